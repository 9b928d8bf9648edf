//! # navratna-core: Pure Business Logic for Navratna
//!
//! This crate holds the business rules of the gemstone trading backend as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Navratna Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │  Inventory ─ Clients ─ Sales ─ Certifications ─ Invoice print   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    navratna-api (axum)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ navratna-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   types  money  valuation  bulk  quality  invoice  words        │   │
//! │  │   tax    demand recommendation  certification  validation       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    navratna-db (SQLite)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (InventoryItem, Client, Sale, ...)
//! - [`money`] - Integer paise money type with Indian digit grouping
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`sale`] - Profit, margin and payment-status arithmetic
//! - [`certification`] - Certification status progression
//! - [`valuation`] - Valuation calculator (multiplier tables)
//! - [`bulk`] - Bulk-purchase quote and budget optimizer
//! - [`quality`] - Quality comparison scoring
//! - [`invoice`] - Invoice totals, GST split, round-off, UPI link
//! - [`words`] - Indian amount-to-words converter
//! - [`tax`] - HSN/SAC table, GST breakdown, filing calendar
//! - [`demand`] - Static demand chart data
//! - [`recommendation`] - Recommendation strategies (zodiac, planet, analysis)
//!
//! ## Example Usage
//!
//! ```rust
//! use navratna_core::money::Money;
//! use navratna_core::types::TaxRate;
//!
//! let price = Money::from_paise(1_000_000); // ₹10,000.00
//! let gst = price.calculate_tax(TaxRate::from_bps(25)); // 0.25%
//! assert_eq!(gst.paise(), 2_500);
//! ```

pub mod bulk;
pub mod certification;
pub mod demand;
pub mod error;
pub mod invoice;
pub mod money;
pub mod quality;
pub mod recommendation;
pub mod sale;
pub mod tax;
pub mod types;
pub mod validation;
pub mod valuation;
pub mod words;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of lines on a single invoice.
pub const MAX_INVOICE_LINES: usize = 50;

/// Maximum carat weight accepted for a single lot.
pub const MAX_CARAT: f64 = 10_000.0;

/// Maximum number of tags on an inventory item.
pub const MAX_TAGS: usize = 20;
