//! # navratna-db: Database Layer for Navratna
//!
//! SQLite storage for the gemstone business, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Navratna Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   navratna-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ InventoryRepo  │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo       │    │ 001_init.sql │ │   │
//! │  │   │               │    │ ClientRepo ... │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                              │                                  │   │
//! │  │                              ▼ business rules                   │   │
//! │  │                        navratna-core                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL, foreign keys on)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use navratna_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("navratna.db")).await?;
//! let rubies = db.inventory().search("ruby", None).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CertificationRepository, ClientRepository, ConsultationRepository, InventoryRepository,
    InventoryStats, Receivables, SaleRepository, SaleSummary, SupplierRepository, TaskRepository,
};
