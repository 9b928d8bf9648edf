//! # Repository Module
//!
//! One repository per entity, each a thin handle over the shared pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │  db.sales().create(input, "NR")                                │
//! │       ▼                                                                 │
//! │  SaleRepository ── BEGIN ── read stone ── navratna_core::build_sale    │
//! │       │                     insert sale ── mark stone Sold ── COMMIT   │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into private `*Row` structs (`sqlx::FromRow`) and
//! converted to the domain types; list columns are JSON text.
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - stones, search, stock statistics
//! - [`ClientRepository`] / [`SupplierRepository`] - CRM
//! - [`SaleRepository`] - sales with stone status coupling
//! - [`CertificationRepository`] - lab submissions
//! - [`ConsultationRepository`] - astrology consultations and follow-ups
//! - [`TaskRepository`] - to-do items

pub mod certification;
pub mod client;
pub mod consultation;
pub mod inventory;
pub mod sale;
pub mod supplier;
pub mod task;

pub use certification::CertificationRepository;
pub use client::ClientRepository;
pub use consultation::ConsultationRepository;
pub use inventory::{InventoryRepository, InventoryStats};
pub use sale::{Receivables, SaleRepository, SaleSummary};
pub use supplier::SupplierRepository;
pub use task::TaskRepository;

use crate::error::{DbError, DbResult};

/// Serializes a string list for a JSON text column.
pub(crate) fn encode_list(column: &str, values: &[String]) -> DbResult<String> {
    serde_json::to_string(values).map_err(|e| DbError::CorruptData {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

/// Reads a JSON text column back into a string list.
pub(crate) fn decode_list(column: &str, raw: &str) -> DbResult<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| DbError::CorruptData {
        column: column.to_string(),
        reason: e.to_string(),
    })
}

/// `LIKE` pattern matching `term` anywhere, with wildcards escaped (`ESCAPE '\'`).
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use navratna_core::types::{
        ClientInput, ClientType, InventoryInput, LoyaltyLevel, QualityGrade, SaleInput,
        StoneStatus,
    };

    use crate::pool::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn stone_input(code: &str, gem: &str, purchase: i64, selling: i64) -> InventoryInput {
        InventoryInput {
            stone_code: code.to_string(),
            gem_type: gem.to_string(),
            carat: 3.1,
            origin: "Ceylon".to_string(),
            shape: Some("Oval".to_string()),
            color: Some("Vivid".to_string()),
            clarity: Some("VS".to_string()),
            quality_grade: QualityGrade::Aa,
            certification_lab: None,
            certificate_file: None,
            purchase_price_paise: purchase,
            selling_price_paise: selling,
            status: StoneStatus::InStock,
            tags: vec!["jyotish".to_string()],
            supplier_id: None,
            notes: None,
        }
    }

    pub fn client_input(name: &str) -> ClientInput {
        ClientInput {
            name: name.to_string(),
            client_type: ClientType::Astrologer,
            loyalty_level: LoyaltyLevel::Silver,
            phone: Some("9829012345".to_string()),
            email: None,
            city: Some("Jaipur".to_string()),
            address: None,
            gstin: None,
            notes: None,
        }
    }

    pub fn sale_input(client_id: &str, inventory_id: &str, total: i64, paid: i64) -> SaleInput {
        SaleInput {
            client_id: client_id.to_string(),
            inventory_id: inventory_id.to_string(),
            sale_date: date(2026, 10, 15),
            total_amount_paise: total,
            amount_paid_paise: paid,
            payment_status: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_column_round_trip() {
        let tags = vec!["premium".to_string(), "navratna".to_string()];
        let raw = encode_list("tags", &tags).unwrap();
        assert_eq!(raw, r#"["premium","navratna"]"#);
        assert_eq!(decode_list("tags", &raw).unwrap(), tags);
        assert!(decode_list("tags", "").unwrap().is_empty());
        assert!(decode_list("tags", "not json").is_err());
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ruby"), "%ruby%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
