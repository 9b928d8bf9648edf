//! # Validation Module
//!
//! Input validation for every entity form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form schema                                         │
//! │  ├── Required fields, basic formats                                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use navratna_core::validation::{validate_stone_code, validate_gstin};
//!
//! assert!(validate_stone_code("RUB-0001").is_ok());
//! assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{
    CertificationInput, CertificationStatus, ClientInput, ConsultationInput, InventoryInput,
    SaleInput, SupplierInput, TaskInput,
};
use crate::{MAX_CARAT, MAX_TAGS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 2000;
const MAX_TAG_LEN: usize = 40;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional free-text field against a length limit.
pub fn validate_optional(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a stone code (the business identifier of a lot).
///
/// ## Rules
/// - Must not be empty, at most 32 characters
/// - Letters, digits, hyphens, underscores and slashes only
pub fn validate_stone_code(code: &str) -> ValidationResult<()> {
    validate_required("stoneCode", code, 32)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "stoneCode".to_string(),
            reason: "must contain only letters, numbers, '-', '_' and '/'".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional email address (loose shape check).
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional phone number: 7 to 15 digits, allowing `+`, spaces and hyphens.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if !allowed || !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 7 to 15 digits".to_string(),
        });
    }

    Ok(())
}

const GSTIN_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Validates a GSTIN (Indian GST identification number).
///
/// ## Layout
/// ```text
/// 27 AAPFU0939F 1 Z V
/// ── ────────── ─ ─ ─
/// │  │          │ │ └─ check character (mod-36)
/// │  │          │ └─── always 'Z'
/// │  │          └───── entity number for the PAN
/// │  └──────────────── PAN (5 letters, 4 digits, 1 letter)
/// └─────────────────── state code
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim().to_ascii_uppercase();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "gstin".to_string(),
        reason: reason.to_string(),
    };

    let bytes = gstin.as_bytes();
    if bytes.len() != 15 {
        return Err(invalid("must be 15 characters"));
    }

    let state_ok = bytes[0..2].iter().all(u8::is_ascii_digit);
    let pan_ok = bytes[2..7].iter().all(u8::is_ascii_uppercase)
        && bytes[7..11].iter().all(u8::is_ascii_digit)
        && bytes[11].is_ascii_uppercase();
    let tail_ok = bytes[12].is_ascii_alphanumeric() && bytes[13] == b'Z';

    if !state_ok || !pan_ok || !tail_ok {
        return Err(invalid("does not follow the GSTIN layout"));
    }

    if gstin_check_char(&bytes[..14]) != Some(bytes[14]) {
        return Err(invalid("check character mismatch"));
    }

    Ok(())
}

/// Computes the GSTIN check character over the first 14 characters.
fn gstin_check_char(body: &[u8]) -> Option<u8> {
    let mut sum = 0usize;
    for (i, c) in body.iter().enumerate() {
        let value = GSTIN_ALPHABET.iter().position(|a| a == c)?;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }
    Some(GSTIN_ALPHABET[(36 - sum % 36) % 36])
}

/// Validates a search query. Returns the trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a tag list (count and per-tag length).
pub fn validate_tags(tags: &[String]) -> ValidationResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::OutOfRange {
            field: "tags".to_string(),
            min: 0,
            max: MAX_TAGS as i64,
        });
    }

    for tag in tags {
        validate_required("tag", tag, MAX_TAG_LEN)?;
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a carat weight: finite, positive, at most [`MAX_CARAT`].
pub fn validate_carat(carat: f64) -> ValidationResult<()> {
    if !carat.is_finite() || carat <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "carat".to_string(),
        });
    }

    if carat > MAX_CARAT {
        return Err(ValidationError::OutOfRange {
            field: "carat".to_string(),
            min: 0,
            max: MAX_CARAT as i64,
        });
    }

    Ok(())
}

/// Validates an amount in paise: non-negative.
pub fn validate_amount_paise(field: &str, paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a supplier rating (1-5).
pub fn validate_rating(rating: Option<i64>) -> ValidationResult<()> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_inventory_input(input: &InventoryInput) -> ValidationResult<()> {
    validate_stone_code(&input.stone_code)?;
    validate_required("gemType", &input.gem_type, 60)?;
    validate_carat(input.carat)?;
    validate_required("origin", &input.origin, 60)?;
    validate_amount_paise("purchasePrice", input.purchase_price_paise)?;
    validate_amount_paise("sellingPrice", input.selling_price_paise)?;
    validate_tags(&input.tags)?;
    if let Some(supplier_id) = &input.supplier_id {
        validate_uuid("supplierId", supplier_id)?;
    }
    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_client_input(input: &ClientInput) -> ValidationResult<()> {
    validate_required("name", &input.name, MAX_NAME_LEN)?;
    validate_phone(input.phone.as_deref())?;
    validate_email(input.email.as_deref())?;
    if let Some(gstin) = input.gstin.as_deref().filter(|g| !g.trim().is_empty()) {
        validate_gstin(gstin)?;
    }
    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_supplier_input(input: &SupplierInput) -> ValidationResult<()> {
    validate_required("name", &input.name, MAX_NAME_LEN)?;
    validate_required("location", &input.location, MAX_NAME_LEN)?;
    validate_phone(input.phone.as_deref())?;
    validate_email(input.email.as_deref())?;
    validate_tags(&input.gemstone_types)?;
    validate_rating(input.rating)?;
    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_sale_input(input: &SaleInput) -> ValidationResult<()> {
    validate_uuid("clientId", &input.client_id)?;
    validate_uuid("inventoryId", &input.inventory_id)?;
    if input.total_amount_paise <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "totalAmount".to_string(),
        });
    }
    validate_amount_paise("amountPaid", input.amount_paid_paise)?;
    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_certification_input(input: &CertificationInput) -> ValidationResult<()> {
    validate_uuid("inventoryId", &input.inventory_id)?;
    validate_required("lab", &input.lab, 60)?;
    validate_amount_paise("cost", input.cost_paise)?;

    if let Some(expected) = input.expected_date {
        if expected < input.submitted_date {
            return Err(ValidationError::InvalidFormat {
                field: "expectedDate".to_string(),
                reason: "must not be before the submission date".to_string(),
            });
        }
    }

    let has_number = input
        .certificate_number
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());
    if input.status == CertificationStatus::Certified && !has_number {
        return Err(ValidationError::required("certificateNumber"));
    }

    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_consultation_input(input: &ConsultationInput) -> ValidationResult<()> {
    validate_uuid("clientId", &input.client_id)?;
    validate_required("topic", &input.topic, MAX_NAME_LEN)?;
    validate_amount_paise("fee", input.fee_paise)?;
    validate_tags(&input.recommended_stones)?;

    if let Some(follow_up) = input.follow_up_date {
        if follow_up < input.consultation_date {
            return Err(ValidationError::InvalidFormat {
                field: "followUpDate".to_string(),
                reason: "must not be before the consultation date".to_string(),
            });
        }
    }

    validate_optional("notes", input.notes.as_deref(), MAX_NOTES_LEN)?;
    Ok(())
}

pub fn validate_task_input(input: &TaskInput) -> ValidationResult<()> {
    validate_required("title", &input.title, MAX_NAME_LEN)?;
    validate_optional("description", input.description.as_deref(), MAX_NOTES_LEN)?;

    match (&input.related_type, &input.related_id) {
        (Some(_), Some(id)) => validate_uuid("relatedId", id)?,
        (None, None) => {}
        (Some(_), None) => return Err(ValidationError::required("relatedId")),
        (None, Some(_)) => return Err(ValidationError::required("relatedType")),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientType, QualityGrade, StoneStatus};
    use chrono::NaiveDate;

    fn inventory_input() -> InventoryInput {
        InventoryInput {
            stone_code: "EME-0042".to_string(),
            gem_type: "Emerald".to_string(),
            carat: 4.1,
            origin: "Colombia".to_string(),
            shape: None,
            color: None,
            clarity: None,
            quality_grade: QualityGrade::Aa,
            certification_lab: None,
            certificate_file: None,
            purchase_price_paise: 80_000_00,
            selling_price_paise: 1_20_000_00,
            status: StoneStatus::InStock,
            tags: vec![],
            supplier_id: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_stone_code() {
        assert!(validate_stone_code("RUB-0001").is_ok());
        assert!(validate_stone_code("LOT/24/7").is_ok());
        assert!(validate_stone_code("").is_err());
        assert!(validate_stone_code("   ").is_err());
        assert!(validate_stone_code("has space").is_err());
        assert!(validate_stone_code(&"A".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
        assert!(validate_gstin("29aagcb7383j1z4").is_ok());
        assert!(validate_gstin("27AAPFU0939F1ZX").is_err());
        assert!(validate_gstin("27AAPFU0939F1").is_err());
        assert!(validate_gstin("AAAPFU0939F1ZVX").is_err());
    }

    #[test]
    fn test_validate_email_and_phone() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("ravi@example.in")).is_ok());
        assert!(validate_email(Some("ravi@example")).is_err());
        assert!(validate_email(Some("@example.in")).is_err());

        assert!(validate_phone(Some("+91 98290-12345")).is_ok());
        assert!(validate_phone(Some("12345")).is_err());
        assert!(validate_phone(Some("98290x12345")).is_err());
    }

    #[test]
    fn test_validate_carat() {
        assert!(validate_carat(0.5).is_ok());
        assert!(validate_carat(0.0).is_err());
        assert!(validate_carat(-1.0).is_err());
        assert!(validate_carat(f64::NAN).is_err());
        assert!(validate_carat(MAX_CARAT + 1.0).is_err());
    }

    #[test]
    fn test_inventory_rejects_missing_required_fields() {
        assert!(validate_inventory_input(&inventory_input()).is_ok());

        let mut input = inventory_input();
        input.gem_type = " ".to_string();
        let err = validate_inventory_input(&input).unwrap_err();
        assert_eq!(err.to_string(), "gemType is required");

        let mut input = inventory_input();
        input.purchase_price_paise = -1;
        assert!(validate_inventory_input(&input).is_err());
    }

    #[test]
    fn test_client_input_gstin_optional() {
        let mut input = ClientInput {
            name: "Shri Ram Mandir Trust".to_string(),
            client_type: ClientType::Temple,
            loyalty_level: Default::default(),
            phone: None,
            email: None,
            city: None,
            address: None,
            gstin: Some(String::new()),
            notes: None,
        };
        assert!(validate_client_input(&input).is_ok());

        input.gstin = Some("27AAPFU0939F1ZX".to_string());
        assert!(validate_client_input(&input).is_err());
    }

    #[test]
    fn test_certification_requires_number_when_certified() {
        let mut input = CertificationInput {
            inventory_id: uuid::Uuid::new_v4().to_string(),
            lab: "GRS".to_string(),
            submitted_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            expected_date: NaiveDate::from_ymd_opt(2026, 9, 20),
            certificate_number: None,
            status: CertificationStatus::Certified,
            cost_paise: 3_500_00,
            notes: None,
        };
        assert!(validate_certification_input(&input).is_err());

        input.certificate_number = Some("GRS2026-091234".to_string());
        assert!(validate_certification_input(&input).is_ok());

        input.expected_date = NaiveDate::from_ymd_opt(2026, 8, 1);
        assert!(validate_certification_input(&input).is_err());
    }

    #[test]
    fn test_task_related_pair() {
        let mut input = TaskInput {
            title: "Send certificate".to_string(),
            description: None,
            due_date: None,
            priority: Default::default(),
            status: Default::default(),
            related_type: Some(crate::types::RelatedType::Client),
            related_id: None,
        };
        assert!(validate_task_input(&input).is_err());

        input.related_id = Some(uuid::Uuid::new_v4().to_string());
        assert!(validate_task_input(&input).is_ok());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }
}
