//! # HTTP Routes
//!
//! One module per resource. Handlers validate with `navratna-core`,
//! persist through `navratna-db` repositories and return `Json<T>` or an
//! [`ApiError`](crate::error::ApiError).

pub mod astrological;
pub mod calculators;
pub mod certifications;
pub mod clients;
pub mod consultations;
pub mod dashboard;
pub mod demand;
pub mod health;
pub mod inventory;
pub mod sales;
pub mod suppliers;
pub mod tasks;
pub mod tax;

use chrono::{Local, NaiveDate};

use navratna_core::validation::validate_uuid;

use crate::error::ApiResult;

/// Business date used for overdue and follow-up checks.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rejects path ids that are not UUIDs before touching the database.
pub(crate) fn check_id(id: &str) -> ApiResult<()> {
    validate_uuid("id", id)?;
    Ok(())
}
