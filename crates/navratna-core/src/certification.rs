//! # Certification Lifecycle
//!
//! ```text
//! Pending ──► In Progress ──► Received ──► Certified
//!    │             │              │            │
//!    └─ submitted  └─ at the lab  └─ returned  └─ certificate number recorded
//! ```
//!
//! Status moves one step at a time. Moving backwards, skipping a step, or
//! advancing past `Certified` is rejected.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Certification, CertificationInput, CertificationStatus};
use chrono::{DateTime, Utc};

impl CertificationStatus {
    /// The status that follows this one, if any.
    pub fn next(&self) -> Option<CertificationStatus> {
        match self {
            CertificationStatus::Pending => Some(CertificationStatus::InProgress),
            CertificationStatus::InProgress => Some(CertificationStatus::Received),
            CertificationStatus::Received => Some(CertificationStatus::Certified),
            CertificationStatus::Certified => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

/// Checks a status change.
///
/// Staying on the same status is allowed so that ordinary edits of other
/// fields pass through.
pub fn check_transition(from: CertificationStatus, to: CertificationStatus) -> CoreResult<()> {
    if from == to || from.next() == Some(to) {
        return Ok(());
    }

    Err(CoreError::InvalidCertificationTransition {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Advances a certification one step.
///
/// ## Arguments
/// * `certificate_number` - replaces the stored number when given; required
///   (here or already on record) when the next step is `Certified`
pub fn advance(
    cert: &mut Certification,
    certificate_number: Option<String>,
    now: DateTime<Utc>,
) -> CoreResult<CertificationStatus> {
    let next = cert
        .status
        .next()
        .ok_or_else(|| CoreError::InvalidCertificationTransition {
            from: cert.status.to_string(),
            to: cert.status.to_string(),
        })?;

    let number = certificate_number
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| cert.certificate_number.clone());

    if next == CertificationStatus::Certified && number.is_none() {
        return Err(ValidationError::required("certificateNumber").into());
    }

    cert.certificate_number = number;
    cert.status = next;
    cert.updated_at = now;
    Ok(next)
}

/// Applies an edit to a certification.
///
/// The status may stay put or move one step forward; the stone a
/// certification belongs to never changes.
pub fn apply_certification_update(
    cert: &mut Certification,
    input: CertificationInput,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    check_transition(cert.status, input.status)?;

    cert.lab = input.lab.trim().to_string();
    cert.submitted_date = input.submitted_date;
    cert.expected_date = input.expected_date;
    cert.certificate_number = input.certificate_number;
    cert.status = input.status;
    cert.cost_paise = input.cost_paise;
    cert.notes = input.notes;
    cert.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CertificationInput;
    use chrono::NaiveDate;

    fn pending() -> Certification {
        Certification::new(
            CertificationInput {
                inventory_id: crate::types::new_id(),
                lab: "IGI".to_string(),
                submitted_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                expected_date: None,
                certificate_number: None,
                status: CertificationStatus::Pending,
                cost_paise: 2_000_00,
                notes: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_walks_the_full_progression() {
        let mut cert = pending();
        assert_eq!(
            advance(&mut cert, None, Utc::now()).unwrap(),
            CertificationStatus::InProgress
        );
        assert_eq!(
            advance(&mut cert, None, Utc::now()).unwrap(),
            CertificationStatus::Received
        );
        assert_eq!(
            advance(&mut cert, Some("IGI-559201".to_string()), Utc::now()).unwrap(),
            CertificationStatus::Certified
        );
        assert_eq!(cert.certificate_number.as_deref(), Some("IGI-559201"));
        assert!(cert.status.is_terminal());
    }

    #[test]
    fn test_certified_requires_number() {
        let mut cert = pending();
        cert.status = CertificationStatus::Received;
        let err = advance(&mut cert, Some("  ".to_string()), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cert.status, CertificationStatus::Received);
    }

    #[test]
    fn test_cannot_advance_past_certified() {
        let mut cert = pending();
        cert.status = CertificationStatus::Certified;
        cert.certificate_number = Some("GIA-1".to_string());
        assert!(matches!(
            advance(&mut cert, None, Utc::now()),
            Err(CoreError::InvalidCertificationTransition { .. })
        ));
    }

    #[test]
    fn test_update_rejects_skipped_step() {
        let mut cert = pending();
        let mut input = CertificationInput {
            inventory_id: cert.inventory_id.clone(),
            lab: " GIA ".to_string(),
            submitted_date: cert.submitted_date,
            expected_date: None,
            certificate_number: None,
            status: CertificationStatus::Received,
            cost_paise: 2_500_00,
            notes: None,
        };
        assert!(apply_certification_update(&mut cert, input.clone(), Utc::now()).is_err());
        assert_eq!(cert.status, CertificationStatus::Pending);

        input.status = CertificationStatus::InProgress;
        apply_certification_update(&mut cert, input, Utc::now()).unwrap();
        assert_eq!(cert.lab, "GIA");
        assert_eq!(cert.cost_paise, 2_500_00);
    }

    #[test]
    fn test_check_transition() {
        use CertificationStatus::*;
        assert!(check_transition(Pending, Pending).is_ok());
        assert!(check_transition(Pending, InProgress).is_ok());
        assert!(check_transition(Pending, Received).is_err());
        assert!(check_transition(Received, InProgress).is_err());
        assert!(check_transition(Certified, Pending).is_err());
    }
}
