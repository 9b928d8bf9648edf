//! # Certification Repository
//!
//! Lab submissions per stone. Reaching `Certified` also records the lab on
//! the stone when it has none yet.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info};

use navratna_core::certification::{advance, apply_certification_update};
use navratna_core::types::{Certification, CertificationInput, CertificationStatus};

use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, inventory_id, lab, submitted_date, expected_date,
        certificate_number, status, cost_paise, notes, created_at, updated_at
    FROM certifications
"#;

#[derive(Debug, sqlx::FromRow)]
struct CertificationRow {
    id: String,
    inventory_id: String,
    lab: String,
    submitted_date: NaiveDate,
    expected_date: Option<NaiveDate>,
    certificate_number: Option<String>,
    status: CertificationStatus,
    cost_paise: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CertificationRow> for Certification {
    fn from(row: CertificationRow) -> Self {
        Certification {
            id: row.id,
            inventory_id: row.inventory_id,
            lab: row.lab,
            submitted_date: row.submitted_date,
            expected_date: row.expected_date,
            certificate_number: row.certificate_number,
            status: row.status,
            cost_paise: row.cost_paise,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn fetch_certification<'e, E>(executor: E, id: &str) -> DbResult<Option<Certification>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    let row: Option<CertificationRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Certification::from))
}

async fn write_changes<'e, E>(executor: E, cert: &Certification) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE certifications SET
            lab = ?2,
            submitted_date = ?3,
            expected_date = ?4,
            certificate_number = ?5,
            status = ?6,
            cost_paise = ?7,
            notes = ?8,
            updated_at = ?9
        WHERE id = ?1
        "#,
    )
    .bind(&cert.id)
    .bind(&cert.lab)
    .bind(cert.submitted_date)
    .bind(cert.expected_date)
    .bind(&cert.certificate_number)
    .bind(cert.status)
    .bind(cert.cost_paise)
    .bind(&cert.notes)
    .bind(cert.updated_at)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Certification", &cert.id));
    }
    Ok(())
}

async fn record_lab_on_stone<'e, E>(executor: E, cert: &Certification) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE inventory
        SET certification_lab = ?2, updated_at = ?3
        WHERE id = ?1 AND (certification_lab IS NULL OR trim(certification_lab) = '')
        "#,
    )
    .bind(&cert.inventory_id)
    .bind(&cert.lab)
    .bind(cert.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Repository for certification database operations.
#[derive(Debug, Clone)]
pub struct CertificationRepository {
    pool: SqlitePool,
}

impl CertificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CertificationRepository { pool }
    }

    /// All certifications, latest submission first.
    pub async fn list(&self) -> DbResult<Vec<Certification>> {
        let sql = format!("{} ORDER BY submitted_date DESC, created_at DESC", SELECT_COLUMNS);
        let rows: Vec<CertificationRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Certification::from).collect())
    }

    /// Certification history of one stone, oldest first.
    pub async fn list_by_inventory(&self, inventory_id: &str) -> DbResult<Vec<Certification>> {
        let sql = format!(
            "{} WHERE inventory_id = ?1 ORDER BY submitted_date, created_at",
            SELECT_COLUMNS
        );
        let rows: Vec<CertificationRow> = sqlx::query_as(&sql)
            .bind(inventory_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Certification::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Certification>> {
        fetch_certification(&self.pool, id).await
    }

    /// Inserts a certification.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - unknown stone
    pub async fn insert(&self, cert: &Certification) -> DbResult<Certification> {
        debug!(id = %cert.id, inventory_id = %cert.inventory_id, lab = %cert.lab, "Inserting certification");

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO certifications (
                id, inventory_id, lab, submitted_date, expected_date,
                certificate_number, status, cost_paise, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&cert.id)
        .bind(&cert.inventory_id)
        .bind(&cert.lab)
        .bind(cert.submitted_date)
        .bind(cert.expected_date)
        .bind(&cert.certificate_number)
        .bind(cert.status)
        .bind(cert.cost_paise)
        .bind(&cert.notes)
        .bind(cert.created_at)
        .bind(cert.updated_at)
        .execute(&mut *tx)
        .await?;

        if cert.status == CertificationStatus::Certified {
            record_lab_on_stone(&mut *tx, cert).await?;
        }
        tx.commit().await?;

        Ok(cert.clone())
    }

    /// Applies an edit; the status may only stay or move one step forward.
    pub async fn update(&self, id: &str, input: CertificationInput) -> DbResult<Certification> {
        let mut tx = self.pool.begin().await?;
        let mut cert = fetch_certification(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Certification", id))?;

        apply_certification_update(&mut cert, input, Utc::now())?;
        write_changes(&mut *tx, &cert).await?;
        if cert.status == CertificationStatus::Certified {
            record_lab_on_stone(&mut *tx, &cert).await?;
        }
        tx.commit().await?;

        debug!(id = %cert.id, status = %cert.status, "Certification updated");
        Ok(cert)
    }

    /// Moves a certification one step along its lifecycle.
    ///
    /// ## Returns
    /// * `Err(DbError::Rule)` - already certified, or certifying without a number
    pub async fn advance_status(
        &self,
        id: &str,
        certificate_number: Option<String>,
    ) -> DbResult<Certification> {
        let mut tx = self.pool.begin().await?;
        let mut cert = fetch_certification(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Certification", id))?;

        let from = cert.status;
        let to = advance(&mut cert, certificate_number, Utc::now())?;
        write_changes(&mut *tx, &cert).await?;
        if to == CertificationStatus::Certified {
            record_lab_on_stone(&mut *tx, &cert).await?;
        }
        tx.commit().await?;

        info!(id = %cert.id, from = %from, to = %to, "Certification advanced");
        Ok(cert)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting certification");

        let result = sqlx::query("DELETE FROM certifications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Certification", id));
        }
        Ok(())
    }

    /// Certifications not yet completed.
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM certifications WHERE status != 'certified'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::fixtures::{date, db, stone_input};
    use navratna_core::types::InventoryItem;
    use navratna_core::CoreError;

    async fn submitted(db: &Database) -> (InventoryItem, Certification) {
        let stone = InventoryItem::new(
            stone_input("EMR-0042", "Emerald", 2_00_000_00, 2_80_000_00),
            Utc::now(),
        );
        db.inventory().insert(&stone).await.unwrap();
        let cert = Certification::new(
            CertificationInput {
                inventory_id: stone.id.clone(),
                lab: "GRS".to_string(),
                submitted_date: date(2026, 10, 1),
                expected_date: Some(date(2026, 10, 20)),
                certificate_number: None,
                status: CertificationStatus::Pending,
                cost_paise: 3_500_00,
                notes: None,
            },
            Utc::now(),
        );
        db.certifications().insert(&cert).await.unwrap();
        (stone, cert)
    }

    #[tokio::test]
    async fn test_advance_through_lifecycle() {
        let db = db().await;
        let (stone, cert) = submitted(&db).await;
        let repo = db.certifications();

        assert_eq!(
            repo.advance_status(&cert.id, None).await.unwrap().status,
            CertificationStatus::InProgress
        );
        assert_eq!(
            repo.advance_status(&cert.id, None).await.unwrap().status,
            CertificationStatus::Received
        );
        assert_eq!(repo.count_pending().await.unwrap(), 1);

        let done = repo
            .advance_status(&cert.id, Some("GRS2026-104233".to_string()))
            .await
            .unwrap();
        assert_eq!(done.status, CertificationStatus::Certified);
        assert_eq!(done.certificate_number.as_deref(), Some("GRS2026-104233"));
        assert_eq!(repo.count_pending().await.unwrap(), 0);

        let stone = db.inventory().get_by_id(&stone.id).await.unwrap().unwrap();
        assert_eq!(stone.certification_lab.as_deref(), Some("GRS"));

        let err = repo.advance_status(&cert.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidCertificationTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_certified_without_number_is_not_saved() {
        let db = db().await;
        let (_, cert) = submitted(&db).await;
        let repo = db.certifications();
        repo.advance_status(&cert.id, None).await.unwrap();
        repo.advance_status(&cert.id, None).await.unwrap();

        assert!(repo.advance_status(&cert.id, None).await.is_err());
        let stored = repo.get_by_id(&cert.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CertificationStatus::Received);
    }

    #[tokio::test]
    async fn test_update_cannot_skip_steps() {
        let db = db().await;
        let (stone, cert) = submitted(&db).await;
        let repo = db.certifications();
        let input = CertificationInput {
            inventory_id: stone.id.clone(),
            lab: "GRS".to_string(),
            submitted_date: cert.submitted_date,
            expected_date: None,
            certificate_number: Some("X-1".to_string()),
            status: CertificationStatus::Certified,
            cost_paise: cert.cost_paise,
            notes: None,
        };
        assert!(matches!(
            repo.update(&cert.id, input).await,
            Err(DbError::Rule(_))
        ));
    }

    #[tokio::test]
    async fn test_history_and_foreign_key() {
        let db = db().await;
        let (stone, cert) = submitted(&db).await;
        let history = db.certifications().list_by_inventory(&stone.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, cert.id);
        assert_eq!(history[0].expected_date, Some(date(2026, 10, 20)));

        let mut orphan = cert.clone();
        orphan.id = uuid::Uuid::new_v4().to_string();
        orphan.inventory_id = uuid::Uuid::new_v4().to_string();
        assert!(matches!(
            db.certifications().insert(&orphan).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        db.certifications().delete(&cert.id).await.unwrap();
        assert!(db.certifications().list().await.unwrap().is_empty());
    }
}
