//! # Consultation Repository
//!
//! Astrology consultations and their follow-up dates.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use navratna_core::types::{Consultation, ConsultationStatus};

use super::{decode_list, encode_list};
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, client_id, consultation_date, topic, zodiac_sign,
        recommended_stones, fee_paise, status, follow_up_date, notes,
        created_at, updated_at
    FROM consultations
"#;

#[derive(Debug, sqlx::FromRow)]
struct ConsultationRow {
    id: String,
    client_id: String,
    consultation_date: NaiveDate,
    topic: String,
    zodiac_sign: Option<String>,
    recommended_stones: String,
    fee_paise: i64,
    status: ConsultationStatus,
    follow_up_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConsultationRow> for Consultation {
    type Error = DbError;

    fn try_from(row: ConsultationRow) -> DbResult<Self> {
        Ok(Consultation {
            recommended_stones: decode_list(
                "consultations.recommended_stones",
                &row.recommended_stones,
            )?,
            id: row.id,
            client_id: row.client_id,
            consultation_date: row.consultation_date,
            topic: row.topic,
            zodiac_sign: row.zodiac_sign,
            fee_paise: row.fee_paise,
            status: row.status,
            follow_up_date: row.follow_up_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_consultations(rows: Vec<ConsultationRow>) -> DbResult<Vec<Consultation>> {
    rows.into_iter().map(Consultation::try_from).collect()
}

/// Repository for consultation database operations.
#[derive(Debug, Clone)]
pub struct ConsultationRepository {
    pool: SqlitePool,
}

impl ConsultationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ConsultationRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Consultation>> {
        let sql = format!("{} ORDER BY consultation_date DESC, created_at DESC", SELECT_COLUMNS);
        let rows: Vec<ConsultationRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        into_consultations(rows)
    }

    pub async fn list_by_client(&self, client_id: &str) -> DbResult<Vec<Consultation>> {
        let sql = format!(
            "{} WHERE client_id = ?1 ORDER BY consultation_date DESC, created_at DESC",
            SELECT_COLUMNS
        );
        let rows: Vec<ConsultationRow> = sqlx::query_as(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;
        into_consultations(rows)
    }

    /// Follow-ups due on or after `today`, soonest first. Cancelled
    /// consultations are skipped.
    pub async fn upcoming_follow_ups(&self, today: NaiveDate) -> DbResult<Vec<Consultation>> {
        let sql = format!(
            r#"{}
            WHERE follow_up_date IS NOT NULL
              AND follow_up_date >= ?1
              AND status != 'cancelled'
            ORDER BY follow_up_date
            "#,
            SELECT_COLUMNS
        );
        let rows: Vec<ConsultationRow> = sqlx::query_as(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;
        into_consultations(rows)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Consultation>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<ConsultationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Consultation::try_from).transpose()
    }

    /// Inserts a consultation.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - unknown client
    pub async fn insert(&self, consultation: &Consultation) -> DbResult<Consultation> {
        debug!(id = %consultation.id, client_id = %consultation.client_id, "Inserting consultation");

        sqlx::query(
            r#"
            INSERT INTO consultations (
                id, client_id, consultation_date, topic, zodiac_sign,
                recommended_stones, fee_paise, status, follow_up_date, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&consultation.id)
        .bind(&consultation.client_id)
        .bind(consultation.consultation_date)
        .bind(&consultation.topic)
        .bind(&consultation.zodiac_sign)
        .bind(encode_list(
            "consultations.recommended_stones",
            &consultation.recommended_stones,
        )?)
        .bind(consultation.fee_paise)
        .bind(consultation.status)
        .bind(consultation.follow_up_date)
        .bind(&consultation.notes)
        .bind(consultation.created_at)
        .bind(consultation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(consultation.clone())
    }

    pub async fn update(&self, consultation: &Consultation) -> DbResult<Consultation> {
        debug!(id = %consultation.id, "Updating consultation");

        let result = sqlx::query(
            r#"
            UPDATE consultations SET
                client_id = ?2,
                consultation_date = ?3,
                topic = ?4,
                zodiac_sign = ?5,
                recommended_stones = ?6,
                fee_paise = ?7,
                status = ?8,
                follow_up_date = ?9,
                notes = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&consultation.id)
        .bind(&consultation.client_id)
        .bind(consultation.consultation_date)
        .bind(&consultation.topic)
        .bind(&consultation.zodiac_sign)
        .bind(encode_list(
            "consultations.recommended_stones",
            &consultation.recommended_stones,
        )?)
        .bind(consultation.fee_paise)
        .bind(consultation.status)
        .bind(consultation.follow_up_date)
        .bind(&consultation.notes)
        .bind(consultation.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Consultation", &consultation.id));
        }
        Ok(consultation.clone())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting consultation");

        let result = sqlx::query("DELETE FROM consultations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Consultation", id));
        }
        Ok(())
    }
}
