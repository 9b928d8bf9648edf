//! # Inventory Repository
//!
//! Database operations for gemstone lots.
//!
//! ## Key Operations
//! - CRUD by id, lookup by stone code
//! - Text search over code, gem type, origin, colour and tags
//! - Status changes (sales drive these through [`set_stone_status`])
//! - Stock statistics for the dashboard

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use navratna_core::types::{InventoryItem, QualityGrade, StoneStatus};

use super::{contains_pattern, decode_list, encode_list};
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, stone_code, gem_type, carat, origin, shape, color, clarity,
        quality_grade, certification_lab, certificate_file,
        purchase_price_paise, selling_price_paise, status, tags,
        supplier_id, notes, created_at, updated_at
    FROM inventory
"#;

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    stone_code: String,
    gem_type: String,
    carat: f64,
    origin: String,
    shape: Option<String>,
    color: Option<String>,
    clarity: Option<String>,
    quality_grade: QualityGrade,
    certification_lab: Option<String>,
    certificate_file: Option<String>,
    purchase_price_paise: i64,
    selling_price_paise: i64,
    status: StoneStatus,
    tags: String,
    supplier_id: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = DbError;

    fn try_from(row: InventoryRow) -> DbResult<Self> {
        Ok(InventoryItem {
            tags: decode_list("inventory.tags", &row.tags)?,
            id: row.id,
            stone_code: row.stone_code,
            gem_type: row.gem_type,
            carat: row.carat,
            origin: row.origin,
            shape: row.shape,
            color: row.color,
            clarity: row.clarity,
            quality_grade: row.quality_grade,
            certification_lab: row.certification_lab,
            certificate_file: row.certificate_file,
            purchase_price_paise: row.purchase_price_paise,
            selling_price_paise: row.selling_price_paise,
            status: row.status,
            supplier_id: row.supplier_id,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_items(rows: Vec<InventoryRow>) -> DbResult<Vec<InventoryItem>> {
    rows.into_iter().map(InventoryItem::try_from).collect()
}

/// Stock counts and totals, grouped by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_count: i64,
    pub in_stock_count: i64,
    pub reserved_count: i64,
    pub sold_count: i64,
    /// Purchase cost of stones not yet sold.
    pub stock_cost_paise: i64,
    /// Asking price of stones not yet sold.
    pub stock_value_paise: i64,
}

// =============================================================================
// Executor-level helpers (shared with the sale and certification transactions)
// =============================================================================

pub(crate) async fn fetch_stone<'e, E>(executor: E, id: &str) -> DbResult<Option<InventoryItem>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    let row: Option<InventoryRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    row.map(InventoryItem::try_from).transpose()
}

pub(crate) async fn set_stone_status<'e, E>(
    executor: E,
    id: &str,
    status: StoneStatus,
) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, status = %status, "Setting stone status");

    let result = sqlx::query("UPDATE inventory SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("InventoryItem", id));
    }
    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// All stones, newest first.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!("{} ORDER BY created_at DESC, stone_code", SELECT_COLUMNS);
        let rows: Vec<InventoryRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        into_items(rows)
    }

    /// Searches stones by free text and/or status.
    ///
    /// The text matches anywhere in the stone code, gem type, origin,
    /// colour or tags (case-insensitive for ASCII). An empty query with no
    /// status returns everything.
    pub async fn search(
        &self,
        query: &str,
        status: Option<StoneStatus>,
    ) -> DbResult<Vec<InventoryItem>> {
        let query = query.trim();
        debug!(query = %query, status = ?status, "Searching inventory");

        let sql = format!(
            r#"{}
            WHERE (?1 = ''
                OR stone_code LIKE ?2 ESCAPE '\'
                OR gem_type LIKE ?2 ESCAPE '\'
                OR origin LIKE ?2 ESCAPE '\'
                OR color LIKE ?2 ESCAPE '\'
                OR tags LIKE ?2 ESCAPE '\')
            AND (?3 IS NULL OR status = ?3)
            ORDER BY created_at DESC, stone_code
            "#,
            SELECT_COLUMNS
        );

        let rows: Vec<InventoryRow> = sqlx::query_as(&sql)
            .bind(query)
            .bind(contains_pattern(query))
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned stones");
        into_items(rows)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        fetch_stone(&self.pool, id).await
    }

    pub async fn get_by_stone_code(&self, stone_code: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("{} WHERE stone_code = ?1", SELECT_COLUMNS);
        let row: Option<InventoryRow> = sqlx::query_as(&sql)
            .bind(stone_code.trim())
            .fetch_optional(&self.pool)
            .await?;
        row.map(InventoryItem::try_from).transpose()
    }

    /// Inserts a new stone.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - stone code already in use
    /// * `Err(DbError::ForeignKeyViolation)` - unknown supplier
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<InventoryItem> {
        debug!(id = %item.id, stone_code = %item.stone_code, "Inserting stone");

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, stone_code, gem_type, carat, origin, shape, color, clarity,
                quality_grade, certification_lab, certificate_file,
                purchase_price_paise, selling_price_paise, status, tags,
                supplier_id, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.stone_code)
        .bind(&item.gem_type)
        .bind(item.carat)
        .bind(&item.origin)
        .bind(&item.shape)
        .bind(&item.color)
        .bind(&item.clarity)
        .bind(item.quality_grade)
        .bind(&item.certification_lab)
        .bind(&item.certificate_file)
        .bind(item.purchase_price_paise)
        .bind(item.selling_price_paise)
        .bind(item.status)
        .bind(encode_list("inventory.tags", &item.tags)?)
        .bind(&item.supplier_id)
        .bind(&item.notes)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &item.stone_code),
            other => other,
        })?;

        Ok(item.clone())
    }

    /// Writes every editable field of an existing stone.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<InventoryItem> {
        debug!(id = %item.id, "Updating stone");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                stone_code = ?2,
                gem_type = ?3,
                carat = ?4,
                origin = ?5,
                shape = ?6,
                color = ?7,
                clarity = ?8,
                quality_grade = ?9,
                certification_lab = ?10,
                certificate_file = ?11,
                purchase_price_paise = ?12,
                selling_price_paise = ?13,
                status = ?14,
                tags = ?15,
                supplier_id = ?16,
                notes = ?17,
                updated_at = ?18
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.stone_code)
        .bind(&item.gem_type)
        .bind(item.carat)
        .bind(&item.origin)
        .bind(&item.shape)
        .bind(&item.color)
        .bind(&item.clarity)
        .bind(item.quality_grade)
        .bind(&item.certification_lab)
        .bind(&item.certificate_file)
        .bind(item.purchase_price_paise)
        .bind(item.selling_price_paise)
        .bind(item.status)
        .bind(encode_list("inventory.tags", &item.tags)?)
        .bind(&item.supplier_id)
        .bind(&item.notes)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &item.stone_code),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", &item.id));
        }

        Ok(item.clone())
    }

    pub async fn set_status(&self, id: &str, status: StoneStatus) -> DbResult<()> {
        set_stone_status(&self.pool, id, status).await
    }

    /// Deletes a stone.
    ///
    /// ## Returns
    /// * `Err(DbError::Referenced)` - the stone has a sale or certification
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting stone");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete("InventoryItem", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", id));
        }
        Ok(())
    }

    /// Counts and totals per status.
    pub async fn stats(&self) -> DbResult<InventoryStats> {
        let stats: InventoryStats = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_count,
                COALESCE(SUM(CASE WHEN status = 'in_stock' THEN 1 ELSE 0 END), 0) AS in_stock_count,
                COALESCE(SUM(CASE WHEN status = 'reserved' THEN 1 ELSE 0 END), 0) AS reserved_count,
                COALESCE(SUM(CASE WHEN status = 'sold' THEN 1 ELSE 0 END), 0) AS sold_count,
                COALESCE(SUM(CASE WHEN status != 'sold' THEN purchase_price_paise ELSE 0 END), 0)
                    AS stock_cost_paise,
                COALESCE(SUM(CASE WHEN status != 'sold' THEN selling_price_paise ELSE 0 END), 0)
                    AS stock_value_paise
            FROM inventory
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Stones that can still be sold (in stock or reserved).
    pub async fn available(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!(
            "{} WHERE status IN ('in_stock', 'reserved') ORDER BY gem_type, carat DESC",
            SELECT_COLUMNS
        );
        let rows: Vec<InventoryRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        into_items(rows)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{db, stone_input};

    #[tokio::test]
    async fn test_insert_and_get_preserves_fields() {
        let db = db().await;
        let repo = db.inventory();
        let mut input = stone_input("RUB-0001", "Ruby", 1_00_000_00, 1_60_000_00);
        input.tags = vec!["premium".to_string(), "burmese".to_string()];
        input.certification_lab = Some("GRS".to_string());
        let item = InventoryItem::new(input, Utc::now());

        repo.insert(&item).await.unwrap();
        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();

        assert_eq!(loaded.stone_code, "RUB-0001");
        assert_eq!(loaded.tags, item.tags);
        assert_eq!(loaded.quality_grade, QualityGrade::Aa);
        assert_eq!(loaded.status, StoneStatus::InStock);
        assert_eq!(loaded.selling_price_paise, 1_60_000_00);
        assert_eq!(loaded.certification_lab.as_deref(), Some("GRS"));
        assert_eq!(
            repo.get_by_stone_code("RUB-0001").await.unwrap().unwrap().id,
            item.id
        );
    }

    #[tokio::test]
    async fn test_duplicate_stone_code_rejected() {
        let db = db().await;
        let repo = db.inventory();
        let first = InventoryItem::new(stone_input("EMR-0001", "Emerald", 100, 200), Utc::now());
        let second = InventoryItem::new(stone_input("EMR-0001", "Emerald", 100, 200), Utc::now());

        repo.insert(&first).await.unwrap();
        let err = repo.insert(&second).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "stone_code");
                assert_eq!(value, "EMR-0001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_by_text_and_status() {
        let db = db().await;
        let repo = db.inventory();
        for (code, gem) in [("RUB-0001", "Ruby"), ("RUB-0002", "Ruby"), ("PRL-0001", "Pearl")] {
            repo.insert(&InventoryItem::new(stone_input(code, gem, 100, 200), Utc::now()))
                .await
                .unwrap();
        }
        let sold = repo.get_by_stone_code("RUB-0002").await.unwrap().unwrap();
        repo.set_status(&sold.id, StoneStatus::Sold).await.unwrap();

        assert_eq!(repo.search("ruby", None).await.unwrap().len(), 2);
        assert_eq!(repo.search("", None).await.unwrap().len(), 3);

        let in_stock = repo.search("rub", Some(StoneStatus::InStock)).await.unwrap();
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].stone_code, "RUB-0001");

        assert_eq!(repo.search("jyotish", None).await.unwrap().len(), 3);
        assert!(repo.search("100%", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = db().await;
        let repo = db.inventory();
        let mut item = InventoryItem::new(stone_input("YSP-0001", "Yellow Sapphire", 100, 200), Utc::now());
        repo.insert(&item).await.unwrap();

        item.selling_price_paise = 450;
        item.status = StoneStatus::Reserved;
        repo.update(&item).await.unwrap();
        let loaded = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.selling_price_paise, 450);
        assert_eq!(loaded.status, StoneStatus::Reserved);

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&item.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stats_by_status() {
        let db = db().await;
        let repo = db.inventory();
        let a = InventoryItem::new(stone_input("A-1", "Ruby", 1_000, 2_000), Utc::now());
        let b = InventoryItem::new(stone_input("B-1", "Pearl", 300, 500), Utc::now());
        let c = InventoryItem::new(stone_input("C-1", "Diamond", 5_000, 9_000), Utc::now());
        for item in [&a, &b, &c] {
            repo.insert(item).await.unwrap();
        }
        repo.set_status(&b.id, StoneStatus::Reserved).await.unwrap();
        repo.set_status(&c.id, StoneStatus::Sold).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(
            stats,
            InventoryStats {
                total_count: 3,
                in_stock_count: 1,
                reserved_count: 1,
                sold_count: 1,
                stock_cost_paise: 1_300,
                stock_value_paise: 2_500,
            }
        );
        assert_eq!(repo.available().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_stats_are_zero() {
        let db = db().await;
        assert_eq!(db.inventory().stats().await.unwrap(), InventoryStats::default());
    }
}
