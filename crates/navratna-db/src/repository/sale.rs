//! # Sale Repository
//!
//! Sales and the stone status they drive.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                           │
//! │     └── stone must be In Stock or Reserved                             │
//! │     └── next invoice number in the financial-year series               │
//! │     └── profit = total − purchase price                                │
//! │     └── stone → Sold                                                   │
//! │                                                                         │
//! │  2. UPDATE (one transaction)                                           │
//! │     └── profit recomputed against the (possibly new) stone             │
//! │     └── stone swapped? old → In Stock, new → Sold                      │
//! │                                                                         │
//! │  3. DELETE (one transaction)                                           │
//! │     └── stone → In Stock                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info};

use navratna_core::invoice::{format_invoice_number, invoice_series, parse_sequence};
use navratna_core::sale::{apply_sale_update, build_sale};
use navratna_core::types::{PaymentStatus, Sale, SaleInput, StoneStatus};

use super::inventory::{fetch_stone, set_stone_status};
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, invoice_number, client_id, inventory_id, sale_date,
        total_amount_paise, profit_paise, payment_status, amount_paid_paise,
        notes, created_at, updated_at
    FROM sales
"#;

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    invoice_number: String,
    client_id: String,
    inventory_id: String,
    sale_date: NaiveDate,
    total_amount_paise: i64,
    profit_paise: i64,
    payment_status: PaymentStatus,
    amount_paid_paise: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            invoice_number: row.invoice_number,
            client_id: row.client_id,
            inventory_id: row.inventory_id,
            sale_date: row.sale_date,
            total_amount_paise: row.total_amount_paise,
            profit_paise: row.profit_paise,
            payment_status: row.payment_status,
            amount_paid_paise: row.amount_paid_paise,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Revenue figures over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub sale_count: i64,
    pub revenue_paise: i64,
    pub profit_paise: i64,
    pub collected_paise: i64,
}

/// Money still owed by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Receivables {
    pub open_sales: i64,
    pub outstanding_paise: i64,
}

// =============================================================================
// Executor-level helpers
// =============================================================================

async fn fetch_sale<'e, E>(executor: E, id: &str) -> DbResult<Option<Sale>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    let row: Option<SaleRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Sale::from))
}

async fn next_sequence<'e, E>(executor: E, prefix: &str, date: NaiveDate) -> DbResult<u32>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let series = invoice_series(prefix, date);
    let numbers: Vec<String> = sqlx::query_scalar(
        "SELECT invoice_number FROM sales WHERE substr(invoice_number, 1, length(?1)) = ?1",
    )
    .bind(&series)
    .fetch_all(executor)
    .await?;

    let last = numbers
        .iter()
        .filter_map(|n| parse_sequence(n))
        .max()
        .unwrap_or(0);
    Ok(last + 1)
}

async fn write_sale<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, invoice_number, client_id, inventory_id, sale_date,
            total_amount_paise, profit_paise, payment_status, amount_paid_paise,
            notes, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(id) DO UPDATE SET
            client_id = excluded.client_id,
            inventory_id = excluded.inventory_id,
            sale_date = excluded.sale_date,
            total_amount_paise = excluded.total_amount_paise,
            profit_paise = excluded.profit_paise,
            payment_status = excluded.payment_status,
            amount_paid_paise = excluded.amount_paid_paise,
            notes = excluded.notes,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.invoice_number)
    .bind(&sale.client_id)
    .bind(&sale.inventory_id)
    .bind(sale.sale_date)
    .bind(sale.total_amount_paise)
    .bind(sale.profit_paise)
    .bind(sale.payment_status)
    .bind(sale.amount_paid_paise)
    .bind(&sale.notes)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(executor)
    .await
    .map_err(|e| match DbError::from(e) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &sale.invoice_number),
        other => other,
    })?;
    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// All sales, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("{} ORDER BY sale_date DESC, invoice_number DESC", SELECT_COLUMNS);
        let rows: Vec<SaleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    pub async fn list_by_client(&self, client_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "{} WHERE client_id = ?1 ORDER BY sale_date DESC, invoice_number DESC",
            SELECT_COLUMNS
        );
        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        fetch_sale(&self.pool, id).await
    }

    pub async fn get_by_invoice_number(&self, invoice_number: &str) -> DbResult<Option<Sale>> {
        let sql = format!("{} WHERE invoice_number = ?1", SELECT_COLUMNS);
        let row: Option<SaleRow> = sqlx::query_as(&sql)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Sale::from))
    }

    /// Next running number in the financial year of `date`.
    pub async fn next_invoice_sequence(&self, prefix: &str, date: NaiveDate) -> DbResult<u32> {
        next_sequence(&self.pool, prefix, date).await
    }

    /// Records a sale and marks its stone sold.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - unknown stone
    /// * `Err(DbError::Rule)` - stone already sold, or inconsistent payment status
    /// * `Err(DbError::ForeignKeyViolation)` - unknown client
    pub async fn create(&self, input: SaleInput, invoice_prefix: &str) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let stone = fetch_stone(&mut *tx, &input.inventory_id)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", &input.inventory_id))?;

        let sequence = next_sequence(&mut *tx, invoice_prefix, input.sale_date).await?;
        let invoice_number = format_invoice_number(invoice_prefix, input.sale_date, sequence);

        let sale = build_sale(input, &stone, invoice_number, Utc::now())?;
        write_sale(&mut *tx, &sale).await?;
        set_stone_status(&mut *tx, &stone.id, StoneStatus::Sold).await?;

        tx.commit().await?;

        info!(
            invoice = %sale.invoice_number,
            stone_code = %stone.stone_code,
            total = sale.total_amount_paise,
            profit = sale.profit_paise,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Edits a sale, recomputing profit and moving the Sold flag when the
    /// stone changes.
    pub async fn update(&self, id: &str, input: SaleInput) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let mut sale = fetch_sale(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;
        let stone = fetch_stone(&mut *tx, &input.inventory_id)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", &input.inventory_id))?;

        let previous_stone = sale.inventory_id.clone();
        apply_sale_update(&mut sale, input, &stone, Utc::now())?;
        write_sale(&mut *tx, &sale).await?;

        if previous_stone != sale.inventory_id {
            debug!(from = %previous_stone, to = %sale.inventory_id, "Sale moved to another stone");
            set_stone_status(&mut *tx, &previous_stone, StoneStatus::InStock).await?;
            set_stone_status(&mut *tx, &sale.inventory_id, StoneStatus::Sold).await?;
        }

        tx.commit().await?;
        debug!(id = %sale.id, profit = sale.profit_paise, "Sale updated");
        Ok(sale)
    }

    /// Deletes a sale and returns its stone to stock.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let sale = fetch_sale(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        set_stone_status(&mut *tx, &sale.inventory_id, StoneStatus::InStock).await?;

        tx.commit().await?;
        info!(invoice = %sale.invoice_number, "Sale deleted, stone back in stock");
        Ok(())
    }

    /// Totals for sales dated within `[from, to]` (either bound optional).
    pub async fn summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DbResult<SaleSummary> {
        let summary: SaleSummary = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS sale_count,
                COALESCE(SUM(total_amount_paise), 0) AS revenue_paise,
                COALESCE(SUM(profit_paise), 0) AS profit_paise,
                COALESCE(SUM(MIN(amount_paid_paise, total_amount_paise)), 0) AS collected_paise
            FROM sales
            WHERE (?1 IS NULL OR sale_date >= ?1)
              AND (?2 IS NULL OR sale_date <= ?2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }

    /// Sales not yet paid in full.
    pub async fn receivables(&self) -> DbResult<Receivables> {
        let receivables: Receivables = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS open_sales,
                COALESCE(SUM(total_amount_paise - amount_paid_paise), 0) AS outstanding_paise
            FROM sales
            WHERE amount_paid_paise < total_amount_paise
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(receivables)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::fixtures::{client_input, date, db, sale_input, stone_input};
    use navratna_core::types::{Client, InventoryItem};
    use navratna_core::CoreError;

    async fn setup(db: &Database) -> (Client, InventoryItem, InventoryItem) {
        let client = Client::new(client_input("Pandit Sharma"), Utc::now());
        db.clients().insert(&client).await.unwrap();
        let ruby = InventoryItem::new(
            stone_input("RUB-0001", "Ruby", 1_00_000_00, 1_50_000_00),
            Utc::now(),
        );
        let pearl = InventoryItem::new(
            stone_input("PRL-0001", "Pearl", 8_000_00, 12_000_00),
            Utc::now(),
        );
        db.inventory().insert(&ruby).await.unwrap();
        db.inventory().insert(&pearl).await.unwrap();
        (client, ruby, pearl)
    }

    async fn status_of(db: &Database, id: &str) -> StoneStatus {
        db.inventory().get_by_id(id).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_create_marks_stone_sold() {
        let db = db().await;
        let (client, ruby, _) = setup(&db).await;

        let sale = db
            .sales()
            .create(sale_input(&client.id, &ruby.id, 1_40_000_00, 40_000_00), "NR")
            .await
            .unwrap();

        assert_eq!(sale.invoice_number, "NR/2026-27/0001");
        assert_eq!(sale.profit_paise, 40_000_00);
        assert_eq!(sale.payment_status, PaymentStatus::Partial);
        assert_eq!(status_of(&db, &ruby.id).await, StoneStatus::Sold);

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.sale_date, date(2026, 10, 15));
        assert_eq!(loaded.total_amount_paise, 1_40_000_00);
    }

    #[tokio::test]
    async fn test_cannot_sell_sold_stone() {
        let db = db().await;
        let (client, ruby, _) = setup(&db).await;
        let sales = db.sales();
        sales
            .create(sale_input(&client.id, &ruby.id, 1_40_000_00, 0), "NR")
            .await
            .unwrap();

        let err = sales
            .create(sale_input(&client.id, &ruby.id, 1_40_000_00, 0), "NR")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::StoneNotAvailable { .. })));
        assert_eq!(sales.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_client_rolls_back() {
        let db = db().await;
        let (_, ruby, _) = setup(&db).await;

        let err = db
            .sales()
            .create(sale_input(&uuid::Uuid::new_v4().to_string(), &ruby.id, 100, 0), "NR")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(status_of(&db, &ruby.id).await, StoneStatus::InStock);
    }

    #[tokio::test]
    async fn test_invoice_numbers_run_per_financial_year() {
        let db = db().await;
        let (client, ruby, pearl) = setup(&db).await;
        let sales = db.sales();

        let first = sales
            .create(sale_input(&client.id, &ruby.id, 100, 0), "NR")
            .await
            .unwrap();
        let mut next_year = sale_input(&client.id, &pearl.id, 100, 0);
        next_year.sale_date = date(2027, 4, 2);
        let second = sales.create(next_year, "NR").await.unwrap();

        assert_eq!(first.invoice_number, "NR/2026-27/0001");
        assert_eq!(second.invoice_number, "NR/2027-28/0001");
        assert_eq!(
            sales.next_invoice_sequence("NR", date(2027, 1, 5)).await.unwrap(),
            2
        );
        assert!(sales
            .get_by_invoice_number("NR/2027-28/0001")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_recomputes_profit_and_swaps_stone() {
        let db = db().await;
        let (client, ruby, pearl) = setup(&db).await;
        let sales = db.sales();
        let sale = sales
            .create(sale_input(&client.id, &ruby.id, 1_40_000_00, 0), "NR")
            .await
            .unwrap();

        // Amount change on the same stone
        let updated = sales
            .update(&sale.id, sale_input(&client.id, &ruby.id, 1_20_000_00, 1_20_000_00))
            .await
            .unwrap();
        assert_eq!(updated.profit_paise, 20_000_00);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.invoice_number, sale.invoice_number);

        // Stone change
        let moved = sales
            .update(&sale.id, sale_input(&client.id, &pearl.id, 10_000_00, 0))
            .await
            .unwrap();
        assert_eq!(moved.profit_paise, 2_000_00);
        assert_eq!(status_of(&db, &ruby.id).await, StoneStatus::InStock);
        assert_eq!(status_of(&db, &pearl.id).await, StoneStatus::Sold);
    }

    #[tokio::test]
    async fn test_delete_restores_stone() {
        let db = db().await;
        let (client, ruby, _) = setup(&db).await;
        let sale = db
            .sales()
            .create(sale_input(&client.id, &ruby.id, 100, 0), "NR")
            .await
            .unwrap();

        db.sales().delete(&sale.id).await.unwrap();
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());
        assert_eq!(status_of(&db, &ruby.id).await, StoneStatus::InStock);
        assert!(matches!(
            db.sales().delete(&sale.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_summary_and_receivables() {
        let db = db().await;
        let (client, ruby, pearl) = setup(&db).await;
        let sales = db.sales();
        sales
            .create(sale_input(&client.id, &ruby.id, 1_40_000_00, 1_40_000_00), "NR")
            .await
            .unwrap();
        sales
            .create(sale_input(&client.id, &pearl.id, 10_000_00, 4_000_00), "NR")
            .await
            .unwrap();

        let summary = sales.summary(None, None).await.unwrap();
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.revenue_paise, 1_50_000_00);
        assert_eq!(summary.profit_paise, 42_000_00);
        assert_eq!(summary.collected_paise, 1_44_000_00);

        let none = sales
            .summary(Some(date(2026, 11, 1)), None)
            .await
            .unwrap();
        assert_eq!(none, SaleSummary::default());

        let receivables = sales.receivables().await.unwrap();
        assert_eq!(receivables.open_sales, 1);
        assert_eq!(receivables.outstanding_paise, 6_000_00);
    }

    #[tokio::test]
    async fn test_client_with_sales_cannot_be_deleted() {
        let db = db().await;
        let (client, ruby, _) = setup(&db).await;
        db.sales()
            .create(sale_input(&client.id, &ruby.id, 100, 0), "NR")
            .await
            .unwrap();

        assert!(matches!(
            db.clients().delete(&client.id).await,
            Err(DbError::Referenced { .. })
        ));
        assert!(matches!(
            db.inventory().delete(&ruby.id).await,
            Err(DbError::Referenced { .. })
        ));
    }
}
