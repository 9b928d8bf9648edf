//! # Supplier Repository
//!
//! Domestic and international stone suppliers. Deleting a supplier keeps
//! its stones and clears their `supplier_id`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use navratna_core::types::{Supplier, SupplierType};

use super::{decode_list, encode_list};
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, name, supplier_type, location, contact_person, phone, email,
        gemstone_types, rating, notes, created_at, updated_at
    FROM suppliers
"#;

#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: String,
    name: String,
    supplier_type: SupplierType,
    location: String,
    contact_person: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    gemstone_types: String,
    rating: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = DbError;

    fn try_from(row: SupplierRow) -> DbResult<Self> {
        Ok(Supplier {
            gemstone_types: decode_list("suppliers.gemstone_types", &row.gemstone_types)?,
            id: row.id,
            name: row.name,
            supplier_type: row.supplier_type,
            location: row.location,
            contact_person: row.contact_person,
            phone: row.phone,
            email: row.email,
            rating: row.rating,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// All suppliers, best rated first.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let sql = format!(
            "{} ORDER BY rating IS NULL, rating DESC, name COLLATE NOCASE",
            SELECT_COLUMNS
        );
        let rows: Vec<SupplierRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Supplier::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<SupplierRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Supplier::try_from).transpose()
    }

    pub async fn insert(&self, supplier: &Supplier) -> DbResult<Supplier> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, supplier_type, location, contact_person, phone, email,
                gemstone_types, rating, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(supplier.supplier_type)
        .bind(&supplier.location)
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(encode_list("suppliers.gemstone_types", &supplier.gemstone_types)?)
        .bind(supplier.rating)
        .bind(&supplier.notes)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier.clone())
    }

    pub async fn update(&self, supplier: &Supplier) -> DbResult<Supplier> {
        debug!(id = %supplier.id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                supplier_type = ?3,
                location = ?4,
                contact_person = ?5,
                phone = ?6,
                email = ?7,
                gemstone_types = ?8,
                rating = ?9,
                notes = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(supplier.supplier_type)
        .bind(&supplier.location)
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(encode_list("suppliers.gemstone_types", &supplier.gemstone_types)?)
        .bind(supplier.rating)
        .bind(&supplier.notes)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", &supplier.id));
        }
        Ok(supplier.clone())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete("Supplier", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{db, stone_input};
    use navratna_core::types::{InventoryItem, SupplierInput};

    fn supplier_input(name: &str, rating: Option<i64>) -> SupplierInput {
        SupplierInput {
            name: name.to_string(),
            supplier_type: SupplierType::International,
            location: "Ratnapura, Sri Lanka".to_string(),
            contact_person: Some("Mr. Perera".to_string()),
            phone: None,
            email: None,
            gemstone_types: vec!["Blue Sapphire".to_string(), "Cat's Eye".to_string()],
            rating,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_gemstone_types_round_trip() {
        let db = db().await;
        let repo = db.suppliers();
        let supplier = Supplier::new(supplier_input("Lanka Gems", Some(5)), Utc::now());
        repo.insert(&supplier).await.unwrap();

        let loaded = repo.get_by_id(&supplier.id).await.unwrap().unwrap();
        assert_eq!(loaded.gemstone_types, vec!["Blue Sapphire", "Cat's Eye"]);
        assert_eq!(loaded.supplier_type, SupplierType::International);
        assert_eq!(loaded.rating, Some(5));
    }

    #[tokio::test]
    async fn test_list_orders_by_rating() {
        let db = db().await;
        let repo = db.suppliers();
        for (name, rating) in [("Unrated", None), ("Good", Some(4)), ("Best", Some(5))] {
            repo.insert(&Supplier::new(supplier_input(name, rating), Utc::now()))
                .await
                .unwrap();
        }
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Best", "Good", "Unrated"]);
    }

    #[tokio::test]
    async fn test_delete_detaches_stones() {
        let db = db().await;
        let supplier = Supplier::new(supplier_input("Jaipur Traders", Some(3)), Utc::now());
        db.suppliers().insert(&supplier).await.unwrap();

        let mut input = stone_input("CAT-0001", "Cat's Eye", 100, 200);
        input.supplier_id = Some(supplier.id.clone());
        let stone = InventoryItem::new(input, Utc::now());
        db.inventory().insert(&stone).await.unwrap();

        db.suppliers().delete(&supplier.id).await.unwrap();
        let stone = db.inventory().get_by_id(&stone.id).await.unwrap().unwrap();
        assert_eq!(stone.supplier_id, None);
    }
}
