//! # Client Repository
//!
//! Astrologers, jewellers, temples and walk-in buyers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use navratna_core::types::{Client, ClientType, LoyaltyLevel};

use super::contains_pattern;
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, name, client_type, loyalty_level, phone, email, city,
        address, gstin, notes, created_at, updated_at
    FROM clients
"#;

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    client_type: ClientType,
    loyalty_level: LoyaltyLevel,
    phone: Option<String>,
    email: Option<String>,
    city: Option<String>,
    address: Option<String>,
    gstin: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            client_type: row.client_type,
            loyalty_level: row.loyalty_level,
            phone: row.phone,
            email: row.email,
            city: row.city,
            address: row.address,
            gstin: row.gstin,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// All clients by name.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let sql = format!("{} ORDER BY name COLLATE NOCASE", SELECT_COLUMNS);
        let rows: Vec<ClientRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Clients whose name, city or phone contains `query`.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Client>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list().await;
        }
        debug!(query = %query, "Searching clients");

        let sql = format!(
            r#"{}
            WHERE name LIKE ?1 ESCAPE '\'
               OR city LIKE ?1 ESCAPE '\'
               OR phone LIKE ?1 ESCAPE '\'
            ORDER BY name COLLATE NOCASE
            "#,
            SELECT_COLUMNS
        );
        let rows: Vec<ClientRow> = sqlx::query_as(&sql)
            .bind(contains_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<ClientRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Client::from))
    }

    pub async fn insert(&self, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, client_type, loyalty_level, phone, email, city,
                address, gstin, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(client.client_type)
        .bind(client.loyalty_level)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.city)
        .bind(&client.address)
        .bind(&client.gstin)
        .bind(&client.notes)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(client.clone())
    }

    pub async fn update(&self, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                client_type = ?3,
                loyalty_level = ?4,
                phone = ?5,
                email = ?6,
                city = ?7,
                address = ?8,
                gstin = ?9,
                notes = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(client.client_type)
        .bind(client.loyalty_level)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.city)
        .bind(&client.address)
        .bind(&client.gstin)
        .bind(&client.notes)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }
        Ok(client.clone())
    }

    /// Deletes a client and their consultations.
    ///
    /// ## Returns
    /// * `Err(DbError::Referenced)` - the client has sales
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).on_delete("Client", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{client_input, db};

    #[tokio::test]
    async fn test_crud_round_trip() {
        let db = db().await;
        let repo = db.clients();
        let mut input = client_input("Shri Ganesh Temple Trust");
        input.client_type = ClientType::Temple;
        input.gstin = Some("08AABCS1429B1ZB".to_string());
        let mut client = Client::new(input, Utc::now());

        repo.insert(&client).await.unwrap();
        let loaded = repo.get_by_id(&client.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, client.name);
        assert_eq!(loaded.gstin.as_deref(), Some("08AABCS1429B1ZB"));
        assert_eq!(loaded.phone, client.phone);

        client.loyalty_level = LoyaltyLevel::Platinum;
        repo.update(&client).await.unwrap();
        let loaded = repo.get_by_id(&client.id).await.unwrap().unwrap();
        assert_eq!(loaded.loyalty_level, LoyaltyLevel::Platinum);
        assert_eq!(loaded.client_type, ClientType::Temple);

        repo.delete(&client.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_client() {
        let db = db().await;
        let client = Client::new(client_input("Ghost"), Utc::now());
        assert!(matches!(
            db.clients().update(&client).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_and_order() {
        let db = db().await;
        let repo = db.clients();
        for name in ["Pandit Verma", "anand jewellers", "Pandit Sharma"] {
            repo.insert(&Client::new(client_input(name), Utc::now()))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["anand jewellers", "Pandit Sharma", "Pandit Verma"]);
        assert_eq!(repo.search("pandit").await.unwrap().len(), 2);
        assert_eq!(repo.search("jaipur").await.unwrap().len(), 3);
    }
}
