//! # Task Repository

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use navratna_core::types::{RelatedType, Task, TaskPriority, TaskStatus};

use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, title, description, due_date, priority, status,
        related_type, related_id, created_at, updated_at
    FROM tasks
"#;

/// Open tasks first, then by due date (undated last) and priority.
const ORDER_BY: &str = r#"
    ORDER BY
        status = 'completed',
        due_date IS NULL,
        due_date,
        CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
        created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    priority: TaskPriority,
    status: TaskStatus,
    related_type: Option<RelatedType>,
    related_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            priority: row.priority,
            status: row.status,
            related_type: row.related_type,
            related_id: row.related_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for task database operations.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TaskRepository { pool }
    }

    /// Tasks, optionally filtered by status.
    pub async fn list(&self, status: Option<TaskStatus>) -> DbResult<Vec<Task>> {
        let sql = format!("{} WHERE (?1 IS NULL OR status = ?1) {}", SELECT_COLUMNS, ORDER_BY);
        let rows: Vec<TaskRow> = sqlx::query_as(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// Tasks past their due date and not completed.
    pub async fn overdue(&self, today: NaiveDate) -> DbResult<Vec<Task>> {
        let sql = format!(
            "{} WHERE due_date < ?1 AND status != 'completed' {}",
            SELECT_COLUMNS, ORDER_BY
        );
        let rows: Vec<TaskRow> = sqlx::query_as(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Task>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Task::from))
    }

    pub async fn insert(&self, task: &Task) -> DbResult<Task> {
        debug!(id = %task.id, title = %task.title, "Inserting task");

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, due_date, priority, status,
                related_type, related_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.related_type)
        .bind(&task.related_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(task.clone())
    }

    pub async fn update(&self, task: &Task) -> DbResult<Task> {
        debug!(id = %task.id, status = ?task.status, "Updating task");

        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                title = ?2,
                description = ?3,
                due_date = ?4,
                priority = ?5,
                status = ?6,
                related_type = ?7,
                related_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.related_type)
        .bind(&task.related_id)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", &task.id));
        }
        Ok(task.clone())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting task");

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }
        Ok(())
    }

    pub async fn count_overdue(&self, today: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE due_date < ?1 AND status != 'completed'",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{date, db};
    use navratna_core::types::TaskInput;

    fn task(title: &str, due: Option<NaiveDate>, priority: TaskPriority, status: TaskStatus) -> Task {
        Task::new(
            TaskInput {
                title: title.to_string(),
                description: None,
                due_date: due,
                priority,
                status,
                related_type: None,
                related_id: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_list_filter_and_order() {
        let db = db().await;
        let repo = db.tasks();
        let done = task("Send GSTR-1", Some(date(2026, 10, 11)), TaskPriority::High, TaskStatus::Completed);
        let low = task("Reorder packets", Some(date(2026, 10, 20)), TaskPriority::Low, TaskStatus::Pending);
        let high = task("Call GRS lab", Some(date(2026, 10, 20)), TaskPriority::High, TaskStatus::Pending);
        let undated = task("Clean display", None, TaskPriority::Medium, TaskStatus::InProgress);
        for t in [&done, &low, &high, &undated] {
            repo.insert(t).await.unwrap();
        }

        let titles: Vec<String> = repo.list(None).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(
            titles,
            vec!["Call GRS lab", "Reorder packets", "Clean display", "Send GSTR-1"]
        );

        let pending = repo.list(Some(TaskStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 2);
        let in_progress = repo.list(Some(TaskStatus::InProgress)).await.unwrap();
        assert_eq!(in_progress[0].id, undated.id);
    }

    #[tokio::test]
    async fn test_overdue() {
        let db = db().await;
        let repo = db.tasks();
        let late = task("Follow up Meera", Some(date(2026, 10, 10)), TaskPriority::Medium, TaskStatus::Pending);
        let done = task("Pay GST", Some(date(2026, 10, 10)), TaskPriority::High, TaskStatus::Completed);
        let future = task("Diwali stock", Some(date(2026, 10, 30)), TaskPriority::High, TaskStatus::Pending);
        for t in [&late, &done, &future] {
            repo.insert(t).await.unwrap();
        }

        let today = date(2026, 10, 18);
        let overdue = repo.overdue(today).await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
        assert!(overdue[0].is_overdue(today));
        assert_eq!(repo.count_overdue(today).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_related_reference() {
        let db = db().await;
        let repo = db.tasks();
        let mut t = task("Check stone", None, TaskPriority::Low, TaskStatus::Pending);
        repo.insert(&t).await.unwrap();

        t.related_type = Some(RelatedType::Stone);
        t.related_id = Some("RUB-0001".to_string());
        t.status = TaskStatus::Completed;
        repo.update(&t).await.unwrap();

        let loaded = repo.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(loaded.related_type, Some(RelatedType::Stone));
        assert_eq!(loaded.status, TaskStatus::Completed);

        repo.delete(&t.id).await.unwrap();
        assert!(repo.get_by_id(&t.id).await.unwrap().is_none());
    }
}
