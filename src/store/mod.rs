//! Relational store for todo rows
//!
//! Wraps a sqlx SQLite pool. Each operation checks a connection out of
//! the pool for its own statement or transaction and releases it when
//! the call returns, so no request shares mutable state with another.

use sqlx::sqlite::SqlitePool;

use crate::error::{Error, Result};
use crate::types::{CreateTodo, TodoItem, TodoPatch};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT,
    completed   BOOLEAN NOT NULL DEFAULT 0
)";

/// Handle to the backing table. Cheap to clone; constructed once at
/// startup and injected into the API state.
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Open a pool against the configured connection string.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Create the todos table if it does not exist yet. Safe to call any
    /// number of times; existing rows are untouched.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new row and return it as persisted, id included.
    pub async fn insert(&self, todo: CreateTodo) -> Result<TodoItem> {
        let item = sqlx::query_as::<_, TodoItem>(
            "INSERT INTO todos (title, description, completed) VALUES (?1, ?2, ?3) \
             RETURNING id, title, description, completed",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Every row, ordered by id ascending.
    pub async fn list(&self) -> Result<Vec<TodoItem>> {
        let items = sqlx::query_as::<_, TodoItem>(
            "SELECT id, title, description, completed FROM todos ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Apply a partial patch to an existing row and return the merged
    /// record. Fails with `NotFound` when the id has no row; the lookup
    /// and write share one transaction.
    pub async fn update(&self, id: i64, patch: TodoPatch) -> Result<TodoItem> {
        let mut tx = self.pool.begin().await?;

        let mut item = sqlx::query_as::<_, TodoItem>(
            "SELECT id, title, description, completed FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::NotFound(id))?;

        patch.apply(&mut item);

        sqlx::query("UPDATE todos SET title = ?1, description = ?2, completed = ?3 WHERE id = ?4")
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.completed)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Remove a row permanently and return it as it existed just before
    /// deletion. Fails with `NotFound` when the id has no row.
    pub async fn delete(&self, id: i64) -> Result<TodoItem> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, TodoItem>(
            "SELECT id, title, description, completed FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::NotFound(id))?;

        sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Number of rows currently stored. Used by the health endpoint.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Drain the pool. Called once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
