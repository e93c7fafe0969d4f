use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::users::repo_types::{DeleteResult, NewUser, User, UserChanges, UserFilter};

/// Gateway to the persistent user records.
///
/// A missing row is `Ok(None)`, never an error; errors are reserved for the
/// backend itself failing (connection, constraint, ...).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_row(&self, filter: UserFilter) -> anyhow::Result<Option<User>>;
    async fn get_user_rows(&self) -> anyhow::Result<Vec<User>>;
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> anyhow::Result<User>;
    async fn delete_user(&self, id: i64) -> anyhow::Result<DeleteResult>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_user_row(&self, filter: UserFilter) -> anyhow::Result<Option<User>> {
        let query = match &filter {
            UserFilter::Id(id) => sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password_hash, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(*id),
            UserFilter::Email(email) => sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, email, password_hash, created_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email.as_str()),
        };
        let user = query
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("get user row by {:?}", filter))?;
        Ok(user)
    }

    async fn get_user_rows(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(log_unique_violation)
        .context("insert user")?;
        Ok(created)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> anyhow::Result<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $1, email = $2
             WHERE id = $3
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(log_unique_violation)
        .with_context(|| format!("update user {}", id))?;
        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<DeleteResult> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete user {}", id))?;
        Ok(DeleteResult {
            rows_affected: result.rows_affected(),
        })
    }
}

fn log_unique_violation(e: sqlx::Error) -> sqlx::Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            warn!(constraint = ?db_err.constraint(), "unique constraint violated");
        }
    }
    e
}
