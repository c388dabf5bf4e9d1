use rust_decimal::Decimal;
use sqlx::{Encode, Executor, Postgres, Type};

use crate::database::{DatabaseError, Result};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub login: String,
    pub password_hash: String,
}

/// The two aggregates a balance is computed from; `current = accrued - withdrawn`.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct Balance {
    pub accrued: Decimal,
    pub withdrawn: Decimal,
}

impl User {
    pub async fn find_by_login<'q, E>(executor: E, login: &str) -> Result<Option<Self>>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query_as("SELECT id, login, password_hash FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(executor)
            .await
            .map_err(DatabaseError::Sqlx)
    }

    pub async fn find_by_id<'q, E, T>(executor: E, id: T) -> Result<Option<Self>>
    where
        E: 'q + Executor<'q, Database = Postgres>,
        T: 'q + Encode<'q, Postgres> + Type<Postgres> + Send,
    {
        sqlx::query_as("SELECT id, login, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(DatabaseError::Sqlx)
    }

    /// Fails with [`DatabaseError::Conflict`] if `login` is already taken.
    pub async fn create<'q, E>(executor: E, login: &str, password_hash: &str) -> Result<Self>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query_as(
            "INSERT INTO users (login, password_hash) VALUES ($1, $2) RETURNING id, login, password_hash",
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DatabaseError::Conflict,
            _ => DatabaseError::Sqlx(err),
        })
    }

    pub async fn balance<'q, E>(executor: E, user_id: i32) -> Result<Balance>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query_as(
            r#"
            SELECT
                COALESCE((SELECT SUM(accrual) FROM orders WHERE user_id = $1), 0) AS accrued,
                COALESCE((SELECT SUM(amount) FROM withdrawals WHERE user_id = $1), 0) AS withdrawn
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(DatabaseError::Sqlx)
    }
}

impl Balance {
    pub fn current(&self) -> Decimal {
        self.accrued - self.withdrawn
    }
}
