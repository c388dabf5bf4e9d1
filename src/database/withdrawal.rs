use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::database::{DatabaseError, Result};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Withdrawal {
    pub number: String,
    pub amount: Decimal,
    pub user_id: i32,
    pub processed_at: DateTime<Utc>,
}

impl Withdrawal {
    pub async fn list_for_user<'q, E>(executor: E, user_id: i32) -> Result<Vec<Withdrawal>>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query_as(
            r#"
            SELECT number, amount, user_id, processed_at
            FROM withdrawals
            WHERE user_id = $1
            ORDER BY processed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
        .map_err(DatabaseError::Sqlx)
    }

    /// Serialisable transaction: inserts a withdrawal row iff the user's
    /// accrued-minus-withdrawn balance is at least `amount`. The balance check
    /// and the insert are a single server-side statement so two concurrent
    /// withdrawals racing against the same balance cannot both commit.
    pub async fn insert(pool: &PgPool, number: &str, amount: Decimal, user_id: i32) -> Result<()> {
        let mut tx = pool.begin().await.map_err(DatabaseError::Sqlx)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Sqlx)?;

        let result = sqlx::query(
            r#"
            INSERT INTO withdrawals (number, amount, user_id)
            SELECT $1, $2, $3
            WHERE COALESCE((SELECT SUM(accrual) FROM orders WHERE user_id = $3), 0)
                - COALESCE((SELECT SUM(amount) FROM withdrawals WHERE user_id = $3), 0) >= $2
            "#,
        )
        .bind(number)
        .bind(amount)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::Sqlx)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(DatabaseError::Sqlx)?;
            return Err(DatabaseError::Insufficient);
        }

        tx.commit().await.map_err(DatabaseError::Sqlx)?;

        Ok(())
    }
}
