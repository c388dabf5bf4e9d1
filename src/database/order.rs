use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::database::{DatabaseError, Result};

/// The order status state machine. `Invalid` and `Processed` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Invalid => "INVALID",
            Self::Processed => "PROCESSED",
        }
    }

    /// `true` for the two statuses the pipeline never leaves once reached.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Invalid | Self::Processed)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "INVALID" => Ok(Self::Invalid),
            "PROCESSED" => Ok(Self::Processed),
            other => Err(DatabaseError::Sqlx(sqlx::Error::Decode(
                format!("unknown order status {other:?}").into(),
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub number: String,
    pub user_id: i32,
    pub status: OrderStatus,
    pub accrual: Decimal,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    number: String,
    user_id: i32,
    status: String,
    accrual: Decimal,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DatabaseError;

    fn try_from(row: OrderRow) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            number: row.number,
            user_id: row.user_id,
            status: row.status.parse()?,
            accrual: row.accrual,
            uploaded_at: row.uploaded_at,
        })
    }
}

impl Order {
    /// Returns the owning user id, if the order has ever been submitted.
    pub async fn owner<'q, E>(executor: E, number: &str) -> Result<Option<i32>>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query_scalar("SELECT user_id FROM orders WHERE number = $1")
            .bind(number)
            .fetch_optional(executor)
            .await
            .map_err(DatabaseError::Sqlx)
    }

    /// Inserts a fresh order in `NEW` status. Caller must have already checked ownership.
    pub async fn insert<'q, E>(executor: E, number: &str, user_id: i32) -> Result<()>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO orders (number, user_id, status_id)
            VALUES ($1, $2, (SELECT id FROM statuses WHERE name = 'NEW'))
            "#,
        )
        .bind(number)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(DatabaseError::Sqlx)?;

        Ok(())
    }

    pub async fn list_for_user<'q, E>(executor: E, user_id: i32) -> Result<Vec<Order>>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT o.number, o.user_id, s.name AS status, o.accrual, o.uploaded_at
            FROM orders o
            JOIN statuses s ON s.id = o.status_id
            WHERE o.user_id = $1
            ORDER BY o.uploaded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
        .map_err(DatabaseError::Sqlx)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Updates status and accrual. Guarded so a terminal row (`INVALID`/`PROCESSED`) is
    /// never overwritten, even if a duplicate poll races this call.
    pub async fn set_status_and_accrual<'q, E>(
        executor: E,
        number: &str,
        status: OrderStatus,
        accrual: Decimal,
    ) -> Result<()>
    where
        E: 'q + Executor<'q, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE orders
            SET status_id = (SELECT id FROM statuses WHERE name = $1), accrual = $2
            WHERE number = $3
              AND status_id IN (SELECT id FROM statuses WHERE name IN ('NEW', 'PROCESSING'))
            "#,
        )
        .bind(status.as_str())
        .bind(accrual)
        .bind(number)
        .execute(executor)
        .await
        .map_err(DatabaseError::Sqlx)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_absorbing() {
        assert!(OrderStatus::Invalid.is_terminal());
        assert!(OrderStatus::Processed.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            OrderStatus::New,
            OrderStatus::Processing,
            OrderStatus::Invalid,
            OrderStatus::Processed,
        ] {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
