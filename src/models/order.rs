use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use utoipa::ToSchema;

use crate::database::order::{Order, OrderStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub number: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<f64>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let accrual = (order.status == OrderStatus::Processed)
            .then(|| order.accrual.to_f64())
            .flatten();

        Self {
            number: order.number,
            status: order.status.as_str(),
            accrual,
            uploaded_at: order.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub current: f64,
    pub withdrawn: f64,
}
