//! Per-order polling state machine (§4.4): drives an order from `PROCESSING`
//! to a terminal status by repeatedly querying the external accrual provider.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::accrual::client::{PollOutcome, fetch_order};
use crate::accrual::gate::RateLimitGate;
use crate::accrual::retry::with_retry;
use crate::database::DatabaseError;
use crate::database::order::{Order, OrderStatus};

/// Iterations that count against the polling budget (§4.4 step 7). `429`
/// observations and decode-error retries are bounded separately.
const MAX_ITERATIONS: u32 = 120;
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const DECODE_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_WALL_TIME: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("transport error contacting accrual provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Drives the poller for `number` to a terminal (or budget-exhausted)
/// outcome, writing the final status and accrual through the Ledger Store.
pub async fn poll_order(
    client: &Client,
    base_url: &str,
    gate: &RateLimitGate,
    pool: &PgPool,
    number: &str,
) -> Result<(), PollError> {
    Order::set_status_and_accrual(pool, number, OrderStatus::Processing, Decimal::ZERO).await?;

    let start = tokio::time::Instant::now();
    let mut iterations: u32 = 0;

    loop {
        gate.pause_if_needed().await;

        let outcome = with_retry(|| fetch_order(client, base_url, number)).await?;

        match outcome {
            PollOutcome::Retry429 { retry_after } => {
                gate.observe_429(retry_after.as_deref());
                continue;
            }
            PollOutcome::NoContent => {
                Order::set_status_and_accrual(pool, number, OrderStatus::New, Decimal::ZERO)
                    .await?;
                return Ok(());
            }
            PollOutcome::DecodeError => {
                if budget_exhausted(&mut iterations, start) {
                    warn_budget_exhausted(number);
                    return Ok(());
                }
                tokio::time::sleep(DECODE_RETRY_DELAY).await;
            }
            PollOutcome::Decoded(body) => match body.status.as_str() {
                "INVALID" => {
                    Order::set_status_and_accrual(
                        pool,
                        number,
                        OrderStatus::Invalid,
                        Decimal::ZERO,
                    )
                    .await?;
                    return Ok(());
                }
                "PROCESSED" => {
                    let accrual = body.accrual.unwrap_or(Decimal::ZERO);
                    Order::set_status_and_accrual(
                        pool,
                        number,
                        OrderStatus::Processed,
                        accrual,
                    )
                    .await?;
                    return Ok(());
                }
                // REGISTERED, PROCESSING: keep polling.
                _ => {
                    if budget_exhausted(&mut iterations, start) {
                        warn_budget_exhausted(number);
                        return Ok(());
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            },
            PollOutcome::OtherStatus(status) => {
                tracing::debug!(order = %number, %status, "unexpected accrual status, continuing to poll");
                if budget_exhausted(&mut iterations, start) {
                    warn_budget_exhausted(number);
                    return Ok(());
                }
            }
        }
    }
}

fn budget_exhausted(iterations: &mut u32, start: tokio::time::Instant) -> bool {
    *iterations += 1;
    *iterations >= MAX_ITERATIONS || start.elapsed() >= MAX_WALL_TIME
}

fn warn_budget_exhausted(number: &str) {
    tracing::warn!(order = %number, "polling budget exhausted, leaving order in PROCESSING");
}
