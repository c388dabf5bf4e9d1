//! Loyalty-points accounting service.
//!
//! The library crate wires together the ledger store, the rate-limit gate,
//! the accrual poller, and the worker pool behind a thin Actix HTTP surface.
//! `main.rs` is only responsible for reading configuration and starting the
//! server; everything else lives here so it can be exercised from tests.

pub mod accrual;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod luhn;
pub mod models;
pub mod routes;
pub mod worker;

use sqlx::PgPool;

use crate::accrual::RateLimitGate;
use crate::auth::TokenSigner;
use crate::worker::WorkerHandle;

/// Shared application state handed to every request via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub token_signer: TokenSigner,
    pub accrual_base_url: String,
    pub rate_limit_gate: std::sync::Arc<RateLimitGate>,
    pub worker: WorkerHandle,
}
