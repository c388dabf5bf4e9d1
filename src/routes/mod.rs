pub mod auth;
pub mod balance;
pub mod not_found;
pub mod orders;

use actix_web::{error, error::ResponseError, web};

use crate::errors::ApiError;

/// Registers the `/api/user` scope. The JSON extractor error handler
/// translates malformed bodies into the domain `BadRequest` variant so every
/// failure mode — not just handler-level validation — goes through the same
/// `ResponseError` plumbing.
pub fn config(cfg: &mut web::ServiceConfig) {
    let json_cfg = web::JsonConfig::default()
        .error_handler(|err, _req| error::InternalError::from_response(
            err.to_string(),
            ApiError::BadRequest(err.to_string()).error_response(),
        ).into());

    cfg.service(
        web::scope("/api/user")
            .app_data(json_cfg)
            .configure(auth::config)
            .configure(orders::config)
            .configure(balance::config),
    );
}
