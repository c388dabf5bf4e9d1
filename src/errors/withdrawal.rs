use actix_web::{error, http::StatusCode};

/// Only a Luhn failure on an otherwise well-formed request lands here; an
/// empty order number or a non-positive sum is a [`crate::errors::ApiError::BadRequest`]
/// instead (see the withdraw handler).
#[derive(Debug, Clone, thiserror::Error)]
pub enum WithdrawalError {
    #[error("order number fails the Luhn check")]
    InvalidNumber,
}

impl error::ResponseError for WithdrawalError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}
