pub mod auth;
pub mod database;
pub mod order;
pub mod withdrawal;

pub use auth::AuthError;
pub use database::DatabaseError;
pub use order::OrderError;
pub use withdrawal::WithdrawalError;

use actix_web::{HttpResponse, error, http::StatusCode};

/// Top-level handler error, aggregating every domain error behind a single
/// `ResponseError` impl so handlers can return `Result<HttpResponse, ApiError>`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(DatabaseError::Sqlx(err))
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => err.status_code(),
            Self::Order(err) => err.status_code(),
            Self::Withdrawal(err) => err.status_code(),
            Self::Database(err) => err.status_code(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Database(DatabaseError::Sqlx(err)) = self {
            tracing::debug!("persistence error: {err}");
        }

        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
