use actix_web::{error, http::StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("login already registered")]
    Conflict,

    #[error("withdrawal exceeds available balance")]
    Insufficient,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl error::ResponseError for DatabaseError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict => StatusCode::CONFLICT,
            Self::Insufficient => StatusCode::PAYMENT_REQUIRED,
            Self::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
