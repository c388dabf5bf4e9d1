use actix_web::{error, http::StatusCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderError {
    #[error("order number fails the Luhn check")]
    InvalidNumber,
    #[error("order {0} already belongs to another user")]
    OwnedByAnotherUser(String),
}

impl error::ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidNumber => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OwnedByAnotherUser(_) => StatusCode::CONFLICT,
        }
    }
}
