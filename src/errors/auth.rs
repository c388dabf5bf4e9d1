use actix_web::{error, http::StatusCode};

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum AuthError {
    #[error("missing session cookie")]
    MissingToken,
    #[error("session token is malformed, expired, or was signed with an unexpected algorithm")]
    InvalidToken,
    #[error("login or password is incorrect")]
    BadCredentials,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}
