use serde::Deserialize;
use utoipa::ToSchema;

/// Shared request body for both Register and Login: both require non-empty fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}
