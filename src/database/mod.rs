pub mod order;
pub mod user;
pub mod withdrawal;

pub use crate::errors::database::DatabaseError;

pub type Result<T> = std::result::Result<T, DatabaseError>;
