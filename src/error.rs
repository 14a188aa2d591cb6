use thiserror::Error;

use crate::insights::InsightError;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Insight(#[from] InsightError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JournalError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        JournalError::NotFound { entity, id: id.into() }
    }
}

impl From<rusqlite::Error> for JournalError {
    fn from(err: rusqlite::Error) -> Self {
        JournalError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
