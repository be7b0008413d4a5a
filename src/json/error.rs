//! JSON-specific error types

use thiserror::Error;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Expected a JSON array of objects")]
    NotAnArray,

    #[error("Record {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("Key field name must not be empty")]
    EmptyKeyField,
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        JsonError::ParseError(err.to_string())
    }
}
