use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Page structure a behavior needs is absent or malformed.
    MissingStructure,
    /// An event referenced an element the page does not have.
    UnknownElement,
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct PageException {
    pub code: ErrorCode,
    pub message: String,
}

impl PageException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_element(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::UnknownElement, format!("no {kind} with id '{id}'"))
    }
}
