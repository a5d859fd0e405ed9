//! Domain error taxonomy.

use thiserror::Error;

use crate::ports::StoreError;

/// Failures surfaced by queue and settings operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("{0}")]
    Validation(String),

    #[error("Queue item not found")]
    NotFound,

    #[error("This token has already been completed")]
    AlreadyCompleted,

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Token number conflict. Please try again.")]
    DuplicateToken,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for QueueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateToken => QueueError::DuplicateToken,
            StoreError::Backend(msg) => QueueError::Storage(msg),
        }
    }
}

impl From<validator::ValidationErrors> for QueueError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        messages.sort();
        QueueError::Validation(messages.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
