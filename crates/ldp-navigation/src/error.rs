//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Rejected URL '{url}': {reason}")]
    Rejected { url: String, reason: String },

    #[error("URL cannot be empty")]
    Empty,
}
