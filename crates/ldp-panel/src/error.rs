//! Panel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Panel could not be created: {0}")]
    CreateFailed(String),

    #[error("Panel has been disposed: {0}")]
    Disposed(String),

    #[error("Malformed panel message: {0}")]
    Message(#[from] serde_json::Error),
}
