//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No preview URL is set")]
    MissingUrl,

    #[error("Panel error: {0}")]
    Panel(#[from] ldp_panel::PanelError),

    #[error("Invalid panel state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
