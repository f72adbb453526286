//! Loco Dev Preview Panel
//!
//! The preview panel is an embedded content surface owned by the host
//! application. This crate defines:
//! - the contract the session controller uses to drive a panel
//! - the panel lifecycle state machine (`Closed` ⇄ `Open`)
//! - the JSON message schema exchanged with the panel content
//! - the markup loaded into the panel

pub mod content;
mod error;
mod host;
mod message;
mod state;

pub use error::PanelError;
pub use host::{
    PanelEvent, PanelEventKind, PanelEventReceiver, PanelHandle, PanelHost, PanelListener,
    PanelOptions, ViewColumn, PANEL_TITLE, PANEL_VIEW_TYPE,
};
pub use message::{HostMessage, PanelMessage};
pub use state::PanelState;

pub type Result<T> = std::result::Result<T, PanelError>;
