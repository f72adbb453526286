//! Loco Dev Preview Session Management
//!
//! - A Session is the single record of the preview URL and panel state
//! - At most one Session is live per [`SessionSlot`]; closing the panel or
//!   disposing the slot releases it
//! - The controller prompts for the URL, shows the panel and runs the
//!   reachability protocol with the panel content
//! - Everything the host provides (settings, panels, prompts, notices) is
//!   reached through traits so the controller runs against test doubles

mod controller;
mod error;
mod probe;
pub mod reachability;
mod session;
mod settings;
mod slot;
mod window;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::{EventOutcome, HostServices, PromptOutcome, SessionController};
pub use error::SessionError;
pub use probe::{ProbeReport, ReachabilityProbe};
pub use session::Session;
pub use settings::{
    resolve_settings, SettingsError, SettingsProvider, WorkspaceSettings, DEFAULT_URL,
};
pub use slot::SessionSlot;
pub use window::{HostWindow, InputBoxOptions, PromptError, PROMPT_TITLE};

pub type Result<T> = std::result::Result<T, SessionError>;
