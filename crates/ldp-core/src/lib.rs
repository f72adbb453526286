//! Loco Dev Preview Core
//!
//! Coordination layer between the embedding host and the preview session.
//! The host lends panels and a window; this crate supplies settings from
//! the local store, a host-side reachability probe and the two commands.

mod command;
mod config;
mod error;
mod preview;
mod probe;
mod settings_store;

pub use command::CommandId;
pub use config::Config;
pub use error::CoreError;
pub use preview::Preview;
pub use probe::HttpProbe;
pub use settings_store::{StoredSettings, DEFAULT_URL_KEY, RESTRICT_TO_HTTP_KEY};

// Re-export the host contracts
pub use ldp_navigation::{NavigationError, RestrictionPolicy, UrlCheck};
pub use ldp_panel::{
    HostMessage, PanelError, PanelEvent, PanelHandle, PanelHost, PanelListener, PanelMessage,
    PanelOptions, PanelState, ViewColumn,
};
pub use ldp_session::{
    HostWindow, InputBoxOptions, ProbeReport, PromptError, ReachabilityProbe, SessionError,
    SessionSlot, WorkspaceSettings,
};
pub use ldp_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
