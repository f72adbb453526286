//! Workspace settings and their precedence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ldp_navigation::RestrictionPolicy;

/// URL offered when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Default URL offered at the prompt
    pub user_defined_url: String,
    /// Restrict the prompt to loopback addresses
    pub http_only_restriction: bool,
}

impl WorkspaceSettings {
    pub fn new(user_defined_url: impl Into<String>, http_only_restriction: bool) -> Self {
        Self {
            user_defined_url: user_defined_url.into(),
            http_only_restriction,
        }
    }

    pub fn policy(&self) -> RestrictionPolicy {
        RestrictionPolicy::new(self.http_only_restriction)
    }

    /// Whether the configured default is the built-in one.
    pub fn is_builtin_default(&self) -> bool {
        self.user_defined_url == DEFAULT_URL
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self::new(DEFAULT_URL, true)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Settings unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the host's settings store.
///
/// Values may change between calls.
pub trait SettingsProvider: Send + Sync {
    fn get_settings(&self) -> Result<WorkspaceSettings, SettingsError>;
}

/// Pick the settings a prompt runs with: an explicit override wins, then the
/// settings cached on the session, then a fresh read.
pub fn resolve_settings<F>(
    override_settings: Option<WorkspaceSettings>,
    cached: Option<&WorkspaceSettings>,
    fetch: F,
) -> WorkspaceSettings
where
    F: FnOnce() -> WorkspaceSettings,
{
    override_settings
        .or_else(|| cached.cloned())
        .unwrap_or_else(fetch)
}
