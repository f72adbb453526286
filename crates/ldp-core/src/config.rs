//! Preview configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ldp_session::DEFAULT_URL;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// URL offered when the store has none
    pub default_url: String,
    /// Restriction applied when the store has none
    pub restrict_to_http: bool,
    /// Run a host-side check when the panel reports a dead URL
    pub probe_enabled: bool,
    /// Timeout of the host-side check
    pub probe_timeout_secs: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("ldp.db"),
            default_url: DEFAULT_URL.to_string(),
            restrict_to_http: true,
            probe_enabled: true,
            probe_timeout_secs: 6,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("LocoDevPreview"))
            .unwrap_or_else(|| PathBuf::from(".ldp"))
    }

    /// Read a JSON config file. Missing fields take their defaults; a
    /// missing file yields the default config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.check()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.default_url.trim().is_empty() {
            return Err(CoreError::Config("default_url is empty".to_string()));
        }
        if self.probe_timeout_secs == 0 {
            return Err(CoreError::Config(
                "probe_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for the data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
