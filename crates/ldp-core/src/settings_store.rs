//! Workspace settings backed by the local settings table.

use ldp_session::{SettingsError, SettingsProvider, WorkspaceSettings};
use ldp_storage::Database;

use crate::config::Config;
use crate::Result;

pub const DEFAULT_URL_KEY: &str = "LDP.locoDevPreviewExtension.defaultUrl";
pub const RESTRICT_TO_HTTP_KEY: &str = "LDP.locoDevPreviewExtension.restrictToHttp";

/// Settings provider reading the two preview keys from the database.
/// Keys that were never written fall back to the configured defaults.
#[derive(Clone)]
pub struct StoredSettings {
    db: Database,
    fallback: WorkspaceSettings,
}

impl StoredSettings {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            fallback: WorkspaceSettings::new(config.default_url.clone(), config.restrict_to_http),
        }
    }

    pub fn set_default_url(&self, url: &str) -> Result<()> {
        self.db.set_setting(DEFAULT_URL_KEY, url.trim())?;
        tracing::info!(url = %url.trim(), "Default preview URL updated");
        Ok(())
    }

    pub fn set_restrict_to_http(&self, restrict: bool) -> Result<()> {
        self.db.set_bool_setting(RESTRICT_TO_HTTP_KEY, restrict)?;
        tracing::info!(restrict, "Preview URL restriction updated");
        Ok(())
    }

    /// Forget stored values so the configured defaults apply again.
    pub fn reset(&self) -> Result<()> {
        self.db.remove_setting(DEFAULT_URL_KEY)?;
        self.db.remove_setting(RESTRICT_TO_HTTP_KEY)?;
        Ok(())
    }

    fn read(&self) -> ldp_storage::Result<WorkspaceSettings> {
        let user_defined_url = self
            .db
            .get_setting(DEFAULT_URL_KEY)?
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.fallback.user_defined_url.clone());
        let http_only_restriction = self
            .db
            .get_bool_setting(RESTRICT_TO_HTTP_KEY)?
            .unwrap_or(self.fallback.http_only_restriction);

        Ok(WorkspaceSettings {
            user_defined_url,
            http_only_restriction,
        })
    }
}

impl SettingsProvider for StoredSettings {
    fn get_settings(&self) -> std::result::Result<WorkspaceSettings, SettingsError> {
        self.read()
            .map_err(|e| SettingsError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn store() -> (StoredSettings, Database) {
        let db = Database::open_in_memory().unwrap();
        let config = Config::new(PathBuf::from("/tmp/ldp"));
        (StoredSettings::new(db.clone(), &config), db)
    }

    #[test]
    fn test_defaults_when_unset() {
        let (store, _) = store();
        assert_eq!(store.get_settings().unwrap(), WorkspaceSettings::default());
    }

    #[test]
    fn test_stored_values_win() {
        let (store, _) = store();
        store.set_default_url(" http://localhost:5173 ").unwrap();
        store.set_restrict_to_http(false).unwrap();

        let settings = store.get_settings().unwrap();
        assert_eq!(settings.user_defined_url, "http://localhost:5173");
        assert!(!settings.http_only_restriction);

        store.reset().unwrap();
        assert_eq!(store.get_settings().unwrap(), WorkspaceSettings::default());
    }

    #[test]
    fn test_config_supplies_fallback() {
        let db = Database::open_in_memory().unwrap();
        let mut config = Config::new(PathBuf::from("/tmp/ldp"));
        config.default_url = "http://127.0.0.1:8000".to_string();
        config.restrict_to_http = false;

        let settings = StoredSettings::new(db, &config).get_settings().unwrap();
        assert_eq!(settings.user_defined_url, "http://127.0.0.1:8000");
        assert!(!settings.http_only_restriction);
    }

    #[test]
    fn test_corrupt_value_is_unavailable() {
        let (store, db) = store();
        db.set_setting(RESTRICT_TO_HTTP_KEY, "maybe").unwrap();

        assert!(matches!(
            store.get_settings(),
            Err(SettingsError::Unavailable(_))
        ));
    }
}
