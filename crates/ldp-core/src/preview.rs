//! Preview command surface
//!
//! Owns the session slot and maps host commands onto it. The embedder
//! registers [`CommandId::ALL`], forwards invocations to [`Preview::execute`]
//! and feeds panel events back through [`Preview::pump_events`] or
//! [`Preview::handle_next_event`].

use std::sync::Arc;

use ldp_panel::PanelHost;
use ldp_session::{EventOutcome, HostServices, HostWindow, SessionSlot};
use ldp_storage::Database;

use crate::command::CommandId;
use crate::config::Config;
use crate::probe::HttpProbe;
use crate::settings_store::StoredSettings;
use crate::Result;

pub struct Preview {
    config: Config,
    slot: SessionSlot,
}

impl Preview {
    /// Open the settings store named by `config` and wire it to the host.
    pub fn open(
        config: Config,
        panels: Arc<dyn PanelHost>,
        window: Arc<dyn HostWindow>,
    ) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let settings = Arc::new(StoredSettings::new(db, &config));

        let mut services = HostServices::new(settings, panels, window);
        if config.probe_enabled {
            services = services.with_probe(Arc::new(HttpProbe::from_config(&config)));
        }

        tracing::info!(database = %config.database_path.display(), "Preview initialized");

        Ok(Self::new(config, services))
    }

    pub fn new(config: Config, services: HostServices) -> Self {
        Self {
            config,
            slot: SessionSlot::new(services),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn slot(&self) -> &SessionSlot {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut SessionSlot {
        &mut self.slot
    }

    pub async fn execute(&mut self, command: CommandId) -> Result<()> {
        tracing::debug!(command = %command, "Executing command");

        let result = match command {
            CommandId::Launch => self.launch().await,
            CommandId::ChangeUrl => self.change_url().await,
        };

        if let Err(e) = &result {
            tracing::error!(command = %command, error = %e, "Command failed");
        }
        result
    }

    /// Execute a command by its host identifier.
    pub async fn execute_named(&mut self, id: &str) -> Result<()> {
        let command = id.parse::<CommandId>()?;
        self.execute(command).await
    }

    /// Show the preview. Prompts only when no URL is known yet.
    pub async fn launch(&mut self) -> Result<()> {
        let controller = self.slot.acquire();

        if controller.current_url().is_some() {
            controller.show_panel(false).await?;
        } else {
            controller.prompt_and_show(None, false).await?;
        }
        Ok(())
    }

    /// Prompt for a new URL with freshly read settings. An open panel is
    /// refreshed in place.
    pub async fn change_url(&mut self) -> Result<()> {
        let controller = self.slot.acquire();

        let settings = controller.refresh_settings();
        let fast_refresh = controller.panel_state().is_open();
        controller
            .prompt_and_show(Some(settings), fast_refresh)
            .await?;
        Ok(())
    }

    /// Host settings changed; the next prompt uses the new values.
    pub fn settings_changed(&mut self) {
        if let Some(controller) = self.slot.get_mut() {
            let settings = controller.refresh_settings();
            tracing::debug!(
                url = %settings.user_defined_url,
                restrict = settings.http_only_restriction,
                "Settings reloaded"
            );
        }
    }

    /// Handle every queued panel event. Returns how many were handled.
    pub async fn pump_events(&mut self) -> usize {
        self.slot.pump().await
    }

    /// Wait for one panel event and handle it.
    pub async fn handle_next_event(&mut self) -> Result<Option<EventOutcome>> {
        let Some(event) = self.slot.next_event().await else {
            return Ok(None);
        };
        Ok(Some(self.slot.dispatch(event).await?))
    }

    /// Host is shutting down the extension.
    pub fn deactivate(&mut self) {
        self.slot.dispose();
    }
}
