//! Session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ldp_panel::PanelState;

use crate::error::SessionError;
use crate::settings::WorkspaceSettings;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: String,
    /// URL shown in the preview panel, once one has been chosen
    pub current_url: Option<String>,
    /// Lifecycle of the preview panel
    pub panel_state: PanelState,
    /// Settings read when the session was created or last refreshed
    pub settings: Option<WorkspaceSettings>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(settings: Option<WorkspaceSettings>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            current_url: None,
            panel_state: PanelState::Closed,
            settings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store a new preview URL. A blank URL clears it.
    pub fn set_url(&mut self, url: String) {
        self.current_url = if url.trim().is_empty() { None } else { Some(url) };
        self.updated_at = Utc::now();
    }

    /// Attempt to move the panel to a new state
    pub fn transition_to(&mut self, new_state: PanelState) -> Result<()> {
        if !self.panel_state.can_transition_to(new_state) {
            return Err(SessionError::InvalidTransition {
                from: self.panel_state.to_string(),
                to: new_state.to_string(),
            });
        }

        // An open panel always has something to show
        if new_state.is_open() && self.current_url.is_none() {
            return Err(SessionError::MissingUrl);
        }

        if self.panel_state != new_state {
            tracing::debug!(
                session_id = %self.id,
                from = %self.panel_state,
                to = %new_state,
                "Panel state transition"
            );
        }

        self.panel_state = new_state;
        self.updated_at = Utc::now();

        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.panel_state.is_open()
    }
}
