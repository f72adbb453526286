//! Panel State Machine
//!
//! ```text
//! Closed
//!   ↓ show (URL set)
//! Open ─┐ show again (reveal / push URL)
//!   ↑───┘
//!   ↓ closed by user / dispose
//! Closed
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    /// No panel exists
    #[default]
    Closed,
    /// A panel exists and shows the current URL
    Open,
}

impl PanelState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: PanelState) -> bool {
        match (self, target) {
            (PanelState::Closed, PanelState::Open) => true,
            (PanelState::Open, PanelState::Closed) => true,
            // Re-showing an open panel reveals it
            (PanelState::Open, PanelState::Open) => true,
            // Nothing to close
            (PanelState::Closed, PanelState::Closed) => false,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PanelState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Closed => "closed",
            PanelState::Open => "open",
        }
    }
}

impl std::fmt::Display for PanelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
