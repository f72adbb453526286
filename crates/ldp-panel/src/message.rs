//! Messages exchanged with the panel content.
//!
//! Both directions use a JSON object discriminated by `command`:
//! - panel → host: `{"command":"ready"}`, `{"command":"alert","error":true}`
//! - host → panel: `{"command":"setUrl","url":"..."}`

use serde::{Deserialize, Serialize};

use crate::Result;

/// Message posted by the panel content to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// Content initialized; the host should push the current URL.
    Ready,
    /// The out-of-band probe of a URL failed.
    Alert {
        error: bool,
        /// URL the probe was run against, when the content reports it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl PanelMessage {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn alert(url: impl Into<String>) -> Self {
        PanelMessage::Alert {
            error: true,
            url: Some(url.into()),
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            PanelMessage::Ready => "ready",
            PanelMessage::Alert { .. } => "alert",
        }
    }
}

/// Message posted by the host to the panel content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    /// Probe `url` and load it as the visible content.
    SetUrl { url: String },
}

impl HostMessage {
    pub fn set_url(url: impl Into<String>) -> Self {
        HostMessage::SetUrl { url: url.into() }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn url(&self) -> &str {
        match self {
            HostMessage::SetUrl { url } => url,
        }
    }
}
