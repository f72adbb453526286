//! Reachability protocol
//!
//! ```text
//! panel created ── ready ──▶ host
//! host ── setUrl(current) ──▶ panel   (panel probes, then loads)
//! panel ── alert ──▶ host              (probe failed)
//! host: "Retry with another URL" → prompt again, push with setUrl
//! ```
//!
//! [`reduce`] is a pure function over the protocol state and one incoming
//! message; the controller executes the actions it returns.

use ldp_panel::{HostMessage, PanelMessage};

pub const RETRY_ACTION: &str = "Retry with another URL";
pub const DISMISS_ACTION: &str = "Dismiss";

/// What the host knows about the check running in the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachabilityState {
    /// URL last pushed to the panel with `setUrl`
    pub pushed: Option<String>,
    /// URL the panel reported as unreachable
    pub unreachable: Option<String>,
}

impl ReachabilityState {
    /// State after `url` was pushed: a fresh check is running.
    pub fn pushed(url: impl Into<String>) -> Self {
        Self {
            pushed: Some(url.into()),
            unreachable: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolAction {
    /// Send a message to the panel content
    Post(HostMessage),
    /// Ask the user whether to retry with another URL
    ConfirmRetry { url: String },
    /// Nothing to do
    Ignore(&'static str),
}

pub fn reduce(
    state: &ReachabilityState,
    current_url: Option<&str>,
    message: &PanelMessage,
) -> (ReachabilityState, Vec<ProtocolAction>) {
    match message {
        PanelMessage::Ready => match current_url {
            Some(url) => (
                ReachabilityState::pushed(url),
                vec![ProtocolAction::Post(HostMessage::set_url(url))],
            ),
            None => (
                state.clone(),
                vec![ProtocolAction::Ignore("ready before a URL was set")],
            ),
        },
        PanelMessage::Alert { error: false, .. } => {
            (state.clone(), vec![ProtocolAction::Ignore("probe succeeded")])
        }
        PanelMessage::Alert { error: true, url } => {
            let Some(current) = current_url else {
                return (state.clone(), vec![ProtocolAction::Ignore("no URL set")]);
            };

            // Checks are keyed by URL; an alert for anything else is stale
            let probed = url.as_deref().unwrap_or(current);
            if probed != current {
                return (state.clone(), vec![ProtocolAction::Ignore("stale alert")]);
            }

            let next = ReachabilityState {
                pushed: state.pushed.clone(),
                unreachable: Some(current.to_string()),
            };
            (
                next,
                vec![ProtocolAction::ConfirmRetry {
                    url: current.to_string(),
                }],
            )
        }
    }
}

/// Text of the retry dialog for `url`, with optional host probe detail.
pub fn alert_message(url: &str, detail: Option<&str>) -> String {
    let mut message = format!(
        "Loco Dev Preview could not reach '{url}'. Is the dev server running? \
         This check can report a false positive when cross-origin policy blocks \
         the probe even though the page itself loads."
    );
    if let Some(detail) = detail {
        message.push(' ');
        message.push_str(detail);
    }
    message
}
