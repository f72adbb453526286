//! Panel host contract.
//!
//! The embedding application owns the actual content surface. The session
//! controller only sees it through [`PanelHost`] and [`PanelHandle`].
//! Messages and disposal coming from a panel are not handled in callbacks:
//! the host hands them to a [`PanelListener`], which queues them as
//! [`PanelEvent`]s for the controller's owner to drain.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::message::{HostMessage, PanelMessage};
use crate::Result;

/// Identifies the preview panel type to the host.
pub const PANEL_VIEW_TYPE: &str = "locoDevPreview";

/// Title of the panel displayed to the user.
pub const PANEL_TITLE: &str = "Preview";

/// Editor column a panel is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewColumn {
    Active,
    #[default]
    Beside,
    Two,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOptions {
    pub view_type: String,
    pub column: ViewColumn,
    /// The protocol script needs scripting enabled in the content
    pub enable_scripts: bool,
    /// Keep content alive while the panel is hidden
    pub retain_context_when_hidden: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            view_type: PANEL_VIEW_TYPE.to_string(),
            column: ViewColumn::Beside,
            enable_scripts: true,
            retain_context_when_hidden: true,
        }
    }
}

/// Capability to create preview panels.
#[async_trait]
pub trait PanelHost: Send + Sync {
    async fn create_panel(
        &self,
        title: &str,
        options: &PanelOptions,
    ) -> Result<Box<dyn PanelHandle>>;
}

/// A live panel created by a [`PanelHost`].
#[async_trait]
pub trait PanelHandle: Send + Sync {
    /// Host-assigned identifier, stable for the panel's lifetime.
    fn id(&self) -> &str;

    /// Bring the panel to the foreground.
    async fn reveal(&self, column: ViewColumn) -> Result<()>;

    /// Post a message to the panel content. Resolves to the host's ack.
    async fn post_message(&self, message: HostMessage) -> Result<bool>;

    /// Replace the panel content with `markup`.
    fn set_content(&self, markup: String) -> Result<()>;

    /// Route messages posted by the panel content to `listener`.
    fn on_message(&self, listener: PanelListener);

    /// Notify `listener` when the panel is closed.
    fn on_dispose(&self, listener: PanelListener);

    /// Close the panel. Fires the dispose listener.
    fn dispose(&self);
}

/// Something that happened to a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEventKind {
    Message(PanelMessage),
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEvent {
    /// Panel the event originated from
    pub panel_id: String,
    pub kind: PanelEventKind,
}

pub type PanelEventReceiver = mpsc::UnboundedReceiver<PanelEvent>;

/// Queue endpoint handed to a panel host for one panel.
#[derive(Debug, Clone)]
pub struct PanelListener {
    panel_id: String,
    tx: mpsc::UnboundedSender<PanelEvent>,
}

impl PanelListener {
    pub fn new(panel_id: impl Into<String>, tx: mpsc::UnboundedSender<PanelEvent>) -> Self {
        Self {
            panel_id: panel_id.into(),
            tx,
        }
    }

    /// Create a listener together with the receiving end of its queue.
    pub fn channel(panel_id: impl Into<String>) -> (Self, PanelEventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(panel_id, tx), rx)
    }

    pub fn panel_id(&self) -> &str {
        &self.panel_id
    }

    /// Queue a decoded message from the panel content.
    pub fn deliver(&self, message: PanelMessage) {
        self.send(PanelEventKind::Message(message));
    }

    /// Queue a raw JSON message from the panel content.
    ///
    /// Malformed messages are logged and dropped.
    pub fn deliver_raw(&self, raw: &str) {
        match PanelMessage::from_json(raw) {
            Ok(message) => self.deliver(message),
            Err(e) => {
                tracing::warn!(panel_id = %self.panel_id, error = %e, "Dropping malformed panel message");
            }
        }
    }

    pub fn notify_disposed(&self) {
        self.send(PanelEventKind::Disposed);
    }

    fn send(&self, kind: PanelEventKind) {
        let event = PanelEvent {
            panel_id: self.panel_id.clone(),
            kind,
        };
        if self.tx.send(event).is_err() {
            tracing::debug!(panel_id = %self.panel_id, "Panel event dropped, session is gone");
        }
    }
}
