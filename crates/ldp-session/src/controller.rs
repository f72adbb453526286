//! Session Controller
//!
//! Owns the session record and its panel. All writes to the preview URL
//! and panel state go through here.

use std::sync::Arc;

use tokio::sync::mpsc;

use ldp_navigation::{accept, value_selection};
use ldp_panel::{
    content, HostMessage, PanelError, PanelEvent, PanelEventKind, PanelHandle, PanelHost,
    PanelListener, PanelOptions, PanelState, PANEL_TITLE,
};

use crate::error::SessionError;
use crate::probe::ReachabilityProbe;
use crate::reachability::{self, ProtocolAction, ReachabilityState, DISMISS_ACTION, RETRY_ACTION};
use crate::session::Session;
use crate::settings::{resolve_settings, SettingsProvider, WorkspaceSettings};
use crate::window::{HostWindow, InputBoxOptions, PROMPT_TITLE};
use crate::Result;

/// Capabilities the host application lends to a session.
#[derive(Clone)]
pub struct HostServices {
    pub settings: Arc<dyn SettingsProvider>,
    pub panels: Arc<dyn PanelHost>,
    pub window: Arc<dyn HostWindow>,
    /// Optional host-side check run when the panel reports a dead URL
    pub probe: Option<Arc<dyn ReachabilityProbe>>,
}

impl HostServices {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        panels: Arc<dyn PanelHost>,
        window: Arc<dyn HostWindow>,
    ) -> Self {
        Self {
            settings,
            panels,
            window,
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }
}

/// How a prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The user entered a URL
    Entered,
    /// The user submitted nothing; the configured default is used
    Defaulted,
    /// The user dismissed the prompt
    Cancelled,
    /// The host returned a value the validator refuses
    Rejected,
    /// The prompt itself failed; the previous URL (or the default) stays
    Failed,
}

impl PromptOutcome {
    /// Whether the show step should run after this prompt.
    pub fn proceeds(&self) -> bool {
        !matches!(self, PromptOutcome::Cancelled | PromptOutcome::Rejected)
    }
}

/// What handling a panel event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// Event came from a panel this session no longer owns
    Ignored,
    /// The panel was closed; the session should be released
    Released,
}

pub struct SessionController {
    session: Session,
    panel: Option<Box<dyn PanelHandle>>,
    /// URL the panel content was last rendered with or pushed
    displayed_url: Option<String>,
    reachability: ReachabilityState,
    services: HostServices,
    events: mpsc::UnboundedSender<PanelEvent>,
}

impl SessionController {
    /// Build a session, reading settings once. Does not prompt or show.
    pub fn new(services: HostServices, events: mpsc::UnboundedSender<PanelEvent>) -> Self {
        let settings = match services.settings.get_settings() {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read settings, will retry at prompt");
                None
            }
        };

        let session = Session::new(settings);
        tracing::info!(session_id = %session.id, "Created preview session");

        Self {
            session,
            panel: None,
            displayed_url: None,
            reachability: ReachabilityState::default(),
            services,
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_url(&self) -> Option<&str> {
        self.session.current_url.as_deref()
    }

    pub fn panel_state(&self) -> PanelState {
        self.session.panel_state
    }

    pub fn panel_id(&self) -> Option<&str> {
        self.panel.as_ref().map(|panel| panel.id())
    }

    /// URL the panel is showing, as far as the host knows.
    pub fn displayed_url(&self) -> Option<&str> {
        self.displayed_url.as_deref()
    }

    pub fn reachability(&self) -> &ReachabilityState {
        &self.reachability
    }

    /// Re-read settings from the provider, replacing the cached copy.
    pub fn refresh_settings(&mut self) -> WorkspaceSettings {
        let settings = self.fetch_settings();
        self.session.settings = Some(settings.clone());
        settings
    }

    fn fetch_settings(&self) -> WorkspaceSettings {
        self.services.settings.get_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read settings, using defaults");
            WorkspaceSettings::default()
        })
    }

    /// Prompt for a URL, then show it.
    pub async fn prompt_and_show(
        &mut self,
        override_settings: Option<WorkspaceSettings>,
        fast_refresh: bool,
    ) -> Result<()> {
        let outcome = self.prompt(override_settings).await;
        if !outcome.proceeds() {
            return Ok(());
        }

        self.show_panel(fast_refresh).await
    }

    /// Ask the user for the preview URL and store it.
    pub async fn prompt(&mut self, override_settings: Option<WorkspaceSettings>) -> PromptOutcome {
        let settings = resolve_settings(override_settings, self.session.settings.as_ref(), || {
            self.fetch_settings()
        });

        let default_url = settings.user_defined_url.clone();
        let options = InputBoxOptions {
            title: PROMPT_TITLE.to_string(),
            value: default_url.clone(),
            value_selection: if settings.is_builtin_default() {
                value_selection(&default_url)
            } else {
                None
            },
            policy: settings.policy(),
        };
        let default_message = format!("Using default '{default_url}' defined in settings.");

        let response = self.services.window.show_input_box(options).await;

        match response {
            Ok(None) => {
                tracing::debug!(session_id = %self.session.id, "URL prompt cancelled");
                PromptOutcome::Cancelled
            }
            Ok(Some(value)) if value.trim().is_empty() => {
                self.services.window.show_information_message(&default_message);
                self.store_url(ldp_navigation::normalize(&default_url));
                PromptOutcome::Defaulted
            }
            Ok(Some(value)) => match accept(&value, settings.policy()) {
                Ok(url) => {
                    self.store_url(url);
                    PromptOutcome::Entered
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Host accepted a URL the validator rejects");
                    PromptOutcome::Rejected
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "URL prompt failed");
                let notice = match self.session.current_url.as_deref() {
                    Some(kept) => format!(
                        "Loco Dev Preview could not capture your url response. Keeping '{kept}'."
                    ),
                    None => format!(
                        "Loco Dev Preview could not capture your url response. {default_message}"
                    ),
                };
                self.services.window.show_error_message(&notice);
                if self.session.current_url.is_none() {
                    self.store_url(ldp_navigation::normalize(&default_url));
                }
                PromptOutcome::Failed
            }
        }
    }

    fn store_url(&mut self, url: String) {
        tracing::info!(session_id = %self.session.id, url = %url, "Preview URL set");
        self.session.set_url(url);
    }

    /// Show the preview panel for the current URL.
    ///
    /// An open panel is revealed; with `fast_refresh` the URL is pushed to
    /// it over the protocol instead of re-rendering its content.
    pub async fn show_panel(&mut self, fast_refresh: bool) -> Result<()> {
        let Some(url) = self.session.current_url.clone() else {
            tracing::warn!(session_id = %self.session.id, "Show requested without a URL");
            self.services
                .window
                .show_error_message("Loco Dev Preview has no URL to show. Run 'Change URL' first.");
            return Err(SessionError::MissingUrl);
        };

        let options = PanelOptions::default();

        if self.panel.is_some() {
            return self.refresh_open_panel(url, fast_refresh, &options).await;
        }

        let panel = match self.services.panels.create_panel(PANEL_TITLE, &options).await {
            Ok(panel) => panel,
            Err(e) => {
                tracing::error!(session_id = %self.session.id, error = %e, "Could not create preview panel");
                self.services
                    .window
                    .show_error_message(&format!("Loco Dev Preview could not open a panel: {e}"));
                return Err(e.into());
            }
        };

        let listener = PanelListener::new(panel.id(), self.events.clone());
        panel.on_message(listener.clone());
        panel.on_dispose(listener);

        if let Err(e) = panel.set_content(content::render(&url)) {
            tracing::error!(panel_id = %panel.id(), error = %e, "Could not render preview panel");
            self.services
                .window
                .show_error_message(&format!("Loco Dev Preview could not open a panel: {e}"));
            panel.dispose();
            return Err(e.into());
        }

        tracing::info!(
            session_id = %self.session.id,
            panel_id = %panel.id(),
            url = %url,
            "Opened preview panel"
        );

        self.panel = Some(panel);
        self.displayed_url = Some(url);
        self.reachability = ReachabilityState::default();
        self.session.transition_to(PanelState::Open)
    }

    async fn refresh_open_panel(
        &mut self,
        url: String,
        fast_refresh: bool,
        options: &PanelOptions,
    ) -> Result<()> {
        if let Some(panel) = &self.panel {
            if let Err(e) = panel.reveal(options.column).await {
                self.report_panel_failure(&e);
                return Err(e.into());
            }
        }

        if fast_refresh {
            self.push_url(url).await?;
        } else if self.displayed_url.as_deref() != Some(url.as_str()) {
            self.render(url)?;
        }

        self.session.transition_to(PanelState::Open)
    }

    fn render(&mut self, url: String) -> Result<()> {
        if let Some(panel) = &self.panel {
            if let Err(e) = panel.set_content(content::render(&url)) {
                self.report_panel_failure(&e);
                return Err(e.into());
            }
        }
        self.reachability = ReachabilityState::default();
        self.displayed_url = Some(url);
        Ok(())
    }

    async fn push_url(&mut self, url: String) -> Result<()> {
        let Some(panel) = &self.panel else {
            return Err(SessionError::MissingUrl);
        };

        let delivered = match panel.post_message(HostMessage::set_url(url.clone())).await {
            Ok(delivered) => delivered,
            Err(e) => {
                self.report_panel_failure(&e);
                return Err(e.into());
            }
        };
        if !delivered {
            tracing::warn!(panel_id = %panel.id(), url = %url, "Panel did not acknowledge setUrl");
        }

        self.reachability = ReachabilityState::pushed(url.clone());
        self.displayed_url = Some(url);
        Ok(())
    }

    fn report_panel_failure(&self, error: &PanelError) {
        tracing::error!(session_id = %self.session.id, error = %error, "Preview panel update failed");
        self.services
            .window
            .show_error_message(&format!("Loco Dev Preview could not update the panel: {error}"));
    }

    /// Handle one event queued by a panel listener.
    pub async fn handle_event(&mut self, event: PanelEvent) -> Result<EventOutcome> {
        if self.panel_id() != Some(event.panel_id.as_str()) {
            tracing::debug!(panel_id = %event.panel_id, "Ignoring event from a stale panel");
            return Ok(EventOutcome::Ignored);
        }

        match event.kind {
            PanelEventKind::Disposed => {
                tracing::info!(
                    session_id = %self.session.id,
                    panel_id = %event.panel_id,
                    "Preview panel closed by user"
                );
                self.panel = None;
                self.displayed_url = None;
                self.session.transition_to(PanelState::Closed)?;
                Ok(EventOutcome::Released)
            }
            PanelEventKind::Message(message) => {
                tracing::debug!(panel_id = %event.panel_id, command = message.command(), "Panel message");

                let (next, actions) =
                    reachability::reduce(&self.reachability, self.current_url(), &message);
                self.reachability = next;

                for action in actions {
                    self.apply(action).await?;
                }
                Ok(EventOutcome::Handled)
            }
        }
    }

    async fn apply(&mut self, action: ProtocolAction) -> Result<()> {
        match action {
            ProtocolAction::Post(HostMessage::SetUrl { url }) => self.push_url(url).await,
            ProtocolAction::ConfirmRetry { url } => self.confirm_retry(&url).await,
            ProtocolAction::Ignore(reason) => {
                tracing::debug!(reason, "Panel message ignored");
                Ok(())
            }
        }
    }

    async fn confirm_retry(&mut self, url: &str) -> Result<()> {
        tracing::warn!(session_id = %self.session.id, url = %url, "Panel reports URL unreachable");

        let detail = match &self.services.probe {
            Some(probe) => Some(probe.probe(url).await.summary()),
            None => None,
        };
        let message = reachability::alert_message(url, detail.as_deref());

        let choice = self
            .services
            .window
            .show_warning_dialog(&message, &[RETRY_ACTION, DISMISS_ACTION])
            .await;

        if choice.as_deref() == Some(RETRY_ACTION) {
            return self.prompt_and_show(None, true).await;
        }

        Ok(())
    }

    /// Close the panel if open. The owner drops the session afterwards.
    pub fn dispose(&mut self) {
        if let Some(panel) = self.panel.take() {
            panel.dispose();
        }
        self.displayed_url = None;
        self.reachability = ReachabilityState::default();

        if self.session.is_open() {
            // Closed is always reachable from Open
            let _ = self.session.transition_to(PanelState::Closed);
        }

        tracing::info!(session_id = %self.session.id, "Disposed preview session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePanelHost, FakeProbe, FakeSettings, FakeWindow};
    use crate::ProbeReport;
    use ldp_panel::PanelMessage;
    use std::sync::Arc;

    struct Harness {
        controller: SessionController,
        rx: mpsc::UnboundedReceiver<PanelEvent>,
        host: Arc<FakePanelHost>,
        window: Arc<FakeWindow>,
        settings: Arc<FakeSettings>,
    }

    impl Harness {
        fn new() -> Self {
            let host = Arc::new(FakePanelHost::new());
            let window = Arc::new(FakeWindow::new());
            let settings = Arc::new(FakeSettings::new(WorkspaceSettings::default()));
            let services = HostServices::new(settings.clone(), host.clone(), window.clone());
            let (tx, rx) = mpsc::unbounded_channel();

            Self {
                controller: SessionController::new(services, tx),
                rx,
                host,
                window,
                settings,
            }
        }

        async fn drain(&mut self) {
            while let Ok(event) = self.rx.try_recv() {
                self.controller.handle_event(event).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_prompt_normalizes_schemeless_input() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("localhost:3000".to_string())));

        h.controller.prompt_and_show(None, false).await.unwrap();

        assert_eq!(h.controller.current_url(), Some("http://localhost:3000"));
        assert_eq!(h.controller.panel_state(), PanelState::Open);
        assert_eq!(h.host.created_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_offers_default_with_selection() {
        let mut h = Harness::new();
        h.window.push_input(Ok(None));

        h.controller.prompt(None).await;

        let options = h.window.prompts().pop().unwrap();
        assert_eq!(options.title, PROMPT_TITLE);
        assert_eq!(options.value, "http://localhost:3000");
        assert_eq!(options.value_selection, Some((7, 21)));
        assert!(options.policy.http_only);
    }

    #[tokio::test]
    async fn test_blank_input_uses_default() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("   ".to_string())));

        let outcome = h.controller.prompt(None).await;

        assert_eq!(outcome, PromptOutcome::Defaulted);
        assert_eq!(h.controller.current_url(), Some("http://localhost:3000"));
        assert_eq!(
            h.window.infos(),
            vec!["Using default 'http://localhost:3000' defined in settings.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cancel_preserves_state() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:4000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.window.push_input(Ok(None));
        h.controller.prompt_and_show(None, true).await.unwrap();

        assert_eq!(h.controller.current_url(), Some("http://localhost:4000"));
        assert_eq!(h.controller.panel_state(), PanelState::Open);
        assert_eq!(h.host.created_count(), 1);
        assert!(h.host.panel(0).posted().is_empty());
        assert_eq!(h.host.panel(0).reveal_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_failure_falls_back() {
        let mut h = Harness::new();
        h.window.push_input(Err(crate::PromptError::Io("input box crashed".to_string())));

        h.controller.prompt_and_show(None, false).await.unwrap();

        assert_eq!(h.controller.current_url(), Some("http://localhost:3000"));
        assert_eq!(h.controller.panel_state(), PanelState::Open);
        let errors = h.window.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("could not capture your url response"));
        assert!(errors[0].contains("http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_prompt_failure_keeps_previous_url() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:4000".to_string())));
        h.controller.prompt(None).await;

        h.window.push_input(Err(crate::PromptError::Io("gone".to_string())));
        let outcome = h.controller.prompt(None).await;

        assert_eq!(outcome, PromptOutcome::Failed);
        assert_eq!(h.controller.current_url(), Some("http://localhost:4000"));
        let errors = h.window.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Keeping 'http://localhost:4000'"));
        assert!(!errors[0].contains("http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_rejected_value_aborts_show() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("https://example.com".to_string())));

        h.controller.prompt_and_show(None, false).await.unwrap();

        assert!(h.controller.current_url().is_none());
        assert_eq!(h.host.created_count(), 0);
    }

    #[tokio::test]
    async fn test_override_settings_lift_restriction() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("https://example.com".to_string())));

        let open = WorkspaceSettings::new("https://staging.local", false);
        h.controller.prompt(Some(open)).await;

        assert_eq!(h.controller.current_url(), Some("https://example.com"));
        let options = h.window.prompts().pop().unwrap();
        assert_eq!(options.value, "https://staging.local");
        assert_eq!(options.value_selection, None);
        // Overrides are not cached
        assert!(h.controller.session().settings.as_ref().unwrap().http_only_restriction);
    }

    #[tokio::test]
    async fn test_settings_refetched_after_failed_read() {
        let host = Arc::new(FakePanelHost::new());
        let window = Arc::new(FakeWindow::new());
        let settings = Arc::new(FakeSettings::new(WorkspaceSettings::new(
            "http://localhost:8080",
            true,
        )));
        settings.set_failing(true);
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut controller =
            SessionController::new(HostServices::new(settings.clone(), host, window.clone()), tx);
        assert!(controller.session().settings.is_none());

        settings.set_failing(false);
        window.push_input(Ok(None));
        controller.prompt(None).await;

        assert_eq!(window.prompts()[0].value, "http://localhost:8080");
        assert_eq!(settings.read_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_settings_replaces_cache() {
        let mut h = Harness::new();
        h.settings.set(WorkspaceSettings::new("http://localhost:9000", false));

        let refreshed = h.controller.refresh_settings();

        assert_eq!(refreshed.user_defined_url, "http://localhost:9000");
        assert_eq!(h.controller.session().settings.as_ref(), Some(&refreshed));
    }

    #[tokio::test]
    async fn test_show_without_url_is_error() {
        let mut h = Harness::new();

        let result = h.controller.show_panel(false).await;

        assert!(matches!(result, Err(SessionError::MissingUrl)));
        assert_eq!(h.controller.panel_state(), PanelState::Closed);
        assert_eq!(h.host.created_count(), 0);
        assert_eq!(h.window.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_show_twice_creates_one_panel() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.controller.show_panel(false).await.unwrap();
        h.controller.show_panel(false).await.unwrap();

        assert_eq!(h.host.created_count(), 1);
        let panel = h.host.panel(0);
        assert_eq!(panel.reveal_count(), 2);
        // Same URL, content not re-rendered
        assert_eq!(panel.contents().len(), 1);
    }

    #[tokio::test]
    async fn test_show_rerenders_changed_url_without_fast_refresh() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.window.push_input(Ok(Some("http://localhost:4000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        let panel = h.host.panel(0);
        assert_eq!(h.host.created_count(), 1);
        assert_eq!(panel.contents().len(), 2);
        assert!(panel.contents()[1].contains("http://localhost:4000"));
        assert!(panel.posted().is_empty());
    }

    #[tokio::test]
    async fn test_show_on_closed_panel_reports_error() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        // Closed by the user, close event not yet handled
        h.host.panel(0).close_by_user();
        let result = h.controller.show_panel(false).await;

        assert!(matches!(
            result,
            Err(SessionError::Panel(PanelError::Disposed(_)))
        ));
        let errors = h.window.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("could not update the panel"));

        h.drain().await;
        assert_eq!(h.controller.panel_state(), PanelState::Closed);
    }

    #[tokio::test]
    async fn test_fast_refresh_on_closed_panel_reports_error() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.host.panel(0).close_by_user();
        h.window.push_input(Ok(Some("http://localhost:4000".to_string())));
        let result = h.controller.prompt_and_show(None, true).await;

        assert!(matches!(result, Err(SessionError::Panel(_))));
        assert_eq!(h.window.errors().len(), 1);
        assert_eq!(h.controller.current_url(), Some("http://localhost:4000"));
    }

    #[tokio::test]
    async fn test_ready_handshake_pushes_url() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.host.panel(0).send(PanelMessage::Ready);
        h.drain().await;

        assert_eq!(
            h.host.panel(0).posted(),
            vec![HostMessage::set_url("http://localhost:3000")]
        );
        assert_eq!(
            h.controller.reachability().pushed.as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[tokio::test]
    async fn test_retry_converges_on_same_panel() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3001".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();
        let panel_id = h.controller.panel_id().unwrap().to_string();

        let panel = h.host.panel(0);
        panel.send(PanelMessage::Ready);
        panel.send(PanelMessage::alert("http://localhost:3001"));
        h.window.push_dialog(Some(RETRY_ACTION.to_string()));
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.drain().await;

        assert_eq!(h.host.created_count(), 1);
        assert_eq!(h.controller.panel_id(), Some(panel_id.as_str()));
        assert_eq!(h.controller.current_url(), Some("http://localhost:3000"));
        assert_eq!(h.controller.displayed_url(), Some("http://localhost:3000"));
        assert_eq!(
            panel.posted(),
            vec![
                HostMessage::set_url("http://localhost:3001"),
                HostMessage::set_url("http://localhost:3000"),
            ]
        );

        let dialogs = h.window.dialogs();
        assert_eq!(dialogs.len(), 1);
        assert!(dialogs[0].contains("false positive"));
    }

    #[tokio::test]
    async fn test_dismissed_alert_is_noop() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3001".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.host.panel(0).send(PanelMessage::alert("http://localhost:3001"));
        h.window.push_dialog(Some(DISMISS_ACTION.to_string()));
        h.drain().await;

        assert_eq!(h.controller.current_url(), Some("http://localhost:3001"));
        assert_eq!(h.controller.panel_state(), PanelState::Open);
        assert_eq!(h.window.prompts().len(), 1);
        assert_eq!(
            h.controller.reachability().unreachable.as_deref(),
            Some("http://localhost:3001")
        );
    }

    #[tokio::test]
    async fn test_probe_detail_in_dialog() {
        let host = Arc::new(FakePanelHost::new());
        let window = Arc::new(FakeWindow::new());
        let settings = Arc::new(FakeSettings::new(WorkspaceSettings::default()));
        let probe = Arc::new(FakeProbe::new(ProbeReport::failed(
            "connect",
            "connection refused",
        )));
        let services =
            HostServices::new(settings, host.clone(), window.clone()).with_probe(probe.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = SessionController::new(services, tx);

        window.push_input(Ok(Some("http://localhost:3001".to_string())));
        controller.prompt_and_show(None, false).await.unwrap();
        host.panel(0).send(PanelMessage::alert("http://localhost:3001"));
        while let Ok(event) = rx.try_recv() {
            controller.handle_event(event).await.unwrap();
        }

        assert_eq!(probe.probed(), vec!["http://localhost:3001".to_string()]);
        assert!(window.dialogs()[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_user_close_releases_session() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.host.panel(0).close_by_user();
        let event = h.rx.try_recv().unwrap();
        let outcome = h.controller.handle_event(event).await.unwrap();

        assert_eq!(outcome, EventOutcome::Released);
        assert_eq!(h.controller.panel_state(), PanelState::Closed);
        assert!(h.controller.panel_id().is_none());
    }

    #[tokio::test]
    async fn test_stale_panel_events_ignored() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        let event = PanelEvent {
            panel_id: "some-other-panel".to_string(),
            kind: PanelEventKind::Disposed,
        };
        let outcome = h.controller.handle_event(event).await.unwrap();

        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(h.controller.panel_state(), PanelState::Open);
    }

    #[tokio::test]
    async fn test_panel_creation_failure_stays_closed() {
        let mut h = Harness::new();
        h.host.set_failing(true);
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));

        let result = h.controller.prompt_and_show(None, false).await;

        assert!(matches!(result, Err(SessionError::Panel(_))));
        assert_eq!(h.controller.panel_state(), PanelState::Closed);
        assert_eq!(h.controller.current_url(), Some("http://localhost:3000"));
        assert!(h.window.errors()[0].contains("could not open a panel"));
    }

    #[tokio::test]
    async fn test_dispose_closes_panel() {
        let mut h = Harness::new();
        h.window.push_input(Ok(Some("http://localhost:3000".to_string())));
        h.controller.prompt_and_show(None, false).await.unwrap();

        h.controller.dispose();

        assert!(h.host.panel(0).is_disposed());
        assert_eq!(h.controller.panel_state(), PanelState::Closed);
        // The dispose notification refers to a panel the session dropped
        let event = h.rx.try_recv().unwrap();
        assert_eq!(
            h.controller.handle_event(event).await.unwrap(),
            EventOutcome::Ignored
        );
    }
}
