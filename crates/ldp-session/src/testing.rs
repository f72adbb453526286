//! In-memory host doubles.
//!
//! Lets the controller run without an embedding application:
//! - [`FakePanelHost`] / [`FakePanel`]: record created panels, revealed
//!   panels, posted messages and rendered content; simulate panel content
//!   posting messages or the user closing the panel
//! - [`FakeWindow`]: scripted prompt answers and dialog choices, recorded
//!   notices
//! - [`FakeSettings`]: mutable settings, optionally failing
//! - [`FakeProbe`]: canned probe report

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use ldp_panel::{
    HostMessage, PanelError, PanelHandle, PanelHost, PanelListener, PanelMessage, PanelOptions,
    ViewColumn,
};

use crate::probe::{ProbeReport, ReachabilityProbe};
use crate::settings::{SettingsError, SettingsProvider, WorkspaceSettings};
use crate::window::{HostWindow, InputBoxOptions, PromptError};

#[derive(Default)]
struct FakePanelState {
    reveals: Vec<ViewColumn>,
    posted: Vec<HostMessage>,
    contents: Vec<String>,
    message_listener: Option<PanelListener>,
    dispose_listener: Option<PanelListener>,
    disposed: bool,
}

/// Panel double. Clones share state.
#[derive(Clone)]
pub struct FakePanel {
    id: String,
    state: Arc<Mutex<FakePanelState>>,
}

impl FakePanel {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            state: Arc::new(Mutex::new(FakePanelState::default())),
        }
    }

    pub fn reveal_count(&self) -> usize {
        self.state.lock().reveals.len()
    }

    pub fn posted(&self) -> Vec<HostMessage> {
        self.state.lock().posted.clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.state.lock().contents.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Simulate the panel content posting `message`.
    pub fn send(&self, message: PanelMessage) {
        let listener = self.state.lock().message_listener.clone();
        if let Some(listener) = listener {
            listener.deliver(message);
        }
    }

    /// Simulate the panel content posting raw JSON.
    pub fn send_raw(&self, raw: &str) {
        let listener = self.state.lock().message_listener.clone();
        if let Some(listener) = listener {
            listener.deliver_raw(raw);
        }
    }

    /// Simulate the user closing the panel.
    pub fn close_by_user(&self) {
        self.fire_dispose();
    }

    fn fire_dispose(&self) {
        let listener = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.dispose_listener.clone()
        };
        if let Some(listener) = listener {
            listener.notify_disposed();
        }
    }
}

#[async_trait]
impl PanelHandle for FakePanel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn reveal(&self, column: ViewColumn) -> ldp_panel::Result<()> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(PanelError::Disposed(self.id.clone()));
        }
        state.reveals.push(column);
        Ok(())
    }

    async fn post_message(&self, message: HostMessage) -> ldp_panel::Result<bool> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(PanelError::Disposed(self.id.clone()));
        }
        state.posted.push(message);
        Ok(true)
    }

    fn set_content(&self, markup: String) -> ldp_panel::Result<()> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(PanelError::Disposed(self.id.clone()));
        }
        state.contents.push(markup);
        Ok(())
    }

    fn on_message(&self, listener: PanelListener) {
        self.state.lock().message_listener = Some(listener);
    }

    fn on_dispose(&self, listener: PanelListener) {
        self.state.lock().dispose_listener = Some(listener);
    }

    fn dispose(&self) {
        self.fire_dispose();
    }
}

/// Panel host double recording every panel it creates.
#[derive(Default)]
pub struct FakePanelHost {
    panels: Mutex<Vec<FakePanel>>,
    failing: Mutex<bool>,
}

impl FakePanelHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_panel` calls fail.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn created_count(&self) -> usize {
        self.panels.lock().len()
    }

    /// The `index`-th panel created. Panics if there is none.
    pub fn panel(&self, index: usize) -> FakePanel {
        self.panels.lock()[index].clone()
    }
}

#[async_trait]
impl PanelHost for FakePanelHost {
    async fn create_panel(
        &self,
        _title: &str,
        _options: &PanelOptions,
    ) -> ldp_panel::Result<Box<dyn PanelHandle>> {
        if *self.failing.lock() {
            return Err(PanelError::CreateFailed("host refused".to_string()));
        }

        let panel = FakePanel::new();
        self.panels.lock().push(panel.clone());
        Ok(Box::new(panel))
    }
}

/// Host window double with scripted answers.
///
/// An exhausted prompt script answers with a cancel; an exhausted dialog
/// script answers with a dismissal.
#[derive(Default)]
pub struct FakeWindow {
    inputs: Mutex<VecDeque<Result<Option<String>, PromptError>>>,
    dialog_choices: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<InputBoxOptions>>,
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    dialogs: Mutex<Vec<String>>,
}

impl FakeWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_input(&self, answer: Result<Option<String>, PromptError>) {
        self.inputs.lock().push_back(answer);
    }

    pub fn push_dialog(&self, choice: Option<String>) {
        self.dialog_choices.lock().push_back(choice);
    }

    pub fn prompts(&self) -> Vec<InputBoxOptions> {
        self.prompts.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn dialogs(&self) -> Vec<String> {
        self.dialogs.lock().clone()
    }
}

#[async_trait]
impl HostWindow for FakeWindow {
    async fn show_input_box(
        &self,
        options: InputBoxOptions,
    ) -> Result<Option<String>, PromptError> {
        self.prompts.lock().push(options);
        self.inputs.lock().pop_front().unwrap_or(Ok(None))
    }

    fn show_information_message(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn show_error_message(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    async fn show_warning_dialog(&self, message: &str, _items: &[&str]) -> Option<String> {
        self.dialogs.lock().push(message.to_string());
        self.dialog_choices.lock().pop_front().flatten()
    }
}

/// Settings double counting every read.
pub struct FakeSettings {
    settings: Mutex<WorkspaceSettings>,
    failing: Mutex<bool>,
    reads: Mutex<usize>,
}

impl FakeSettings {
    pub fn new(settings: WorkspaceSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            failing: Mutex::new(false),
            reads: Mutex::new(0),
        }
    }

    pub fn set(&self, settings: WorkspaceSettings) {
        *self.settings.lock() = settings;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn read_count(&self) -> usize {
        *self.reads.lock()
    }
}

impl SettingsProvider for FakeSettings {
    fn get_settings(&self) -> Result<WorkspaceSettings, SettingsError> {
        *self.reads.lock() += 1;
        if *self.failing.lock() {
            return Err(SettingsError::Unavailable("settings store offline".to_string()));
        }
        Ok(self.settings.lock().clone())
    }
}

/// Probe double returning a fixed report.
pub struct FakeProbe {
    report: ProbeReport,
    probed: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new(report: ProbeReport) -> Self {
        Self {
            report,
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().clone()
    }
}

#[async_trait]
impl ReachabilityProbe for FakeProbe {
    async fn probe(&self, url: &str) -> ProbeReport {
        self.probed.lock().push(url.to_string());
        self.report.clone()
    }
}
