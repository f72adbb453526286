//! Host window: URL prompt, notices and dialogs.

use async_trait::async_trait;
use thiserror::Error;

use ldp_navigation::{validate, RestrictionPolicy};

pub const PROMPT_TITLE: &str = "Http Full Url";

/// Configuration of one URL prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBoxOptions {
    pub title: String,
    /// Editable value the prompt starts with
    pub value: String,
    /// Byte span of `value` to pre-select
    pub value_selection: Option<(usize, usize)>,
    /// Policy the inline validator enforces
    pub policy: RestrictionPolicy,
}

impl InputBoxOptions {
    /// Inline validation message for `input`, `None` when acceptable.
    ///
    /// Hosts must keep the prompt open while this returns a message.
    pub fn validate(&self, input: &str) -> Option<String> {
        validate(input, self.policy).message()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt failed: {0}")]
    Io(String),
}

#[async_trait]
pub trait HostWindow: Send + Sync {
    /// Ask the user for a URL. `Ok(None)` means the prompt was cancelled.
    async fn show_input_box(
        &self,
        options: InputBoxOptions,
    ) -> Result<Option<String>, PromptError>;

    /// Non-blocking informational notice.
    fn show_information_message(&self, message: &str);

    /// Non-blocking error notice.
    fn show_error_message(&self, message: &str);

    /// Warning with choices. Resolves to the chosen item, or
    /// `None` when dismissed.
    async fn show_warning_dialog(&self, message: &str, items: &[&str]) -> Option<String>;
}
