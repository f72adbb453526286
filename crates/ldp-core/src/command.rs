//! Command identifiers registered with the host
//!
//! - `locoDevPreview.launch`: show the preview, prompting only when no URL
//!   is known yet
//! - `locoDevPreview.changeUrl`: always prompt, then refresh the open panel

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    #[serde(rename = "locoDevPreview.launch")]
    Launch,
    #[serde(rename = "locoDevPreview.changeUrl")]
    ChangeUrl,
}

impl CommandId {
    pub const ALL: [CommandId; 2] = [CommandId::Launch, CommandId::ChangeUrl];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandId::Launch => "locoDevPreview.launch",
            CommandId::ChangeUrl => "locoDevPreview.changeUrl",
        }
    }

    /// Title shown in the host's command list
    pub fn title(&self) -> &'static str {
        match self {
            CommandId::Launch => "Loco Dev Preview: Launch",
            CommandId::ChangeUrl => "Loco Dev Preview: Change URL",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "locoDevPreview.launch" => Ok(CommandId::Launch),
            "locoDevPreview.changeUrl" => Ok(CommandId::ChangeUrl),
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "locoDevPreview.launch".parse::<CommandId>().unwrap(),
            CommandId::Launch
        );
        assert_eq!(
            " locoDevPreview.changeUrl ".parse::<CommandId>().unwrap(),
            CommandId::ChangeUrl
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = "locoDevPreview.reload".parse::<CommandId>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownCommand(ref id) if id == "locoDevPreview.reload"));
    }

    #[test]
    fn test_ids_round_trip_through_display() {
        for id in CommandId::ALL {
            assert_eq!(id.to_string().parse::<CommandId>().unwrap(), id);
        }
    }

    #[test]
    fn test_serde_uses_host_ids() {
        assert_eq!(
            serde_json::to_string(&CommandId::ChangeUrl).unwrap(),
            r#""locoDevPreview.changeUrl""#
        );
    }
}
