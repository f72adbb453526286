//! Host-side reachability probe.
//!
//! The panel content probes URLs on its own; a host probe only adds detail
//! to the retry dialog. It never decides whether the dialog is shown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeReport {
    pub ok: bool,
    pub status: Option<u16>,
    pub final_url: Option<String>,
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
}

impl ProbeReport {
    pub fn reachable(status: Option<u16>, final_url: impl Into<String>) -> Self {
        Self {
            ok: true,
            status,
            final_url: Some(final_url.into()),
            error_kind: None,
            error_message: None,
        }
    }

    pub fn failed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            final_url: None,
            error_kind: Some(kind.into()),
            error_message: Some(message.into()),
        }
    }

    /// One sentence for the retry dialog.
    pub fn summary(&self) -> String {
        if self.ok {
            match self.status {
                Some(status) => format!(
                    "The host itself got HTTP {status} from it, so this may be a false positive."
                ),
                None => "The host itself reached it, so this may be a false positive.".to_string(),
            }
        } else {
            let kind = self.error_kind.as_deref().unwrap_or("unknown");
            match self.error_message.as_deref() {
                Some(message) => format!("Host check failed too ({kind}: {message})."),
                None => format!("Host check failed too ({kind})."),
            }
        }
    }
}

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let ok = ProbeReport::reachable(Some(200), "http://localhost:3000/");
        assert!(ok.summary().contains("HTTP 200"));
        assert!(ok.summary().contains("false positive"));

        let failed = ProbeReport::failed("connect", "connection refused");
        assert_eq!(
            failed.summary(),
            "Host check failed too (connect: connection refused)."
        );
    }
}
