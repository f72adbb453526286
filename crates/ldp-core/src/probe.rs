//! HTTP reachability probe run from the host process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;

use ldp_session::{ProbeReport, ReachabilityProbe};

use crate::config::Config;

pub struct HttpProbe {
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Duration::from_secs(config.probe_timeout_secs))
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(6))
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProbe {
    /// Never takes longer than the configured timeout in total.
    async fn probe(&self, url: &str) -> ProbeReport {
        match tokio::time::timeout(self.timeout, self.check(url)).await {
            Ok(report) => report,
            Err(_) => {
                tracing::debug!(url = %url.trim(), "Host probe timed out");
                ProbeReport::failed(
                    "timeout",
                    format!("no response within {}s", self.timeout.as_secs_f32()),
                )
            }
        }
    }
}

impl HttpProbe {
    async fn check(&self, url: &str) -> ProbeReport {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return ProbeReport::failed("invalid_url", "URL is empty");
        }

        if trimmed.starts_with("about:") {
            return ProbeReport::reachable(None, trimmed);
        }

        let parsed = match url::Url::parse(trimmed) {
            Ok(u) => u,
            Err(e) => return ProbeReport::failed("invalid_url", e.to_string()),
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return ProbeReport::reachable(None, trimmed);
        }

        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .timeout(self.timeout);
        // A proxy cannot reach the developer's own machine
        if is_loopback(&parsed) {
            builder = builder.no_proxy();
        }

        let client = match builder.build() {
            Ok(c) => c,
            Err(e) => return ProbeReport::failed("client", e.to_string()),
        };

        // Some dev servers refuse HEAD; a one-byte GET is the fallback
        let response = match client.head(parsed.clone()).send().await {
            Ok(resp) => Ok(resp),
            Err(e) if e.is_timeout() => Err(e),
            Err(_) => {
                client
                    .get(parsed)
                    .header(reqwest::header::RANGE, "bytes=0-0")
                    .send()
                    .await
            }
        };

        match response {
            Ok(resp) => {
                let status = resp.status().as_u16();
                tracing::debug!(url = %trimmed, status, "Host probe reached URL");
                ProbeReport::reachable(Some(status), resp.url().to_string())
            }
            Err(e) => {
                let report = ProbeReport::failed(classify(&e), e.to_string());
                tracing::debug!(
                    url = %trimmed,
                    kind = report.error_kind.as_deref().unwrap_or("unknown"),
                    "Host probe failed"
                );
                report
            }
        }
    }
}

fn is_loopback(url: &url::Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn classify(e: &reqwest::Error) -> &'static str {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };

    if kind != "connect" {
        return kind;
    }

    let lowered = e.to_string().to_lowercase();
    if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("name") {
        "dns"
    } else if lowered.contains("tls")
        || lowered.contains("certificate")
        || lowered.contains("handshake")
    {
        "tls"
    } else {
        kind
    }
}
