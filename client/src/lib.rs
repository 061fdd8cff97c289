//! HTTP client for the external proof-checking backend.
//!
//! One outbound operation: submit a batch of one source item to the
//! configured `/api/check` endpoint and reduce the structured response to a
//! [`VerifierReply`]. Everything that can go wrong before a reply exists is
//! a [`ClientError`]; the orchestration layer converts those into terminal
//! error records, so nothing here ever reaches the user as a raw failure.
//!
//! The request is bounded by a single timeout covering connection, send,
//! and body decode. Timeout expiry is indistinguishable from any other
//! transport failure as far as the caller's contract is concerned; it only
//! affects the human-readable message.

pub mod wire;

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use proofpad_config::{DEFAULT_DEV_ENDPOINT, Environment, ProofpadConfig};
use proofpad_types::{RecordId, VerifierReply};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint is unset or unusable; no connection was attempted.
    #[error("checker endpoint is not configured: {0}")]
    Configuration(String),

    /// The backend did not answer within the bounded wait.
    #[error("checker did not respond within {secs} seconds")]
    Timeout { secs: u64 },

    /// Connection refused, DNS failure, or any other network-level failure.
    #[error("failed to reach checker: {source}")]
    Connect {
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("checker returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The backend answered 2xx but the body was not a valid check response.
    #[error("failed to decode checker response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Coarse failure class used in user-facing error records.
    #[must_use]
    pub fn failure_class(&self) -> &'static str {
        match self {
            ClientError::Configuration(_) => "configuration",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Connect { .. } | ClientError::Status { .. } | ClientError::Decode { .. } => {
                "transport"
            }
        }
    }
}

/// Process-wide HTTP client. Redirects are disabled; a redirect would
/// silently re-target the submission.
fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client with tuned settings: {e}");
                reqwest::Client::new()
            })
    })
}

#[derive(Debug, Clone)]
enum Endpoint {
    Ready(Url),
    /// Carries the explanation handed back on every check attempt.
    Unconfigured(String),
}

/// Client for one configured checker backend.
#[derive(Clone)]
pub struct VerifierClient {
    endpoint: Endpoint,
    api_key: Option<String>,
    timeout: Duration,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for VerifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierClient")
            .field("endpoint", &self.endpoint)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VerifierClient {
    /// Build a client from loaded configuration.
    ///
    /// Endpoint resolution happens here, but a missing or invalid endpoint
    /// is not an immediate failure: it is surfaced as
    /// [`ClientError::Configuration`] on the first `check` call, so the
    /// submission flow can commit it as a terminal error record.
    #[must_use]
    pub fn from_config(config: &ProofpadConfig) -> Self {
        Self {
            endpoint: resolve_endpoint(config),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs()),
        }
    }

    /// Build a client for a known-good endpoint. Used by tests and embedders
    /// that resolve configuration themselves.
    #[must_use]
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self {
            endpoint: Endpoint::Ready(endpoint),
            api_key: None,
            timeout,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Submit one source item for a fresh check and reduce the reply.
    pub async fn check(&self, id: RecordId, code: &str) -> Result<VerifierReply, ClientError> {
        let url = match &self.endpoint {
            Endpoint::Ready(url) => url.clone(),
            Endpoint::Unconfigured(reason) => {
                return Err(ClientError::Configuration(reason.clone()));
            }
        };

        let request = wire::CheckRequest::single(id.to_string(), code);
        let secs = self.timeout.as_secs();

        tracing::debug!(%id, endpoint = %url, "Submitting check request");

        match tokio::time::timeout(self.timeout, self.perform(url, &request)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout { secs }),
        }
    }

    async fn perform(
        &self,
        url: Url,
        request: &wire::CheckRequest,
    ) -> Result<VerifierReply, ClientError> {
        let mut builder = http_client().post(url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                ClientError::Timeout {
                    secs: self.timeout.as_secs(),
                }
            } else {
                ClientError::Connect { source }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => truncate_body(&text),
                Err(e) => format!("<failed to read error body: {e}>"),
            };
            return Err(ClientError::Status { status, body });
        }

        let parsed: wire::CheckResponse = response
            .json()
            .await
            .map_err(|source| ClientError::Decode { source })?;

        Ok(wire::reduce(&parsed))
    }
}

fn resolve_endpoint(config: &ProofpadConfig) -> Endpoint {
    let raw = match config.endpoint.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => match config.environment() {
            Environment::Dev => DEFAULT_DEV_ENDPOINT.to_string(),
            Environment::Prod => {
                return Endpoint::Unconfigured(
                    "no endpoint configured for this deployment; set `endpoint` in config.toml \
                     or the PROOFPAD_ENDPOINT environment variable"
                        .to_string(),
                );
            }
        },
    };

    match Url::parse(&raw) {
        Ok(url) => Endpoint::Ready(url),
        Err(e) => Endpoint::Unconfigured(format!("invalid endpoint `{raw}`: {e}")),
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>, environment: Environment) -> ProofpadConfig {
        ProofpadConfig {
            endpoint: endpoint.map(ToString::to_string),
            environment: Some(environment),
            ..Default::default()
        }
    }

    #[test]
    fn dev_falls_back_to_local_endpoint() {
        let client = VerifierClient::from_config(&config(None, Environment::Dev));
        match client.endpoint {
            Endpoint::Ready(url) => assert_eq!(url.as_str(), DEFAULT_DEV_ENDPOINT),
            Endpoint::Unconfigured(reason) => panic!("expected dev fallback, got: {reason}"),
        }
    }

    #[test]
    fn prod_without_endpoint_is_unconfigured() {
        let client = VerifierClient::from_config(&config(None, Environment::Prod));
        assert!(matches!(client.endpoint, Endpoint::Unconfigured(_)));
    }

    #[test]
    fn unparseable_endpoint_is_unconfigured() {
        let client = VerifierClient::from_config(&config(Some("not a url"), Environment::Prod));
        match client.endpoint {
            Endpoint::Unconfigured(reason) => assert!(reason.contains("invalid endpoint")),
            Endpoint::Ready(url) => panic!("expected rejection, got {url}"),
        }
    }

    #[tokio::test]
    async fn check_against_unconfigured_endpoint_never_connects() {
        let client = VerifierClient::from_config(&config(None, Environment::Prod));
        let err = client
            .check(RecordId::generate(), "#check Nat")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ClientError::Configuration(_)));
        assert_eq!(err.failure_class(), "configuration");
    }

    #[test]
    fn truncate_body_bounds_long_bodies() {
        let body = "x".repeat(MAX_ERROR_BODY_BYTES + 100);
        let truncated = truncate_body(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.ends_with("[truncated]"));
    }

    #[test]
    fn debug_masks_api_key() {
        let endpoint = Url::parse("http://localhost:8000/api/check").expect("url");
        let client =
            VerifierClient::new(endpoint, Duration::from_secs(5)).with_api_key("sk-secret");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn failure_classes_are_stable() {
        assert_eq!(
            ClientError::Timeout { secs: 30 }.failure_class(),
            "timeout"
        );
        assert_eq!(
            ClientError::Configuration("unset".to_string()).failure_class(),
            "configuration"
        );
        assert_eq!(
            ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            }
            .failure_class(),
            "transport"
        );
    }
}
