use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, COOKIE};
use url::Url;

use crate::errors::StrategyError;

use super::errors::ExchangeError;
use super::types::{ApiResponse, PlatformSession};

/// Platform the client talks to when `APPC_PLATFORM_URL` is not set.
pub const DEFAULT_PLATFORM_URL: &str = "https://dashboard.appcelerator.com";

const FIND_SESSION_PATH: &str = "/api/v1/auth/findSession";

/// Cookie under which the platform expects the session identifier.
const PLATFORM_SID_COOKIE: &str = "connect.sid";

/// Exchanges a session identifier for a validated session.
///
/// Implementations resolve exactly once per call. A failure whose
/// [`code()`](ExchangeError::code) is 403 is treated by the strategy as an
/// expired identifier.
#[async_trait]
pub trait SessionExchange: Send + Sync + 'static {
    type Session: Send + 'static;

    async fn exchange(&self, session_id: &str) -> Result<Self::Session, ExchangeError>;
}

/// HTTP client for the platform's session lookup endpoint.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    base_url: Url,
    client: reqwest::Client,
}

impl PlatformClient {
    /// # Errors
    ///
    /// Returns [`StrategyError::Config`] if `base_url` is not an absolute URL
    /// or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StrategyError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StrategyError::Config(format!("invalid platform URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            client: get_client()?,
        })
    }

    /// Create a client for `APPC_PLATFORM_URL`, falling back to [`DEFAULT_PLATFORM_URL`].
    pub fn from_env() -> Result<Self, StrategyError> {
        let base_url =
            std::env::var("APPC_PLATFORM_URL").unwrap_or_else(|_| DEFAULT_PLATFORM_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn find_session_url(&self) -> String {
        format!(
            "{}{FIND_SESSION_PATH}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SessionExchange for PlatformClient {
    type Session = PlatformSession;

    async fn exchange(&self, session_id: &str) -> Result<PlatformSession, ExchangeError> {
        let url = self.find_session_url();
        tracing::debug!("Looking up platform session at {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(COOKIE, format!("{PLATFORM_SID_COOKIE}={session_id}"))
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("Session lookup rejected with status {}", status);
            return Err(ExchangeError::Status {
                code: status.as_u16(),
                message: error_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        parse_find_session(&body, session_id)
    }
}

/// HTTP client with a bounded request time.
fn get_client() -> Result<reqwest::Client, StrategyError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| StrategyError::Config(format!("failed to build HTTP client: {e}")))
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiResponse>(body)
        .ok()
        .and_then(|r| r.message)
}

pub(super) fn parse_find_session(
    body: &str,
    session_id: &str,
) -> Result<PlatformSession, ExchangeError> {
    let envelope: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ExchangeError::InvalidResponse(format!("malformed body: {e}")))?;

    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "session lookup unsuccessful".to_string());
        return Err(match envelope.code {
            Some(code) => ExchangeError::Status { code, message },
            None => ExchangeError::InvalidResponse(message),
        });
    }

    let result = envelope
        .result
        .ok_or_else(|| ExchangeError::InvalidResponse("no session in response".to_string()))?;

    let mut session: PlatformSession = serde_json::from_value(result)
        .map_err(|e| ExchangeError::InvalidResponse(format!("unexpected session shape: {e}")))?;
    session.sid = session_id.to_string();

    Ok(session)
}
