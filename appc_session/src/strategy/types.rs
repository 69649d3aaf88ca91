use std::fmt;

use headers::{Cookie, HeaderMapExt};
use http::{HeaderMap, Uri};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::redirect_url::original_url;
use super::traits::SessionMap;
use crate::errors::StrategyError;

/// Cookies that may carry the platform session id, in lookup order.
/// `dashboard.sid` is the legacy name.
pub const SID_COOKIE_NAMES: [&str; 2] = ["dashboard.sid", "connect.sid"];

/// Round-trip status kept in the host session between redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The user agent was sent to the platform login page.
    SignIn,
    /// The user agent was bounced through the callback URL.
    Bypass,
    /// The cookie is validated without any redirect.
    Direct,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::Bypass => "bypass",
            Self::Direct => "direct",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "signin" => Some(Self::SignIn),
            "bypass" => Some(Self::Bypass),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of an inbound request, built by the host framework.
pub struct AuthRequest<'a> {
    pub(crate) headers: &'a HeaderMap,
    pub(crate) uri: &'a Uri,
    pub(crate) encrypted: bool,
    pub(crate) session: Option<&'a mut dyn SessionMap>,
}

impl<'a> AuthRequest<'a> {
    pub fn new(headers: &'a HeaderMap, uri: &'a Uri) -> Self {
        Self {
            headers,
            uri,
            encrypted: false,
            session: None,
        }
    }

    /// Mark the connection the request arrived on as TLS.
    #[must_use]
    pub fn with_tls(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: &'a mut dyn SessionMap) -> Self {
        self.session = Some(session);
        self
    }

    /// Platform session id from the first non-empty of [`SID_COOKIE_NAMES`].
    pub fn session_cookie(&self) -> Option<String> {
        let cookies = self.headers.typed_get::<Cookie>()?;
        SID_COOKIE_NAMES
            .iter()
            .find_map(|name| cookies.get(name).filter(|v| !v.is_empty()))
            .map(str::to_string)
    }

    /// Fully-qualified URL the client used to reach this endpoint.
    pub fn current_url(&self, trust_proxy: bool) -> String {
        original_url(self.headers, self.uri, self.encrypted, trust_proxy)
    }
}

/// Per-request overrides of the strategy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOptions {
    pub callback_url: Option<String>,
    pub require_callback: Option<bool>,
}

impl AuthOptions {
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_require_callback(mut self, required: bool) -> Self {
        self.require_callback = Some(required);
        self
    }
}

/// Informational payload attached to success and fail outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthInfo {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            extra: Map::new(),
        }
    }
}

/// Result of a verify callback: the `(user, info)` half of `done(err, user, info)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification<U> {
    pub user: Option<U>,
    pub info: Option<AuthInfo>,
}

impl<U> Verification<U> {
    pub fn user(user: U) -> Self {
        Self {
            user: Some(user),
            info: None,
        }
    }

    pub fn rejected(info: Option<AuthInfo>) -> Self {
        Self { user: None, info }
    }

    #[must_use]
    pub fn with_info(mut self, info: AuthInfo) -> Self {
        self.info = Some(info);
        self
    }
}

/// The single terminal action of an authentication attempt.
#[derive(Debug)]
pub enum AuthOutcome<U> {
    Redirect(String),
    Success { user: U, info: Option<AuthInfo> },
    Fail(Option<AuthInfo>),
    Error(StrategyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{COOKIE, HOST};

    fn headers(cookie: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, "app.example".parse().unwrap());
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, cookie.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_session_status_round_trip() {
        for status in [SessionStatus::SignIn, SessionStatus::Bypass, SessionStatus::Direct] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("SIGNIN"), None);
        assert_eq!(SessionStatus::SignIn.to_string(), "signin");
    }

    #[test]
    fn test_session_cookie_prefers_legacy_name() {
        let headers = headers(Some("connect.sid=new; dashboard.sid=old"));
        let uri = Uri::from_static("/");

        let request = AuthRequest::new(&headers, &uri);

        assert_eq!(request.session_cookie(), Some("old".to_string()));
    }

    #[test]
    fn test_session_cookie_falls_back_to_connect_sid() {
        let headers = headers(Some("theme=dark; connect.sid=s%3Aabc.def"));
        let uri = Uri::from_static("/");

        let request = AuthRequest::new(&headers, &uri);

        assert_eq!(request.session_cookie(), Some("s%3Aabc.def".to_string()));
    }

    #[test]
    fn test_session_cookie_ignores_empty_value() {
        let headers = headers(Some("dashboard.sid=; connect.sid=abc"));
        let uri = Uri::from_static("/");

        let request = AuthRequest::new(&headers, &uri);

        assert_eq!(request.session_cookie(), Some("abc".to_string()));
    }

    #[test]
    fn test_session_cookie_absent() {
        let with_other = headers(Some("theme=dark"));
        let without = headers(None);
        let uri = Uri::from_static("/");

        assert_eq!(AuthRequest::new(&with_other, &uri).session_cookie(), None);
        assert_eq!(AuthRequest::new(&without, &uri).session_cookie(), None);
    }

    #[test]
    fn test_current_url_uses_tls_flag() {
        let headers = headers(None);
        let uri = Uri::from_static("/login?next=%2F");

        let plain = AuthRequest::new(&headers, &uri);
        assert_eq!(plain.current_url(false), "http://app.example/login?next=%2F");

        let tls = AuthRequest::new(&headers, &uri).with_tls(true);
        assert_eq!(tls.current_url(false), "https://app.example/login?next=%2F");
    }

    #[test]
    fn test_auth_info_serialization() {
        let info = AuthInfo::message("no match");
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value, serde_json::json!({ "message": "no match" }));

        let empty = serde_json::to_value(AuthInfo::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn test_verification_builders() {
        let accepted = Verification::user("jane").with_info(AuthInfo::message("welcome"));
        assert_eq!(accepted.user, Some("jane"));
        assert_eq!(accepted.info, Some(AuthInfo::message("welcome")));

        let rejected: Verification<&str> = Verification::rejected(None);
        assert_eq!(rejected.user, None);
        assert_eq!(rejected.info, None);
    }
}
