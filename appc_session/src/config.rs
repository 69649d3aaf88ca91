//! Strategy configuration for the appc_session crate

use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::StrategyError;

/// Placeholder in the login URL template replaced by the encoded callback URL.
pub const CALLBACK_URL_PLACEHOLDER: &str = "{callbackURL}";

/// Dashboard login page used when no template is configured.
pub const DEFAULT_LOGIN_URL: &str = "https://dashboard.appcelerator.com/?next={callbackURL}";

/// Session key under which the redirect round-trip status is kept.
pub const DEFAULT_SESSION_KEY: &str = "appc.session.status";

pub const DEFAULT_STRATEGY_NAME: &str = "appc";

/// Immutable configuration of an [`AppcStrategy`](crate::AppcStrategy).
///
/// Every field has an explicit value from the moment the config is created.
/// Override defaults with the `with_*` methods or load them with
/// [`from_env()`](StrategyConfig::from_env).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub(crate) name: String,
    pub(crate) login_url: String,
    pub(crate) callback_url: Option<String>,
    pub(crate) require_callback: bool,
    pub(crate) session_key: String,
    pub(crate) trust_proxy: bool,
    pub(crate) exchange_timeout: Option<Duration>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STRATEGY_NAME.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            callback_url: None,
            require_callback: false,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            trust_proxy: false,
            exchange_timeout: None,
        }
    }
}

impl StrategyConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `APPC_LOGIN_URL`: login page template containing `{callbackURL}`
    /// - `APPC_CALLBACK_URL`: absolute or relative callback URL
    /// - `APPC_REQUIRE_CALLBACK`: `true`/`false`, force the callback round-trip
    /// - `APPC_SESSION_KEY`: session key for the round-trip status
    /// - `APPC_TRUST_PROXY`: `true`/`false`, honor `X-Forwarded-*` headers
    /// - `APPC_EXCHANGE_TIMEOUT_SECS`: timeout for the session exchange
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Config`] if a variable is set to an unparsable
    /// value or the resulting config fails [`validate()`](StrategyConfig::validate).
    pub fn from_env() -> Result<Self, StrategyError> {
        let mut config = Self::default();

        if let Ok(login_url) = env::var("APPC_LOGIN_URL") {
            config = config.with_login_url(login_url);
        }
        if let Ok(callback_url) = env::var("APPC_CALLBACK_URL") {
            config = config.with_callback_url(callback_url);
        }
        if let Ok(value) = env::var("APPC_REQUIRE_CALLBACK") {
            config = config.with_require_callback(parse_bool("APPC_REQUIRE_CALLBACK", &value)?);
        }
        if let Ok(key) = env::var("APPC_SESSION_KEY") {
            config = config.with_session_key(key);
        }
        if let Ok(value) = env::var("APPC_TRUST_PROXY") {
            config = config.with_trust_proxy(parse_bool("APPC_TRUST_PROXY", &value)?);
        }
        if let Ok(value) = env::var("APPC_EXCHANGE_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|e| {
                StrategyError::Config(format!("APPC_EXCHANGE_TIMEOUT_SECS: {e}"))
            })?;
            config = config.with_exchange_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_login_url(mut self, template: impl Into<String>) -> Self {
        self.login_url = template.into();
        self
    }

    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_require_callback(mut self, required: bool) -> Self {
        self.require_callback = required;
        self
    }

    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    #[must_use]
    pub fn with_trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    #[must_use]
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub fn require_callback(&self) -> bool {
        self.require_callback
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn trust_proxy(&self) -> bool {
        self.trust_proxy
    }

    pub fn exchange_timeout(&self) -> Option<Duration> {
        self.exchange_timeout
    }

    /// Check the config for values that would break every request.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Config`] when the strategy name or session key
    /// is empty, the login template lacks the `{callbackURL}` placeholder, the
    /// callback URL has a scheme but does not parse, or the timeout is zero.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.name.trim().is_empty() {
            return Err(StrategyError::Config("strategy name must not be empty".into()));
        }
        if self.session_key.trim().is_empty() {
            return Err(StrategyError::Config("session key must not be empty".into()));
        }
        if !self.login_url.contains(CALLBACK_URL_PLACEHOLDER) {
            return Err(StrategyError::Config(format!(
                "login URL template must contain {CALLBACK_URL_PLACEHOLDER}: {}",
                self.login_url
            )));
        }
        if let Some(callback_url) = &self.callback_url {
            match Url::parse(callback_url) {
                Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {}
                Err(e) => {
                    return Err(StrategyError::Config(format!(
                        "invalid callback URL {callback_url}: {e}"
                    )));
                }
            }
        }
        if self.exchange_timeout == Some(Duration::ZERO) {
            return Err(StrategyError::Config("exchange timeout must be non-zero".into()));
        }
        Ok(())
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, StrategyError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StrategyError::Config(format!(
            "{var}: expected a boolean, got {other:?}"
        ))),
    }
}
