use async_trait::async_trait;

use super::redirect_url::{login_url, resolve_url};
use super::traits::{SessionMap, Strategy, VerifySession};
use super::types::{AuthOptions, AuthOutcome, AuthRequest, SessionStatus, Verification};
use crate::config::StrategyConfig;
use crate::errors::StrategyError;
use crate::platform::SessionExchange;

const SESSION_REQUIRED: &str =
    "Appc authentication requires session support. Did you forget to attach a session layer?";

/// Strategy that validates the Appcelerator platform session cookie.
///
/// See [`Strategy::authenticate`] for the redirect round-trip it drives.
pub struct AppcStrategy<E, V> {
    config: StrategyConfig,
    exchange: E,
    verify: V,
}

impl<E, V> AppcStrategy<E, V> {
    pub fn builder() -> AppcStrategyBuilder<E, V> {
        AppcStrategyBuilder {
            config: StrategyConfig::default(),
            exchange: None,
            verify: None,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }
}

impl<E, V> AppcStrategy<E, V>
where
    E: SessionExchange,
    V: VerifySession<E::Session>,
{
    /// # Errors
    ///
    /// Returns [`StrategyError::Config`] if `config` fails validation.
    pub fn new(config: StrategyConfig, exchange: E, verify: V) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config,
            exchange,
            verify,
        })
    }

    fn callback_url(
        &self,
        options: &AuthOptions,
        current_url: &str,
    ) -> Result<Option<String>, StrategyError> {
        options
            .callback_url
            .as_deref()
            .or(self.config.callback_url.as_deref())
            .map(|url| resolve_url(current_url, url))
            .transpose()
    }

    fn stored_status(&self, session: &dyn SessionMap) -> Option<SessionStatus> {
        let value = session.get(&self.config.session_key)?;
        match SessionStatus::parse(&value) {
            Some(status) => Some(status),
            None => {
                // Unknown values still count as "set" so the exchange runs and clears them.
                tracing::warn!("Unrecognized session status {:?}, treating as direct", value);
                Some(SessionStatus::Direct)
            }
        }
    }

    /// Store `signin` and send the user agent to the login page, unless the
    /// previous round-trip already did so, in which case `err` is surfaced.
    fn retry_sign_in(
        &self,
        previous: Option<SessionStatus>,
        session: &mut dyn SessionMap,
        login_url: String,
        err: StrategyError,
    ) -> AuthOutcome<V::User> {
        if previous == Some(SessionStatus::SignIn) {
            tracing::warn!("Session still invalid after sign-in redirect: {}", err);
            return AuthOutcome::Error(err);
        }

        tracing::debug!("Session invalid, redirecting to login: {}", err);
        session.set(&self.config.session_key, SessionStatus::SignIn.to_string());
        AuthOutcome::Redirect(login_url)
    }

    async fn exchange_session(&self, session_id: &str) -> Result<E::Session, StrategyError> {
        let exchange = self.exchange.exchange(session_id);
        match self.config.exchange_timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result.map_err(StrategyError::Exchange),
                Err(_) => Err(StrategyError::ExchangeTimeout(limit)),
            },
            None => exchange.await.map_err(StrategyError::Exchange),
        }
    }

    async fn validate_session(
        &self,
        session_id: Option<String>,
        previous: Option<SessionStatus>,
        session: &mut dyn SessionMap,
        login_url: String,
    ) -> AuthOutcome<V::User> {
        let Some(session_id) = session_id else {
            return self.retry_sign_in(
                previous,
                session,
                login_url,
                StrategyError::MissingSessionCookie,
            );
        };

        let platform_session = match self.exchange_session(&session_id).await {
            Ok(platform_session) => platform_session,
            Err(StrategyError::Exchange(err)) if err.is_expired() => {
                let err = StrategyError::Exchange(err);
                return self.retry_sign_in(previous, session, login_url, err);
            }
            Err(err) => {
                tracing::error!("Session exchange failed: {}", err);
                return AuthOutcome::Error(err);
            }
        };

        match self.verify.verify(platform_session).await {
            Err(err) => {
                tracing::error!("Verify callback failed: {}", err);
                AuthOutcome::Error(StrategyError::Verify(err))
            }
            Ok(Verification { user: None, info }) => {
                tracing::debug!("Verify callback rejected the session");
                AuthOutcome::Fail(info)
            }
            Ok(Verification {
                user: Some(user),
                info,
            }) => AuthOutcome::Success { user, info },
        }
    }
}

#[async_trait]
impl<E, V> Strategy for AppcStrategy<E, V>
where
    E: SessionExchange,
    V: VerifySession<E::Session>,
{
    type User = V::User;

    fn name(&self) -> &str {
        &self.config.name
    }

    /// Drive one step of the redirect round-trip.
    ///
    /// - no cookie: store `signin` and redirect to the login page;
    /// - cookie, round-trip required, nothing stored: store `bypass` and
    ///   redirect to the callback URL;
    /// - otherwise clear the stored status and exchange the cookie. An expired
    ///   identifier earns one more login redirect unless the previous step was
    ///   already `signin`.
    async fn authenticate(
        &self,
        request: AuthRequest<'_>,
        options: &AuthOptions,
    ) -> AuthOutcome<V::User> {
        let session_id = request.session_cookie();
        let current_url = request.current_url(self.config.trust_proxy);

        let Some(session) = request.session else {
            tracing::error!("{}", SESSION_REQUIRED);
            return AuthOutcome::Error(StrategyError::Config(SESSION_REQUIRED.to_string()));
        };

        let callback_url = match self.callback_url(options, &current_url) {
            Ok(url) => url,
            Err(err) => return AuthOutcome::Error(err),
        };
        let login_url = login_url(
            &self.config.login_url,
            callback_url.as_deref().unwrap_or(&current_url),
        );
        let require_callback = options
            .require_callback
            .unwrap_or(self.config.require_callback);

        let stored = self.stored_status(session);
        let status = stored.or_else(|| {
            (session_id.is_some() && !require_callback).then_some(SessionStatus::Direct)
        });

        tracing::debug!(
            strategy = %self.config.name,
            stored = ?stored,
            status = ?status,
            has_cookie = session_id.is_some(),
            require_callback,
            "Authenticating request"
        );

        if status.is_some() {
            session.delete(&self.config.session_key);
            return self
                .validate_session(session_id, stored, session, login_url)
                .await;
        }

        if session_id.is_some() {
            session.set(&self.config.session_key, SessionStatus::Bypass.to_string());
            let target = callback_url.unwrap_or(current_url);
            tracing::debug!("Redirecting through callback URL {}", target);
            return AuthOutcome::Redirect(target);
        }

        session.set(&self.config.session_key, SessionStatus::SignIn.to_string());
        tracing::debug!("No session cookie, redirecting to login");
        AuthOutcome::Redirect(login_url)
    }
}

/// Builder for [`AppcStrategy`] that checks every collaborator is present.
pub struct AppcStrategyBuilder<E, V> {
    config: StrategyConfig,
    exchange: Option<E>,
    verify: Option<V>,
}

impl<E, V> AppcStrategyBuilder<E, V>
where
    E: SessionExchange,
    V: VerifySession<E::Session>,
{
    #[must_use]
    pub fn config(mut self, config: StrategyConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn exchange(mut self, exchange: E) -> Self {
        self.exchange = Some(exchange);
        self
    }

    #[must_use]
    pub fn verify(mut self, verify: V) -> Self {
        self.verify = Some(verify);
        self
    }

    /// # Errors
    ///
    /// Returns [`StrategyError::Config`] if the verify callback or exchange is
    /// missing, or the config fails validation.
    pub fn build(self) -> Result<AppcStrategy<E, V>, StrategyError> {
        let verify = self.verify.ok_or_else(|| {
            StrategyError::Config("AppcStrategy requires a verify callback".to_string())
        })?;
        let exchange = self.exchange.ok_or_else(|| {
            StrategyError::Config("AppcStrategy requires a session exchange".to_string())
        })?;
        AppcStrategy::new(self.config, exchange, verify)
    }
}
