use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;

use super::types::{AuthOptions, AuthOutcome, AuthRequest, Verification};
use crate::errors::VerifyError;

/// A pluggable authentication strategy.
///
/// The host calls [`authenticate`](Strategy::authenticate) once per request
/// and acts on the single [`AuthOutcome`] it returns.
#[async_trait]
pub trait Strategy: Send + Sync + 'static {
    type User: Send + 'static;

    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    async fn authenticate(
        &self,
        request: AuthRequest<'_>,
        options: &AuthOptions,
    ) -> AuthOutcome<Self::User>;
}

/// Application callback that maps a validated platform session to a user.
///
/// Returning `Ok` with no user yields a fail outcome; returning `Err` yields
/// an error outcome.
///
/// Any async closure `Fn(S) -> impl Future<Output = Result<Verification<U>, VerifyError>>`
/// implements this trait.
#[async_trait]
pub trait VerifySession<S>: Send + Sync + 'static {
    type User: Send + 'static;

    async fn verify(&self, session: S) -> Result<Verification<Self::User>, VerifyError>;
}

#[async_trait]
impl<S, U, F, Fut> VerifySession<S> for F
where
    F: Fn(S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Verification<U>, VerifyError>> + Send + 'static,
    S: Send + 'static,
    U: Send + 'static,
{
    type User = U;

    async fn verify(&self, session: S) -> Result<Verification<U>, VerifyError> {
        (self)(session).await
    }
}

/// Mutable per-request session state owned by the host framework.
pub trait SessionMap: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn delete(&mut self, key: &str) -> Option<String>;
}

impl SessionMap for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) -> Option<String> {
        self.remove(key)
    }
}
