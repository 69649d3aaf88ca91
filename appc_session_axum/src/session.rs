use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::{StatusCode, request::Parts};
use tokio::sync::{Mutex, MutexGuard};

use appc_session::AuthInfo;

/// Per-request view of the host session, shared through request extensions.
///
/// The host's session layer inserts one of these before the strategy runs;
/// the strategy records its round-trip status in it, and the session layer
/// persists whatever it holds once the response is produced.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<Mutex<HashMap<String, String>>>);

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self(Arc::new(Mutex::new(map)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.0.lock().await
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.0.lock().await.get(key).cloned()
    }

    /// Copy of the current contents, for persisting after the response.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.0.lock().await.clone()
    }
}

/// Marks a request that arrived on a TLS connection terminated by this process.
///
/// Origin-form request URIs carry no scheme, so a host serving TLS itself
/// (for example with `axum-server`) inserts `ConnectionTls(true)` to have the
/// current URL built as `https://`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionTls(pub bool);

/// User produced by a successful authentication, available as an axum extractor
///
/// [`require_appc_session`](crate::require_appc_session) stores it in the
/// request extensions. Extracting it from a route without that middleware
/// rejects with `401 Unauthorized`.
///
/// # Example
///
/// ```no_run
/// use appc_session_axum::AuthUser;
///
/// async fn protected(user: AuthUser<String>) -> String {
///     format!("Hello, {}!", user.user)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser<U> {
    pub user: U,
    pub info: Option<AuthInfo>,
}

impl<S, U> FromRequestParts<S> for AuthUser<U>
where
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::debug!("No authenticated user in request extensions");
            (StatusCode::UNAUTHORIZED, "Unauthorized")
        })
    }
}

impl<S, U> OptionalFromRequestParts<S> for AuthUser<U>
where
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::get};
    use http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_session_handle_shares_state() {
        let handle = SessionHandle::new();
        let clone = handle.clone();

        clone
            .lock()
            .await
            .insert("status".to_string(), "signin".to_string());

        assert_eq!(handle.get("status").await, Some("signin".to_string()));
        assert_eq!(handle.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_auth_user_rejects_without_middleware() {
        async fn protected(user: AuthUser<String>) -> String {
            user.user
        }
        let app = Router::new().route("/", get(protected));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_auth_user_is_none_without_middleware() {
        async fn index(user: Option<AuthUser<String>>) -> String {
            match user {
                Some(u) => u.user,
                None => "anonymous".to_string(),
            }
        }
        let app = Router::new().route("/", get(index));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
