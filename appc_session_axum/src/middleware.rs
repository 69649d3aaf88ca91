use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{request::Parts, uri::Scheme};

use super::error::into_auth_result;
use super::session::{ConnectionTls, SessionHandle};
use appc_session::{AuthOptions, AuthOutcome, AuthRequest, Strategy};

/// Run `strategy` against the parts of an inbound request.
///
/// The session comes from the [`SessionHandle`] extension; without one the
/// strategy reports a configuration error. The connection counts as TLS when
/// the URI scheme is `https` or a [`ConnectionTls(true)`](ConnectionTls)
/// extension is present.
pub async fn authenticate_parts<S: Strategy>(
    strategy: &S,
    parts: &Parts,
    options: &AuthOptions,
) -> AuthOutcome<S::User> {
    let encrypted = parts.uri.scheme() == Some(&Scheme::HTTPS)
        || parts
            .extensions
            .get::<ConnectionTls>()
            .is_some_and(|ConnectionTls(tls)| *tls);
    let request = AuthRequest::new(&parts.headers, &parts.uri).with_tls(encrypted);

    let Some(handle) = parts.extensions.get::<SessionHandle>() else {
        tracing::warn!("No SessionHandle in request extensions");
        return strategy.authenticate(request, options).await;
    };

    let mut session = handle.lock().await;
    strategy
        .authenticate(request.with_session(&mut *session), options)
        .await
}

/// Middleware that only lets authenticated requests through.
///
/// Per-route overrides can be attached as an [`AuthOptions`] extension.
///
/// ```ignore
/// let app = Router::new()
///     .route("/protected", get(protected))
///     .route_layer(middleware::from_fn_with_state(
///         strategy,
///         require_appc_session::<MyStrategy>,
///     ));
/// ```
pub async fn require_appc_session<S>(
    State(strategy): State<Arc<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: Strategy,
    S::User: Clone + Sync,
{
    let (mut parts, body) = req.into_parts();
    let options = parts
        .extensions
        .get::<AuthOptions>()
        .cloned()
        .unwrap_or_default();

    tracing::debug!(
        "Authenticating {} {} with strategy {}",
        parts.method,
        parts.uri,
        strategy.name()
    );

    match into_auth_result(authenticate_parts(strategy.as_ref(), &parts, &options).await) {
        Ok(auth_user) => {
            parts.extensions.insert(auth_user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
