use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{TypedHeader, headers::Cookie};
use http::{HeaderValue, header::SET_COOKIE};
use tokio::sync::Mutex;
use uuid::Uuid;

use appc_session_axum::SessionHandle;

pub(crate) const DEMO_SESSION_COOKIE: &str = "demo.sid";

/// In-memory session store keyed by the `demo.sid` cookie.
///
/// Entries are never evicted, so the map grows with every new visitor.
/// Only suitable for the demo.
#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    /// Returns the session id, its handle, and whether it was just created.
    async fn load_or_create(&self, id: Option<String>) -> (String, SessionHandle, bool) {
        let mut sessions = self.sessions.lock().await;
        if let Some(id) = id {
            if let Some(handle) = sessions.get(&id) {
                return (id, handle.clone(), false);
            }
            tracing::debug!("Unknown session id {}, starting a new session", id);
        }

        let id = Uuid::new_v4().to_string();
        let handle = SessionHandle::new();
        sessions.insert(id.clone(), handle.clone());
        (id, handle, true)
    }
}

pub(crate) async fn session_layer(
    State(store): State<SessionStore>,
    cookies: Option<TypedHeader<Cookie>>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = cookies
        .as_ref()
        .and_then(|TypedHeader(cookies)| cookies.get(DEMO_SESSION_COOKIE))
        .map(str::to_string);

    let (id, handle, created) = store.load_or_create(existing).await;
    req.extensions_mut().insert(handle);

    let mut response = next.run(req).await;
    if created {
        let cookie = format!("{DEMO_SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Failed to build session cookie: {}", e),
        }
    }
    response
}
