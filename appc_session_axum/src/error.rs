use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{StatusCode, header::LOCATION};

use super::session::AuthUser;
use appc_session::{AuthInfo, AuthOutcome, StrategyError};

/// Every authentication outcome other than success, ready to be sent back.
#[derive(Debug)]
pub enum AuthRejection {
    /// Send the user agent elsewhere with `302 Found`.
    Redirect(String),
    /// The verify callback found no user.
    Fail(Option<AuthInfo>),
    Error(StrategyError),
}

/// Split an outcome into the authenticated user or the response to send instead.
pub fn into_auth_result<U>(outcome: AuthOutcome<U>) -> Result<AuthUser<U>, AuthRejection> {
    match outcome {
        AuthOutcome::Success { user, info } => Ok(AuthUser { user, info }),
        AuthOutcome::Redirect(url) => Err(AuthRejection::Redirect(url)),
        AuthOutcome::Fail(info) => Err(AuthRejection::Fail(info)),
        AuthOutcome::Error(err) => Err(AuthRejection::Error(err)),
    }
}

fn error_status(err: &StrategyError) -> StatusCode {
    match err {
        StrategyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StrategyError::Exchange(e) if e.is_expired() => StatusCode::UNAUTHORIZED,
        StrategyError::Exchange(_) => StatusCode::BAD_GATEWAY,
        StrategyError::ExchangeTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        StrategyError::MissingSessionCookie => StatusCode::UNAUTHORIZED,
        StrategyError::Verify(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Redirect(url) => {
                tracing::debug!("Redirecting to {}", url);
                (StatusCode::FOUND, [(LOCATION, url)]).into_response()
            }
            AuthRejection::Fail(Some(info)) => {
                tracing::debug!("Authentication failed: {:?}", info.message);
                (StatusCode::UNAUTHORIZED, Json(info)).into_response()
            }
            AuthRejection::Fail(None) => {
                tracing::debug!("Authentication failed");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            AuthRejection::Error(err) => {
                let status = error_status(&err);
                tracing::error!("Authentication error ({}): {}", status, err);
                (status, err.to_string()).into_response()
            }
        }
    }
}
