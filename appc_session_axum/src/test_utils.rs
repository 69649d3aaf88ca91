//! Shared test doubles for router-level tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::response::Response;
use http::Request;
use http::header::{COOKIE, HOST};

use appc_session::{
    AppcStrategy, AuthInfo, ExchangeError, SessionExchange, StrategyConfig, Verification,
    VerifyError, VerifySession,
};

/// Exchange that either echoes the session id or fails with a fixed status code.
pub struct FixedExchange {
    fail_with: Option<u16>,
}

#[async_trait]
impl SessionExchange for FixedExchange {
    type Session = String;

    async fn exchange(&self, session_id: &str) -> Result<String, ExchangeError> {
        match self.fail_with {
            Some(code) => Err(ExchangeError::Status {
                code,
                message: format!("platform returned {code}"),
            }),
            None => Ok(session_id.to_string()),
        }
    }
}

/// Accepts every session id except `unknown`.
pub struct KnownUsers;

#[async_trait]
impl VerifySession<String> for KnownUsers {
    type User = String;

    async fn verify(&self, session: String) -> Result<Verification<String>, VerifyError> {
        if session == "unknown" {
            Ok(Verification::rejected(Some(AuthInfo::message("unknown user"))))
        } else {
            Ok(Verification::user(format!("user-{session}")))
        }
    }
}

pub type TestStrategy = AppcStrategy<FixedExchange, KnownUsers>;

pub fn test_strategy(config: StrategyConfig, fail_with: Option<u16>) -> Arc<TestStrategy> {
    Arc::new(AppcStrategy::new(config, FixedExchange { fail_with }, KnownUsers).unwrap())
}

pub fn get_request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path).header(HOST, "app.example");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
