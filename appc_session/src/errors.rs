use std::time::Duration;

use thiserror::Error;

use crate::platform::ExchangeError;

/// Errors surfaced as the error outcome of an authentication attempt.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Misuse of the strategy: invalid configuration or missing host support.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the session exchange, passed through unchanged.
    #[error("Session exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Session cookie missing after redirect round-trip")]
    MissingSessionCookie,

    #[error("Session exchange timed out after {0:?}")]
    ExchangeTimeout(Duration),

    /// Error raised by the application's verify callback.
    #[error("Verify error: {0}")]
    Verify(#[from] VerifyError),
}

/// Error returned by an application verify callback.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct VerifyError(pub Box<dyn std::error::Error + Send + Sync>);

impl VerifyError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_passes_through_unchanged() {
        let original = ExchangeError::Status {
            code: 500,
            message: "boom".to_string(),
        };

        let err = StrategyError::from(original.clone());

        match err {
            StrategyError::Exchange(inner) => assert_eq!(inner, original),
            other => panic!("Expected Exchange variant, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_error_display_uses_inner_message() {
        let err = VerifyError::new("database unavailable");
        assert_eq!(err.to_string(), "database unavailable");

        let wrapped = StrategyError::from(err);
        assert_eq!(wrapped.to_string(), "Verify error: database unavailable");
    }

    #[test]
    fn test_timeout_display() {
        let err = StrategyError::ExchangeTimeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Session exchange timed out after 5s");
    }
}
