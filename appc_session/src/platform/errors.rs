use thiserror::Error;

/// Status code the platform uses for an expired or otherwise invalid session id.
pub const EXPIRED_SESSION_CODE: u16 = 403;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The platform answered, but rejected the session identifier.
    #[error("Platform responded with {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ExchangeError {
    /// Classification code of the failure, when the platform supplied one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }

    /// True when the identifier is expired or forbidden and a fresh login may fix it.
    pub fn is_expired(&self) -> bool {
        self.code() == Some(EXPIRED_SESSION_CODE)
    }
}
