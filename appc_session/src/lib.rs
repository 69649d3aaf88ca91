//! appc_session - Appcelerator platform session authentication
//!
//! This crate provides a pluggable authentication strategy that validates the
//! Appcelerator platform session cookie, driving the redirect round-trip through
//! the dashboard login page when needed and mapping the platform session to an
//! application user through a verify callback.

mod config;
mod errors;
mod platform;
mod strategy;

pub use config::{
    CALLBACK_URL_PLACEHOLDER, DEFAULT_LOGIN_URL, DEFAULT_SESSION_KEY, DEFAULT_STRATEGY_NAME,
    StrategyConfig,
};
pub use errors::{StrategyError, VerifyError};

pub use platform::{
    DEFAULT_PLATFORM_URL, EXPIRED_SESSION_CODE, ExchangeError, PlatformClient, PlatformOrg,
    PlatformSession, PlatformUser, SessionExchange,
};

pub use strategy::{
    AppcStrategy, AppcStrategyBuilder, AuthInfo, AuthOptions, AuthOutcome, AuthRequest,
    SID_COOKIE_NAMES, SessionMap, SessionStatus, Strategy, Verification, VerifySession, login_url,
    original_url, resolve_url,
};
