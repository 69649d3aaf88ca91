mod client;
mod errors;
mod types;

pub use client::{DEFAULT_PLATFORM_URL, PlatformClient, SessionExchange};
pub use errors::{EXPIRED_SESSION_CODE, ExchangeError};
pub use types::{PlatformOrg, PlatformSession, PlatformUser};
