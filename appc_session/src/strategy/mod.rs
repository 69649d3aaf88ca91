mod core;
mod redirect_url;
mod traits;
mod types;


pub use core::{AppcStrategy, AppcStrategyBuilder};
pub use redirect_url::{login_url, original_url, resolve_url};
pub use traits::{SessionMap, Strategy, VerifySession};
pub use types::{
    AuthInfo, AuthOptions, AuthOutcome, AuthRequest, SID_COOKIE_NAMES, SessionStatus,
    Verification,
};
