use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validated platform session, as returned by the session lookup endpoint.
///
/// Fields the crate does not model are kept in `extra` so that the verify
/// callback sees the full platform payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSession {
    /// Session identifier the lookup was made with.
    #[serde(skip)]
    pub sid: String,
    pub user: PlatformUser,
    /// Organization the session is currently scoped to.
    #[serde(default)]
    pub org: Option<PlatformOrg>,
    #[serde(default)]
    pub orgs: Vec<PlatformOrg>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub guid: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOrg {
    pub org_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
}

/// Response envelope used by the platform API.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse {
    #[serde(default)]
    pub(super) success: bool,
    #[serde(default)]
    pub(super) result: Option<Value>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) code: Option<u16>,
}
