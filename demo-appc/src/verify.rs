use async_trait::async_trait;

use appc_session_axum::appc_session::{
    AppcStrategy, AuthInfo, PlatformClient, PlatformSession, Verification, VerifyError,
    VerifySession,
};

pub(crate) type DemoStrategy = AppcStrategy<PlatformClient, DemoVerify>;

#[derive(Clone, Debug)]
pub(crate) struct DemoUser {
    pub(crate) guid: String,
    pub(crate) username: String,
    pub(crate) org: Option<String>,
}

/// Accepts any platform user that has a username or email.
pub(crate) struct DemoVerify;

#[async_trait]
impl VerifySession<PlatformSession> for DemoVerify {
    type User = DemoUser;

    async fn verify(&self, session: PlatformSession) -> Result<Verification<DemoUser>, VerifyError> {
        let PlatformSession { user, org, .. } = session;
        let Some(username) = user.username.or(user.email) else {
            tracing::debug!("Platform user {} has no username", user.guid);
            return Ok(Verification::rejected(Some(AuthInfo::message(
                "Platform user has no username",
            ))));
        };

        Ok(Verification::user(DemoUser {
            guid: user.guid,
            username,
            org: org.and_then(|o| o.name),
        }))
    }
}
