use axum::response::Html;

use appc_session_axum::AuthUser;

use crate::verify::DemoUser;

pub(crate) async fn index() -> Html<&'static str> {
    Html(
        r#"<h1>Appcelerator session demo</h1>
<p>Sign in with your platform account to see the <a href="/protected">protected page</a>.</p>"#,
    )
}

pub(crate) async fn protected(user: AuthUser<DemoUser>) -> Html<String> {
    tracing::trace!("Platform user guid: {}", user.user.guid);
    let org = user.user.org.as_deref().unwrap_or("no organization");
    Html(format!(
        "<h1>Hey {}!</h1><p>Signed in to {}.</p><p><a href=\"/\">Home</a></p>",
        user.user.username, org
    ))
}

/// Target of the redirect round-trip.
pub(crate) async fn callback(user: AuthUser<DemoUser>) -> Html<String> {
    let message = user
        .info
        .and_then(|info| info.message)
        .unwrap_or_else(|| "Signed in".to_string());
    Html(format!(
        "<h1>{}, {}</h1><p><a href=\"/protected\">Continue</a></p>",
        message, user.user.username
    ))
}
