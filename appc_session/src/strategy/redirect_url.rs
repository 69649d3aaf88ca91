use http::header::HOST;
use http::{HeaderMap, Uri};
use url::Url;

use crate::config::CALLBACK_URL_PLACEHOLDER;
use crate::errors::StrategyError;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Reconstruct the URL the client used to reach this endpoint.
///
/// `X-Forwarded-Proto` and `X-Forwarded-Host` are only honored when
/// `trust_proxy` is set; otherwise the scheme comes from `encrypted` and the
/// host from the `Host` header.
pub fn original_url(headers: &HeaderMap, uri: &Uri, encrypted: bool, trust_proxy: bool) -> String {
    let forwarded_https = trust_proxy
        && first_value(headers, X_FORWARDED_PROTO)
            .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    let scheme = if encrypted || forwarded_https {
        "https"
    } else {
        "http"
    };

    let host = trust_proxy
        .then(|| first_value(headers, X_FORWARDED_HOST))
        .flatten()
        .or_else(|| first_value(headers, HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());

    format!("{scheme}://{host}{path}")
}

fn first_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolve `reference` against `base` unless it already carries a scheme.
///
/// Absolute references are returned untouched.
pub fn resolve_url(base: &str, reference: &str) -> Result<String, StrategyError> {
    match Url::parse(reference) {
        Ok(_) => Ok(reference.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(base)
                .map_err(|e| StrategyError::Config(format!("invalid request URL {base}: {e}")))?;
            let resolved = base.join(reference).map_err(|e| {
                StrategyError::Config(format!("invalid callback URL {reference}: {e}"))
            })?;
            Ok(resolved.into())
        }
        Err(e) => Err(StrategyError::Config(format!(
            "invalid callback URL {reference}: {e}"
        ))),
    }
}

/// Substitute the percent-encoded `target` for the placeholder in `template`.
///
/// Only ASCII alphanumerics and `-_.~` are left unescaped, so `!'()*` are
/// escaped too. Login pages decode them back to the same characters.
pub fn login_url(template: &str, target: &str) -> String {
    template.replacen(CALLBACK_URL_PLACEHOLDER, &urlencoding::encode(target), 1)
}
