//! HTTP plumbing shared by the adapters: client construction and the
//! "direct success only" response check.

use crate::error::LookupError;
use reqwest::{RequestBuilder, Response, header::LOCATION, redirect::Policy};

/// Build an HTTP client that identifies as `user_agent` and never follows redirects.
///
/// `cookies` enables a per-client cookie jar for sources that need a session.
pub fn build_client(user_agent: &str, cookies: bool) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(Policy::none())
        .cookie_store(cookies)
        .build()
}

/// Send `request` and accept only a non-redirected, success-status response.
pub(crate) async fn send_direct(request: RequestBuilder) -> Result<Response, LookupError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        return Err(LookupError::Redirected {
            url: response.url().to_string(),
            location,
        });
    }

    if !status.is_success() {
        return Err(LookupError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

/// Resolve a (possibly relative) link found on a page against the site's base URL.
pub(crate) fn resolve_href(base: &str, href: &str) -> Result<String, LookupError> {
    let base = url::Url::parse(base)?;
    Ok(base.join(href)?.to_string())
}
