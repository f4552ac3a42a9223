//! HTTP session construction
//!
//! Builds the reqwest client a crawler uses for all of its fetches,
//! including any source-mandated cookies seeded into the jar before the
//! first request. Several sources gate full content behind a cookie-driven
//! consent wall: without the cookie, pages still return HTTP 200 but carry
//! placeholder or redirected content, which no status check can catch. The
//! seeding therefore happens unconditionally at session construction, not
//! reactively per request.

use crate::config::NetworkConfig;
use reqwest::cookie::Jar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A cookie a source requires before it serves real content
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: &'static str,
}

/// Builds an HTTP session for one crawler instance
///
/// The session owns its cookie jar; it is not shared across sources. Seeding
/// is idempotent: applying the same cookie twice just overwrites it.
///
/// # Arguments
///
/// * `config` - Network behavior configuration
/// * `base_url` - The resolved base URL the cookies are scoped to
/// * `cookies` - Source-mandated cookies to seed before first use
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built session
/// * `Err(reqwest::Error)` - Failed to build the client
pub fn build_session(
    config: &NetworkConfig,
    base_url: &Url,
    cookies: &[SessionCookie],
) -> Result<Client, reqwest::Error> {
    let jar = Arc::new(Jar::default());
    for cookie in cookies {
        jar.add_cookie_str(&format!("{}={}", cookie.name, cookie.value), base_url);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .cookie_provider(jar)
        .gzip(true)
        .brotli(true)
        .build()
}
