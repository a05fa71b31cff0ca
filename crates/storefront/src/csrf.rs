//! CSRF token lookup.
//!
//! The backend sets a `csrftoken` cookie and expects its value echoed back
//! in the `X-CSRFToken` header on every mutating request.

use std::fmt;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Name of the cookie holding the CSRF token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Header the token is sent in.
pub const CSRF_HEADER_NAME: &str = "x-csrftoken";

/// Extract the CSRF token from a `;`-separated `name=value` cookie list.
///
/// Pairs are trimmed, pairs without `=` are skipped, and the first pair named
/// exactly `csrftoken` wins. Values may themselves contain `=`.
///
/// ```rust
/// use verzend_storefront::csrf::csrf_token;
///
/// assert_eq!(csrf_token("theme=dark; csrftoken=abc123"), Some("abc123"));
/// assert_eq!(csrf_token("theme=dark"), None);
/// ```
#[must_use]
pub fn csrf_token(cookies: &str) -> Option<&str> {
    cookie_value(cookies, CSRF_COOKIE_NAME)
}

/// Value of the first cookie named `name` in a `;`-separated list.
#[must_use]
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(n, _)| *n == name)
        .map(|(_, value)| value)
}

/// Reads the CSRF token from the cookie jar shared with the HTTP client.
///
/// Cookies set by backend responses land in the same jar, so a rotated
/// token is picked up on the next request.
#[derive(Clone)]
pub struct CsrfProvider {
    jar: Arc<Jar>,
    url: Url,
}

impl CsrfProvider {
    /// Create a provider reading cookies scoped to `url`.
    #[must_use]
    pub const fn new(jar: Arc<Jar>, url: Url) -> Self {
        Self { jar, url }
    }

    /// Current token, if the cookie is present. Never errors.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.cookie(CSRF_COOKIE_NAME)
    }

    /// Current value of any cookie the jar would send to the backend.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        let cookies = header.to_str().ok()?;
        cookie_value(cookies, name).map(str::to_string)
    }
}

impl fmt::Debug for CsrfProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfProvider")
            .field("url", &self.url.as_str())
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_csrf_token_basic() {
        assert_eq!(csrf_token("csrftoken=abc"), Some("abc"));
        assert_eq!(csrf_token("  csrftoken=abc  "), Some("abc"));
        assert_eq!(csrf_token("a=1; csrftoken=xyz; b=2"), Some("xyz"));
    }

    #[test]
    fn test_csrf_token_missing() {
        assert_eq!(csrf_token(""), None);
        assert_eq!(csrf_token("sessionid=1; theme=dark"), None);
        assert_eq!(csrf_token("xcsrftoken=nope; csrftokens=nope"), None);
    }

    #[test]
    fn test_csrf_token_skips_pairs_without_equals() {
        assert_eq!(csrf_token("csrftoken; csrftoken=real"), Some("real"));
    }

    #[test]
    fn test_csrf_token_first_match_wins() {
        assert_eq!(csrf_token("csrftoken=first; csrftoken=second"), Some("first"));
    }

    #[test]
    fn test_csrf_token_keeps_equals_in_value() {
        assert_eq!(csrf_token("csrftoken=a=b=="), Some("a=b=="));
    }

    #[test]
    fn test_provider_reads_jar() {
        let url = Url::parse("http://shop.test/").unwrap();
        let jar = Arc::new(Jar::default());
        let provider = CsrfProvider::new(Arc::clone(&jar), url.clone());
        assert_eq!(provider.token(), None);

        jar.add_cookie_str("csrftoken=tok123; Path=/", &url);
        jar.add_cookie_str("theme=dark; Path=/", &url);
        assert_eq!(provider.token().as_deref(), Some("tok123"));
        assert_eq!(provider.cookie("theme").as_deref(), Some("dark"));
        assert_eq!(provider.cookie("sessionid"), None);
    }

    #[test]
    fn test_provider_debug_redacts_token() {
        let url = Url::parse("http://shop.test/").unwrap();
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("csrftoken=very_secret; Path=/", &url);
        let provider = CsrfProvider::new(jar, url);

        let debug_output = format!("{provider:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very_secret"));
    }

    fn cookie_name() -> impl Strategy<Value = String> {
        "[a-z_]{1,12}".prop_filter("not the csrf cookie", |n| n != CSRF_COOKIE_NAME)
    }

    proptest! {
        #[test]
        fn test_token_found_among_other_pairs(
            token in "[A-Za-z0-9]{1,64}",
            before in proptest::collection::vec((cookie_name(), "[A-Za-z0-9]{0,16}"), 0..4),
            after in proptest::collection::vec((cookie_name(), "[A-Za-z0-9]{0,16}"), 0..4),
            pad in " {0,3}",
        ) {
            let mut pairs: Vec<String> = before.iter().map(|(n, v)| format!("{n}={v}")).collect();
            pairs.push(format!("{pad}{CSRF_COOKIE_NAME}={token}{pad}"));
            pairs.extend(after.iter().map(|(n, v)| format!("{n}={v}")));
            let cookies = pairs.join("; ");

            prop_assert_eq!(csrf_token(&cookies), Some(token.as_str()));
        }

        #[test]
        fn test_no_token_without_csrf_pair(
            pairs in proptest::collection::vec((cookie_name(), "[A-Za-z0-9]{0,16}"), 0..6),
        ) {
            let cookies = pairs
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            prop_assert_eq!(csrf_token(&cookies), None);
        }
    }
}
