//! HTTP client for the storefront backend.
//!
//! Every request built through [`HttpClient::request`] carries the CSRF
//! header and a JSON content type, plus the session and CSRF cookies from
//! the shared jar. Callers may override either by passing
//! their own headers. Responses are handed back untouched: a 400 with a JSON
//! body is a normal response, not an error.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::csrf::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, CsrfProvider};
use crate::error::ApiError;

/// Name of the backend's session cookie. The cart is keyed on it.
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Options for a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers; these win over the client defaults
    pub headers: HeaderMap,
    /// Pre-encoded request body
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// A POST carrying `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` if `body` cannot be serialized.
    pub fn post_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(serde_json::to_vec(body)?),
        })
    }

    /// Add a caller header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Merge caller headers over defaults. On a key collision every default
/// value for that key is replaced by the caller's values.
#[must_use]
pub fn merge_headers(mut defaults: HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    for name in overrides.keys() {
        defaults.remove(name);
        for value in overrides.get_all(name) {
            defaults.append(name.clone(), value.clone());
        }
    }
    defaults
}

/// Storefront HTTP client with CSRF handling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    csrf: CsrfProvider,
}

impl HttpClient {
    /// Create a client for the configured backend.
    ///
    /// A configured CSRF token and session id are seeded into the cookie
    /// jar as `csrftoken` and `sessionid`, exactly as if the backend had set
    /// them.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        seed_cookie(&jar, &config.base_url, CSRF_COOKIE_NAME, config.csrf_token.as_ref());
        seed_cookie(&jar, &config.base_url, SESSION_COOKIE_NAME, config.session_id.as_ref());

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            csrf: CsrfProvider::new(jar, config.base_url.clone()),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn csrf(&self) -> &CsrfProvider {
        &self.csrf
    }

    /// Session id currently held in the jar, whether configured or issued
    /// by the backend.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.csrf.cookie(SESSION_COOKIE_NAME)
    }

    /// Headers applied to every [`request`](Self::request).
    ///
    /// `X-CSRFToken` is omitted when no `csrftoken` cookie is present.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidHeader` if the token is not a valid header value.
    pub fn default_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.csrf.token() {
            headers.insert(
                HeaderName::from_static(CSRF_HEADER_NAME),
                HeaderValue::from_str(&token)
                    .map_err(|_| ApiError::InvalidHeader(CSRF_HEADER_NAME.to_string()))?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send a request to `path` (resolved against the base URL).
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the request fails in transport.
    /// HTTP error statuses are not errors.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Response, ApiError> {
        let url = self.base_url.join(path)?;
        let headers = merge_headers(self.default_headers()?, &options.headers);

        let mut builder = self.client.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "Storefront response");
        Ok(response)
    }

    /// POST `body` as JSON and decode the JSON response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON response body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(path, RequestOptions::post_json(body)?).await?;
        decode(response).await
    }

    /// Plain GET without the default headers, decoding the JSON response.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON response body.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.base_url.join(path)?;
        let response = self.client.get(url).send().await?;
        debug!(status = %response.status(), "Storefront response");
        decode(response).await
    }
}

fn seed_cookie(jar: &Jar, url: &Url, name: &str, value: Option<&SecretString>) {
    if let Some(value) = value {
        jar.add_cookie_str(&format!("{name}={}; Path=/", value.expose_secret()), url);
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
