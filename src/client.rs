//! Zendesk API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::context::Context;
use crate::credential::Credential;
use crate::error::{Result, ZendeskError};
use crate::pagination::{CbpOptions, CursorPaginationMeta, ObpOptions, OffsetPage};
use crate::query::add_options;

const DEFAULT_USER_AGENT: &str = concat!("zendesk-rs/", env!("CARGO_PKG_VERSION"));

static SUBDOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]+[a-z0-9]$").expect("valid subdomain regex"));

/// Low-level Zendesk API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update` and `Delete`
/// traits on model types.
///
/// The header set is fixed when the client is built; [`with_header`]
/// returns a new client instead of changing this one. Clones share the
/// same connection pool.
///
/// [`with_header`]: ZendeskClient::with_header
///
/// # Example
///
/// ```no_run
/// use zendesk::{Credential, ZendeskClient};
///
/// # fn example() -> zendesk::Result<()> {
/// // Create from environment variables
/// let client = ZendeskClient::from_env()?;
///
/// // Or configure manually
/// let client = ZendeskClient::new("acme", Credential::api_token("agent@acme.com", "secret"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZendeskClient {
    http: Client,
    base_url: Arc<Url>,
    headers: Arc<HeaderMap>,
    credential: Arc<Credential>,
}

impl std::fmt::Debug for ZendeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZendeskClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ZendeskClient {
    /// Create a client from environment variables.
    ///
    /// The endpoint comes from `ZENDESK_API_URL` or, failing that,
    /// `ZENDESK_SUBDOMAIN`. The credential is the first complete one of
    /// `ZENDESK_OAUTH_TOKEN`, `ZENDESK_EMAIL` + `ZENDESK_API_TOKEN`, or
    /// `ZENDESK_EMAIL` + `ZENDESK_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::ConfigMissing`] if no endpoint or no
    /// credential is configured.
    pub fn from_env() -> Result<Self> {
        let credential = credential_from_env()?;

        if let Ok(url) = env::var("ZENDESK_API_URL") {
            return Self::with_endpoint(&url, credential);
        }

        let subdomain = env::var("ZENDESK_SUBDOMAIN").map_err(|_| {
            ZendeskError::ConfigMissing(
                "ZENDESK_SUBDOMAIN or ZENDESK_API_URL environment variable not set".to_string(),
            )
        })?;
        Self::new(&subdomain, credential)
    }

    /// Create a client for `https://{subdomain}.zendesk.com/api/v2`.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::InvalidSubdomain`] if `subdomain` is not a
    /// lowercase account name.
    pub fn new(subdomain: &str, credential: Credential) -> Result<Self> {
        if !SUBDOMAIN_RE.is_match(subdomain) {
            return Err(ZendeskError::InvalidSubdomain(subdomain.to_string()));
        }
        Self::with_endpoint(&format!("https://{subdomain}.zendesk.com/api/v2"), credential)
    }

    /// Create a client for an arbitrary API root, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_endpoint(base_url: &str, credential: Credential) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            headers: Arc::new(headers),
            credential: Arc::new(credential),
        })
    }

    /// A copy of this client that also sends `name: value` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::InvalidHeader`] if the name or value is not
    /// a legal HTTP header.
    pub fn with_header(&self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ZendeskError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ZendeskError::InvalidHeader(format!("{name}: {e}")))?;

        let mut headers = (*self.headers).clone();
        headers.insert(name, value);

        Ok(Self {
            headers: Arc::new(headers),
            ..self.clone()
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request (authorization excluded).
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Make a GET request and return the raw body.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &Context, path: &str) -> Result<Vec<u8>> {
        self.send(ctx, Method::GET, path, None, None).await
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, ctx: &Context, path: &str) -> Result<T> {
        let body = self.get(ctx, path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, ctx, body))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        ctx: &Context,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(body)?;
        self.send(ctx, Method::POST, path, Some(body), None).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, ctx, body))]
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        ctx: &Context,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(body)?;
        self.send(ctx, Method::PUT, path, Some(body), None).await
    }

    /// Make a POST request with a raw body, e.g. a file upload.
    #[tracing::instrument(skip(self, ctx, body), fields(len = body.len()))]
    pub async fn post_bytes(
        &self,
        ctx: &Context,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| ZendeskError::InvalidHeader(format!("content-type: {e}")))?;
        self.send(ctx, Method::POST, path, Some(body), Some(content_type))
            .await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &Context, path: &str) -> Result<()> {
        self.send(ctx, Method::DELETE, path, None, None).await?;
        Ok(())
    }

    /// Fetch one offset page of the collection found under `key`.
    #[tracing::instrument(skip(self, ctx, opts))]
    pub async fn list_obp<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        key: &str,
        opts: &ObpOptions,
    ) -> Result<(Vec<T>, OffsetPage)> {
        let path = add_options(path, opts)?;
        let body = self.get(ctx, &path).await?;

        let (items, rest) = split_collection(&body, key)?;
        let page: OffsetPage = serde_json::from_value(rest)?;
        Ok((items, page))
    }

    /// Fetch one cursor page of the collection found under `key`.
    #[tracing::instrument(skip(self, ctx, opts))]
    pub async fn list_cbp<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        key: &str,
        opts: &CbpOptions,
    ) -> Result<(Vec<T>, CursorPaginationMeta)> {
        let path = add_options(path, opts)?;
        let body = self.get(ctx, &path).await?;

        let (items, mut rest) = split_collection(&body, key)?;
        let meta = match rest.get_mut("meta").map(Value::take) {
            Some(meta) if !meta.is_null() => serde_json::from_value(meta)?,
            _ => CursorPaginationMeta::default(),
        };
        Ok((items, meta))
    }

    /// Resolve a request path against the API root.
    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        content_type: Option<HeaderValue>,
    ) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;

        let mut auth = HeaderValue::from_str(&self.credential.authorization_header())
            .map_err(|e| ZendeskError::InvalidHeader(format!("authorization: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = (*self.headers).clone();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, content_type);
        }

        let mut request = self
            .http
            .request(method, url)
            .headers(headers)
            .header(AUTHORIZATION, auth);
        if let Some(body) = body {
            request = request.body(body);
        }

        // The whole exchange, body upload and download included, races the context.
        ctx.run(async move {
            let response = request.send().await?;
            let response = Self::check_response(response).await?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ZendeskError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP {status}"));
        Err(ZendeskError::Api {
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Decode the array under `key` and hand back the rest of the document.
///
/// A missing or null key yields an empty collection.
fn split_collection<T: DeserializeOwned>(body: &[u8], key: &str) -> Result<(Vec<T>, Value)> {
    let mut value: Value = serde_json::from_slice(body)?;
    let items = match value.get_mut(key).map(Value::take) {
        Some(items) if !items.is_null() => serde_json::from_value(items)?,
        _ => Vec::new(),
    };
    Ok((items, value))
}

/// Decode the object under `key` of a `{"<key>": {...}}` envelope.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(body: &[u8], key: &str) -> Result<T> {
    let mut value: Value = serde_json::from_slice(body)?;
    let inner = value.get_mut(key).map(Value::take).unwrap_or(Value::Null);
    Ok(serde_json::from_value(inner)?)
}

/// Wrap `payload` as `{"<key>": payload}`.
pub(crate) fn envelope<P: Serialize + ?Sized>(key: &str, payload: &P) -> Result<Value> {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), serde_json::to_value(payload)?);
    Ok(Value::Object(map))
}

fn credential_from_env() -> Result<Credential> {
    if let Ok(token) = env::var("ZENDESK_OAUTH_TOKEN") {
        return Ok(Credential::bearer(token));
    }

    let email = env::var("ZENDESK_EMAIL").map_err(|_| {
        ZendeskError::ConfigMissing(
            "ZENDESK_OAUTH_TOKEN or ZENDESK_EMAIL environment variable not set".to_string(),
        )
    })?;

    if let Ok(token) = env::var("ZENDESK_API_TOKEN") {
        return Ok(Credential::api_token(email, token));
    }
    if let Ok(password) = env::var("ZENDESK_PASSWORD") {
        return Ok(Credential::basic(email, password));
    }

    Err(ZendeskError::ConfigMissing(
        "ZENDESK_API_TOKEN or ZENDESK_PASSWORD environment variable not set".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn client() -> ZendeskClient {
        ZendeskClient::new("acme", Credential::bearer("test-token")).unwrap()
    }

    #[test]
    fn test_client_debug() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("ZendeskClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_from_subdomain() {
        assert_eq!(client().base_url().as_str(), "https://acme.zendesk.com/api/v2/");
    }

    #[test_case("subdomain" ; "plain")]
    #[test_case("sub-domain" ; "hyphen")]
    #[test_case("a1" ; "short with digit")]
    fn test_valid_subdomain(subdomain: &str) {
        assert!(ZendeskClient::new(subdomain, Credential::bearer("t")).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("Subdomain" ; "uppercase")]
    #[test_case("1abc" ; "leading digit")]
    #[test_case("abc-" ; "trailing hyphen")]
    #[test_case("ab.cd" ; "dot")]
    fn test_invalid_subdomain(subdomain: &str) {
        let err = ZendeskClient::new(subdomain, Credential::bearer("t")).unwrap_err();
        assert!(matches!(err, ZendeskError::InvalidSubdomain(_)));
        assert_eq!(err.to_string(), format!("{subdomain} is invalid subdomain"));
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let a = ZendeskClient::with_endpoint("http://127.0.0.1:9/api/v2", Credential::bearer("t")).unwrap();
        let b = ZendeskClient::with_endpoint("http://127.0.0.1:9/api/v2/", Credential::bearer("t")).unwrap();
        assert_eq!(a.base_url().as_str(), b.base_url().as_str());
    }

    #[test]
    fn test_url_for_keeps_api_prefix() {
        let client = client();
        assert_eq!(
            client.url_for("/tickets.json?page=2").unwrap().as_str(),
            "https://acme.zendesk.com/api/v2/tickets.json?page=2"
        );
        assert_eq!(
            client.url_for("users/1.json").unwrap().as_str(),
            "https://acme.zendesk.com/api/v2/users/1.json"
        );
    }

    #[test]
    fn test_with_header_returns_new_client() {
        let base = client();
        let derived = base.with_header("X-Custom", "yes").unwrap();

        assert_eq!(derived.headers().get("x-custom").unwrap(), "yes");
        assert!(base.headers().get("x-custom").is_none());
        assert_eq!(derived.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_with_header_rejects_bad_name() {
        let err = client().with_header("bad header", "x").unwrap_err();
        assert!(matches!(err, ZendeskError::InvalidHeader(_)));
    }

    #[test]
    fn test_split_collection() {
        let body = br#"{"users": [{"id": 1}], "next_page": null, "count": 1}"#;
        let (items, rest): (Vec<Value>, Value) = split_collection(body, "users").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(rest["count"], 1);

        let (empty, _): (Vec<Value>, Value) = split_collection(br#"{"count": 0}"#, "users").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_envelope_round_trip() {
        let wrapped = envelope("ticket", &serde_json::json!({"subject": "Help"})).unwrap();
        assert_eq!(wrapped, serde_json::json!({"ticket": {"subject": "Help"}}));

        let body = serde_json::to_vec(&wrapped).unwrap();
        let inner: Value = unwrap_envelope(&body, "ticket").unwrap();
        assert_eq!(inner["subject"], "Help");
    }
}
