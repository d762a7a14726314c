//! The VPSie API client core.
//!
//! [`ApiClient`] owns the base URL, the default header set, the user agent and
//! the HTTP transport. Every resource call goes through the same two steps:
//!
//! 1. [`ApiClient::build_request`] resolves the path, encodes the body and
//!    applies headers, producing an [`ApiRequest`] that has not been sent.
//! 2. [`ApiClient::execute`] (or [`ApiClient::execute_unit`]) sends it and
//!    decodes the response into the caller's type or a typed [`Error`].
//!
//! The core never retries. Callers that want retry policy layer it on top.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::config::{ClientConfig, VpsieConfig};
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::transport::{HttpTransport, TransportResponse};
use crate::types::{ErrorBody, AUTH_HEADER, DEFAULT_USER_AGENT, MEDIA_TYPE};

/// A fully-formed request that has not been sent yet.
#[derive(Debug)]
pub struct ApiRequest {
    inner: reqwest::Request,
}

impl ApiRequest {
    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Resolved absolute URL, including any query string.
    #[must_use]
    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Mutable access to the headers, for callers that adjust a request
    /// before sending it.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// Encoded JSON payload, if one is attached.
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.inner.body().and_then(reqwest::Body::as_bytes)
    }

    /// Unwrap the underlying `reqwest::Request`.
    #[must_use]
    pub fn into_inner(self) -> reqwest::Request {
        self.inner
    }
}

/// Mutable client settings shared by all clones of an [`ApiClient`].
#[derive(Debug, Clone)]
struct ClientState {
    base_url: Url,
    default_headers: HashMap<String, String>,
    user_agent: String,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    transport: Option<Arc<dyn HttpTransport>>,
    http_config: ClientConfig,
    user_agent: Option<String>,
    default_headers: HashMap<String, String>,
}

impl ApiClientBuilder {
    /// Create a builder for the specified base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: None,
            http_config: ClientConfig::new(),
            user_agent: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a builder pre-populated from a [`VpsieConfig`].
    #[must_use]
    pub fn from_config(config: &VpsieConfig) -> Self {
        let mut builder = Self::new(config.base_url.clone()).with_http_config(config.http_config());
        if let Some(token) = &config.api_token {
            builder = builder.with_token(token.expose_secret());
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }
        builder
    }

    /// Use a pre-configured transport instead of building one.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the HTTP configuration used for the default transport.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Configure the `Vpsie-Auth` token header.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_default_header(AUTH_HEADER, token)
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL is not absolute or the
    /// default transport cannot be created.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = parse_base_url(&self.base_url)?;
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(self.http_config.build_http_client()?),
        };

        Ok(ApiClient {
            transport,
            state: Arc::new(RwLock::new(ClientState {
                base_url,
                default_headers: self.default_headers,
                user_agent: self
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            })),
            enable_logging: self.http_config.enable_logging,
        })
    }
}

impl fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .field("user_agent", &self.user_agent)
            .field("custom_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

/// Asynchronous VPSie API client core.
///
/// Clones share the transport and the mutable settings, so a setter called
/// on one clone is observed by all of them. Settings are guarded by a
/// read-write lock; a request captures them once, when it is built.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    state: Arc<RwLock<ClientState>>,
    enable_logging: bool,
}

impl ApiClient {
    /// Construct a client for `base_url`.
    ///
    /// When `transport` is `None` a `reqwest::Client` with default
    /// [`ClientConfig`] settings is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `base_url` is not an absolute URL.
    pub fn new(base_url: impl AsRef<str>, transport: Option<Arc<dyn HttpTransport>>) -> Result<Self> {
        let mut builder = ApiClientBuilder::new(base_url.as_ref());
        if let Some(transport) = transport {
            builder = builder.with_transport(transport);
        }
        builder.build()
    }

    /// Construct a client from application settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration fails validation.
    pub fn from_config(config: &VpsieConfig) -> Result<Self> {
        validator::Validate::validate(config)?;
        ApiClientBuilder::from_config(config).build()
    }

    /// Start a builder for `base_url`.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Current base URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.read_state().base_url.clone()
    }

    /// Current user agent.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.read_state().user_agent.clone()
    }

    /// Snapshot of the default headers.
    #[must_use]
    pub fn default_headers(&self) -> HashMap<String, String> {
        self.read_state().default_headers.clone()
    }

    /// Merge `headers` into the default header set.
    ///
    /// Existing keys are overwritten and new keys added; keys not mentioned
    /// are left alone.
    pub fn set_default_headers<I, K, V>(&self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut state = self.write_state();
        for (name, value) in headers {
            state.default_headers.insert(name.into(), value.into());
        }
    }

    /// Replace the user agent.
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        self.write_state().user_agent = user_agent.into();
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `base_url` is not an absolute URL;
    /// the previous base URL is kept.
    pub fn set_base_url(&self, base_url: &str) -> Result<()> {
        let parsed = parse_base_url(base_url)?;
        self.write_state().base_url = parsed;
        Ok(())
    }

    /// Build a request without sending it.
    ///
    /// `path` is resolved against the base URL with standard reference
    /// resolution, so `"servers?limit=5"` stays below the base path while
    /// `"/apps/v2/servers"` replaces it. `body` is ignored for GET, HEAD and
    /// OPTIONS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingFailure`] if the body cannot be serialized,
    /// [`Error::InvalidPath`] or [`Error::InvalidHeader`] if the URL or a
    /// header is malformed, and [`Error::Cancelled`] if `ctx` is already
    /// cancelled.
    pub fn build_request<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiRequest>
    where
        B: Serialize + ?Sized,
    {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled(format!("{method} {path}")));
        }

        let state = self.read_state().clone();
        let url = state
            .base_url
            .join(path)
            .map_err(|err| Error::InvalidPath(format!("{path}: {err}")))?;

        let mut inner = reqwest::Request::new(method, url);

        if carries_body(inner.method()) {
            if let Some(payload) = body {
                let encoded = serde_json::to_vec(payload)
                    .map_err(|err| Error::EncodingFailure(err.to_string()))?;
                *inner.body_mut() = Some(encoded.into());
            }
            inner
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        }

        let headers = inner.headers_mut();
        for (name, value) in &state.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| Error::InvalidHeader(format!("{name}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| Error::InvalidHeader(format!("{name}: {err}")))?;
            headers.insert(name, value);
        }

        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&state.user_agent)
                .map_err(|err| Error::InvalidHeader(format!("user-agent: {err}")))?,
        );

        Ok(ApiRequest { inner })
    }

    /// Send `request` and decode a successful body into `T`.
    ///
    /// Returns `Ok(None)` for `204 No Content` without looking at the body.
    /// `T` must mirror the whole response, including the `{error, data}`
    /// envelope; see [`Envelope`](crate::types::Envelope).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for non-2xx statuses, [`Error::DecodeFailure`]
    /// if the body does not match `T`, [`Error::Cancelled`] or
    /// [`Error::Timeout`] when `ctx` fires first, and transport errors
    /// otherwise.
    pub async fn execute<T>(&self, ctx: &RequestContext, request: ApiRequest) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(response) = self.dispatch(ctx, request).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&response.body)
            .map(Some)
            .map_err(|err| Error::DecodeFailure {
                status: response.status,
                message: err.to_string(),
            })
    }

    /// Send `request` and discard a successful body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::execute`], minus decode failures.
    pub async fn execute_unit(&self, ctx: &RequestContext, request: ApiRequest) -> Result<()> {
        self.dispatch(ctx, request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<Option<TransportResponse>> {
        let method = request.method().clone();
        let url = request.url().clone();

        if self.enable_logging {
            debug!(%method, %url, "Sending VPSie request");
        }

        let response = tokio::select! {
            biased;
            () = ctx.cancelled() => {
                return Err(Error::Cancelled(format!("{method} {url}")));
            }
            () = ctx.deadline_elapsed() => {
                return Err(Error::Timeout(format!("{method} {url}: deadline exceeded")));
            }
            result = self.transport.send(request.into_inner()) => result?,
        };

        if self.enable_logging {
            debug!(status = %response.status, bytes = response.body.len(), "Received VPSie response");
            trace!(body = %String::from_utf8_lossy(&response.body), "VPSie response body");
        }

        if response.status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !response.status.is_success() {
            return Err(api_error(&response));
        }

        Ok(Some(response))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("ApiClient")
            .field("base_url", &state.base_url.as_str())
            .field("user_agent", &state.user_agent)
            .field("default_headers", &state.default_headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn parse_base_url(input: &str) -> Result<Url> {
    let url = Url::parse(input)
        .map_err(|err| Error::ConfigError(format!("Invalid base URL {input:?}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigError(format!(
            "Invalid base URL {input:?}: cannot be used as a base"
        )));
    }
    Ok(url)
}

fn carries_body(method: &Method) -> bool {
    !(*method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS)
}

fn api_error(response: &TransportResponse) -> Error {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => Error::Api {
            status: response.status,
            code: Some(body.code),
            message: body.message,
            stack: Some(body.stack).filter(|stack| !stack.is_empty()),
        },
        Err(err) => Error::Api {
            status: response.status,
            code: None,
            message: err.to_string(),
            stack: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancelHandle;
    use crate::transport::MockHttpTransport;
    use serde::Deserialize;
    use serde_json::{json, Value};

    const BASE: &str = "https://api.example.com/apps/v2/";

    fn client_with(transport: MockHttpTransport) -> ApiClient {
        ApiClient::new(BASE, Some(Arc::new(transport))).unwrap()
    }

    fn offline_client() -> ApiClient {
        client_with(MockHttpTransport::new())
    }

    fn ctx() -> RequestContext {
        RequestContext::background()
    }

    fn get(client: &ApiClient, path: &str) -> ApiRequest {
        client
            .build_request::<()>(&ctx(), Method::GET, path, None)
            .unwrap()
    }

    fn respond(status: StatusCode, body: &'static str) -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(move |_| Ok(TransportResponse::new(status, body)));
        transport
    }

    #[test]
    fn new_rejects_relative_base_url() {
        let err = ApiClient::new("apps/v2", Some(Arc::new(MockHttpTransport::new()))).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn new_rejects_non_base_url() {
        let err = ApiClient::new("mailto:ops@example.com", Some(Arc::new(MockHttpTransport::new())))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn new_starts_with_defaults() {
        let client = offline_client();
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
        assert!(client.default_headers().is_empty());
        assert_eq!(client.base_url().as_str(), BASE);
    }

    #[test]
    fn new_without_transport_builds_default() {
        let client = ApiClient::new(BASE, None).unwrap();
        assert_eq!(client.base_url().as_str(), BASE);
    }

    #[test]
    fn resolves_paths_like_a_reference_resolver() {
        let client = ApiClient::new(
            "https://api.example.com/apps/v2/current",
            Some(Arc::new(MockHttpTransport::new())),
        )
        .unwrap();

        let cases = [
            ("servers", "https://api.example.com/apps/v2/servers"),
            ("servers?offset=0&limit=10", "https://api.example.com/apps/v2/servers?offset=0&limit=10"),
            ("/apps/v2/sshkeys", "https://api.example.com/apps/v2/sshkeys"),
            ("/other", "https://api.example.com/other"),
            ("../v1/images", "https://api.example.com/apps/v1/images"),
            ("?page=2", "https://api.example.com/apps/v2/current?page=2"),
            ("https://mirror.example.net/x", "https://mirror.example.net/x"),
        ];

        for (path, expected) in cases {
            assert_eq!(get(&client, path).url().as_str(), expected, "path {path}");
        }
    }

    #[test]
    fn get_head_options_never_carry_a_body() {
        let client = offline_client();
        let body = json!({"name": "ignored"});

        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            let request = client
                .build_request(&ctx(), method.clone(), "servers", Some(&body))
                .unwrap();
            assert!(request.body_bytes().is_none(), "{method} had a body");
            assert!(request.headers().get(CONTENT_TYPE).is_none());
        }
    }

    #[test]
    fn body_round_trips_through_json() {
        let client = offline_client();
        let body = json!({
            "hostname": "web-1",
            "tags": ["a", "b"],
            "backupEnabled": true,
            "projectId": 7
        });

        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let request = client
                .build_request(&ctx(), method, "vm", Some(&body))
                .unwrap();
            let decoded: Value = serde_json::from_slice(request.body_bytes().unwrap()).unwrap();
            assert_eq!(decoded, body);
            assert_eq!(request.headers()[CONTENT_TYPE], MEDIA_TYPE);
        }
    }

    #[test]
    fn post_without_body_is_still_tagged_json() {
        let client = offline_client();
        let request = client
            .build_request::<()>(&ctx(), Method::POST, "vm/start", None)
            .unwrap();
        assert!(request.body_bytes().is_none());
        assert_eq!(request.headers()[CONTENT_TYPE], MEDIA_TYPE);
    }

    #[test]
    fn encoding_failure_is_a_build_error() {
        let client = offline_client();
        let mut body = HashMap::new();
        body.insert(vec![1u8], "non-string keys cannot be JSON object keys");

        let err = client
            .build_request(&ctx(), Method::POST, "vm", Some(&body))
            .unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)));
        assert_eq!(err.category(), crate::error::ErrorCategory::Build);
    }

    #[test]
    fn accept_and_user_agent_always_set() {
        let client = offline_client();
        client.set_user_agent("vpsie-cli/2.0");
        let request = get(&client, "servers");
        assert_eq!(request.headers()[ACCEPT], MEDIA_TYPE);
        assert_eq!(request.headers()[USER_AGENT], "vpsie-cli/2.0");
    }

    #[test]
    fn default_headers_overwrite_by_key() {
        let client = offline_client();
        client.set_default_headers([("A", "1")]);
        client.set_default_headers(HashMap::from([("A", "2"), ("B", "3")]));

        let request = get(&client, "servers");
        let a: Vec<_> = request.headers().get_all("A").iter().collect();
        assert_eq!(a, vec!["2"]);
        assert_eq!(request.headers()["B"], "3");
    }

    #[test]
    fn set_default_headers_is_idempotent() {
        let client = offline_client();
        client.set_default_headers([("Vpsie-Auth", "token")]);
        client.set_default_headers([("Vpsie-Auth", "token")]);
        assert_eq!(client.default_headers().len(), 1);
        assert_eq!(get(&client, "x").headers().get_all(AUTH_HEADER).iter().count(), 1);
    }

    #[test]
    fn default_header_can_override_content_type() {
        let client = offline_client();
        client.set_default_headers([("Content-Type", "application/merge-patch+json")]);
        let request = client
            .build_request(&ctx(), Method::PATCH, "vm", Some(&json!({})))
            .unwrap();
        assert_eq!(request.headers()[CONTENT_TYPE], "application/merge-patch+json");
    }

    #[test]
    fn invalid_default_header_fails_build() {
        let client = offline_client();
        client.set_default_headers([("bad header", "x")]);
        let err = client
            .build_request::<()>(&ctx(), Method::GET, "servers", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn builder_token_sets_auth_header() {
        let client = ApiClient::builder(BASE)
            .with_transport(Arc::new(MockHttpTransport::new()))
            .with_token("abc123")
            .with_user_agent("custom/1.0")
            .build()
            .unwrap();

        let request = get(&client, "servers");
        assert_eq!(request.headers()[AUTH_HEADER], "abc123");
        assert_eq!(request.headers()[USER_AGENT], "custom/1.0");
    }

    #[test]
    fn from_config_applies_token_and_user_agent() {
        let config = VpsieConfig::new(BASE)
            .unwrap()
            .with_api_token("from-config")
            .with_user_agent("cfg/0.1");
        let client = ApiClient::from_config(&config).unwrap();

        assert_eq!(client.default_headers()[AUTH_HEADER], "from-config");
        assert_eq!(client.user_agent(), "cfg/0.1");
    }

    #[test]
    fn set_base_url_failure_keeps_previous() {
        let client = offline_client();
        let err = client.set_base_url("not a url \x00").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert_eq!(
            get(&client, "servers").url().as_str(),
            "https://api.example.com/apps/v2/servers"
        );
    }

    #[test]
    fn set_base_url_success_is_seen_by_clones() {
        let client = offline_client();
        let clone = client.clone();
        client.set_base_url("https://eu.example.com/api/").unwrap();
        assert_eq!(
            get(&clone, "servers").url().as_str(),
            "https://eu.example.com/api/servers"
        );
    }

    #[test]
    fn build_fails_fast_on_cancelled_context() {
        let client = offline_client();
        let handle = CancelHandle::new();
        handle.cancel();
        let err = client
            .build_request::<()>(&handle.context(), Method::GET, "servers", None)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[tokio::test]
    async fn no_content_skips_decoding() {
        let client = client_with(respond(StatusCode::NO_CONTENT, "\u{0}garbage{{"));
        let request = get(&client, "servers");
        let result: Option<Value> = client.execute(&ctx(), request).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn not_found_surfaces_provider_message() {
        let client = client_with(respond(
            StatusCode::NOT_FOUND,
            r#"{"error":true,"code":404,"message":"not found","stack":""}"#,
        ));
        let request = get(&client, "servers/missing");
        let err = client.execute::<Value>(&ctx(), request).await.unwrap_err();

        match err {
            Error::Api {
                status,
                code,
                message,
                stack,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(code, Some(404));
                assert_eq!(message, "not found");
                assert!(stack.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_stack_is_preserved() {
        let client = client_with(respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":true,"code":500,"message":"db down","stack":"at query()"}"#,
        ));
        let err = client
            .execute_unit(&ctx(), get(&client, "servers"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Api { stack: Some(ref s), .. } if s == "at query()"
        ));
    }

    #[tokio::test]
    async fn undecodable_error_body_reports_decode_error() {
        let client = client_with(respond(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"));
        let err = client
            .execute::<Value>(&ctx(), get(&client, "servers"))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert!(code.is_none());
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_decodes_into_target() {
        #[derive(Debug, Deserialize)]
        struct Root {
            data: Inner,
        }

        #[derive(Debug, Deserialize)]
        struct Inner {
            id: i64,
        }

        let client = client_with(respond(StatusCode::OK, r#"{"error":false,"data":{"id":42}}"#));
        let root: Root = client
            .execute(&ctx(), get(&client, "servers/42"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(root.data.id, 42);
    }

    #[tokio::test]
    async fn success_with_wrong_shape_is_decode_failure() {
        #[derive(Debug, Deserialize)]
        struct Root {
            #[allow(dead_code)]
            data: Vec<String>,
        }

        let client = client_with(respond(StatusCode::OK, r#"{"error":false,"data":{"id":42}}"#));
        let err = client
            .execute::<Root>(&ctx(), get(&client, "servers"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DecodeFailure { status, .. } if status == StatusCode::OK));
    }

    #[tokio::test]
    async fn execute_unit_discards_body() {
        let client = client_with(respond(StatusCode::CREATED, "not json at all"));
        client
            .execute_unit(&ctx(), get(&client, "servers"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(Error::ServiceUnavailable("connection refused".to_string())));
        let client = client_with(transport);

        let err = client
            .execute_unit(&ctx(), get(&client, "servers"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::ServiceUnavailable("connection refused".to_string()));
    }

    #[tokio::test]
    async fn transport_receives_built_request() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method() == Method::DELETE
                    && request.url().as_str() == "https://api.example.com/apps/v2/sshkey"
                    && request.headers().get(AUTH_HEADER).is_some()
            })
            .times(1)
            .returning(|_| Ok(TransportResponse::new(StatusCode::OK, "{}")));

        let client = client_with(transport);
        client.set_default_headers([(AUTH_HEADER, "token")]);
        let request = client
            .build_request(&ctx(), Method::DELETE, "/apps/v2/sshkey", Some(&json!({"identifier": "k"})))
            .unwrap();
        client.execute_unit(&ctx(), request).await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_context_short_circuits_execute() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(0..=1)
            .returning(|_| Ok(TransportResponse::new(StatusCode::OK, "{}")));
        let client = client_with(transport);
        let request = get(&client, "servers");
        let handle = CancelHandle::new();
        handle.cancel();

        let err = client
            .execute_unit(&handle.context(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
    }
}
