//! REST client with bearer-token injection and de-duplication of
//! identical in-flight mutating requests.
//!
//! For every non-GET call the client derives a key from
//! `METHOD:endpoint:body`. While a request with that key is outstanding,
//! further identical calls join it and receive a clone of its result
//! instead of hitting the network again. The request itself runs on a
//! spawned task that removes its key when it settles, whichever way it
//! settles, so a cancelled caller never leaves a stale entry behind.
//! GET requests always go to the network.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, error_message};
use super::token_store::TokenStore;

type InFlight = Shared<BoxFuture<'static, Result<Value, ApiError>>>;
type InFlightMap = Arc<Mutex<HashMap<String, InFlight>>>;

/// Method, JSON body and extra headers of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// JSON body, sent verbatim.
    pub body: Option<Value>,
    /// Extra headers; they override the defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Options for `method` with no body and no extra headers.
    #[must_use]
    pub const fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header, overriding a default of the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Signature identifying identical mutating requests.
#[must_use]
pub fn request_key(method: &Method, endpoint: &str, body: Option<&Value>) -> String {
    let body = body.map(Value::to_string).unwrap_or_default();
    format!("{method}:{endpoint}:{body}")
}

/// HTTP client for the EcoTrack REST API.
///
/// Constructed explicitly by the composition root and shared behind an
/// [`Arc`]; the in-flight map lives inside the instance, not in global
/// state.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    in_flight: InFlightMap,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .field("in_flight", &self.in_flight_count())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080/api`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, tokens)
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Base URL endpoints are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected token store.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Number of mutating requests currently outstanding.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Issues a request and decodes the JSON response into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the server cannot be reached,
    /// [`ApiError::Status`] for a non-2xx answer, [`ApiError::Encode`] for
    /// unusable headers and [`ApiError::Decode`] when the body does not
    /// match `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = if options.method == Method::GET {
            let request = self.prepare(endpoint, &options)?;
            execute(request, options.method, endpoint.to_string()).await?
        } else {
            self.send_deduplicated(endpoint, options).await?
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Joins an identical outstanding request or starts a new one.
    async fn send_deduplicated(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let key = request_key(&options.method, endpoint, options.body.as_ref());

        let pending = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = in_flight.get(&key) {
                tracing::debug!(method = %options.method, endpoint, "deduplicating request");
                existing.clone()
            } else {
                let request = self.prepare(endpoint, &options)?;
                let guard = InFlightGuard {
                    map: Arc::clone(&self.in_flight),
                    key: key.clone(),
                };
                let endpoint = endpoint.to_string();
                // The map lock is still held here, so the guard cannot
                // remove the key before it is inserted below.
                let task = tokio::spawn(async move {
                    let _guard = guard;
                    execute(request, options.method, endpoint).await
                });
                let pending = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(ApiError::Transport(format!("request task failed: {e}")))
                    })
                }
                .boxed()
                .shared();
                in_flight.insert(key, pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Builds the request: default JSON content type, bearer token from
    /// the store, then caller headers on top.
    fn prepare(&self, endpoint: &str, options: &RequestOptions) -> Result<RequestBuilder, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.tokens.load() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Encode(format!("invalid token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Encode(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Encode(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        let url = format!("{}{endpoint}", self.base_url);
        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }
        Ok(request)
    }
}

/// Removes an in-flight key when the owning request task ends.
struct InFlightGuard {
    map: InFlightMap,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Sends one request. Single attempt, no retry, no timeout.
async fn execute(
    request: RequestBuilder,
    method: Method,
    endpoint: String,
) -> Result<Value, ApiError> {
    tracing::debug!(%method, %endpoint, "making API request");

    let response = request.send().await.map_err(|e| {
        tracing::error!(%method, %endpoint, error = %e, "API request failed");
        ApiError::Transport(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!(
            %method,
            %endpoint,
            status = status.as_u16(),
            %message,
            "API request failed"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?
    };

    tracing::debug!(%method, %endpoint, status = status.as_u16(), "API request successful");
    Ok(value)
}
