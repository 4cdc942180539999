//! Authenticated JSON client for the backend API
//!
//! Wraps `reqwest::Client` with base-URL construction, bearer
//! authentication, and normalization of every failure mode into a typed
//! [`GatewayError`]. The backend reports failures as
//! `{"errorId": "...", "message": "..."}`; the error id maps onto the
//! error taxonomy, with the HTTP status as fallback for bodies the
//! client cannot parse.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use recallsync_core::config::ApiConfig;
use recallsync_core::ports::{GatewayError, GatewayResult};

/// Error body the backend returns for non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    error_id: String,
    message: String,
}

/// HTTP client for the backend REST API
///
/// Holds the base URL and optional bearer token; all request plumbing
/// and error normalization lives here so the gateway methods stay down
/// to one line per endpoint.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::unknown(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Creates a client against a custom base URL (useful for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attaches a bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds a request for the given method and path, with the base URL
    /// prepended and the bearer token attached when configured
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GETs `path` and deserializes the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        debug!(path, "GET");
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::read_json(response).await
    }

    /// POSTs `body` as JSON to `path` and deserializes the response
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        debug!(path, "POST");
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::read_json(response).await
    }

    /// PUTs `body` as JSON to `path` and deserializes the response
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        debug!(path, "PUT");
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        Self::read_json(response).await
    }

    /// DELETEs `path`, discarding any response body
    pub async fn delete(&self, path: &str) -> GatewayResult<()> {
        debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder.send().await.map_err(normalize_transport)?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(normalize_status(response).await)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        response
            .json()
            .await
            .map_err(|e| GatewayError::unknown(format!("malformed response body: {e}")))
    }
}

/// Maps a reqwest transport error onto the error taxonomy
fn normalize_transport(err: reqwest::Error) -> GatewayError {
    // Connect errors, DNS failures, and timeouts are all network failures
    // from the caller's point of view
    GatewayError::network(err.to_string())
}

/// Maps a non-2xx response onto the error taxonomy
///
/// Prefers the backend's `errorId` when the body parses; falls back to
/// the HTTP status code otherwise.
async fn normalize_status(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
        let error = match parsed.error_id.as_str() {
            "DeckNotFound" | "CardNotFound" | "ProgressNotFound" => {
                GatewayError::not_found(parsed.message)
            }
            "DeckValidation" | "CardValidation" | "ReviewValidation" => {
                GatewayError::validation(parsed.message)
            }
            "DeckTitleTaken" => GatewayError::conflict(parsed.message),
            other => {
                warn!(error_id = other, status = %status, "unrecognized backend error id");
                from_status(status, parsed.message)
            }
        };
        return error;
    }

    from_status(status, format!("HTTP {status}"))
}

fn from_status(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::NOT_FOUND => GatewayError::not_found(message),
        StatusCode::CONFLICT => GatewayError::conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::validation(message)
        }
        _ => GatewayError::unknown(message),
    }
}
