//! HTTP transport for the clinic API.
//!
//! Every call goes through [`HttpTransport::request`], which builds the URL,
//! tags the request with an `x-request-id`, applies the timeout and maps
//! failures onto [`TransportError`].

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ApiBaseUrl;
use crate::envelope::Envelope;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("invalid request url {0:?}")]
    InvalidUrl(String),
}

impl TransportError {
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Timeout(_) => "The request timed out. Please try again.".to_string(),
            TransportError::Unreachable(_) => {
                "Cannot reach the server. Make sure the backend is running.".to_string()
            }
            TransportError::Server { message, .. } => message.clone(),
            TransportError::Network(_)
            | TransportError::Decode(_)
            | TransportError::InvalidUrl(_) => {
                "A network error occurred. Please try again.".to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Unreachable(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

pub type TransportResult<T> = Result<Envelope<T>, TransportError>;

/// Error bodies are usually an envelope; only `message` matters.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: ApiBaseUrl,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: ApiBaseUrl, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &ApiBaseUrl {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base address + endpoint, with query pairs URL-encoded.
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, TransportError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let mut url = Url::parse(&raw).map_err(|_| TransportError::InvalidUrl(raw.clone()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send one request with the configured timeout.
    pub async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_with_timeout(method, endpoint, query, body, self.timeout)
            .await
    }

    pub async fn request_with_timeout<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        timeout: Duration,
    ) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint, query)?;
        let request_id = Uuid::now_v7();
        let span = tracing::debug_span!(
            "http_request",
            %method,
            endpoint,
            request_id = %request_id,
        );

        async move {
            let mut req = self
                .client
                .request(method.clone(), url)
                .timeout(timeout)
                .header(ACCEPT, HeaderValue::from_static("application/json"))
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .header(REQUEST_ID_HEADER, request_id.to_string());

            if let Some(body) = body {
                if method == Method::POST || method == Method::PUT {
                    let bytes = serde_json::to_vec(body)
                        .map_err(|e| TransportError::Decode(e.to_string()))?;
                    req = req.body(bytes);
                }
            }

            let resp = req.send().await.map_err(|e| {
                let err = TransportError::from_reqwest(e, timeout);
                tracing::warn!(error = %err, "request failed");
                err
            })?;

            let status = resp.status();
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| TransportError::from_reqwest(e, timeout))?;

            if !status.is_success() {
                let message = server_message(status, &bytes);
                tracing::warn!(status = status.as_u16(), %message, "server returned an error");
                return Err(TransportError::Server {
                    status: status.as_u16(),
                    message,
                });
            }

            tracing::debug!(status = status.as_u16(), "response received");
            let envelope: Envelope<T> = serde_json::from_slice(&bytes)
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            Ok::<_, TransportError>(envelope)
        }
        .instrument(span)
        .await
    }

    /// `GET {base}/health`. Any 2xx counts as reachable.
    pub async fn health(&self) -> bool {
        let url = match self.url("/health", &[]) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                return false;
            }
        };
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                false
            }
        }
    }
}

fn server_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error")
            )
        })
}
