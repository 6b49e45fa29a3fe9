//! [`ApiClient`]: envelope-wrapped HTTP calls.

use common::protocol::{EnvelopeRequest, EnvelopeResponse, DATA_FIELD};
use common::ClientError;
use envelope::EnvelopeCodec;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;

/// HTTP method used to carry an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Ciphertext travels in the `data` query parameter.
    Get,
    /// Ciphertext travels in a `{"data": ...}` JSON body.
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// HTTP client that seals every request and opens every response.
///
/// Cheap to clone; the underlying connection pool and derived key are shared.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    codec: EnvelopeCodec,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the shared secret is empty,
    /// the base URL does not parse, or the HTTP client cannot be built.
    pub fn new(cfg: &Config) -> Result<Self, ClientError> {
        Self::with_builder(cfg, reqwest::Client::builder())
    }

    /// Like [`ApiClient::new`], starting from a caller-supplied HTTP builder.
    pub(crate) fn with_builder(
        cfg: &Config,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, ClientError> {
        let secret = cfg
            .shared_secret()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        let base_url = parse_base_url(&cfg.api_base_url)?;
        let http = builder
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            codec: EnvelopeCodec::new(&secret),
            base_url,
        })
    }

    /// The codec used for every request and response.
    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Send `payload` to `endpoint` (relative to the base URL) and return the
    /// decrypted result.
    ///
    /// When a successful response carries no `data`, the response object
    /// itself is returned.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Encoding`] if `payload` cannot be serialised.
    /// - [`ClientError::Transport`] on network failure or a non-envelope body.
    /// - [`ClientError::Rejected`] when the server answers `success: false`.
    /// - [`ClientError::Decrypt`] when the response envelope cannot be opened.
    pub async fn call<T>(
        &self,
        endpoint: &str,
        payload: &T,
        method: Method,
    ) -> Result<serde_json::Value, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let ciphertext = self
            .codec
            .seal_envelope(payload)
            .map_err(|e| ClientError::Encoding(e.to_string()))?;
        let url = self.endpoint_url(endpoint)?;

        info!(endpoint, method = method.as_str(), "sending envelope request");
        let request = match method {
            Method::Get => self
                .http
                .get(url)
                .query(&[(DATA_FIELD, ciphertext.as_str())])
                .header(CONTENT_TYPE, "application/json"),
            Method::Post => self.http.post(url).json(&EnvelopeRequest::new(ciphertext)),
        };

        let response = request.send().await.map_err(|e| transport(endpoint, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport(endpoint, e))?;
        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "response received");

        let envelope: EnvelopeResponse = serde_json::from_str(&body).map_err(|_| {
            warn!(endpoint, status = status.as_u16(), "response is not an envelope");
            ClientError::Transport(format!("unexpected response from {endpoint} (HTTP {status})"))
        })?;

        if !envelope.success {
            let message = envelope
                .failure_message()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{} failed", endpoint_name(endpoint)));
            info!(endpoint, status = status.as_u16(), "request rejected by server");
            return Err(ClientError::Rejected(message));
        }

        match envelope.data.as_deref() {
            Some(data) => self.codec.open_envelope(data).map_err(|_| {
                warn!(endpoint, "response envelope could not be opened");
                ClientError::Decrypt
            }),
            None => serde_json::to_value(&envelope)
                .map_err(|e| ClientError::Transport(e.to_string())),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ClientError::Configuration(format!("invalid endpoint {endpoint}: {e}")))
    }
}

/// Parse the base URL, forcing a trailing slash so that [`Url::join`] appends
/// rather than replaces the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut normalised = raw.trim().to_owned();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    Url::parse(&normalised)
        .map_err(|e| ClientError::Configuration(format!("invalid API base URL {raw}: {e}")))
}

/// Last path segment, e.g. `"login.php"` for `"auth/login.php"`.
fn endpoint_name(endpoint: &str) -> &str {
    endpoint.rsplit('/').next().unwrap_or(endpoint)
}

// GET requests carry ciphertext in the URL; keep it out of error text.
fn transport(endpoint: &str, err: reqwest::Error) -> ClientError {
    let err = err.without_url();
    warn!(endpoint, error = %err, timeout = err.is_timeout(), "transport failure");
    ClientError::Transport(err.to_string())
}
