//! Core `GeminiClient` trait and `HttpGeminiClient` implementation.
//!
//! `HttpGeminiClient` talks to the hosted Gemini v1beta REST API.  All
//! connection details (`base_url`, `model`, timeout) come from
//! [`GeminiConfig`]; the API key is resolved at startup and passed in
//! explicitly so the client never reads the environment itself.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::gemini::types::{
    ApiErrorBody, GenerateContentResponse, GenerateRequest, RemoteFile, UploadFileResponse,
};

// ---------------------------------------------------------------------------
// GeminiError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("Gemini request timed out")]
    Timeout,

    /// The API rejected the request (non-2xx status).
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse Gemini response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// Local file could not be read for upload.
    #[error("failed to read file for upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeminiError::Timeout
        } else {
            GeminiError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GeminiClient trait
// ---------------------------------------------------------------------------

/// Async trait over the Gemini operations the application consumes.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn GeminiClient>`).
#[async_trait]
pub trait GeminiClient: Send + Sync {
    /// Run one `generateContent` call and return the response text.
    async fn generate(&self, request: GenerateRequest) -> Result<String, GeminiError>;

    /// Upload a local file; the returned handle starts in `Processing` or
    /// `Active` state.
    async fn upload_file(&self, path: &Path, mime_type: &str)
        -> Result<RemoteFile, GeminiError>;

    /// Re-fetch an uploaded file's resource to observe its current state.
    async fn get_file(&self, name: &str) -> Result<RemoteFile, GeminiError>;
}

// ---------------------------------------------------------------------------
// HttpGeminiClient
// ---------------------------------------------------------------------------

/// Talks to the Gemini v1beta REST API over HTTPS.
///
/// # No hardcoded endpoints
/// `base_url` and `model` come exclusively from the [`GeminiConfig`] passed
/// to [`HttpGeminiClient::from_config`], so tests can point the client at a
/// local server.
pub struct HttpGeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    api_key: String,
}

impl HttpGeminiClient {
    /// Build an `HttpGeminiClient` from application config and a resolved
    /// API key.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &GeminiConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: api_key.into(),
        }
    }

    /// Pass the response through when 2xx, otherwise convert the API error
    /// envelope into [`GeminiError::Api`].
    async fn ok_or_api_error(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };

        Err(GeminiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GeminiClient for HttpGeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request.into_body())
            .send()
            .await?;

        let response = Self::ok_or_api_error(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let text = parsed
            .text()
            .ok_or(GeminiError::EmptyResponse)?
            .trim()
            .to_string();

        Ok(text)
    }

    async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<RemoteFile, GeminiError> {
        let data = tokio::fs::read(path).await?;
        let url = format!("{}/upload/v1beta/files", self.config.base_url);

        log::debug!(
            "gemini: uploading {} ({} bytes, {mime_type})",
            path.display(),
            data.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await?;

        let response = Self::ok_or_api_error(response).await?;

        let parsed: UploadFileResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        Ok(parsed.file)
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile, GeminiError> {
        // `name` is the full resource name, e.g. "files/abc-123".
        let url = format!("{}/v1beta/{}", self.config.base_url, name);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let response = Self::ok_or_api_error(response).await?;

        response
            .json::<RemoteFile>()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> GeminiConfig {
        GeminiConfig {
            base_url: "http://localhost:9090".into(),
            api_key: None,
            model: "gemini-1.5-flash".into(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = HttpGeminiClient::from_config(&make_config(), "test-key");
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _client = HttpGeminiClient::from_config(&make_config(), "");
    }

    /// Verify that `HttpGeminiClient` is object-safe (usable as
    /// `dyn GeminiClient`).
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn GeminiClient> =
            Box::new(HttpGeminiClient::from_config(&make_config(), "key"));
        drop(client);
    }

    #[test]
    fn timeout_error_maps_from_reqwest() {
        // A reqwest::Error cannot be constructed directly; exercise the
        // Display impls instead so the taxonomy stays human-readable.
        assert_eq!(GeminiError::Timeout.to_string(), "Gemini request timed out");
        assert_eq!(
            GeminiError::Api {
                status: 403,
                message: "forbidden".into()
            }
            .to_string(),
            "Gemini API error (403): forbidden"
        );
    }
}
