//! HTTP client for the generation submission endpoint.
//!
//! Submission is fire-and-forget: the service answers with an opaque
//! acknowledgement and the composer never polls for completion. The
//! simulated progress indicator shown while the call is in flight lives in
//! [`super::progress`] and is entirely independent of this client.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::errors::{ComposerError, ComposerResult};

use super::messages::{GenerationRequest, ServiceErrorBody, SubmissionAck};

/// Submission target for assembled requests.
///
/// Injected into the session so tests can supply a scripted backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submits a generation request and returns the service acknowledgement.
    async fn submit(&self, request: &GenerationRequest) -> ComposerResult<SubmissionAck>;
}

/// HTTP implementation of [`GenerationBackend`] against the Chorus service.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpGenerationClient {
    /// Creates a submission client from the service configuration.
    pub fn new(config: ServiceConfig) -> ComposerResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
    async fn submit(&self, request: &GenerationRequest) -> ComposerResult<SubmissionAck> {
        let url = self.config.generate_url();
        debug!(%url, title = request.title(), "submitting generation request");

        let mut http_request = self.client.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured envelope; fall back to the raw body.
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "generation submission rejected");
            return Err(ComposerError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let ack: SubmissionAck = response.json().await.map_err(|e| ComposerError::Service {
            status: status.as_u16(),
            message: format!("malformed acknowledgement: {e}"),
        })?;

        info!(request_id = %ack.request_id, "generation request accepted");
        Ok(ack)
    }
}
