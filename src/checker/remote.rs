use crate::checker::decode::{decode_response, ChunkReport};
use crate::error::CheckError;
use crate::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://m.search.naver.com/p/csearch/ocontent/spellchecker.nhn";
pub const DEFAULT_CALLBACK: &str = "window.__jindo2_callback._spellingCheck_0";

/// Transport to the remote spell-check service. Returns the raw response body.
#[async_trait]
pub trait SpellService: Send + Sync {
    async fn fetch(&self, text: &str) -> Result<String, CheckError>;
}

pub struct HttpSpellService {
    client: Client,
    endpoint: String,
    callback: String,
}

impl HttpSpellService {
    pub fn new(config: &Config) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            callback: config.callback.clone(),
        })
    }
}

#[async_trait]
impl SpellService for HttpSpellService {
    async fn fetch(&self, text: &str) -> Result<String, CheckError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("_callback", self.callback.as_str()), ("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Http(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Constant wait between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Submits single chunks, retrying failed attempts with a fixed backoff
pub struct RemoteChecker<S> {
    service: S,
    policy: RetryPolicy,
}

impl<S: SpellService> RemoteChecker<S> {
    pub fn new(service: S, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn submit(&self, chunk: &str) -> Result<ChunkReport, CheckError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(chunk).await {
                Ok(report) => {
                    debug!(attempt, errors = report.error_count, "chunk checked");
                    return Ok(report);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "spell-check attempt failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, chunk: &str) -> Result<ChunkReport, CheckError> {
        let body = self.service.fetch(chunk).await?;
        decode_response(&body)
    }
}
