pub mod chunker;
pub mod decode;
pub mod remote;
pub mod strategy;

use crate::cli::output::Display;
use crate::error::{CheckError, ValidationError};
use crate::{CheckResult, Config};
use remote::{HttpSpellService, RemoteChecker, RetryPolicy, SpellService};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Trim the input and enforce the empty / length limits.
pub fn validate_input(text: &str, max_length: usize) -> Result<&str, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }

    let length = text.chars().count();
    if length > max_length {
        return Err(ValidationError::TooLong {
            length,
            max: max_length,
        });
    }

    Ok(text)
}

/// Sequential multi-chunk spell check against the remote service
pub struct SpellChecker<S> {
    remote: RemoteChecker<S>,
    max_input_length: usize,
    max_chunk_length: usize,
    request_delay: Duration,
}

impl SpellChecker<HttpSpellService> {
    pub fn from_config(config: &Config) -> Result<Self, CheckError> {
        Ok(Self::new(HttpSpellService::new(config)?, config))
    }
}

impl<S: SpellService> SpellChecker<S> {
    pub fn new(service: S, config: &Config) -> Self {
        Self {
            remote: RemoteChecker::new(service, RetryPolicy::from_config(config)),
            max_input_length: config.max_input_length,
            max_chunk_length: config.max_chunk_length,
            request_delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    pub fn service(&self) -> &S {
        self.remote.service()
    }

    /// Check `text` chunk by chunk. Chunks are submitted one at a time with
    /// a fixed pause in between; any chunk that still fails after its retries
    /// aborts the whole check and discards what was collected so far.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub async fn check_spelling(
        &self,
        text: &str,
        display: &dyn Display,
        cancel: &CancellationToken,
    ) -> Result<CheckResult, CheckError> {
        let text = validate_input(text, self.max_input_length)?;

        let chunks = chunker::split(text, self.max_chunk_length);
        let total = chunks.len();
        debug!(chunks = total, "split input");

        let mut result = CheckResult::default();
        let mut corrected = Vec::with_capacity(total);

        for chunk in &chunks {
            if cancel.is_cancelled() {
                return Err(CheckError::Cancelled);
            }

            if chunk.index > 1 && !self.request_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CheckError::Cancelled),
                    _ = tokio::time::sleep(self.request_delay) => {}
                }
            }

            display.show_progress(chunk.index, total);

            let report = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CheckError::Cancelled),
                report = self.remote.submit(&chunk.content) => report?,
            };

            debug!(chunk = chunk.index, errors = report.error_count, "chunk done");

            result.total_error_count += report.error_count;
            result
                .errors
                .extend(report.errors.into_iter().map(|mut error| {
                    error.chunk_index = chunk.index;
                    error
                }));
            corrected.push(report.corrected_text);
        }

        result.corrected_text = corrected.join(" ");

        info!(
            chunks = total,
            errors = result.total_error_count,
            "spell check complete"
        );

        Ok(result)
    }
}
