/*!
 * Translation service wrapping a backend with retry handling.
 *
 * The service is the single entry point the rewriter uses for translation.
 * It owns the retry policy (count and exponential backoff) and keeps the
 * backend itself swappable behind the TranslationBackend trait.
 */

use std::sync::Arc;
use std::time::Duration;
use log::{warn, debug};

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::TranslationBackend;
use crate::providers::google::GoogleTranslate;

/// Translation service with retry and backoff around a backend
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// The backend performing the actual translation calls
    backend: Arc<dyn TranslationBackend>,

    /// Number of retries for failed requests
    retry_count: u32,

    /// Base backoff in milliseconds, doubled on each retry
    retry_backoff_ms: u64,
}

impl TranslationService {
    /// Create a service from the translation configuration
    pub fn new(config: &TranslationConfig) -> Self {
        let backend = GoogleTranslate::new(config.endpoint.clone(), config.timeout_secs);
        Self::with_backend(Arc::new(backend), config)
    }

    /// Create a service around an explicit backend (used by tests)
    pub fn with_backend(backend: Arc<dyn TranslationBackend>, config: &TranslationConfig) -> Self {
        TranslationService {
            backend,
            retry_count: config.retry_count,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    /// Translate a single literal segment, retrying transient failures
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..=self.retry_count {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms.saturating_mul(1 << (attempt - 1));
                debug!("Retrying translation (attempt {}) after {}ms", attempt + 1, backoff);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match self
                .backend
                .translate(text, source_language, target_language)
                .await
            {
                Ok(translated) => return Ok(translated),
                Err(e) => {
                    warn!(
                        "Translation attempt {} failed ({} -> {}): {}",
                        attempt + 1,
                        source_language,
                        target_language,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(TranslationError::RetriesExhausted {
            attempts: self.retry_count + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Verify the backend is reachable
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        self.backend.test_connection().await?;
        Ok(())
    }
}
