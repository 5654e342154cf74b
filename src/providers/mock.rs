/*!
 * Mock backend implementation for testing.
 *
 * Returns deterministic pseudo-translations and records every call, so
 * tests can assert what reached the backend without any network access.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use super::TranslationBackend;

/// Tracks calls made against a mock backend
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Every text passed to translate, in call order
    pub requests: Vec<String>,
    /// Number of calls that should fail before succeeding
    pub failures_remaining: usize,
}

/// Mock backend producing `[<target>] <text>` pseudo-translations
#[derive(Debug)]
pub struct MockBackend {
    tracker: Arc<Mutex<CallTracker>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock that always succeeds
    pub fn new() -> Self {
        MockBackend {
            tracker: Arc::new(Mutex::new(CallTracker::default())),
        }
    }

    /// Create a mock whose first `count` calls fail with a connection error
    pub fn failing(count: usize) -> Self {
        MockBackend {
            tracker: Arc::new(Mutex::new(CallTracker {
                requests: Vec::new(),
                failures_remaining: count,
            })),
        }
    }

    /// Shared handle to the call tracker
    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.requests.push(text.to_string());

        if tracker.failures_remaining > 0 {
            tracker.failures_remaining -= 1;
            return Err(ProviderError::ConnectionError(
                "mock backend failure".to_string(),
            ));
        }

        Ok(format!("[{}] {}", target_language, text))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
