/*!
 * Tests for the translation service retry behavior
 */

use std::sync::Arc;

use rwmodtrans::app_config::TranslationConfig;
use rwmodtrans::errors::TranslationError;
use rwmodtrans::providers::mock::MockBackend;
use rwmodtrans::translation_service::TranslationService;

fn service_with_retries(backend: MockBackend, retry_count: u32) -> TranslationService {
    let config = TranslationConfig {
        retry_count,
        retry_backoff_ms: 1,
        ..TranslationConfig::default()
    };
    TranslationService::with_backend(Arc::new(backend), &config)
}

/// Test a healthy backend translates on the first attempt
#[tokio::test]
async fn test_translate_withHealthyBackend_shouldSucceedFirstTry() {
    let backend = MockBackend::new();
    let tracker = backend.tracker();
    let service = service_with_retries(backend, 3);

    let result = service.translate("Hello", "en", "fr").await.unwrap();

    assert_eq!(result, "[fr] Hello");
    assert_eq!(tracker.lock().unwrap().requests.len(), 1);
}

/// Test transient failures are retried until the backend recovers
#[tokio::test]
async fn test_translate_withTransientFailures_shouldRetryAndSucceed() {
    let backend = MockBackend::failing(2);
    let tracker = backend.tracker();
    let service = service_with_retries(backend, 3);

    let result = service.translate("Hello", "en", "fr").await.unwrap();

    assert_eq!(result, "[fr] Hello");
    assert_eq!(tracker.lock().unwrap().requests.len(), 3);
}

/// Test persistent failures exhaust the retry budget
#[tokio::test]
async fn test_translate_withPersistentFailures_shouldExhaustRetries() {
    let backend = MockBackend::failing(10);
    let tracker = backend.tracker();
    let service = service_with_retries(backend, 2);

    let result = service.translate("Hello", "en", "fr").await;

    match result {
        Err(TranslationError::RetriesExhausted { attempts, .. }) => {
            assert_eq!(attempts, 3);
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
    assert_eq!(tracker.lock().unwrap().requests.len(), 3);
}

/// Test zero retries means exactly one attempt
#[tokio::test]
async fn test_translate_withZeroRetries_shouldAttemptOnce() {
    let backend = MockBackend::failing(1);
    let tracker = backend.tracker();
    let service = service_with_retries(backend, 0);

    let result = service.translate("Hello", "en", "fr").await;

    assert!(result.is_err());
    assert_eq!(tracker.lock().unwrap().requests.len(), 1);
}
