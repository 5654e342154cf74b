/*!
 * Backend implementations for the translation capability.
 *
 * This module contains client implementations for translation services:
 * - GoogleTranslate: the free Google web translation endpoint
 * - MockBackend: an offline backend for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// A backend is a stateless text-to-text service: one literal segment in,
/// its translation out. Implementations must treat every call as independent
/// and may be slow or fail; callers own retry policy.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate a single piece of text between two language codes
    ///
    /// # Arguments
    /// * `text` - The literal text to translate
    /// * `source_language` - ISO language code of the input
    /// * `target_language` - ISO language code of the output
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the backend
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the backend is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod google;
pub mod mock;
