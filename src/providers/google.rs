use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use super::TranslationBackend;

/// Client for the free Google web translation endpoint
///
/// The endpoint answers `GET /translate_a/single` with a nested JSON array;
/// the translated text is the concatenation of `response[0][i][0]`.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the translation endpoint
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client against the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        GoogleTranslate {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Extract the translated text from the response body
    fn parse_response(body: &str) -> Result<String, ProviderError> {
        let json: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let sentences = json
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProviderError::ParseError("missing translation array in response".to_string())
            })?;

        let mut translated = String::new();
        for sentence in sentences {
            let part = sentence
                .get(0)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ProviderError::ParseError("missing text in translation sentence".to_string())
                })?;
            translated.push_str(part);
        }

        Ok(translated)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/translate_a/single",
            self.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response body".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("hello", "en", "fr").await?;
        Ok(())
    }
}
