//! Gemini client implementation.

use super::config::GeminiConfig;
use super::convert::{self, GenerateContentResponse};
use async_trait::async_trait;
use gmaps_core::{GmapsError, Llm, LlmRequest, LlmResponseStream, Result};
use gmaps_telemetry::{Instrument, debug, model_call_span, warn};
use reqwest::Client;

/// Gemini model reached through the `generateContent` REST endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use gmaps_model::GeminiModel;
///
/// let model = GeminiModel::new(std::env::var("GOOGLE_API_KEY")?, "gemini-2.5-flash")?;
/// ```
pub struct GeminiModel {
    client: Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key, model))
    }

    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GmapsError::Model(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Builds a client for `model` with the key from `GOOGLE_API_KEY` or `GEMINI_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = GeminiConfig::resolve_api_key(|name| std::env::var(name).ok())?;
        Self::new(api_key, model)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.effective_base_url().trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(&self, request: LlmRequest) -> Result<LlmResponseStream> {
        let body = convert::build_request(&request);
        let span = model_call_span(&self.config.model);

        let response = async {
            debug!(contents = body.contents.len(), tools = request.tools.len(), "calling Gemini");

            let response = self
                .client
                .post(self.api_url())
                .header("x-goog-api-key", &self.config.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| GmapsError::Model(format!("Gemini API request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "Gemini API returned an error");
                return Err(GmapsError::Model(format!(
                    "Gemini API error ({}): {}",
                    status, error_text
                )));
            }

            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| GmapsError::Model(format!("Invalid Gemini response: {}", e)))?;
            Ok(convert::response_from_wire(parsed))
        }
        .instrument(span)
        .await?;

        let stream = async_stream::stream! {
            yield Ok(response);
        };
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let model = GeminiModel::with_config(
            GeminiConfig::new("key", "gemini-2.5-flash-lite").with_base_url("http://localhost:9/v1beta/"),
        )
        .unwrap();
        assert_eq!(model.api_url(), "http://localhost:9/v1beta/models/gemini-2.5-flash-lite:generateContent");
        assert_eq!(model.name(), "gemini-2.5-flash-lite");
    }
}
