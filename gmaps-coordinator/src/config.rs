use gmaps_core::{GmapsError, Result};
use gmaps_tool::PlacesConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Model names, generation settings and Places request settings for the
/// agent tree. Every field is optional in TOML; missing fields keep their
/// defaults.
///
/// ```toml
/// places_model = "gemini-2.5-pro"
/// default_language = "en"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub coordinator_model: String,
    pub selector_model: String,
    pub places_model: String,
    pub geocode_model: String,
    pub coordinator_temperature: f32,
    pub selector_temperature: f32,
    pub places_temperature: f32,
    pub request_timeout_secs: u64,
    pub default_language: String,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            coordinator_model: "gemini-2.5-flash-lite".to_string(),
            selector_model: "gemini-2.5-flash-lite".to_string(),
            places_model: "gemini-2.5-flash".to_string(),
            geocode_model: "gemini-2.5-flash".to_string(),
            coordinator_temperature: 0.1,
            selector_temperature: 0.1,
            places_temperature: 0.1,
            request_timeout_secs: 15,
            default_language: "ko".to_string(),
        }
    }
}

impl AgentsConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| GmapsError::Config(format!("invalid agents config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        let models = [
            ("coordinator_model", &self.coordinator_model),
            ("selector_model", &self.selector_model),
            ("places_model", &self.places_model),
            ("geocode_model", &self.geocode_model),
        ];
        if let Some((name, _)) = models.iter().find(|(_, m)| m.trim().is_empty()) {
            return Err(GmapsError::Config(format!("{} must not be empty", name)));
        }
        if self.request_timeout_secs == 0 {
            return Err(GmapsError::Config("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies the timeout and default language to a Places client config.
    pub fn places_config(&self, base: PlacesConfig) -> PlacesConfig {
        base.with_timeout(self.request_timeout()).with_default_language(&self.default_language)
    }
}
