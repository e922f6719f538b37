use gmaps_core::{GmapsError, Result};
use std::time::Duration;

pub const PLACES_API_BASE: &str = "https://places.googleapis.com";
pub const GEOCODING_API_BASE: &str = "https://maps.googleapis.com";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_PLACES_API_KEY", "GOOGLE_MAPS_API_KEY"];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Response language when neither the caller nor the session picked one.
pub const DEFAULT_LANGUAGE: &str = "ko";

#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub api_key: String,
    pub places_base_url: String,
    pub geocoding_base_url: String,
    pub timeout: Duration,
    pub default_language: String,
}

impl PlacesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            places_base_url: PLACES_API_BASE.to_string(),
            geocoding_base_url: GEOCODING_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Reads the key through `lookup`; the first non-empty variable wins.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
            .map(Self::new)
            .ok_or_else(|| {
                GmapsError::Config(format!(
                    "Google Places API key not set; export {} (or {})",
                    API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
                ))
            })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn with_places_base_url(mut self, url: impl Into<String>) -> Self {
        self.places_base_url = url.into();
        self
    }

    pub fn with_geocoding_base_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub(crate) fn text_search_url(&self) -> String {
        format!("{}/v1/places:searchText", self.places_base_url.trim_end_matches('/'))
    }

    pub(crate) fn geocode_url(&self) -> String {
        format!("{}/maps/api/geocode/json", self.geocoding_base_url.trim_end_matches('/'))
    }
}
