//! Places and Geocoding API adapter.
//!
//! [`PlacesService`] is built once with an API key and shared by the tools
//! through an `Arc`. Every operation performs exactly one HTTP request and
//! reports provider failures as result values, never as `Err`.

mod config;
mod service;

pub use config::{
    API_KEY_ENV_VARS, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT, GEOCODING_API_BASE, PLACES_API_BASE,
    PlacesConfig,
};
pub use service::{PlacesService, messages};
