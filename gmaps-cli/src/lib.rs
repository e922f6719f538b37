//! # gmaps-cli
//!
//! `gmaps ask "<text>"` runs one turn; `gmaps console` keeps a conversation
//! open. Keys come from the environment or a `.env` file:
//!
//! - `GOOGLE_API_KEY` or `GEMINI_API_KEY` for the model
//! - `GOOGLE_PLACES_API_KEY` or `GOOGLE_MAPS_API_KEY` for Places and Geocoding
//!
//! `--config path.toml` overrides model names, temperatures, the request
//! timeout and the default language.

pub mod cli;
pub mod console;
pub mod launcher;
pub mod render;
