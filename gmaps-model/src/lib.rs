//! # gmaps-model
//!
//! Language model implementations for the Google Maps agents.
//!
//! - [`GeminiModel`] - Gemini `generateContent` over REST
//! - [`MockLlm`] - scripted model for tests
//!
//! ```rust,no_run
//! use gmaps_model::GeminiModel;
//!
//! let model = GeminiModel::from_env("gemini-2.5-flash-lite").unwrap();
//! ```

pub mod gemini;
pub mod mock;

pub use gemini::{GEMINI_API_BASE, GeminiConfig, GeminiModel};
pub use mock::MockLlm;
