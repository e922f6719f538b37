//! Gemini provider.
//!
//! One non-streaming `models/{model}:generateContent` call per
//! [`Llm::generate_content`](gmaps_core::Llm::generate_content) invocation,
//! with function declarations for the agent's tools.

mod client;
mod config;
mod convert;

pub use client::GeminiModel;
pub use config::{API_KEY_ENV_VARS, GEMINI_API_BASE, GeminiConfig};
