//! # gmaps-core
//!
//! Core traits and data model for the Google Maps agent workspace.
//!
//! ## Overview
//!
//! - [`Agent`] - an executable unit that turns an invocation into events
//! - [`Llm`] - a hosted language model
//! - [`Tool`] - a function the model may call
//! - [`SessionState`] - typed per-conversation state shared by pipeline stages
//! - [`SearchResult`], [`GeocodeResult`], [`ReverseGeocodeResult`] - adapter results
//!
//! Selector stages write one [`OutputKey`] each into [`SessionState`]; the
//! search tool reads them back when it builds the Places request.

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod instruction_template;
pub mod maps;
pub mod model;
pub mod state;
pub mod tool;
pub mod types;

pub use agent::{Agent, EventStream};
pub use context::{InvocationContext, ReadonlyContext};
pub use error::{GmapsError, Result};
pub use event::{Event, EventActions};
pub use instruction_template::inject_session_state;
pub use maps::{
    Coordinates, FailureKind, GeocodeResult, GeocodedLocation, ReverseGeocodeResult,
    ReverseGeocodedAddress, SearchResult,
};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
pub use state::{
    GeocodeInput, GeocodingRecord, HistoryRecord, OutputKey, PlacesQuery, PlacesSearchRecord,
    ReverseGeocodeInput, ReverseGeocodingRecord, SessionState, SharedState,
};
pub use tool::{Tool, ToolContext};
pub use types::{Content, Part};
