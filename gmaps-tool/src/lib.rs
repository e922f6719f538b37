//! # gmaps-tool
//!
//! Tools for the Google Maps agents.
//!
//! - [`FunctionTool`] - wraps an async closure as a [`Tool`](gmaps_core::Tool)
//! - [`PlacesService`] - Places Text Search and Geocoding API adapter
//! - [`maps`] - the `text_search`, `geocode` and `reverse_geocode` tools

mod function_tool;
pub mod maps;
pub mod places;

pub use function_tool::FunctionTool;
pub use maps::{
    DEFAULT_FIELDS, geocode_tool, geocoding_tools, reverse_geocode_tool, text_search_tool,
};
pub use places::{PlacesConfig, PlacesService};
