//! # gmaps-coordinator
//!
//! The Google Maps agent tree:
//!
//! ```text
//! coordinator_agent
//! ├── places_sequential_agent
//! │   ├── fields_selector_agent    -> fields
//! │   ├── types_selector_agent     -> types
//! │   ├── language_selector_agent  -> language
//! │   └── places_agent             (text_search)
//! └── geocode_agent                (geocode, reverse_geocode)
//! ```
//!
//! [`build_root_agent`] assembles the tree from an [`AgentsConfig`], a model
//! factory and a shared [`PlacesService`](gmaps_tool::PlacesService).

mod agents;
mod config;
pub mod prompts;

pub use agents::{
    COORDINATOR_AGENT, FIELDS_SELECTOR_AGENT, GEOCODE_AGENT, LANGUAGE_SELECTOR_AGENT, PLACES_AGENT,
    PLACES_SEQUENTIAL_AGENT, TYPES_SELECTOR_AGENT, build_geocode_agent, build_places_agent,
    build_places_pipeline, build_root_agent, build_selector, selection_schema,
};
pub use config::AgentsConfig;
