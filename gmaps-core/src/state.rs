//! Typed per-conversation session state.
//!
//! The selector stages of the places pipeline each write one [`OutputKey`];
//! the search tool reads all three. History lists record every provider call
//! and survive across turns of the same conversation.

use crate::maps::{Coordinates, GeocodeResult, ReverseGeocodeResult, SearchResult};
use crate::{GmapsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Session keys written by pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKey {
    Fields,
    Types,
    Language,
}

impl OutputKey {
    pub const ALL: [OutputKey; 3] = [OutputKey::Fields, OutputKey::Types, OutputKey::Language];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKey::Fields => "fields",
            OutputKey::Types => "types",
            OutputKey::Language => "language",
        }
    }

    /// Property name a stage uses when it answers with a JSON object.
    pub fn json_property(&self) -> &'static str {
        match self {
            OutputKey::Fields => "fieldsMask",
            OutputKey::Types => "includedType",
            OutputKey::Language => "languageCode",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord<I, R> {
    #[serde(flatten)]
    pub input: I,
    pub result: R,
    pub timestamp: DateTime<Utc>,
}

impl<I, R> HistoryRecord<I, R> {
    pub fn now(input: I, result: R) -> Self {
        Self { input, result, timestamp: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesQuery {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeInput {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeInput {
    pub coordinates: Coordinates,
}

pub type PlacesSearchRecord = HistoryRecord<PlacesQuery, SearchResult>;
pub type GeocodingRecord = HistoryRecord<GeocodeInput, GeocodeResult>;
pub type ReverseGeocodingRecord = HistoryRecord<ReverseGeocodeInput, ReverseGeocodeResult>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    fields: Option<String>,
    types: Option<String>,
    language: Option<String>,
    places_search_history: Vec<PlacesSearchRecord>,
    geocoding_history: Vec<GeocodingRecord>,
    reverse_geocoding_history: Vec<ReverseGeocodingRecord>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the selections of the previous turn. History is kept.
    pub fn begin_turn(&mut self) {
        self.fields = None;
        self.types = None;
        self.language = None;
    }

    /// Writes a selection. Each key accepts one write per turn.
    pub fn set_output(&mut self, key: OutputKey, value: impl Into<String>) -> Result<()> {
        let slot = self.slot_mut(key);
        if slot.is_some() {
            return Err(GmapsError::State(format!("'{key}' was already written this turn")));
        }
        *slot = Some(value.into());
        Ok(())
    }

    pub fn output(&self, key: OutputKey) -> Option<&str> {
        match key {
            OutputKey::Fields => self.fields.as_deref(),
            OutputKey::Types => self.types.as_deref(),
            OutputKey::Language => self.language.as_deref(),
        }
    }

    fn slot_mut(&mut self, key: OutputKey) -> &mut Option<String> {
        match key {
            OutputKey::Fields => &mut self.fields,
            OutputKey::Types => &mut self.types,
            OutputKey::Language => &mut self.language,
        }
    }

    pub fn record_places_search(&mut self, record: PlacesSearchRecord) {
        self.places_search_history.push(record);
    }

    pub fn record_geocoding(&mut self, record: GeocodingRecord) {
        self.geocoding_history.push(record);
    }

    pub fn record_reverse_geocoding(&mut self, record: ReverseGeocodingRecord) {
        self.reverse_geocoding_history.push(record);
    }

    pub fn places_search_history(&self) -> &[PlacesSearchRecord] {
        &self.places_search_history
    }

    pub fn geocoding_history(&self) -> &[GeocodingRecord] {
        &self.geocoding_history
    }

    pub fn reverse_geocoding_history(&self) -> &[ReverseGeocodingRecord] {
        &self.reverse_geocoding_history
    }
}

/// [`SessionState`] shared by every agent and tool of a turn.
///
/// Stages run one after another so the lock is never contended. A panic
/// inside a closure leaves the state as it was written so far.
#[derive(Debug, Default)]
pub struct SharedState {
    inner: RwLock<SessionState>,
}

impl SharedState {
    pub fn new(state: SessionState) -> Self {
        Self { inner: RwLock::new(state) }
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn snapshot(&self) -> SessionState {
        self.read(SessionState::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::FailureKind;

    #[test]
    fn test_output_key_names() {
        assert_eq!(OutputKey::Fields.as_str(), "fields");
        assert_eq!(OutputKey::Types.to_string(), "types");
        assert_eq!(OutputKey::parse("language"), Some(OutputKey::Language));
        assert_eq!(OutputKey::parse("places_search_history"), None);
        assert_eq!(OutputKey::Fields.json_property(), "fieldsMask");
    }

    #[test]
    fn test_output_written_once_per_turn() {
        let mut state = SessionState::new();
        state.set_output(OutputKey::Types, "cafe").unwrap();
        let err = state.set_output(OutputKey::Types, "restaurant").unwrap_err();
        assert!(matches!(err, GmapsError::State(_)));
        assert_eq!(state.output(OutputKey::Types), Some("cafe"));

        state.begin_turn();
        assert_eq!(state.output(OutputKey::Types), None);
        state.set_output(OutputKey::Types, "restaurant").unwrap();
        assert_eq!(state.output(OutputKey::Types), Some("restaurant"));
    }

    #[test]
    fn test_begin_turn_keeps_history() {
        let mut state = SessionState::new();
        state.set_output(OutputKey::Language, "ko").unwrap();
        state.record_places_search(HistoryRecord::now(
            PlacesQuery { query: "홍대 맛집".to_string() },
            SearchResult::failed(FailureKind::NotFound, "검색 결과가 없습니다.", "홍대 맛집"),
        ));
        state.begin_turn();
        assert_eq!(state.output(OutputKey::Language), None);
        assert_eq!(state.places_search_history().len(), 1);
    }

    #[test]
    fn test_history_record_flattens_input() {
        let record = HistoryRecord::now(
            GeocodeInput { address: "서울시청".to_string() },
            GeocodeResult::failed(FailureKind::NotFound, "주소를 찾을 수 없습니다.", "서울시청"),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["address"], "서울시청");
        assert_eq!(value["result"]["error"], "주소를 찾을 수 없습니다.");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_shared_state_snapshot() {
        let shared = SharedState::default();
        shared.write(|s| s.set_output(OutputKey::Fields, "places.id")).unwrap();
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.output(OutputKey::Fields), Some("places.id"));
        assert_eq!(shared.read(|s| s.output(OutputKey::Types).is_none()), true);
    }
}
