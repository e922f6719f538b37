//! Result types returned by the Places and Geocoding adapter.
//!
//! Every operation returns either a success payload or an error descriptor
//! keyed by the operation's input. Callers only need to check for the `error`
//! key; the [`FailureKind`] travels alongside for logging and tests but is not
//! part of the serialized shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidArgument,
    PermissionDenied,
    QuotaExhausted,
    #[default]
    Provider,
    Transport,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `"lat,lng"` as expected by the reverse geocoding endpoint.
    pub fn to_latlng(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResult {
    Places {
        places: Vec<Value>,
    },
    Failed {
        error: String,
        query: String,
        #[serde(skip)]
        kind: FailureKind,
    },
}

impl SearchResult {
    pub fn failed(kind: FailureKind, error: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Failed { error: error.into(), query: query.into(), kind }
    }

    pub fn places(&self) -> Option<&[Value]> {
        match self {
            Self::Places { places } => Some(places),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Places { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Places { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub location_type: String,
    pub input_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeocodeResult {
    Found(GeocodedLocation),
    Failed {
        error: String,
        address: String,
        #[serde(skip)]
        kind: FailureKind,
    },
}

impl GeocodeResult {
    pub fn failed(kind: FailureKind, error: impl Into<String>, address: impl Into<String>) -> Self {
        Self::Failed { error: error.into(), address: address.into(), kind }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Found(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Found(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodedAddress {
    pub formatted_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub location_type: String,
    pub address_components: Vec<Value>,
    pub input_coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReverseGeocodeResult {
    Found(ReverseGeocodedAddress),
    Failed {
        error: String,
        lat: f64,
        lng: f64,
        #[serde(skip)]
        kind: FailureKind,
    },
}

impl ReverseGeocodeResult {
    pub fn failed(kind: FailureKind, error: impl Into<String>, at: Coordinates) -> Self {
        Self::Failed { error: error.into(), lat: at.lat, lng: at.lng, kind }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Found(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Found(_) => None,
        }
    }
}
