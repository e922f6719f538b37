use super::config::PlacesConfig;
use gmaps_core::{
    Coordinates, FailureKind, GeocodeResult, GeocodedLocation, GmapsError, Result,
    ReverseGeocodeResult, ReverseGeocodedAddress, SearchResult,
};
use gmaps_telemetry::{Instrument, error, info, maps_request_span, record_http_status, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-facing failure messages, in the language of the end user.
pub mod messages {
    pub const INVALID_REQUEST: &str = "잘못된 요청입니다. 쿼리나 필드를 확인해주세요.";
    pub const INVALID_KEY: &str = "API 키가 유효하지 않습니다.";
    pub const FORBIDDEN: &str = "API 접근이 금지되었습니다. 권한을 확인해주세요.";
    pub const QUOTA_EXCEEDED: &str = "API 호출 한도를 초과했습니다.";
    pub const TIMEOUT: &str = "요청 시간이 초과되었습니다.";
    pub const CONNECTION: &str = "네트워크 연결에 문제가 있습니다.";
    pub const NO_PLACES: &str = "검색 결과가 없습니다.";
    pub const ADDRESS_NOT_FOUND: &str = "주소를 찾을 수 없습니다.";
    pub const COORDINATES_NOT_FOUND: &str = "해당 좌표의 주소를 찾을 수 없습니다.";
    pub const PROVIDER_ERROR_PREFIX: &str = "Google API 오류가 발생했습니다";
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    TextSearch,
    Geocode,
    ReverseGeocode,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::TextSearch => "text_search",
            Operation::Geocode => "geocode",
            Operation::ReverseGeocode => "reverse_geocode",
        }
    }

    /// Noun used in the generic request-failure message.
    fn label(self) -> &'static str {
        match self {
            Operation::TextSearch => "장소 검색",
            Operation::Geocode => "지오코딩",
            Operation::ReverseGeocode => "역지오코딩",
        }
    }

    fn not_found(self) -> &'static str {
        match self {
            Operation::TextSearch => messages::NO_PLACES,
            Operation::Geocode => messages::ADDRESS_NOT_FOUND,
            Operation::ReverseGeocode => messages::COORDINATES_NOT_FOUND,
        }
    }
}

struct Failure {
    kind: FailureKind,
    message: String,
}

impl Failure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    fn provider(detail: impl std::fmt::Display) -> Self {
        Self::new(FailureKind::Provider, format!("{}: {}", messages::PROVIDER_ERROR_PREFIX, detail))
    }

    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::new(FailureKind::InvalidArgument, messages::INVALID_REQUEST),
            StatusCode::UNAUTHORIZED => Self::new(FailureKind::PermissionDenied, messages::INVALID_KEY),
            StatusCode::FORBIDDEN => Self::new(FailureKind::PermissionDenied, messages::FORBIDDEN),
            StatusCode::TOO_MANY_REQUESTS => {
                Self::new(FailureKind::QuotaExhausted, messages::QUOTA_EXCEEDED)
            }
            other => Self::provider(format!("HTTP {}", other)),
        }
    }

    fn from_request_error(err: &reqwest::Error, op: Operation) -> Self {
        if err.is_timeout() {
            Self::new(FailureKind::Transport, messages::TIMEOUT)
        } else if err.is_connect() {
            Self::new(FailureKind::Transport, messages::CONNECTION)
        } else if err.is_builder() {
            Self::new(FailureKind::InvalidArgument, messages::INVALID_REQUEST)
        } else if err.is_decode() {
            Self::provider(err)
        } else {
            Self::new(FailureKind::Transport, format!("{} 중 오류가 발생했습니다: {}", op.label(), err))
        }
    }

    /// Geocoding reports most failures in the body of a 200 response.
    fn from_geocoding_status(status: &str, error_message: Option<&str>, op: Operation) -> Self {
        match status {
            "ZERO_RESULTS" => Self::new(FailureKind::NotFound, op.not_found()),
            "INVALID_REQUEST" => Self::new(FailureKind::InvalidArgument, messages::INVALID_REQUEST),
            "REQUEST_DENIED" => Self::new(FailureKind::PermissionDenied, messages::FORBIDDEN),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
                Self::new(FailureKind::QuotaExhausted, messages::QUOTA_EXCEEDED)
            }
            other => match error_message {
                Some(detail) => Self::provider(format!("{} ({})", other, detail)),
                None => Self::provider(other),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    min_rating: f64,
    rank_preference: &'static str,
    include_pure_service_area_businesses: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    included_type: Option<&'a str>,
}

#[derive(Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<Value>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GeocodeEntry>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeEntry {
    formatted_address: String,
    #[serde(default)]
    place_id: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<Value>,
}

#[derive(Deserialize)]
struct Geometry {
    location: Coordinates,
    #[serde(default)]
    location_type: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Client for Places Text Search and the Geocoding API.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> gmaps_core::Result<()> {
/// use gmaps_tool::PlacesService;
///
/// let service = PlacesService::from_env()?;
/// let result = service
///     .text_search("강남역 카페", "places.displayName", Some("cafe"), Some("ko"))
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PlacesService {
    client: Client,
    config: PlacesConfig,
}

impl PlacesService {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(PlacesConfig::new(api_key))
    }

    /// Fails with a configuration error when the key is blank.
    pub fn with_config(config: PlacesConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GmapsError::Config("Google Places API key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GmapsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Uses `GOOGLE_PLACES_API_KEY`, then `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::with_config(PlacesConfig::from_env()?)
    }

    pub fn config(&self) -> &PlacesConfig {
        &self.config
    }

    pub fn default_language(&self) -> &str {
        &self.config.default_language
    }

    /// Searches places by free text.
    ///
    /// `fields` becomes the response field mask. Empty `types` and `language`
    /// are left out of the request.
    pub async fn text_search(
        &self,
        query: &str,
        fields: &str,
        types: Option<&str>,
        language: Option<&str>,
    ) -> SearchResult {
        let op = Operation::TextSearch;
        let body = SearchTextRequest {
            text_query: query,
            min_rating: 0.0,
            rank_preference: "RELEVANCE",
            include_pure_service_area_businesses: false,
            language_code: non_empty(language),
            included_type: non_empty(types),
        };

        let outcome = async {
            info!(query, fields, types = ?body.included_type, language = ?body.language_code, "places text search");
            let response = self
                .client
                .post(self.config.text_search_url())
                .header("X-Goog-Api-Key", &self.config.api_key)
                .header("X-Goog-FieldMask", fields)
                .json(&body)
                .send()
                .await
                .map_err(|e| Failure::from_request_error(&e, op))?;

            record_http_status(response.status().as_u16());
            if !response.status().is_success() {
                return Err(Failure::from_status(response.status()));
            }

            let parsed: SearchTextResponse =
                response.json().await.map_err(|e| Failure::from_request_error(&e, op))?;
            if parsed.places.is_empty() {
                return Err(Failure::new(FailureKind::NotFound, op.not_found()));
            }
            Ok::<_, Failure>(parsed.places)
        }
        .instrument(maps_request_span(op.as_str()))
        .await;

        match outcome {
            Ok(places) => {
                info!(query, count = places.len(), "places text search succeeded");
                SearchResult::Places { places }
            }
            Err(failure) => {
                log_failure(op, &failure);
                SearchResult::failed(failure.kind, failure.message, query)
            }
        }
    }

    /// Resolves an address to coordinates.
    pub async fn geocode(&self, address: &str, language: &str) -> GeocodeResult {
        let op = Operation::Geocode;
        let params = [("address", address), ("language", language)];
        match self.geocoding_request(&params, op).await {
            Ok(entry) => {
                info!(address, formatted_address = %entry.formatted_address, "geocode succeeded");
                GeocodeResult::Found(GeocodedLocation {
                    lat: entry.geometry.location.lat,
                    lng: entry.geometry.location.lng,
                    formatted_address: entry.formatted_address,
                    place_id: entry.place_id,
                    location_type: entry.geometry.location_type,
                    input_address: address.to_string(),
                })
            }
            Err(failure) => {
                log_failure(op, &failure);
                GeocodeResult::failed(failure.kind, failure.message, address)
            }
        }
    }

    /// Resolves coordinates to the closest address.
    pub async fn reverse_geocode(&self, at: Coordinates, language: &str) -> ReverseGeocodeResult {
        let op = Operation::ReverseGeocode;
        let latlng = at.to_latlng();
        let params = [("latlng", latlng.as_str()), ("language", language)];
        match self.geocoding_request(&params, op).await {
            Ok(entry) => {
                info!(latlng = %latlng, formatted_address = %entry.formatted_address, "reverse geocode succeeded");
                ReverseGeocodeResult::Found(ReverseGeocodedAddress {
                    formatted_address: entry.formatted_address,
                    place_id: entry.place_id,
                    location_type: entry.geometry.location_type,
                    address_components: entry.address_components,
                    input_coordinates: at,
                })
            }
            Err(failure) => {
                log_failure(op, &failure);
                ReverseGeocodeResult::failed(failure.kind, failure.message, at)
            }
        }
    }

    async fn geocoding_request(
        &self,
        params: &[(&str, &str)],
        op: Operation,
    ) -> std::result::Result<GeocodeEntry, Failure> {
        async {
            info!(params = ?params, "geocoding request");
            let response = self
                .client
                .get(self.config.geocode_url())
                .query(params)
                .query(&[("key", self.config.api_key.as_str())])
                .send()
                .await
                .map_err(|e| Failure::from_request_error(&e, op))?;

            record_http_status(response.status().as_u16());
            if !response.status().is_success() {
                return Err(Failure::from_status(response.status()));
            }

            let parsed: GeocodeResponse =
                response.json().await.map_err(|e| Failure::from_request_error(&e, op))?;
            if parsed.status != "OK" {
                return Err(Failure::from_geocoding_status(
                    &parsed.status,
                    parsed.error_message.as_deref(),
                    op,
                ));
            }
            parsed
                .results
                .into_iter()
                .next()
                .ok_or_else(|| Failure::new(FailureKind::NotFound, op.not_found()))
        }
        .instrument(maps_request_span(op.as_str()))
        .await
    }
}

fn log_failure(op: Operation, failure: &Failure) {
    match failure.kind {
        FailureKind::NotFound => info!(operation = op.as_str(), "no results"),
        FailureKind::InvalidArgument | FailureKind::Transport => {
            warn!(operation = op.as_str(), kind = ?failure.kind, error = %failure.message, "maps request failed")
        }
        FailureKind::PermissionDenied | FailureKind::QuotaExhausted | FailureKind::Provider => {
            error!(operation = op.as_str(), kind = ?failure.kind, error = %failure.message, "maps request failed")
        }
    }
}
