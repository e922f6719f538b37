//! Maps tools exposed to the agents.
//!
//! Each tool calls the injected [`PlacesService`] once and appends one record
//! to the matching history list in session state, whatever the outcome.
//! Blank text and out-of-range coordinates are sent as given; the provider's
//! rejection comes back as an invalid-request result. Only arguments that
//! fail to parse are rejected before the call.

use crate::{FunctionTool, PlacesService};
use gmaps_core::{
    Coordinates, GeocodeInput, GmapsError, HistoryRecord, OutputKey, PlacesQuery, Result,
    ReverseGeocodeInput, Tool, ToolContext,
};
use gmaps_telemetry::{debug, info};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Field mask used when no field selection was made this turn.
pub const DEFAULT_FIELDS: &str =
    "places.id,places.attributions,places.displayName,places.formattedAddress,places.location";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TextSearchArgs {
    /// 검색할 장소 텍스트. 예: "강남역 스타벅스", "부산역 근처 호텔"
    pub query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeocodeArgs {
    /// 좌표로 변환할 주소 또는 장소명
    pub address: String,
    /// 응답 언어 코드 (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReverseGeocodeArgs {
    /// 위도
    pub lat: f64,
    /// 경도
    pub lng: f64,
    /// 응답 언어 코드 (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| GmapsError::Tool(format!("{}: invalid arguments: {}", tool, e)))
}

/// Explicit argument, then the session's language selection, then the
/// service default.
fn resolve_language(ctx: &dyn ToolContext, explicit: Option<String>, fallback: &str) -> String {
    explicit
        .filter(|l| !l.trim().is_empty())
        .or_else(|| {
            ctx.state().read(|s| {
                s.output(OutputKey::Language).filter(|l| !l.trim().is_empty()).map(str::to_string)
            })
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// `text_search`: Places Text Search with the fields, type and language
/// selected earlier in the turn.
pub fn text_search_tool(service: Arc<PlacesService>) -> FunctionTool {
    FunctionTool::new(
        "text_search",
        "텍스트 쿼리로 장소를 검색합니다. 이전 단계에서 선택된 필드, 장소 타입, 언어 설정이 적용됩니다.",
        move |ctx, args| {
            let service = service.clone();
            async move {
                let args: TextSearchArgs = parse_args("text_search", args)?;

                let (fields, types) = ctx.state().read(|s| {
                    (
                        s.output(OutputKey::Fields)
                            .filter(|f| !f.trim().is_empty())
                            .unwrap_or(DEFAULT_FIELDS)
                            .to_string(),
                        s.output(OutputKey::Types).map(str::to_string),
                    )
                });
                let language = resolve_language(ctx.as_ref(), None, service.default_language());
                debug!(fields = %fields, types = ?types, language = %language, "selections read from session");

                let result = service
                    .text_search(&args.query, &fields, types.as_deref(), Some(&language))
                    .await;

                ctx.state().write(|s| {
                    s.record_places_search(HistoryRecord::now(
                        PlacesQuery { query: args.query.clone() },
                        result.clone(),
                    ))
                });
                info!(query = %args.query, ok = result.error().is_none(), "text_search recorded");
                Ok(serde_json::to_value(&result)?)
            }
        },
    )
    .with_parameters_schema::<TextSearchArgs>()
}

/// `geocode`: address to coordinates.
pub fn geocode_tool(service: Arc<PlacesService>) -> FunctionTool {
    FunctionTool::new(
        "geocode",
        "주소나 장소명을 위도/경도 좌표로 변환합니다.",
        move |ctx, args| {
            let service = service.clone();
            async move {
                let args: GeocodeArgs = parse_args("geocode", args)?;
                let language =
                    resolve_language(ctx.as_ref(), args.language, service.default_language());

                let result = service.geocode(&args.address, &language).await;

                ctx.state().write(|s| {
                    s.record_geocoding(HistoryRecord::now(
                        GeocodeInput { address: args.address.clone() },
                        result.clone(),
                    ))
                });
                Ok(serde_json::to_value(&result)?)
            }
        },
    )
    .with_parameters_schema::<GeocodeArgs>()
}

/// `reverse_geocode`: coordinates to address.
pub fn reverse_geocode_tool(service: Arc<PlacesService>) -> FunctionTool {
    FunctionTool::new(
        "reverse_geocode",
        "위도/경도 좌표를 주소로 변환합니다.",
        move |ctx, args| {
            let service = service.clone();
            async move {
                let args: ReverseGeocodeArgs = parse_args("reverse_geocode", args)?;
                let at = Coordinates::new(args.lat, args.lng);
                let language =
                    resolve_language(ctx.as_ref(), args.language, service.default_language());

                let result = service.reverse_geocode(at, &language).await;

                ctx.state().write(|s| {
                    s.record_reverse_geocoding(HistoryRecord::now(
                        ReverseGeocodeInput { coordinates: at },
                        result.clone(),
                    ))
                });
                Ok(serde_json::to_value(&result)?)
            }
        },
    )
    .with_parameters_schema::<ReverseGeocodeArgs>()
}

/// Both geocoding tools, for the geocode agent.
pub fn geocoding_tools(service: Arc<PlacesService>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(geocode_tool(service.clone())) as Arc<dyn Tool>,
        Arc::new(reverse_geocode_tool(service)),
    ]
}
