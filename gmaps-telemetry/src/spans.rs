//! Span helpers for agent, model, tool and maps operations.

use tracing::Span;

/// Create a span for agent execution
///
/// # Example
/// ```
/// use gmaps_telemetry::agent_run_span;
/// let span = agent_run_span("coordinator_agent", "inv-123");
/// let _enter = span.enter();
/// ```
pub fn agent_run_span(agent_name: &str, invocation_id: &str) -> Span {
    tracing::info_span!("agent.run", agent.name = agent_name, invocation.id = invocation_id)
}

/// Create a span for one model round trip
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name)
}

/// Create a span for tool execution
pub fn tool_execute_span(tool_name: &str, function_call_id: &str) -> Span {
    tracing::info_span!("tool.execute", tool.name = tool_name, call.id = function_call_id)
}

/// Create a span for a Places or Geocoding HTTP request
///
/// `operation` is one of `text_search`, `geocode`, `reverse_geocode`.
pub fn maps_request_span(operation: &str) -> Span {
    tracing::info_span!("maps.request", maps.operation = operation, http.status = tracing::field::Empty)
}

/// Record the HTTP status on the current `maps.request` span
pub fn record_http_status(status: u16) {
    Span::current().record("http.status", status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_construct_without_subscriber() {
        let span = agent_run_span("places_sequential_agent", "inv-1");
        let _enter = span.enter();
        let _tool = tool_execute_span("text_search", "call-1");
        let maps = maps_request_span("text_search");
        let _m = maps.enter();
        record_http_status(200);
        let _model = model_call_span("gemini-2.5-flash");
    }
}
