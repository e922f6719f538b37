use futures::StreamExt;
use gmaps_core::{Event, EventStream, GmapsError};

/// What a finished turn produced for the user.
#[derive(Debug, Default)]
pub struct TurnOutput {
    /// Text of the last event that carried text.
    pub answer: Option<String>,
    /// Agents control was handed to, in order.
    pub transfers: Vec<String>,
    pub error: Option<GmapsError>,
}

impl TurnOutput {
    fn push(&mut self, event: &Event) {
        if let Some(target) = &event.actions.transfer_to_agent {
            self.transfers.push(target.clone());
        }
        if let Some(text) = event.text() {
            self.answer = Some(text);
        }
    }
}

/// Drains a turn's events. Intermediate selector output is not shown; only
/// the final answer is kept.
pub async fn collect_turn(mut events: EventStream) -> TurnOutput {
    let mut output = TurnOutput::default();
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => output.push(&event),
            Err(e) => {
                output.error = Some(e);
                break;
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmaps_core::Content;

    fn text_event(author: &str, text: &str) -> Event {
        Event::new("inv").with_author(author).with_content(Content::new("model").with_text(text))
    }

    #[tokio::test]
    async fn test_keeps_last_answer_and_transfers() {
        let mut transfer = Event::new("inv").with_author("coordinator_agent");
        transfer.actions.transfer_to_agent = Some("places_sequential_agent".to_string());
        let events: Vec<gmaps_core::Result<Event>> = vec![
            Ok(transfer),
            Ok(text_event("fields_selector_agent", r#"{"fieldsMask": "places.id"}"#)),
            Ok(Event::new("inv").with_author("fields_selector_agent")),
            Ok(text_event("places_agent", "카페 두 곳을 찾았습니다.")),
        ];
        let output = collect_turn(Box::pin(futures::stream::iter(events))).await;

        assert_eq!(output.answer.as_deref(), Some("카페 두 곳을 찾았습니다."));
        assert_eq!(output.transfers, vec!["places_sequential_agent"]);
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn test_stops_at_error() {
        let events: Vec<gmaps_core::Result<Event>> = vec![
            Ok(text_event("fields_selector_agent", "   ")),
            Err(GmapsError::Agent("malformed output".to_string())),
            Ok(text_event("places_agent", "unreachable")),
        ];
        let output = collect_turn(Box::pin(futures::stream::iter(events))).await;

        assert!(matches!(output.error, Some(GmapsError::Agent(_))));
        assert!(output.answer.is_none());
    }
}
