//! Gemini client against a local HTTP double.

use futures::StreamExt;
use gmaps_core::{Content, GenerateContentConfig, GmapsError, Llm, LlmRequest};
use gmaps_model::{GeminiConfig, GeminiModel};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer) -> GeminiModel {
    GeminiModel::with_config(
        GeminiConfig::new("test-key", "gemini-2.5-flash-lite").with_base_url(server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_generate_content_text_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-lite:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "Answer briefly."}]},
            "generationConfig": {"topK": 5}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"languageCode\": \"ko\"}"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = LlmRequest::new(
        "gemini-2.5-flash-lite",
        vec![Content::new("user").with_text("강남역 근처 카페 알려줘")],
    )
    .with_config(GenerateContentConfig { top_k: Some(5), ..Default::default() });
    request.system_instruction = Some("Answer briefly.".to_string());

    let model = model_for(&server);
    let mut stream = model.generate_content(request).await.unwrap();
    let response = stream.next().await.unwrap().unwrap();
    assert_eq!(response.content.unwrap().text(), "{\"languageCode\": \"ko\"}");
    assert!(response.turn_complete);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_generate_content_function_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-lite:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{
                    "functionCall": {"name": "transfer_to_agent", "args": {"agent_name": "places_sequential_agent"}}
                }]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let model = model_for(&server);
    let request = LlmRequest::new("gemini-2.5-flash-lite", vec![Content::new("user").with_text("홍대 맛집")]);
    let mut stream = model.generate_content(request).await.unwrap();
    let content = stream.next().await.unwrap().unwrap().content.unwrap();
    let calls: Vec<_> = content.function_calls().collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "transfer_to_agent");
    assert_eq!(calls[0].1["agent_name"], "places_sequential_agent");
}

#[tokio::test]
async fn test_generate_content_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
        .expect(1)
        .mount(&server)
        .await;

    let model = model_for(&server);
    let request = LlmRequest::new("gemini-2.5-flash-lite", vec![Content::new("user").with_text("hi")]);
    match model.generate_content(request).await {
        Err(GmapsError::Model(msg)) => {
            assert!(msg.contains("403"));
            assert!(msg.contains("PERMISSION_DENIED"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error"),
    }
}
