mod common;

use futures::StreamExt;
use gmaps_agent::{LlmAgentBuilder, MAX_ITERATIONS, TRANSFER_TO_AGENT};
use gmaps_core::{Agent, Event, GmapsError, InvocationContext, OutputKey, Result, Tool};
use gmaps_model::MockLlm;
use gmaps_tool::FunctionTool;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use common::TestContext;

async fn collect(agent: &dyn Agent, ctx: Arc<TestContext>) -> Vec<Result<Event>> {
    let stream = agent.run(ctx as Arc<dyn InvocationContext>).await.unwrap();
    stream.collect().await
}

#[tokio::test]
async fn test_direct_answer() {
    let model = Arc::new(MockLlm::new("mock").with_text("안녕하세요! 장소 검색을 도와드릴게요."));
    let agent = LlmAgentBuilder::new("coordinator_agent").model(model.clone()).build().unwrap();

    let ctx = Arc::new(TestContext::new("안녕"));
    let events = collect(&agent, ctx).await;

    assert_eq!(events.len(), 1);
    let event = events[0].as_ref().unwrap();
    assert_eq!(event.author, "coordinator_agent");
    assert_eq!(event.text().as_deref(), Some("안녕하세요! 장소 검색을 도와드릴게요."));
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn test_output_key_binding_from_json() {
    let model = Arc::new(MockLlm::new("mock").with_text(
        "```json\n{\"fieldsMask\": \"places.displayName,places.rating\"}\n```",
    ));
    let agent = LlmAgentBuilder::new("fields_selector_agent")
        .model(model)
        .output_key(OutputKey::Fields)
        .build()
        .unwrap();
    assert_eq!(agent.output_key(), Some(OutputKey::Fields));

    let ctx = Arc::new(TestContext::new("강남역 맛집 평점"));
    let events = collect(&agent, ctx.clone()).await;

    let state_event = events.last().unwrap().as_ref().unwrap();
    assert_eq!(
        state_event.actions.state_delta.get("fields"),
        Some(&json!("places.displayName,places.rating"))
    );
    let fields = ctx.state().read(|s| s.output(OutputKey::Fields).map(str::to_string));
    assert_eq!(fields.as_deref(), Some("places.displayName,places.rating"));
}

#[tokio::test]
async fn test_malformed_output_fails() {
    let model = Arc::new(MockLlm::new("mock").with_text("{\"language\": \"ko\"}"));
    let agent = LlmAgentBuilder::new("language_selector_agent")
        .model(model)
        .output_key(OutputKey::Language)
        .build()
        .unwrap();

    let ctx = Arc::new(TestContext::new("도쿄 라멘"));
    let events = collect(&agent, ctx.clone()).await;

    assert!(matches!(events.last().unwrap(), Err(GmapsError::Agent(_))));
    assert!(ctx.state().read(|s| s.output(OutputKey::Language).is_none()));
}

#[tokio::test]
async fn test_instruction_and_generation_config_sent() {
    let model = Arc::new(MockLlm::new("mock").with_text("ja"));
    let agent = LlmAgentBuilder::new("language_selector_agent")
        .model(model.clone())
        .global_instruction("You help with places.")
        .instruction("Pick a language. Type filter: [{types?}]")
        .temperature(0.1)
        .output_key(OutputKey::Language)
        .build()
        .unwrap();

    let ctx = Arc::new(TestContext::new("신주쿠 맛집"));
    ctx.state().write(|s| s.set_output(OutputKey::Types, "restaurant")).unwrap();
    collect(&agent, ctx).await;

    let request = &model.requests()[0];
    assert_eq!(
        request.system_instruction.as_deref(),
        Some("You help with places.\n\nPick a language. Type filter: [restaurant]")
    );
    assert_eq!(request.config.as_ref().and_then(|c| c.temperature), Some(0.1));
    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].text(), "신주쿠 맛집");
    assert!(request.tools.is_empty());
}

#[tokio::test]
async fn test_missing_required_placeholder_fails_run() {
    let model = Arc::new(MockLlm::new("mock").with_text("unused"));
    let agent = LlmAgentBuilder::new("places_agent")
        .model(model.clone())
        .instruction("Use field mask {fields}")
        .build()
        .unwrap();

    let ctx = Arc::new(TestContext::new("q")) as Arc<dyn InvocationContext>;
    let err = agent.run(ctx).await.err().unwrap();
    assert!(matches!(err, GmapsError::State(_)));
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn test_tool_loop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let tool = FunctionTool::new("text_search", "Searches places", move |_ctx, args| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"places": [{"id": "p1", "query": args["query"]}]}))
        }
    });

    let model = Arc::new(
        MockLlm::new("mock")
            .with_function_call("text_search", json!({"query": "홍대 맛집"}))
            .with_text("홍대 근처 식당 1곳을 찾았습니다."),
    );
    let agent = LlmAgentBuilder::new("places_agent")
        .model(model.clone())
        .tool(Arc::new(tool))
        .build()
        .unwrap();

    let ctx = Arc::new(TestContext::new("홍대 맛집"));
    let events: Vec<Event> = collect(&agent, ctx).await.into_iter().map(|e| e.unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].text().as_deref(), Some("홍대 근처 식당 1곳을 찾았습니다."));

    let second = &model.requests()[1];
    assert_eq!(second.contents.len(), 3);
    assert!(second.tools.contains_key("text_search"));
    let wire = serde_json::to_value(&second.contents[2]).unwrap();
    assert_eq!(wire["role"], "user");
    assert_eq!(wire["parts"][0]["response"]["places"][0]["id"], "p1");
}

#[tokio::test]
async fn test_tool_error_reported_to_model() {
    let tool = FunctionTool::new("geocode", "Geocodes", |_ctx, _args| async {
        Err(GmapsError::Tool("geocode: invalid arguments: missing field `address`".to_string()))
    });
    let model = Arc::new(
        MockLlm::new("mock").with_function_call("geocode", json!({})).with_text("주소를 알려주세요."),
    );
    let agent =
        LlmAgentBuilder::new("geocode_agent").model(model.clone()).tool(Arc::new(tool)).build().unwrap();

    let events = collect(&agent, Arc::new(TestContext::new("좌표 알려줘"))).await;
    assert!(events.iter().all(|e| e.is_ok()));

    let request = &model.requests()[1];
    let wire = serde_json::to_value(&request.contents[2]).unwrap();
    assert!(wire["parts"][0]["response"]["error"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_max_iterations() {
    let mut model = MockLlm::new("mock");
    for _ in 0..MAX_ITERATIONS {
        model = model.with_function_call("noop", json!({}));
    }
    let tool = FunctionTool::new("noop", "Does nothing", |_ctx, _args| async { Ok(json!({})) });
    let agent =
        LlmAgentBuilder::new("looping").model(Arc::new(model)).tool(Arc::new(tool)).build().unwrap();

    let events = collect(&agent, Arc::new(TestContext::new("loop"))).await;
    match events.last().unwrap() {
        Err(GmapsError::Agent(msg)) => assert!(msg.contains("max iterations")),
        other => panic!("unexpected last item: {other:?}"),
    }
}

#[tokio::test]
async fn test_transfer_runs_named_sub_agent() {
    let places = Arc::new(
        LlmAgentBuilder::new("places_sequential_agent")
            .description("장소 검색")
            .model(Arc::new(MockLlm::new("places").with_text("검색 결과입니다.")))
            .build()
            .unwrap(),
    );
    let geocode_model = Arc::new(MockLlm::new("geocode"));
    let geocode = Arc::new(
        LlmAgentBuilder::new("geocode_agent")
            .description("주소/좌표 변환")
            .model(geocode_model.clone())
            .build()
            .unwrap(),
    );

    let coordinator_model = Arc::new(
        MockLlm::new("coordinator")
            .with_function_call(TRANSFER_TO_AGENT, json!({"agent_name": "places_sequential_agent"})),
    );
    let coordinator = LlmAgentBuilder::new("coordinator_agent")
        .model(coordinator_model.clone())
        .sub_agent(places)
        .sub_agent(geocode)
        .build()
        .unwrap();

    let events: Vec<Event> = collect(&coordinator, Arc::new(TestContext::new("강남 카페")))
        .await
        .into_iter()
        .map(|e| e.unwrap())
        .collect();

    let transfer = events.iter().find_map(|e| e.actions.transfer_to_agent.clone());
    assert_eq!(transfer.as_deref(), Some("places_sequential_agent"));
    let last = events.last().unwrap();
    assert_eq!(last.author, "places_sequential_agent");
    assert_eq!(last.text().as_deref(), Some("검색 결과입니다."));

    let declarations = &coordinator_model.requests()[0].tools;
    let description = declarations[TRANSFER_TO_AGENT]["description"].as_str().unwrap();
    assert!(description.contains("geocode_agent"));
    assert!(geocode_model.requests().is_empty());
    assert_eq!(coordinator_model.requests().len(), 1);
}

#[tokio::test]
async fn test_transfer_to_unknown_agent_fails() {
    let sub = Arc::new(
        LlmAgentBuilder::new("geocode_agent").model(Arc::new(MockLlm::new("g"))).build().unwrap(),
    );
    let model = Arc::new(
        MockLlm::new("coordinator")
            .with_function_call(TRANSFER_TO_AGENT, json!({"agent_name": "routes_agent"})),
    );
    let coordinator =
        LlmAgentBuilder::new("coordinator_agent").model(model).sub_agent(sub).build().unwrap();

    let events = collect(&coordinator, Arc::new(TestContext::new("경로 알려줘"))).await;
    match events.last().unwrap() {
        Err(GmapsError::Agent(msg)) => assert!(msg.contains("routes_agent")),
        other => panic!("unexpected last item: {other:?}"),
    }
}

#[test]
fn test_builder_validation() {
    assert!(LlmAgentBuilder::new("no_model").build().is_err());

    let reserved = FunctionTool::new(TRANSFER_TO_AGENT, "x", |_ctx, _args| async { Ok(json!({})) });
    let err = LlmAgentBuilder::new("a")
        .model(Arc::new(MockLlm::new("m")))
        .tool(Arc::new(reserved) as Arc<dyn Tool>)
        .build()
        .unwrap_err();
    assert!(matches!(err, GmapsError::Agent(_)));
}
