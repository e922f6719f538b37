use crate::{AgentsConfig, prompts};
use gmaps_agent::{LlmAgent, LlmAgentBuilder, SequentialAgent};
use gmaps_core::{Agent, Llm, OutputKey, Result};
use gmaps_telemetry::info;
use gmaps_tool::{PlacesService, geocoding_tools, text_search_tool};
use serde_json::{Value, json};
use std::sync::Arc;

pub const COORDINATOR_AGENT: &str = "coordinator_agent";
pub const PLACES_SEQUENTIAL_AGENT: &str = "places_sequential_agent";
pub const FIELDS_SELECTOR_AGENT: &str = "fields_selector_agent";
pub const TYPES_SELECTOR_AGENT: &str = "types_selector_agent";
pub const LANGUAGE_SELECTOR_AGENT: &str = "language_selector_agent";
pub const PLACES_AGENT: &str = "places_agent";
pub const GEOCODE_AGENT: &str = "geocode_agent";

/// Response schema of a selector: one string property named after the
/// selection.
pub fn selection_schema(key: OutputKey) -> Value {
    json!({
        "type": "object",
        "properties": {
            key.json_property(): { "type": "string" }
        },
        "required": [key.json_property()]
    })
}

/// One selector stage. The model answers with a JSON object whose property
/// is bound to `key` in session state.
pub fn build_selector(config: &AgentsConfig, key: OutputKey, model: Arc<dyn Llm>) -> Result<LlmAgent> {
    let (name, description, instruction) = match key {
        OutputKey::Fields => (
            FIELDS_SELECTOR_AGENT,
            prompts::FIELDS_SELECTOR_DESCRIPTION,
            prompts::FIELDS_SELECTOR_INSTRUCTION,
        ),
        OutputKey::Types => (
            TYPES_SELECTOR_AGENT,
            prompts::TYPES_SELECTOR_DESCRIPTION,
            prompts::TYPES_SELECTOR_INSTRUCTION,
        ),
        OutputKey::Language => (
            LANGUAGE_SELECTOR_AGENT,
            prompts::LANGUAGE_SELECTOR_DESCRIPTION,
            prompts::LANGUAGE_SELECTOR_INSTRUCTION,
        ),
    };

    LlmAgentBuilder::new(name)
        .description(description)
        .model(model)
        .global_instruction(prompts::GLOBAL_INSTRUCTION)
        .instruction(instruction)
        .temperature(config.selector_temperature)
        .output_schema(selection_schema(key))
        .output_key(key)
        .build()
}

pub fn build_places_agent(
    config: &AgentsConfig,
    model: Arc<dyn Llm>,
    service: Arc<PlacesService>,
) -> Result<LlmAgent> {
    LlmAgentBuilder::new(PLACES_AGENT)
        .description(prompts::PLACES_DESCRIPTION)
        .model(model)
        .global_instruction(prompts::GLOBAL_INSTRUCTION)
        .instruction(prompts::PLACES_INSTRUCTION)
        .temperature(config.places_temperature)
        .tool(Arc::new(text_search_tool(service)))
        .build()
}

/// fields, types and language selectors followed by the places agent.
pub fn build_places_pipeline<F>(
    config: &AgentsConfig,
    models: &F,
    service: Arc<PlacesService>,
) -> Result<SequentialAgent>
where
    F: Fn(&str, &str) -> Result<Arc<dyn Llm>>,
{
    let mut stages: Vec<Arc<dyn Agent>> = Vec::new();
    for key in OutputKey::ALL {
        let model = match key {
            OutputKey::Fields => models(FIELDS_SELECTOR_AGENT, &config.selector_model)?,
            OutputKey::Types => models(TYPES_SELECTOR_AGENT, &config.selector_model)?,
            OutputKey::Language => models(LANGUAGE_SELECTOR_AGENT, &config.selector_model)?,
        };
        stages.push(Arc::new(build_selector(config, key, model)?));
    }
    let places_model = models(PLACES_AGENT, &config.places_model)?;
    stages.push(Arc::new(build_places_agent(config, places_model, service)?));

    Ok(SequentialAgent::new(PLACES_SEQUENTIAL_AGENT, stages)
        .with_description(prompts::PLACES_PIPELINE_DESCRIPTION))
}

pub fn build_geocode_agent(
    config: &AgentsConfig,
    model: Arc<dyn Llm>,
    service: Arc<PlacesService>,
) -> Result<LlmAgent> {
    LlmAgentBuilder::new(GEOCODE_AGENT)
        .description(prompts::GEOCODE_DESCRIPTION)
        .model(model)
        .global_instruction(prompts::GLOBAL_INSTRUCTION)
        .instruction(prompts::GEOCODE_INSTRUCTION)
        .temperature(config.places_temperature)
        .tools(geocoding_tools(service))
        .build()
}

/// Builds the whole tree rooted at the coordinator.
///
/// `models` is called once per LLM agent with the agent's name and the
/// configured model name. Every agent shares `service`.
pub fn build_root_agent<F>(
    config: &AgentsConfig,
    models: F,
    service: Arc<PlacesService>,
) -> Result<Arc<dyn Agent>>
where
    F: Fn(&str, &str) -> Result<Arc<dyn Llm>>,
{
    let pipeline = build_places_pipeline(config, &models, service.clone())?;
    let geocode = build_geocode_agent(config, models(GEOCODE_AGENT, &config.geocode_model)?, service)?;

    let coordinator = LlmAgentBuilder::new(COORDINATOR_AGENT)
        .description(prompts::COORDINATOR_DESCRIPTION)
        .model(models(COORDINATOR_AGENT, &config.coordinator_model)?)
        .global_instruction(prompts::GLOBAL_INSTRUCTION)
        .instruction(prompts::COORDINATOR_INSTRUCTION)
        .temperature(config.coordinator_temperature)
        .sub_agent(Arc::new(pipeline))
        .sub_agent(Arc::new(geocode))
        .build()?;

    info!(
        coordinator_model = %config.coordinator_model,
        selector_model = %config.selector_model,
        places_model = %config.places_model,
        "agent tree built"
    );
    Ok(Arc::new(coordinator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_schema() {
        let schema = selection_schema(OutputKey::Language);
        assert_eq!(schema["properties"]["languageCode"]["type"], "string");
        assert_eq!(schema["required"], json!(["languageCode"]));
    }
}
