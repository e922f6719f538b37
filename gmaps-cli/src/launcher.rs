use anyhow::{Context, Result};
use gmaps_coordinator::{AgentsConfig, build_root_agent};
use gmaps_core::Llm;
use gmaps_model::{GeminiConfig, GeminiModel};
use gmaps_runner::{Runner, RunnerConfig};
use gmaps_tool::{PlacesConfig, PlacesService};
use std::path::Path;
use std::sync::Arc;

pub const APP_NAME: &str = "gmaps";

/// Defaults, overridden by the TOML file when one is given.
pub fn load_config(path: Option<&Path>) -> Result<AgentsConfig> {
    match path {
        Some(path) => AgentsConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AgentsConfig::default()),
    }
}

/// Builds the agent tree against the live Gemini and Maps APIs.
///
/// Fails before any network call when either API key is missing.
pub fn build_runner(config: &AgentsConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Runner> {
    let gemini_key = GeminiConfig::resolve_api_key(&lookup)?;
    let places_config = config.places_config(PlacesConfig::from_lookup(&lookup)?);
    let service = Arc::new(PlacesService::with_config(places_config)?);

    let agent = build_root_agent(
        config,
        |_agent, model| Ok(Arc::new(GeminiModel::new(gemini_key.clone(), model)?) as Arc<dyn Llm>),
        service,
    )
    .context("failed to build agent tree")?;

    Ok(Runner::new(RunnerConfig { app_name: APP_NAME.to_string(), agent }))
}
