use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use gmaps_core::{Agent, EventStream, GmapsError, InvocationContext, Result};
use gmaps_telemetry::{agent_run_span, error, info};
use std::sync::Arc;

/// Runs its stages once each, in order, over the same invocation context.
///
/// The first failing stage ends the run; its error is the last item of the
/// stream and later stages never start. Selections written by earlier stages
/// stay in session state. A stage that declares an output key must have
/// written it by the time its stream ends.
pub struct SequentialAgent {
    name: String,
    description: String,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl SequentialAgent {
    pub fn new(name: impl Into<String>, sub_agents: Vec<Arc<dyn Agent>>) -> Self {
        Self { name: name.into(), description: String::new(), sub_agents }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

#[async_trait]
impl Agent for SequentialAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &self.sub_agents
    }

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        let sub_agents = self.sub_agents.clone();
        let pipeline = self.name.clone();
        let span = agent_run_span(&pipeline, ctx.invocation_id());

        let s = stream! {
            for (index, stage) in sub_agents.iter().enumerate() {
                info!(parent: &span, stage = stage.name(), index, "starting stage");

                let mut events = match stage.run(ctx.clone()).await {
                    Ok(events) => events,
                    Err(e) => {
                        error!(parent: &span, stage = stage.name(), error = %e, "stage failed");
                        yield Err(e);
                        return;
                    }
                };

                while let Some(event) = events.next().await {
                    match event {
                        Ok(event) => yield Ok(event),
                        Err(e) => {
                            error!(parent: &span, stage = stage.name(), error = %e, "stage failed");
                            yield Err(e);
                            return;
                        }
                    }
                }

                if let Some(key) = stage.output_key() {
                    if ctx.state().read(|s| s.output(key).is_none()) {
                        yield Err(GmapsError::Agent(format!(
                            "{}: stage '{}' finished without writing '{}'",
                            pipeline,
                            stage.name(),
                            key
                        )));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }
}
