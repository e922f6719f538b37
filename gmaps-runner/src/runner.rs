use crate::InvocationContext;
use async_stream::stream;
use futures::StreamExt;
use gmaps_core::{Agent, Content, EventStream, Result, SharedState};
use gmaps_telemetry::{error, info};
use std::sync::Arc;

pub struct RunnerConfig {
    pub app_name: String,
    pub agent: Arc<dyn Agent>,
}

/// Runs turns of one conversation against a fixed agent tree.
///
/// Session state lives as long as the runner. Each turn clears the previous
/// turn's selections and keeps the search histories.
pub struct Runner {
    app_name: String,
    root_agent: Arc<dyn Agent>,
    session_id: String,
    state: Arc<SharedState>,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            app_name: config.app_name,
            root_agent: config.agent,
            session_id: uuid::Uuid::new_v4().to_string(),
            state: Arc::new(SharedState::default()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn root_agent(&self) -> &Arc<dyn Agent> {
        &self.root_agent
    }

    /// Starts a turn with `text` as the user message.
    pub async fn run(&self, user_id: impl Into<String>, text: impl Into<String>) -> Result<EventStream> {
        self.state.write(|s| s.begin_turn());

        let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());
        let ctx = Arc::new(InvocationContext::new(
            invocation_id.clone(),
            user_id.into(),
            self.session_id.clone(),
            Content::new("user").with_text(text),
            self.state.clone(),
        ));

        info!(
            app_name = %self.app_name,
            session_id = %self.session_id,
            invocation_id = %invocation_id,
            agent = self.root_agent.name(),
            "starting turn"
        );

        let mut agent_stream = self.root_agent.run(ctx).await?;
        let s = stream! {
            let mut count = 0usize;
            while let Some(result) = agent_stream.next().await {
                match result {
                    Ok(event) => {
                        count += 1;
                        yield Ok(event);
                    }
                    Err(e) => {
                        error!(invocation_id = %invocation_id, error = %e, "turn failed");
                        yield Err(e);
                        return;
                    }
                }
            }
            info!(invocation_id = %invocation_id, events = count, "turn finished");
        };

        Ok(Box::pin(s))
    }

    /// Searches the agent tree for `name`.
    pub fn find_agent(current: &Arc<dyn Agent>, name: &str) -> Option<Arc<dyn Agent>> {
        if current.name() == name {
            return Some(current.clone());
        }
        current.sub_agents().iter().find_map(|sub| Self::find_agent(sub, name))
    }
}
