use crate::output::bind_output;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use gmaps_core::{
    Agent, Content, Event, EventStream, GenerateContentConfig, GmapsError, InvocationContext, Llm,
    LlmRequest, OutputKey, ReadonlyContext, Result, SharedState, Tool, ToolContext,
    inject_session_state,
};
use gmaps_telemetry::{Instrument, agent_run_span, debug, info, warn};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Model round trips allowed per run before the agent gives up.
pub const MAX_ITERATIONS: usize = 10;

/// Function exposed to the model when the agent has sub-agents.
pub const TRANSFER_TO_AGENT: &str = "transfer_to_agent";

pub struct LlmAgent {
    name: String,
    description: String,
    model: Arc<dyn Llm>,
    instruction: Option<String>,
    global_instruction: Option<String>,
    generate_content_config: Option<GenerateContentConfig>,
    output_schema: Option<Value>,
    output_key: Option<OutputKey>,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("model", &self.model.name())
            .field("output_key", &self.output_key)
            .field("tools_count", &self.tools.len())
            .field("sub_agents_count", &self.sub_agents.len())
            .finish()
    }
}

pub struct LlmAgentBuilder {
    name: String,
    description: Option<String>,
    model: Option<Arc<dyn Llm>>,
    instruction: Option<String>,
    global_instruction: Option<String>,
    generate_content_config: Option<GenerateContentConfig>,
    output_schema: Option<Value>,
    output_key: Option<OutputKey>,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl LlmAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            model: None,
            instruction: None,
            global_instruction: None,
            generate_content_config: None,
            output_schema: None,
            output_key: None,
            tools: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn Llm>) -> Self {
        self.model = Some(model);
        self
    }

    /// Agent instruction. `{fields}`, `{types}` and `{language}` are filled
    /// from session state on every run.
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Instruction shared by every agent of a tree; placed before the
    /// agent's own instruction.
    pub fn global_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.global_instruction = Some(instruction.into());
        self
    }

    pub fn generate_content_config(mut self, config: GenerateContentConfig) -> Self {
        self.generate_content_config = Some(config);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generate_content_config.get_or_insert_with(Default::default).temperature =
            Some(temperature);
        self
    }

    pub fn output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn output_key(mut self, key: OutputKey) -> Self {
        self.output_key = Some(key);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    pub fn build(self) -> Result<LlmAgent> {
        let model = self.model.ok_or_else(|| {
            GmapsError::Agent(format!("{}: model is required", self.name))
        })?;

        let mut tool_names = HashSet::new();
        for tool in &self.tools {
            if tool.name() == TRANSFER_TO_AGENT || !tool_names.insert(tool.name().to_string()) {
                return Err(GmapsError::Agent(format!(
                    "{}: duplicate or reserved tool name '{}'",
                    self.name,
                    tool.name()
                )));
            }
        }

        let mut agent_names = HashSet::new();
        for agent in &self.sub_agents {
            if !agent_names.insert(agent.name().to_string()) {
                return Err(GmapsError::Agent(format!(
                    "{}: duplicate sub-agent name '{}'",
                    self.name,
                    agent.name()
                )));
            }
        }

        Ok(LlmAgent {
            name: self.name,
            description: self.description.unwrap_or_default(),
            model,
            instruction: self.instruction,
            global_instruction: self.global_instruction,
            generate_content_config: self.generate_content_config,
            output_schema: self.output_schema,
            output_key: self.output_key,
            tools: self.tools,
            sub_agents: self.sub_agents,
        })
    }
}

impl LlmAgent {
    /// Global instruction then agent instruction, both with session values
    /// substituted.
    fn system_instruction(&self, state: &SharedState) -> Result<Option<String>> {
        let sections = [self.global_instruction.as_deref(), self.instruction.as_deref()];
        let mut rendered = Vec::new();
        for template in sections.into_iter().flatten() {
            let text = state.read(|s| inject_session_state(s, template))?;
            if !text.trim().is_empty() {
                rendered.push(text);
            }
        }
        Ok((!rendered.is_empty()).then(|| rendered.join("\n\n")))
    }

    fn tool_declarations(&self) -> HashMap<String, Value> {
        let mut declarations = HashMap::new();
        for tool in &self.tools {
            let mut decl = json!({
                "name": tool.name(),
                "description": tool.description(),
            });
            if let Some(params) = tool.parameters_schema() {
                decl["parameters"] = params;
            }
            declarations.insert(tool.name().to_string(), decl);
        }

        if !self.sub_agents.is_empty() {
            let agents: Vec<String> = self
                .sub_agents
                .iter()
                .map(|a| format!("- {}: {}", a.name(), a.description()))
                .collect();
            declarations.insert(
                TRANSFER_TO_AGENT.to_string(),
                json!({
                    "name": TRANSFER_TO_AGENT,
                    "description": format!(
                        "Transfer the request to one of these agents:\n{}",
                        agents.join("\n")
                    ),
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "agent_name": {
                                "type": "string",
                                "description": "The name of the agent to transfer to."
                            }
                        },
                        "required": ["agent_name"]
                    }
                }),
            );
        }
        declarations
    }

    fn request_config(&self) -> Option<GenerateContentConfig> {
        let mut config = self.generate_content_config.clone();
        if let Some(schema) = &self.output_schema {
            config.get_or_insert_with(Default::default).response_schema = Some(schema.clone());
        }
        config
    }
}

/// Tool context handed to tools: the invocation's identity and state plus
/// the id of the function call being served.
struct AgentToolContext {
    parent_ctx: Arc<dyn InvocationContext>,
    function_call_id: String,
}

#[async_trait]
impl ReadonlyContext for AgentToolContext {
    fn invocation_id(&self) -> &str {
        self.parent_ctx.invocation_id()
    }

    fn user_id(&self) -> &str {
        self.parent_ctx.user_id()
    }

    fn session_id(&self) -> &str {
        self.parent_ctx.session_id()
    }

    fn user_content(&self) -> &Content {
        self.parent_ctx.user_content()
    }
}

#[async_trait]
impl ToolContext for AgentToolContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }

    fn state(&self) -> &SharedState {
        self.parent_ctx.state()
    }
}

/// Function responses must be JSON objects.
fn as_response_object(value: Value) -> Value {
    if value.is_object() { value } else { json!({ "result": value }) }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &self.sub_agents
    }

    fn output_key(&self) -> Option<OutputKey> {
        self.output_key
    }

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        let agent_name = self.name.clone();
        let invocation_id = ctx.invocation_id().to_string();
        let span = agent_run_span(&agent_name, &invocation_id);
        info!(parent: &span, "Starting agent execution");

        let system_instruction = self.system_instruction(ctx.state())?;
        let declarations = self.tool_declarations();
        let config = self.request_config();
        let model = self.model.clone();
        let tools = self.tools.clone();
        let sub_agents = self.sub_agents.clone();
        let output_key = self.output_key;

        let s = stream! {
            // Each stage sees only the user's request, never earlier stages' text.
            let mut contents = vec![ctx.user_content().clone()];

            for iteration in 1..=MAX_ITERATIONS {
                let mut request = LlmRequest::new(model.name(), contents.clone());
                request.system_instruction = system_instruction.clone();
                request.config = config.clone();
                request.tools = declarations.clone();

                let mut response_stream =
                    match model.generate_content(request).instrument(span.clone()).await {
                        Ok(s) => s,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };

                let mut accumulated: Option<Content> = None;
                while let Some(chunk) = response_stream.next().await {
                    let chunk = match chunk {
                        Ok(c) => c,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };
                    if let Some(content) = chunk.content {
                        match accumulated.as_mut() {
                            Some(acc) => acc.parts.extend(content.parts),
                            None => accumulated = Some(content),
                        }
                    }
                    if chunk.turn_complete {
                        break;
                    }
                }

                let content = accumulated.unwrap_or_else(|| Content::new("model"));
                yield Ok(Event::new(&invocation_id).with_author(&agent_name).with_content(content.clone()));
                contents.push(content.clone());

                let calls: Vec<(String, Value)> = content
                    .function_calls()
                    .map(|(name, args)| (name.to_string(), args.clone()))
                    .collect();

                if calls.is_empty() {
                    if let Some(key) = output_key {
                        let value = match bind_output(key, &content.text()) {
                            Ok(v) => v,
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        };
                        if let Err(e) = ctx.state().write(|s| s.set_output(key, value.clone())) {
                            yield Err(e);
                            return;
                        }
                        info!(parent: &span, key = %key, value = %value, "output bound");
                        let mut state_event = Event::new(&invocation_id).with_author(&agent_name);
                        state_event.actions.state_delta.insert(key.as_str().to_string(), Value::String(value));
                        yield Ok(state_event);
                    }
                    return;
                }

                if let Some((_, args)) = calls.iter().find(|(name, _)| name == TRANSFER_TO_AGENT) {
                    let target = args.get("agent_name").and_then(Value::as_str).unwrap_or_default().to_string();
                    let Some(agent) = sub_agents.iter().find(|a| a.name() == target).cloned() else {
                        yield Err(GmapsError::Agent(format!(
                            "{}: cannot transfer to unknown agent '{}'", agent_name, target
                        )));
                        return;
                    };

                    info!(parent: &span, target = %target, "transferring to sub-agent");
                    let mut transfer_event = Event::new(&invocation_id).with_author(&agent_name);
                    transfer_event.actions.transfer_to_agent = Some(target);
                    yield Ok(transfer_event);

                    let mut sub_stream = match agent.run(ctx.clone()).await {
                        Ok(s) => s,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };
                    while let Some(event) = sub_stream.next().await {
                        let failed = event.is_err();
                        yield event;
                        if failed {
                            return;
                        }
                    }
                    return;
                }

                let mut responses = Content::new("user");
                for (name, args) in calls {
                    let result = match tools.iter().find(|t| t.name() == name) {
                        Some(tool) => {
                            let tool_ctx: Arc<dyn ToolContext> = Arc::new(AgentToolContext {
                                parent_ctx: ctx.clone(),
                                function_call_id: format!("{}_{}_{}", invocation_id, name, iteration),
                            });
                            debug!(parent: &span, tool = %name, args = %args, "executing tool");
                            match tool.execute(tool_ctx, args).instrument(span.clone()).await {
                                Ok(value) => as_response_object(value),
                                Err(e) => {
                                    warn!(parent: &span, tool = %name, error = %e, "tool failed");
                                    json!({ "error": e.to_string() })
                                }
                            }
                        }
                        None => json!({ "error": format!("unknown tool '{}'", name) }),
                    };
                    responses = responses.with_function_response(name, result);
                }
                yield Ok(Event::new(&invocation_id).with_author(&agent_name).with_content(responses.clone()));
                contents.push(responses);
            }

            yield Err(GmapsError::Agent(format!(
                "{}: max iterations ({}) exceeded", agent_name, MAX_ITERATIONS
            )));
        };

        Ok(Box::pin(s))
    }
}
