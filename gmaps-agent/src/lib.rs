mod llm_agent;
mod output;
pub mod workflow;

pub use llm_agent::{LlmAgent, LlmAgentBuilder, MAX_ITERATIONS, TRANSFER_TO_AGENT};
pub use output::bind_output;
pub use workflow::SequentialAgent;
