//! # gmaps-runner
//!
//! Turn runtime for the Google Maps agent tree.
//!
//! - [`Runner`] - owns the root agent and one conversation's session state
//! - [`InvocationContext`] - the per-turn context handed to every agent
//!
//! ```rust,no_run
//! use gmaps_runner::{Runner, RunnerConfig};
//! # fn root() -> std::sync::Arc<dyn gmaps_core::Agent> { unimplemented!() }
//!
//! let runner = Runner::new(RunnerConfig { app_name: "gmaps".to_string(), agent: root() });
//! // let events = runner.run("user", "강남역 근처 카페 알려줘").await?;
//! ```

mod context;
mod runner;

pub use context::InvocationContext;
pub use runner::{Runner, RunnerConfig};
