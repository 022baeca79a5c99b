//! Stride - goal-directed agent loop
//!
//! Repeatedly asks a language model for a structured action plan, executes
//! it against named capability providers, records the outcomes, and asks the
//! model whether the goal has been met.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Completion transport abstraction with Ollama and OpenAI backends
//! - **Tools**: Capability registries (simulated servers, script tools)
//! - **Agent**: History, planner, executor, evaluator, and the loop itself
//! - **CLI**: Goal input, run reporting, and the session that maps a run to an exit code
//!
//! # Usage
//!
//! ```rust,no_run
//! use stride::{create_provider, create_registry, load_system_prompt, Agent, Config};
//!
//! #[tokio::main]
//! async fn main() -> stride::Result<()> {
//!     let config = Config::load()?;
//!     let system_prompt = load_system_prompt(&config.agent.system_prompt_path)?;
//!     let registry = create_registry(&config)?;
//!     let llm = create_provider(&config)?;
//!
//!     let agent = Agent::from_config(&config, llm, registry, &system_prompt)?;
//!     let outcome = agent.run("List the files in /tmp").await?;
//!     println!("{}", stride::cli::render_outcome(&outcome));
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, History, RunOutcome};
pub use core::{load_server_definitions, load_system_prompt, Config, Result, StrideError};
pub use llm::create_provider;
pub use tools::create_registry;
