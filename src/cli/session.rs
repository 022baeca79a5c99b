//! One invocation of the binary
//!
//! Resolves the goal, loads configuration and run inputs, drives the agent
//! and maps the result to a process exit status.

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use crate::agent::{Agent, RunOutcome};
use crate::cli::goal::resolve_goal;
use crate::cli::report::render_outcome;
use crate::core::{load_system_prompt, Config, Result};
use crate::llm::{create_provider, CompletionProvider};
use crate::tools::{create_registry, CapabilityRegistry};

/// Completion transport and capability backend for one run
pub struct Backends {
    pub llm: Arc<dyn CompletionProvider>,
    pub registry: Arc<dyn CapabilityRegistry>,
}

impl Backends {
    /// Build both backends from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            registry: create_registry(config)?,
            llm: create_provider(config)?,
        })
    }
}

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Achieved,
    Exhausted,
    /// No goal was given, so nothing ran
    NoGoal,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Achieved | Exit::Exhausted => 0,
            Exit::NoGoal => 1,
        }
    }
}

impl From<&RunOutcome> for Exit {
    fn from(outcome: &RunOutcome) -> Self {
        if outcome.is_achieved() {
            Exit::Achieved
        } else {
            Exit::Exhausted
        }
    }
}

/// Process exit code for a finished session. Any error is a failure.
pub fn exit_code<E>(result: &std::result::Result<Exit, E>) -> u8 {
    match result {
        Ok(exit) => exit.code(),
        Err(_) => 1,
    }
}

/// Run one goal end to end, writing the report to `out`
///
/// Configuration is loaded only once a goal is known.
pub async fn run_session<W: Write>(
    goal: Option<String>,
    prompt: impl FnOnce() -> Result<String>,
    load_config: impl FnOnce() -> Result<Config>,
    connect: impl FnOnce(&Config) -> Result<Backends>,
    out: &mut W,
) -> Result<Exit> {
    let Some(goal) = resolve_goal(goal, prompt)? else {
        eprintln!("No goal was provided. Exiting.");
        return Ok(Exit::NoGoal);
    };

    let config = load_config()?;
    config.validate()?;

    let system_prompt = load_system_prompt(&config.agent.system_prompt_path)?;
    let backends = connect(&config)?;
    info!(
        provider = backends.llm.name(),
        backend = backends.registry.kind(),
        "Backends ready"
    );

    let agent = Agent::from_config(&config, backends.llm, backends.registry, &system_prompt)?;
    let outcome = agent.run(&goal).await?;

    writeln!(out, "{}", render_outcome(&outcome))?;
    Ok(Exit::from(&outcome))
}
