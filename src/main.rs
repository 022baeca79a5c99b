//! Stride - goal-directed agent loop
//!
//! Main entry point for the CLI application.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stride::cli::{exit_code, prompt_for_goal, run_session, Backends};
use stride::core::{BackendKind, ProviderType, StepErrorPolicy};
use stride::Config;

/// Stride - plan, execute and evaluate until a goal is met
#[derive(Parser, Debug)]
#[command(name = "stride")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Goal for the agent (prompted for when omitted)
    goal: Option<String>,

    /// Path to the system prompt file
    #[arg(long)]
    system_prompt: Option<PathBuf>,

    /// Path to the server registry JSON
    #[arg(long)]
    mcp_config: Option<PathBuf>,

    /// Model identifier
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Completion backend (ollama, openai)
    #[arg(long)]
    provider: Option<ProviderType>,

    /// Capability backend (servers, scripts)
    #[arg(long)]
    backend: Option<BackendKind>,

    /// What to do when a step names an unknown provider (record, abort)
    #[arg(long)]
    on_step_error: Option<StepErrorPolicy>,

    /// Maximum loop iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(ref path) = self.system_prompt {
            config.agent.system_prompt_path = path.clone();
        }
        if let Some(ref path) = self.mcp_config {
            config.agent.servers_path = path.clone();
        }
        if let Some(ref model) = self.model {
            config.model.name = model.clone();
        }
        if let Some(provider) = self.provider {
            config.llm.provider = provider;
        }
        if let Some(backend) = self.backend {
            config.agent.backend = backend;
        }
        if let Some(policy) = self.on_step_error {
            config.agent.on_step_error = policy;
        }
        if let Some(max) = self.max_iterations {
            config.agent.max_iterations = max;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let result = run_session(
        args.goal.clone(),
        prompt_for_goal,
        || {
            let mut config = Config::load()?;
            args.apply(&mut config);
            Ok(config)
        },
        Backends::from_config,
        &mut io::stdout(),
    )
    .await;

    if let Err(e) = &result {
        eprintln!("❌ {}", e);
    }
    ExitCode::from(exit_code(&result))
}
