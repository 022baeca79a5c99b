//! Configuration management for Stride
//!
//! Supports environment variables, config files, and runtime overrides.
//! Also loads the two run inputs: the system prompt and the server registry.
//!
//! Config file location: ~/.config/stride/config.toml

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{Result, StrideError};
use crate::core::types::value_to_string;

/// Main configuration for Stride
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion transport configuration
    pub llm: LlmConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Agent loop configuration
    pub agent: AgentConfig,
    /// Script tools for the `scripts` backend
    pub scripts: Vec<ScriptToolConfig>,
}

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Ollama,
    OpenAi,
}

/// Which capability backend executes plan steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Named servers from the registry file
    Servers,
    /// Script tools spawned as subprocesses
    Scripts,
}

/// What the executor does when the registry rejects a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepErrorPolicy {
    /// Record a failed result and keep going
    Record,
    /// Stop the plan and fail the run
    Abort,
}

/// Completion transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend type
    pub provider: ProviderType,
    /// Base URL override; each provider has its own default
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier sent to the backend
    /// Default: gpt-4.1-mini
    pub name: String,
    /// Sampling temperature for plan generation
    pub planner_temperature: f32,
    /// Sampling temperature for goal evaluation
    pub evaluator_temperature: f32,
}

/// Agent loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum plan/execute/evaluate iterations
    /// Default: 10
    pub max_iterations: usize,
    /// Path to the system prompt text
    pub system_prompt_path: PathBuf,
    /// Path to the server registry JSON
    pub servers_path: PathBuf,
    /// Capability backend
    pub backend: BackendKind,
    /// Policy for steps the registry cannot route
    pub on_step_error: StepErrorPolicy,
}

/// A script tool definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptToolConfig {
    /// Tool name used as the provider name in plans
    pub name: String,
    /// What the tool does, shown to the model
    pub description: String,
    /// Program to spawn
    pub program: String,
    /// Leading arguments; the JSON parameters are appended last
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: env::var("STRIDE_PROVIDER")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(ProviderType::OpenAi),
            base_url: env::var("STRIDE_BASE_URL").ok(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("STRIDE_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string()),
            planner_temperature: 0.2,
            evaluator_temperature: 0.0,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: env::var("STRIDE_MAX_ITERATIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
            system_prompt_path: PathBuf::from("config/system_prompt.txt"),
            servers_path: PathBuf::from("mcp_servers.json"),
            backend: BackendKind::Servers,
            on_step_error: StepErrorPolicy::Record,
        }
    }
}

impl LlmConfig {
    /// Base URL for the configured provider
    pub fn base_url(&self) -> String {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, ProviderType::Ollama) => "http://localhost:11434".to_string(),
            (None, ProviderType::OpenAi) => "https://api.openai.com".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stride")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let path = Self::config_file();
        if path.exists() {
            return Self::load_from_path(&path);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StrideError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            StrideError::config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Check settings that would make the loop meaningless
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(StrideError::config("agent.max_iterations must be at least 1"));
        }

        if self.agent.backend == BackendKind::Scripts && self.scripts.is_empty() {
            return Err(StrideError::config(
                "The scripts backend needs at least one [[scripts]] entry",
            ));
        }

        for script in &self.scripts {
            if script.name.trim().is_empty() || script.program.trim().is_empty() {
                return Err(StrideError::config(format!(
                    "Script tool '{}' needs a name and a program",
                    script.name
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown provider '{}' (expected ollama or openai)", other)),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Ollama => write!(f, "ollama"),
            ProviderType::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "servers" => Ok(Self::Servers),
            "scripts" => Ok(Self::Scripts),
            other => Err(format!("unknown backend '{}' (expected servers or scripts)", other)),
        }
    }
}

impl FromStr for StepErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown step error policy '{}' (expected record or abort)", other)),
        }
    }
}

/// How to launch one registered server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDefinition {
    /// Unique server name
    pub name: String,
    /// Launch command
    pub command: String,
    /// Command arguments
    pub args: Vec<String>,
    /// Extra environment variables
    pub env: BTreeMap<String, String>,
}

/// Load the system prompt used for every completion request
pub fn load_system_prompt(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(StrideError::config(format!(
            "System prompt file not found: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path).map_err(|e| {
        StrideError::config(format!("Failed to read system prompt {}: {}", path.display(), e))
    })?;

    Ok(text.trim().to_string())
}

/// Load server definitions from a JSON file with a top-level `mcpServers` object
pub fn load_server_definitions(path: &Path) -> Result<BTreeMap<String, ServerDefinition>> {
    if !path.exists() {
        return Err(StrideError::config(format!(
            "Server configuration not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        StrideError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_server_definitions(&content)
}

/// Parse and validate the server registry document
pub fn parse_server_definitions(content: &str) -> Result<BTreeMap<String, ServerDefinition>> {
    let data: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| StrideError::config(format!("Server configuration is not valid JSON: {}", e)))?;

    let servers = data
        .get("mcpServers")
        .and_then(|v| v.as_object())
        .ok_or_else(|| {
            StrideError::config("Invalid server configuration: 'mcpServers' missing or not an object")
        })?;

    let mut registry = BTreeMap::new();
    for (name, definition) in servers {
        let definition = definition
            .as_object()
            .ok_or_else(|| StrideError::config(format!("Invalid server definition for '{}'", name)))?;

        let command = definition
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| StrideError::config(format!("Server '{}' is missing a command", name)))?;

        let args = match definition.get("args") {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.iter().map(value_to_string).collect(),
            Some(_) => {
                return Err(StrideError::config(format!("Server '{}' has invalid args", name)));
            }
        };

        let env = match definition.get("env") {
            None => BTreeMap::new(),
            Some(serde_json::Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_string(v)))
                .collect(),
            Some(_) => {
                return Err(StrideError::config(format!("Server '{}' has invalid env", name)));
            }
        };

        registry.insert(
            name.clone(),
            ServerDefinition {
                name: name.clone(),
                command: command.to_string(),
                args,
                env,
            },
        );
    }

    Ok(registry)
}
