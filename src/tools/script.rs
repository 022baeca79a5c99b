//! Script tools - providers backed by subprocesses
//!
//! Each tool is a program invoked as `program args... '<parameters JSON>'`.
//! Combined stdout/stderr and the exit status become the step output.

use std::collections::BTreeMap;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::config::ScriptToolConfig;
use crate::core::{parameters_to_json, ActionResult, Parameters, Result, StrideError};
use crate::tools::registry::CapabilityRegistry;

/// Registry of script tools
pub struct ScriptRegistry {
    tools: BTreeMap<String, ScriptToolConfig>,
}

impl ScriptRegistry {
    /// Create a registry from script tool definitions
    pub fn new(tools: impl IntoIterator<Item = ScriptToolConfig>) -> Self {
        Self {
            tools: tools.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Spawn the tool and fold its output into one text block
    async fn run(tool: &ScriptToolConfig, parameters: &Parameters) -> std::io::Result<(String, bool)> {
        let payload = parameters_to_json(parameters);

        let output = Command::new(&tool.program)
            .args(&tool.args)
            .arg(&payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        let combined = if stderr.is_empty() {
            stdout
        } else {
            format!("{}\n[stderr]\n{}", stdout, stderr).trim().to_string()
        };
        let combined = if combined.is_empty() {
            "<no output>".to_string()
        } else {
            combined
        };

        let success = output.status.success();
        if success {
            Ok((combined, true))
        } else {
            let code = output.status.code().unwrap_or(-1);
            warn!(tool = %tool.name, exit_code = code, "Script exited with failure");
            Ok((format!("[exit code: {}]\n{}", code, combined), false))
        }
    }
}

#[async_trait]
impl CapabilityRegistry for ScriptRegistry {
    fn describe(&self) -> String {
        self.tools
            .values()
            .map(|tool| {
                let mut command = tool.program.clone();
                for arg in &tool.args {
                    command.push(' ');
                    command.push_str(arg);
                }
                format!(
                    "- {}: {} (action: run; command: {})",
                    tool.name, tool.description, command
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn execute(
        &self,
        provider: &str,
        action: &str,
        parameters: &Parameters,
    ) -> Result<ActionResult> {
        let tool = self
            .tools
            .get(provider)
            .ok_or_else(|| StrideError::UnknownProvider(provider.to_string()))?;

        debug!(tool = %provider, program = %tool.program, "Running script tool");

        match Self::run(tool, parameters).await {
            Ok((output, true)) => Ok(ActionResult::success(
                provider,
                action,
                parameters.clone(),
                output,
            )),
            Ok((output, false)) => Ok(ActionResult::failure(
                provider,
                action,
                parameters.clone(),
                output,
            )),
            Err(e) => Ok(ActionResult::failure(
                provider,
                action,
                parameters.clone(),
                format!("Error: failed to start '{}': {}", tool.program, e),
            )),
        }
    }

    fn kind(&self) -> &str {
        "scripts"
    }
}
