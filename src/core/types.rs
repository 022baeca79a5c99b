//! Shared types used across Stride modules
//!
//! Contains message structures, plan steps, and action results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Step parameters. Ordered so rendering is deterministic.
pub type Parameters = BTreeMap<String, String>;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

/// A message sent to the completion transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// One action proposed by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    /// What the step is meant to accomplish
    pub summary: String,
    /// Name of the capability provider to invoke
    pub provider: String,
    /// Operation name on that provider
    pub action: String,
    /// String arguments for the action
    pub parameters: Parameters,
}

impl PlanStep {
    pub fn new(
        summary: impl Into<String>,
        provider: impl Into<String>,
        action: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        Self {
            summary: summary.into(),
            provider: provider.into(),
            action: action.into(),
            parameters,
        }
    }
}

/// Outcome of executing one plan step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Provider that handled the step
    pub provider: String,
    /// Action that was invoked
    pub action: String,
    /// Parameters echoed back from the step
    pub parameters: Parameters,
    /// Provider-defined output text
    pub output: String,
    /// False when the step could not be routed or the provider reported failure
    pub success: bool,
}

impl ActionResult {
    /// Create a successful result
    pub fn success(
        provider: impl Into<String>,
        action: impl Into<String>,
        parameters: Parameters,
        output: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            action: action.into(),
            parameters,
            output: output.into(),
            success: true,
        }
    }

    /// Create a failed result
    pub fn failure(
        provider: impl Into<String>,
        action: impl Into<String>,
        parameters: Parameters,
        error: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            action: action.into(),
            parameters,
            output: error.into(),
            success: false,
        }
    }
}

/// Verdict returned by the evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Whether the goal is satisfied
    pub achieved: bool,
    /// The model's justification
    pub reason: String,
}

/// Render parameters as a compact JSON object.
pub fn parameters_to_json(parameters: &Parameters) -> String {
    serde_json::to_string(parameters).unwrap_or_else(|_| String::from("{}"))
}

/// Stringify a JSON scalar without surrounding quotes
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
