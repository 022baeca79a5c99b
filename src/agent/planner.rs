//! Planner
//!
//! Asks the model for the next batch of steps and validates the reply
//! against the plan contract:
//!
//! ```json
//! {"steps": [{"summary": "...", "provider": "...", "action": "...", "parameters": {"key": "value"}}]}
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::agent::history::History;
use crate::core::{value_to_string, Message, Parameters, PlanStep, ProtocolError, Result};
use crate::llm::{CompletionProvider, GenerateOptions};

const COMPONENT: &str = "planner";

/// Keys accepted for the provider name, in lookup order
const PROVIDER_KEYS: [&str; 3] = ["provider", "server", "tool"];

/// Produces plans from the model
pub struct Planner {
    llm: Arc<dyn CompletionProvider>,
    system_prompt: String,
    temperature: f32,
}

impl Planner {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        system_prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            temperature,
        }
    }

    /// Ask the model for the next plan
    pub async fn create_plan(
        &self,
        goal: &str,
        history: &History,
        registry_description: &str,
    ) -> Result<Vec<PlanStep>> {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(Self::build_prompt(goal, history, registry_description)),
        ];

        let reply = self
            .llm
            .complete(&messages, &GenerateOptions::with_temperature(self.temperature))
            .await?;
        debug!(
            model = %reply.model,
            total_tokens = ?reply.usage.as_ref().map(|u| u.total_tokens),
            reply = %reply.content,
            "Planner reply"
        );

        let steps = Self::parse_plan(&reply.content)?;
        info!(steps = steps.len(), "Plan created");
        Ok(steps)
    }

    /// Build the user prompt for one planning request
    pub fn build_prompt(goal: &str, history: &History, registry_description: &str) -> String {
        format!(
            r#"Goal: {goal}

Steps executed so far:
{history}

Available providers:
{providers}

Plan the next steps toward the goal using only the providers listed above.
Every step must invoke a concrete action on one of those providers.
Respond with ONLY a JSON object in exactly this shape, with no other text:
{{
  "steps": [
    {{
      "summary": "what this step does",
      "provider": "provider name",
      "action": "action to invoke on the provider",
      "parameters": {{"key": "value"}}
    }}
  ]
}}
All parameter values must be strings. Propose at least one step."#,
            goal = goal,
            history = history.to_prompt(),
            providers = registry_description,
        )
    }

    /// Validate a raw reply into plan steps
    ///
    /// Errors carry an excerpt of `text`.
    pub fn parse_plan(text: &str) -> std::result::Result<Vec<PlanStep>, ProtocolError> {
        steps_from_reply(text).map_err(|e| e.with_reply(text))
    }
}

fn steps_from_reply(text: &str) -> std::result::Result<Vec<PlanStep>, ProtocolError> {
    let data = parse_json_reply(COMPONENT, text)?;

    let entries = match data.get("steps") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(ProtocolError::missing_steps()),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_step(index, entry))
        .collect()
}

/// Parse model output strictly as a single JSON document
pub(crate) fn parse_json_reply(
    component: &'static str,
    text: &str,
) -> std::result::Result<Value, ProtocolError> {
    serde_json::from_str(text.trim()).map_err(|e| ProtocolError::malformed(component, e.to_string()))
}

fn parse_step(index: usize, entry: &Value) -> std::result::Result<PlanStep, ProtocolError> {
    let object = entry
        .as_object()
        .ok_or_else(|| ProtocolError::invalid_step(index, "step must be an object"))?;

    let summary = required_text(index, object, &["summary"])?;
    let provider = required_text(index, object, &PROVIDER_KEYS)?;
    let action = required_text(index, object, &["action"])?;

    let parameters = match object.get("parameters") {
        None | Some(Value::Null) => Parameters::new(),
        Some(Value::Object(map)) => flat_parameters(index, map)?,
        Some(_) => {
            return Err(ProtocolError::invalid_step(
                index,
                "'parameters' must be an object",
            ))
        }
    };

    Ok(PlanStep {
        summary,
        provider,
        action,
        parameters,
    })
}

/// First present key among `keys`; must be a non-empty string
fn required_text(
    index: usize,
    object: &Map<String, Value>,
    keys: &[&str],
) -> std::result::Result<String, ProtocolError> {
    let found = keys.iter().find_map(|k| object.get(*k).map(|v| (*k, v)));

    match found {
        Some((_, Value::String(s))) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some((key, Value::String(_))) => {
            Err(ProtocolError::invalid_step(index, format!("'{}' is empty", key)))
        }
        Some((key, _)) => Err(ProtocolError::invalid_step(
            index,
            format!("'{}' must be a string", key),
        )),
        None => Err(ProtocolError::invalid_step(
            index,
            format!("missing '{}'", keys[0]),
        )),
    }
}

/// Coerce scalar values to strings; nested values are rejected
fn flat_parameters(
    index: usize,
    map: &Map<String, Value>,
) -> std::result::Result<Parameters, ProtocolError> {
    map.iter()
        .map(|(key, value)| match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                Ok((key.clone(), value_to_string(value)))
            }
            _ => Err(ProtocolError::invalid_step(
                index,
                format!("parameter '{}' must be a string, number or boolean", key),
            )),
        })
        .collect()
}
