//! Goal evaluation
//!
//! Asks the model whether the goal has been met. This is the only way a run
//! ends successfully.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::agent::history::History;
use crate::agent::planner::parse_json_reply;
use crate::core::{
    parameters_to_json, value_to_string, ActionResult, EvaluationResult, Message, ProtocolError,
    Result,
};
use crate::llm::{CompletionProvider, GenerateOptions};

const COMPONENT: &str = "evaluator";

/// Rendering used when an iteration produced no results.
pub const NO_LATEST_RESULTS: &str = "(No actions executed in this iteration.)";

/// Judges goal completion
pub struct Evaluator {
    llm: Arc<dyn CompletionProvider>,
    system_prompt: String,
    temperature: f32,
}

impl Evaluator {
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

    /// Ask the model whether `goal` is satisfied
    pub async fn assess_goal(
        &self,
        goal: &str,
        history: &History,
        latest_results: &[ActionResult],
    ) -> Result<EvaluationResult> {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(Self::build_prompt(goal, history, latest_results)),
        ];

        let reply = self
            .llm
            .complete(&messages, &GenerateOptions::with_temperature(self.temperature))
            .await?;
        debug!(
            model = %reply.model,
            total_tokens = ?reply.usage.as_ref().map(|u| u.total_tokens),
            reply = %reply.content,
            "Evaluator reply"
        );

        let verdict = Self::parse_verdict(&reply.content)?;
        info!(achieved = verdict.achieved, reason = %verdict.reason, "Evaluation");
        Ok(verdict)
    }

    /// Build the user prompt for one evaluation request
    pub fn build_prompt(goal: &str, history: &History, latest_results: &[ActionResult]) -> String {
        format!(
            r#"Goal: {goal}

Execution history:
{history}

Results from this iteration:
{latest}

Decide whether the goal has been achieved based on the information above.
Respond with ONLY a JSON object in exactly this shape, with no other text:
{{
  "goalAchieved": true or false,
  "reason": "why you reached this verdict"
}}"#,
            goal = goal,
            history = history.to_prompt(),
            latest = render_results(latest_results),
        )
    }

    /// Validate a raw reply into a verdict
    ///
    /// Errors carry an excerpt of `text`.
    pub fn parse_verdict(text: &str) -> std::result::Result<EvaluationResult, ProtocolError> {
        verdict_from_reply(text).map_err(|e| e.with_reply(text))
    }
}

fn verdict_from_reply(text: &str) -> std::result::Result<EvaluationResult, ProtocolError> {
    let data = parse_json_reply(COMPONENT, text)?;
    let object = data
        .as_object()
        .ok_or_else(|| ProtocolError::malformed(COMPONENT, "expected a JSON object"))?;

    let achieved = object
        .get("goalAchieved")
        .or_else(|| object.get("achieved"))
        .and_then(coerce_bool)
        .ok_or_else(|| ProtocolError::missing_field(COMPONENT, "goalAchieved"))?;

    let reason = match object.get("reason") {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => value_to_string(v),
        _ => return Err(ProtocolError::missing_field(COMPONENT, "reason")),
    };

    Ok(EvaluationResult { achieved, reason })
}

/// Render the latest results, blank-line separated
fn render_results(results: &[ActionResult]) -> String {
    if results.is_empty() {
        return NO_LATEST_RESULTS.to_string();
    }

    results
        .iter()
        .map(|r| {
            format!(
                "Provider: {}\nAction: {}\nParameters: {}\nStatus: {}\nOutput: {}",
                r.provider,
                r.action,
                parameters_to_json(&r.parameters),
                if r.success { "ok" } else { "failed" },
                r.output
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Interpret JSON booleans and their common spellings
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameters;
    use crate::llm::Completion;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedProvider {
        reply: String,
        temperatures: Mutex<Vec<Option<f32>>>,
    }

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerateOptions,
        ) -> Result<Completion> {
            self.temperatures.lock().unwrap().push(options.temperature);
            Ok(Completion::text(self.reply.clone()))
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[test]
    fn test_parse_verdict() {
        let verdict =
            Evaluator::parse_verdict(r#"{"goalAchieved": true, "reason": "file written"}"#)
                .unwrap();
        assert!(verdict.achieved);
        assert_eq!(verdict.reason, "file written");
    }

    #[test]
    fn test_boolean_coercion() {
        for (raw, expected) in [
            (r#""true""#, true),
            (r#""No""#, false),
            ("1", true),
            ("0", false),
            ("null", false),
        ] {
            let text = format!(r#"{{"goalAchieved": {}, "reason": "r"}}"#, raw);
            assert_eq!(Evaluator::parse_verdict(&text).unwrap().achieved, expected, "{}", raw);
        }
    }

    #[test]
    fn test_achieved_alias() {
        let verdict = Evaluator::parse_verdict(r#"{"achieved": true, "reason": "done"}"#).unwrap();
        assert!(verdict.achieved);
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert_eq!(
            Evaluator::parse_verdict(r#"{"reason": "??"}"#),
            Err(ProtocolError::MissingField {
                component: "evaluator",
                field: "goalAchieved",
                reply: r#"{"reason": "??"}"#.to_string(),
            })
        );
        assert!(matches!(
            Evaluator::parse_verdict(r#"{"goalAchieved": false}"#),
            Err(ProtocolError::MissingField { field: "reason", .. })
        ));
        assert!(Evaluator::parse_verdict(r#"{"goalAchieved": "maybe", "reason": "r"}"#).is_err());
    }

    #[test]
    fn test_malformed_rejected() {
        let err = Evaluator::parse_verdict("yes, it is done").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedResponse { component: "evaluator", .. }
        ));
        assert!(err.to_string().contains("yes, it is done"));
        assert!(matches!(
            Evaluator::parse_verdict("[true]"),
            Err(ProtocolError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_prompt_with_no_results() {
        let prompt = Evaluator::build_prompt("g", &History::new(), &[]);
        assert!(prompt.contains(NO_LATEST_RESULTS));
        assert!(prompt.contains("goalAchieved"));
    }

    #[test]
    fn test_prompt_renders_results() {
        let mut params = Parameters::new();
        params.insert("path".into(), "a.txt".into());
        let results = vec![
            ActionResult::success("fs", "read_file", params, "hello"),
            ActionResult::failure("ftp", "get", Parameters::new(), "Error: unknown provider"),
        ];
        let prompt = Evaluator::build_prompt("g", &History::new(), &results);
        assert!(prompt.contains("Provider: fs\nAction: read_file\nParameters: {\"path\":\"a.txt\"}"));
        assert!(prompt.contains("Status: failed"));
        assert!(prompt.contains("Output: hello\n\nProvider: ftp"));
    }

    #[tokio::test]
    async fn test_assess_goal_uses_configured_temperature() {
        let provider = Arc::new(CannedProvider {
            reply: r#"{"goalAchieved": false, "reason": "not yet"}"#.to_string(),
            temperatures: Mutex::new(Vec::new()),
        });
        let evaluator = Evaluator::new(provider.clone(), "SYSTEM", 0.0);
        let verdict = evaluator
            .assess_goal("g", &History::new(), &[])
            .await
            .unwrap();
        assert!(!verdict.achieved);
        assert_eq!(*provider.temperatures.lock().unwrap(), vec![Some(0.0)]);
    }
}
