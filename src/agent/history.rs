//! Execution history
//!
//! Append-only record of every executed step, rendered into prompts.

use crate::core::{parameters_to_json, ActionResult, PlanStep};

/// Rendering used when nothing has run yet.
pub const EMPTY_HISTORY: &str = "(No previous steps executed.)";

/// One executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Loop iteration that produced the step (1-based)
    pub iteration: usize,
    /// Planner summary of the step
    pub plan_summary: String,
    /// Provider the step ran against
    pub provider: String,
    /// Action invoked
    pub action: String,
    /// Parameters, stringified
    pub parameters: String,
    /// Output, stringified
    pub result: String,
}

impl StepRecord {
    fn render(&self) -> String {
        format!(
            "Iteration: {}\nPlan summary: {}\nProvider: {}\nAction: {}\nParameters: {}\nResult: {}",
            self.iteration,
            self.plan_summary,
            self.provider,
            self.action,
            self.parameters,
            self.result
        )
    }
}

/// Ordered log of executed steps for one run
#[derive(Debug, Clone, Default)]
pub struct History {
    steps: Vec<StepRecord>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn add_step(
        &mut self,
        iteration: usize,
        plan_summary: impl Into<String>,
        provider: impl Into<String>,
        action: impl Into<String>,
        parameters: impl Into<String>,
        result: impl Into<String>,
    ) {
        self.steps.push(StepRecord {
            iteration,
            plan_summary: plan_summary.into(),
            provider: provider.into(),
            action: action.into(),
            parameters: parameters.into(),
            result: result.into(),
        });
    }

    /// Append the outcome of an executed plan step
    pub fn record(&mut self, iteration: usize, step: &PlanStep, result: &ActionResult) {
        self.add_step(
            iteration,
            step.summary.as_str(),
            step.provider.as_str(),
            step.action.as_str(),
            parameters_to_json(&step.parameters),
            result.output.as_str(),
        );
    }

    /// Render every record in insertion order, blank-line separated
    pub fn to_prompt(&self) -> String {
        if self.steps.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        self.steps
            .iter()
            .map(StepRecord::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameters;

    #[test]
    fn test_empty_history_sentinel() {
        let history = History::new();
        assert_eq!(history.to_prompt(), EMPTY_HISTORY);
        assert!(!history.to_prompt().is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_rendering_preserves_order() {
        let mut history = History::new();
        history.add_step(1, "list files", "filesystem", "list_directory", "{}", "a.txt");
        history.add_step(1, "read file", "filesystem", "read_file", r#"{"path":"a.txt"}"#, "hello");
        history.add_step(2, "search web", "brave-search", "search", r#"{"q":"rust"}"#, "results");

        let text = history.to_prompt();
        let first = text.find("list files").unwrap();
        let second = text.find("read file").unwrap();
        let third = text.find("search web").unwrap();
        assert!(first < second && second < third);
        assert_eq!(text.matches("Iteration: ").count(), 3);
        assert_eq!(text.split("\n\n").count(), 3);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut history = History::new();
        history.add_step(1, "s", "p", "a", "{}", "r");
        let once = history.to_prompt();
        let twice = history.to_prompt();
        assert_eq!(once, twice);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_block_layout() {
        let mut history = History::new();
        history.add_step(4, "write notes", "filesystem", "write_file", "{}", "ok");
        assert_eq!(
            history.to_prompt(),
            "Iteration: 4\nPlan summary: write notes\nProvider: filesystem\nAction: write_file\nParameters: {}\nResult: ok"
        );
    }

    #[test]
    fn test_record_from_step_and_result() {
        let mut params = Parameters::new();
        params.insert("q".into(), "weather".into());
        let step = PlanStep::new("look it up", "brave-search", "search", params.clone());
        let result = ActionResult::success("brave-search", "search", params, "sunny");

        let mut history = History::new();
        history.record(2, &step, &result);

        let record = history.iter().next().unwrap();
        assert_eq!(record.iteration, 2);
        assert_eq!(record.parameters, r#"{"q":"weather"}"#);
        assert_eq!(record.result, "sunny");
    }
}
