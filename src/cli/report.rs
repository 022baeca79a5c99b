//! Run reporting
//!
//! Turns a finished run into the text shown to the operator.

use crate::agent::RunOutcome;

/// Operator-facing summary of a run
pub fn render_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Achieved {
            iteration, reason, ..
        } => format!(
            "✅ Goal achieved (iteration {}).\nReason: {}",
            iteration, reason
        ),
        RunOutcome::Exhausted {
            iterations,
            last_reason,
            ..
        } => {
            let mut output = format!(
                "⚠️  Goal not achieved after {} iteration(s). Further instructions may be needed.\n",
                iterations
            );
            if !last_reason.is_empty() {
                output.push_str(&format!("Last evaluation: {}\n", last_reason));
            }
            output.push_str("Final execution history:\n");
            output.push_str(&outcome.transcript());
            output
        }
    }
}
