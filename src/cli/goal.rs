//! Goal input
//!
//! The goal comes from the command line or, failing that, from stdin.

use std::io::{self, BufRead, Write};

use crate::core::Result;

/// Ask the operator for a goal on stdin
pub fn prompt_for_goal() -> Result<String> {
    print!("Enter your goal: ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    read_goal(&mut stdin.lock())
}

/// Read a single goal line from `reader`
pub fn read_goal(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Pick the goal from the argument or the prompt; `None` if it ends up empty
pub fn resolve_goal(
    arg: Option<String>,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<Option<String>> {
    let goal = match arg {
        Some(goal) => goal,
        None => prompt()?,
    };
    let goal = goal.trim();

    Ok((!goal.is_empty()).then(|| goal.to_string()))
}
