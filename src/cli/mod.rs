//! CLI module - command-line interface helpers
//!
//! Goal input, run reporting and the session that ties them to the agent
//! for the `stride` binary.

pub mod goal;
pub mod report;
pub mod session;

pub use goal::{prompt_for_goal, resolve_goal};
pub use report::render_outcome;
pub use session::{exit_code, run_session, Backends, Exit};
