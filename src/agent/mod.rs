//! Agent module - the plan/execute/evaluate loop
//!
//! Contains the history model, the planner and evaluator that talk to the
//! model, the executor, and the orchestrator that ties them together.

pub mod evaluator;
pub mod executor;
pub mod history;
pub mod loop_state;
pub mod orchestrator;
pub mod planner;

pub use evaluator::Evaluator;
pub use executor::Executor;
pub use history::{History, StepRecord};
pub use loop_state::{LoopPhase, LoopState};
pub use orchestrator::{Agent, RunOutcome};
pub use planner::Planner;
