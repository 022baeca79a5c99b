//! Agent orchestrator
//!
//! Drives the loop: Plan → Execute → Record → Evaluate, until the evaluator
//! accepts the goal or the iteration budget runs out.

use std::sync::Arc;

use tracing::{info, warn};

use crate::agent::evaluator::Evaluator;
use crate::agent::executor::Executor;
use crate::agent::history::History;
use crate::agent::loop_state::{LoopPhase, LoopState};
use crate::agent::planner::Planner;
use crate::core::{Config, Result, StepErrorPolicy, StrideError};
use crate::llm::CompletionProvider;
use crate::tools::CapabilityRegistry;

/// How a completed run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The evaluator judged the goal satisfied
    Achieved {
        /// Iteration in which the goal was met
        iteration: usize,
        /// Evaluator's justification
        reason: String,
        history: History,
    },
    /// Every iteration ran without satisfying the goal
    Exhausted {
        iterations: usize,
        /// Last evaluator justification, if any
        last_reason: String,
        history: History,
    },
}

impl RunOutcome {
    pub fn is_achieved(&self) -> bool {
        matches!(self, RunOutcome::Achieved { .. })
    }

    pub fn history(&self) -> &History {
        match self {
            RunOutcome::Achieved { history, .. } | RunOutcome::Exhausted { history, .. } => history,
        }
    }

    /// Full rendering of every executed step
    pub fn transcript(&self) -> String {
        self.history().to_prompt()
    }
}

/// Main agent that ties planner, executor, and evaluator together
pub struct Agent {
    planner: Planner,
    executor: Executor,
    evaluator: Evaluator,
    max_iterations: usize,
}

impl Agent {
    /// Assemble an agent from its parts
    pub fn new(
        planner: Planner,
        executor: Executor,
        evaluator: Evaluator,
        max_iterations: usize,
    ) -> Result<Self> {
        if max_iterations == 0 {
            return Err(StrideError::config("max_iterations must be at least 1"));
        }

        Ok(Self {
            planner,
            executor,
            evaluator,
            max_iterations,
        })
    }

    /// Build an agent from configuration and already-created collaborators
    pub fn from_config(
        config: &Config,
        llm: Arc<dyn CompletionProvider>,
        registry: Arc<dyn CapabilityRegistry>,
        system_prompt: &str,
    ) -> Result<Self> {
        let planner = Planner::new(llm.clone(), system_prompt, config.model.planner_temperature);
        let evaluator = Evaluator::new(llm, system_prompt, config.model.evaluator_temperature);
        let executor = Executor::new(registry, config.agent.on_step_error);
        Self::new(planner, executor, evaluator, config.agent.max_iterations)
    }

    /// Convenience constructor with the default step error policy
    pub fn with_defaults(
        llm: Arc<dyn CompletionProvider>,
        registry: Arc<dyn CapabilityRegistry>,
        system_prompt: &str,
        max_iterations: usize,
    ) -> Result<Self> {
        let mut config = Config::default();
        config.agent.max_iterations = max_iterations;
        config.agent.on_step_error = StepErrorPolicy::Record;
        Self::from_config(&config, llm, registry, system_prompt)
    }

    /// Run the loop for `goal`
    ///
    /// Planner and evaluator protocol errors end the run immediately; running
    /// out of iterations is a normal outcome.
    pub async fn run(&self, goal: &str) -> Result<RunOutcome> {
        let mut history = History::new();
        let mut state = LoopState::new(self.max_iterations);
        let registry_description = self.executor.registry().describe();
        let mut last_reason = String::new();

        info!(
            max_iterations = state.max_iterations,
            backend = self.executor.registry().kind(),
            "Starting agent loop"
        );

        while !state.is_done() {
            let iteration = state.iteration;
            info!(iteration, max = state.max_iterations, "Planning");

            let steps = self
                .planner
                .create_plan(goal, &history, &registry_description)
                .await?;

            state.enter(LoopPhase::Executing);
            let pairs = self.executor.execute_plan(steps).await?;

            state.enter(LoopPhase::Recording);
            let mut latest_results = Vec::with_capacity(pairs.len());
            for (step, result) in pairs {
                history.record(iteration, &step, &result);
                latest_results.push(result);
            }

            state.enter(LoopPhase::Evaluating);
            let verdict = self
                .evaluator
                .assess_goal(goal, &history, &latest_results)
                .await?;

            if verdict.achieved {
                state.enter(LoopPhase::Achieved);
                info!(iteration, steps = history.len(), "Goal achieved");
                return Ok(RunOutcome::Achieved {
                    iteration,
                    reason: verdict.reason,
                    history,
                });
            }

            last_reason = verdict.reason;
            state.advance();
        }

        warn!(
            iterations = state.iteration,
            steps = history.len(),
            "Iteration budget exhausted"
        );
        Ok(RunOutcome::Exhausted {
            iterations: state.iteration,
            last_reason,
            history,
        })
    }
}
