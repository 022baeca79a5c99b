//! Agent loop state management
//!
//! Tracks the iteration budget and the phase of the plan/execute/evaluate loop.

use std::fmt;

/// Phase of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Planning,
    Executing,
    Recording,
    Evaluating,
    /// Terminal: the evaluator accepted the goal
    Achieved,
    /// Terminal: the iteration budget ran out
    Exhausted,
}

impl LoopPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopPhase::Achieved | LoopPhase::Exhausted)
    }
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopPhase::Planning => "planning",
            LoopPhase::Executing => "executing",
            LoopPhase::Recording => "recording",
            LoopPhase::Evaluating => "evaluating",
            LoopPhase::Achieved => "achieved",
            LoopPhase::Exhausted => "exhausted",
        };
        write!(f, "{}", name)
    }
}

/// State of the agent loop
#[derive(Debug, Clone)]
pub struct LoopState {
    /// Current iteration (1-based)
    pub iteration: usize,
    /// Maximum allowed iterations
    pub max_iterations: usize,
    /// Current phase
    pub phase: LoopPhase,
}

impl LoopState {
    /// Create a new loop state with the given budget
    pub fn new(max_iterations: usize) -> Self {
        Self {
            iteration: 1,
            max_iterations,
            phase: LoopPhase::Planning,
        }
    }

    /// Move to another phase of the current iteration
    pub fn enter(&mut self, phase: LoopPhase) {
        self.phase = phase;
    }

    /// Close the current iteration without success.
    ///
    /// Starts the next iteration in `Planning` if budget remains, otherwise
    /// ends in `Exhausted`. The counter never passes `max_iterations`.
    pub fn advance(&mut self) -> LoopPhase {
        if self.iteration >= self.max_iterations {
            self.phase = LoopPhase::Exhausted;
        } else {
            self.iteration += 1;
            self.phase = LoopPhase::Planning;
        }
        self.phase
    }

    /// Whether the loop has reached a terminal phase
    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_state_new() {
        let state = LoopState::new(10);
        assert_eq!(state.iteration, 1);
        assert_eq!(state.max_iterations, 10);
        assert_eq!(state.phase, LoopPhase::Planning);
        assert!(!state.is_done());
    }

    #[test]
    fn test_advance_until_exhausted() {
        let mut state = LoopState::new(2);
        assert_eq!(state.advance(), LoopPhase::Planning);
        assert_eq!(state.iteration, 2);

        assert_eq!(state.advance(), LoopPhase::Exhausted);
        assert_eq!(state.iteration, 2);
        assert!(state.is_done());
    }

    #[test]
    fn test_achieved_is_terminal() {
        let mut state = LoopState::new(3);
        state.enter(LoopPhase::Evaluating);
        assert!(!state.is_done());
        state.enter(LoopPhase::Achieved);
        assert!(state.is_done());
        assert_eq!(state.phase.to_string(), "achieved");
    }
}
