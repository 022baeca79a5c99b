//! Plan executor
//!
//! Runs plan steps against the capability registry, strictly in plan order.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{ActionResult, PlanStep, Result, StepErrorPolicy};
use crate::tools::CapabilityRegistry;

/// Executes plans one step at a time
pub struct Executor {
    registry: Arc<dyn CapabilityRegistry>,
    policy: StepErrorPolicy,
}

impl Executor {
    pub fn new(registry: Arc<dyn CapabilityRegistry>, policy: StepErrorPolicy) -> Self {
        Self { registry, policy }
    }

    /// The registry steps are routed through
    pub fn registry(&self) -> &dyn CapabilityRegistry {
        self.registry.as_ref()
    }

    /// Execute each step in order, pairing it with its result
    ///
    /// Under `StepErrorPolicy::Abort` the first registry error ends the plan
    /// and is returned; otherwise it is recorded as a failed result.
    pub async fn execute_plan(&self, steps: Vec<PlanStep>) -> Result<Vec<(PlanStep, ActionResult)>> {
        let mut results = Vec::with_capacity(steps.len());

        for step in steps {
            info!(
                provider = %step.provider,
                action = %step.action,
                "Executing step"
            );

            let result = match self
                .registry
                .execute(&step.provider, &step.action, &step.parameters)
                .await
            {
                Ok(result) => result,
                Err(e) if self.policy == StepErrorPolicy::Record => {
                    warn!(provider = %step.provider, error = %e, "Step could not be routed");
                    ActionResult::failure(
                        step.provider.as_str(),
                        step.action.as_str(),
                        step.parameters.clone(),
                        format!("Error: {}", e),
                    )
                }
                Err(e) => return Err(e),
            };

            results.push((step, result));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Parameters, StrideError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Registry that knows a fixed set of providers and logs every call
    struct LoggingRegistry {
        known: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl LoggingRegistry {
        fn new(known: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                known,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CapabilityRegistry for LoggingRegistry {
        fn describe(&self) -> String {
            self.known.join(",")
        }

        async fn execute(
            &self,
            provider: &str,
            action: &str,
            parameters: &Parameters,
        ) -> Result<ActionResult> {
            self.calls.lock().unwrap().push(format!("{}.{}", provider, action));
            if !self.known.contains(&provider) {
                return Err(StrideError::UnknownProvider(provider.to_string()));
            }
            Ok(ActionResult::success(
                provider,
                action,
                parameters.clone(),
                format!("{} done", action),
            ))
        }

        fn kind(&self) -> &str {
            "logging"
        }
    }

    fn three_step_plan() -> Vec<PlanStep> {
        vec![
            PlanStep::new("one", "fs", "first", Parameters::new()),
            PlanStep::new("two", "ghost", "second", Parameters::new()),
            PlanStep::new("three", "fs", "third", Parameters::new()),
        ]
    }

    #[tokio::test]
    async fn test_abort_stops_at_unknown_provider() {
        let registry = LoggingRegistry::new(vec!["fs"]);
        let executor = Executor::new(registry.clone(), StepErrorPolicy::Abort);

        let err = executor.execute_plan(three_step_plan()).await.unwrap_err();
        assert!(matches!(err, StrideError::UnknownProvider(ref p) if p == "ghost"));
        assert_eq!(
            *registry.calls.lock().unwrap(),
            vec!["fs.first".to_string(), "ghost.second".to_string()]
        );
    }

    #[tokio::test]
    async fn test_record_attempts_every_step() {
        let registry = LoggingRegistry::new(vec!["fs"]);
        let executor = Executor::new(registry.clone(), StepErrorPolicy::Record);

        let pairs = executor.execute_plan(three_step_plan()).await.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(registry.calls.lock().unwrap().len(), 3);

        assert!(pairs[0].1.success);
        assert!(!pairs[1].1.success);
        assert!(pairs[1].1.output.contains("Unknown provider: ghost"));
        assert!(pairs[2].1.success);
        assert_eq!(pairs[2].0.summary, "three");
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let registry = LoggingRegistry::new(vec![]);
        let executor = Executor::new(registry, StepErrorPolicy::Abort);
        assert!(executor.execute_plan(Vec::new()).await.unwrap().is_empty());
        assert_eq!(executor.registry().kind(), "logging");
    }
}
