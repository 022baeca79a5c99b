//! Capability registry - routes plan steps to named providers
//!
//! `CapabilityRegistry` is the seam the executor talks to. `ServerRegistry`
//! is the backend built from the server registry file; each server is backed
//! by an `ActionHandler`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::{ActionResult, Parameters, Result, ServerDefinition, StrideError};
use crate::tools::simulated::SimulatedServer;

/// A set of named providers the loop can execute actions against
#[async_trait]
pub trait CapabilityRegistry: Send + Sync {
    /// Deterministic, prompt-ready description of every provider
    fn describe(&self) -> String;

    /// Run `action` on `provider`. Fails only when the provider is unknown.
    async fn execute(
        &self,
        provider: &str,
        action: &str,
        parameters: &Parameters,
    ) -> Result<ActionResult>;

    /// Short backend label for logs
    fn kind(&self) -> &str;
}

/// Something that can carry out actions for one server
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Names of the actions this handler understands
    fn actions(&self) -> Vec<String>;

    /// Perform the action and return its textual output
    async fn handle(&self, action: &str, parameters: &Parameters) -> Result<String>;
}

struct ServerEntry {
    definition: ServerDefinition,
    handler: Arc<dyn ActionHandler>,
}

/// Registry of servers loaded from the registry file
pub struct ServerRegistry {
    servers: BTreeMap<String, ServerEntry>,
}

impl ServerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            servers: BTreeMap::new(),
        }
    }

    /// Create a registry where every server is simulated
    pub fn from_definitions(definitions: BTreeMap<String, ServerDefinition>) -> Self {
        let mut registry = Self::new();
        for (_, definition) in definitions {
            let handler = Arc::new(SimulatedServer::new(&definition.name));
            registry.register(definition, handler);
        }
        registry
    }

    /// Register a server, replacing any previous entry with the same name
    pub fn register(&mut self, definition: ServerDefinition, handler: Arc<dyn ActionHandler>) {
        self.servers.insert(
            definition.name.clone(),
            ServerEntry {
                definition,
                handler,
            },
        );
    }

    /// Swap the handler of an already registered server
    pub fn set_handler(&mut self, name: &str, handler: Arc<dyn ActionHandler>) -> Result<()> {
        let entry = self
            .servers
            .get_mut(name)
            .ok_or_else(|| StrideError::UnknownProvider(name.to_string()))?;
        entry.handler = handler;
        Ok(())
    }

    /// Registered server names in order
    pub fn names(&self) -> Vec<&str> {
        self.servers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityRegistry for ServerRegistry {
    fn describe(&self) -> String {
        let payload: BTreeMap<&str, serde_json::Value> = self
            .servers
            .iter()
            .map(|(name, entry)| {
                (
                    name.as_str(),
                    serde_json::json!({
                        "command": entry.definition.command,
                        "args": entry.definition.args,
                        "env": entry.definition.env,
                        "actions": entry.handler.actions(),
                    }),
                )
            })
            .collect();

        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| String::from("{}"))
    }

    async fn execute(
        &self,
        provider: &str,
        action: &str,
        parameters: &Parameters,
    ) -> Result<ActionResult> {
        let entry = self
            .servers
            .get(provider)
            .ok_or_else(|| StrideError::UnknownProvider(provider.to_string()))?;

        debug!(server = %provider, action = %action, "Dispatching action");

        match entry.handler.handle(action, parameters).await {
            Ok(output) => Ok(ActionResult::success(
                provider,
                action,
                parameters.clone(),
                output,
            )),
            Err(e) => {
                warn!(server = %provider, action = %action, error = %e, "Action failed");
                Ok(ActionResult::failure(
                    provider,
                    action,
                    parameters.clone(),
                    format!("Error: {}", e),
                ))
            }
        }
    }

    fn kind(&self) -> &str {
        "servers"
    }
}
