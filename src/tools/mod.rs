//! Tools module - capability backends for the agent
//!
//! Contains the registry seam, the server backend with its simulated
//! servers, and the script backend.

pub mod registry;
pub mod script;
pub mod simulated;

use std::sync::Arc;

use crate::core::{load_server_definitions, BackendKind, Config, Result};

pub use registry::{ActionHandler, CapabilityRegistry, ServerRegistry};
pub use script::ScriptRegistry;
pub use simulated::SimulatedServer;

/// Build the capability backend selected in the configuration
pub fn create_registry(config: &Config) -> Result<Arc<dyn CapabilityRegistry>> {
    let registry: Arc<dyn CapabilityRegistry> = match config.agent.backend {
        BackendKind::Servers => {
            let definitions = load_server_definitions(&config.agent.servers_path)?;
            Arc::new(ServerRegistry::from_definitions(definitions))
        }
        BackendKind::Scripts => Arc::new(ScriptRegistry::new(config.scripts.clone())),
    };
    Ok(registry)
}
