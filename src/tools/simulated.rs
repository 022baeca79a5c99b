//! Simulated servers
//!
//! Stand-ins for well-known servers so the loop can run end to end without
//! live processes. Each knows its action catalogue and answers with a
//! transcript of what it would have done.

use async_trait::async_trait;

use crate::core::{parameters_to_json, Parameters, Result};
use crate::tools::registry::ActionHandler;

/// Action catalogue of the servers we know about
fn known_actions(server: &str) -> &'static [&'static str] {
    match server {
        "filesystem" => &["list_directory", "read_file", "write_file", "delete_path"],
        "brave-search" => &["search"],
        "playwright" => &["open_page", "click", "type", "screenshot"],
        "excel" => &["open_workbook", "list_sheets", "read_range", "write_range"],
        "computer-use" => &["move_mouse", "click", "type", "screenshot"],
        _ => &["execute"],
    }
}

/// Handler that reports what a real server would have been asked to do
#[derive(Debug, Clone)]
pub struct SimulatedServer {
    name: String,
    actions: Vec<String>,
}

impl SimulatedServer {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let actions = known_actions(&name).iter().map(|a| a.to_string()).collect();
        Self { name, actions }
    }
}

#[async_trait]
impl ActionHandler for SimulatedServer {
    fn actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    async fn handle(&self, action: &str, parameters: &Parameters) -> Result<String> {
        if !self.actions.iter().any(|a| a == action) {
            return Ok(format!(
                "Action '{}' is not available on server '{}'. Available actions: {}",
                action,
                self.name,
                self.actions.join(", ")
            ));
        }

        Ok(format!(
            "Simulated execution (no live server attached).\nServer: {}\nAction: {}\nParameters: {}",
            self.name,
            action,
            parameters_to_json(parameters)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lookup() {
        assert_eq!(SimulatedServer::new("brave-search").actions(), vec!["search"]);
        assert_eq!(SimulatedServer::new("custom").actions(), vec!["execute"]);
    }

    #[test]
    fn test_simulated_output() {
        let server = SimulatedServer::new("filesystem");
        let mut params = Parameters::new();
        params.insert("path".into(), "/tmp".into());

        let output =
            tokio_test::block_on(server.handle("list_directory", &params)).unwrap();
        assert!(output.contains("Server: filesystem"));
        assert!(output.contains("Action: list_directory"));
        assert!(output.contains(r#"{"path":"/tmp"}"#));
    }

    #[test]
    fn test_unsupported_action_is_reported_in_output() {
        let server = SimulatedServer::new("excel");
        let output =
            tokio_test::block_on(server.handle("format_disk", &Parameters::new())).unwrap();
        assert!(output.contains("not available"));
        assert!(output.contains("read_range"));
    }
}
