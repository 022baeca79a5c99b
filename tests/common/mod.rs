//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stride::core::config::parse_server_definitions;
use stride::core::{Message, Result};
use stride::llm::{Completion, CompletionProvider, GenerateOptions};
use stride::tools::ServerRegistry;

pub const SYSTEM_PROMPT: &str = "You are a meticulous agent that replies in JSON only.";

/// Which side of the loop a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Planner,
    Evaluator,
}

/// A captured request
#[derive(Debug, Clone)]
pub struct Request {
    pub caller: Caller,
    pub messages: Vec<Message>,
    pub options: GenerateOptions,
}

impl Request {
    pub fn user_prompt(&self) -> &str {
        self.messages.last().map(|m| m.content.as_str()).unwrap_or("")
    }
}

/// Completion transport that replays scripted replies.
///
/// Planner and evaluator requests are told apart by the reply contract in
/// the prompt. When a queue has one reply left it is repeated forever.
pub struct ScriptedTransport {
    plans: Mutex<VecDeque<String>>,
    verdicts: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new(plans: Vec<&str>, verdicts: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            plans: Mutex::new(plans.into_iter().map(String::from).collect()),
            verdicts: Mutex::new(verdicts.into_iter().map(String::from).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self, caller: Caller) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.caller == caller)
            .count()
    }

    fn next(queue: &Mutex<VecDeque<String>>) -> String {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().expect("scripted transport ran out of replies")
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedTransport {
    async fn complete(&self, messages: &[Message], options: &GenerateOptions) -> Result<Completion> {
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        let caller = if prompt.contains("\"goalAchieved\"") {
            Caller::Evaluator
        } else {
            Caller::Planner
        };

        self.requests.lock().unwrap().push(Request {
            caller,
            messages: messages.to_vec(),
            options: options.clone(),
        });

        let reply = match caller {
            Caller::Planner => Self::next(&self.plans),
            Caller::Evaluator => Self::next(&self.verdicts),
        };
        Ok(Completion::text(reply))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Registry with simulated `filesystem` and `brave-search` servers
pub fn simulated_servers() -> Arc<ServerRegistry> {
    let definitions = parse_server_definitions(
        r#"{
            "mcpServers": {
                "filesystem": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-filesystem", "/tmp"]},
                "brave-search": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-brave-search"], "env": {"BRAVE_API_KEY": "test"}}
            }
        }"#,
    )
    .expect("valid server definitions");
    Arc::new(ServerRegistry::from_definitions(definitions))
}

pub const NOT_YET: &str = r#"{"goalAchieved": false, "reason": "not yet"}"#;
