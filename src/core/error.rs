//! Custom error types for Stride
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Stride operations
#[derive(Error, Debug)]
pub enum StrideError {
    /// Missing or malformed configuration (prompt file, server file, settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model replied with something that breaks the JSON contract
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A plan step named a provider the registry does not know
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Completion transport errors (connection, API status, response shape)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Model not available on the completion backend
    #[error("Model '{0}' not available on the completion backend")]
    ModelNotFound(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Violations of the JSON reply contract, raised by the planner and evaluator.
///
/// Each variant carries an excerpt of the offending reply so the failure can
/// be diagnosed from the error alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Reply text was not a JSON document
    #[error("{component} response was not valid JSON: {detail}{}", reply_note(.reply))]
    MalformedResponse {
        component: &'static str,
        detail: String,
        reply: String,
    },

    /// `steps` absent, not a list, or empty
    #[error("planner response must include a non-empty 'steps' array{}", reply_note(.reply))]
    MissingSteps { reply: String },

    /// A single plan entry failed validation
    #[error("invalid plan step #{index}: {reason}{}", reply_note(.reply))]
    InvalidStep {
        index: usize,
        reason: String,
        reply: String,
    },

    /// A required key was missing or had an unusable type
    #[error("{component} response is missing a usable '{field}' field{}", reply_note(.reply))]
    MissingField {
        component: &'static str,
        field: &'static str,
        reply: String,
    },
}

/// Longest reply excerpt kept in a protocol error, in characters
pub const REPLY_EXCERPT_CHARS: usize = 200;

fn reply_note(reply: &str) -> String {
    if reply.is_empty() {
        String::new()
    } else {
        format!(" (reply: {})", reply)
    }
}

/// Bounded excerpt of a model reply
fn excerpt(text: &str) -> String {
    let text = text.trim();
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(REPLY_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Convenience Result type for Stride operations
pub type Result<T> = std::result::Result<T, StrideError>;

impl StrideError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether this error should stop the process before the loop starts
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl ProtocolError {
    pub(crate) fn malformed(component: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            component,
            detail: detail.into(),
            reply: String::new(),
        }
    }

    pub(crate) fn missing_steps() -> Self {
        Self::MissingSteps {
            reply: String::new(),
        }
    }

    pub(crate) fn invalid_step(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidStep {
            index,
            reason: reason.into(),
            reply: String::new(),
        }
    }

    pub(crate) fn missing_field(component: &'static str, field: &'static str) -> Self {
        Self::MissingField {
            component,
            field,
            reply: String::new(),
        }
    }

    /// Attach an excerpt of the reply that caused this error
    pub(crate) fn with_reply(mut self, text: &str) -> Self {
        let slot = match &mut self {
            Self::MalformedResponse { reply, .. }
            | Self::MissingSteps { reply }
            | Self::InvalidStep { reply, .. }
            | Self::MissingField { reply, .. } => reply,
        };
        *slot = excerpt(text);
        self
    }

    /// Excerpt of the offending reply, empty if none was attached
    pub fn reply(&self) -> &str {
        match self {
            Self::MalformedResponse { reply, .. }
            | Self::MissingSteps { reply }
            | Self::InvalidStep { reply, .. }
            | Self::MissingField { reply, .. } => reply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_names_component() {
        let err: StrideError = ProtocolError::malformed("planner", "expected value").into();
        let text = err.to_string();
        assert!(text.contains("planner"));
        assert!(text.contains("expected value"));
    }

    #[test]
    fn test_invalid_step_message() {
        let err = ProtocolError::invalid_step(2, "missing 'action'");
        assert_eq!(
            err.to_string(),
            "invalid plan step #2: missing 'action'"
        );
    }

    #[test]
    fn test_reply_excerpt_in_message() {
        let err: StrideError = ProtocolError::malformed("evaluator", "expected value")
            .with_reply("  yes, done\n")
            .into();
        assert_eq!(
            err.to_string(),
            "Protocol error: evaluator response was not valid JSON: expected value (reply: yes, done)"
        );
    }

    #[test]
    fn test_reply_excerpt_is_bounded() {
        let long = "é".repeat(REPLY_EXCERPT_CHARS + 50);
        let err = ProtocolError::missing_steps().with_reply(&long);
        assert_eq!(err.reply().chars().count(), REPLY_EXCERPT_CHARS + 3);
        assert!(err.reply().ends_with("..."));

        let short = ProtocolError::missing_steps().with_reply("{\"steps\": []}");
        assert_eq!(short.reply(), "{\"steps\": []}");
    }

    #[test]
    fn test_is_config() {
        assert!(StrideError::config("bad").is_config());
        assert!(!StrideError::UnknownProvider("x".into()).is_config());
    }
}
