//! Core module - shared infrastructure for Stride
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    load_server_definitions, load_system_prompt, BackendKind, Config, ProviderType,
    ServerDefinition, StepErrorPolicy,
};
pub use error::{ProtocolError, Result, StrideError};
pub use types::*;
