//! Error types for weatherflow.
//!
//! All errors are represented by the `FlowError` enum. Construction problems
//! (`Config`) and engine misuse (`EngineTerminated`) are fatal, while
//! `Validation` and `UnknownAction` are reported to the caller and the
//! conversation carries on.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flow::NodeId;

/// Unified error type for all weatherflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Invalid flow graph, initial node or configuration file.
    #[error("{0}")]
    Config(String),

    /// Arguments of an action call do not match its declared schema.
    #[error("invalid arguments for '{action}': {}", .errors.join(", "))]
    Validation {
        action: String,
        errors: Vec<String>,
    },

    /// The call names an action the current node does not declare.
    #[error("action '{action}' is not available on node '{node}'")]
    UnknownAction {
        node: NodeId,
        action: String,
    },

    /// The flow reached `end`, no further turns are processed.
    #[error("engine terminated, no further turns can be processed")]
    EngineTerminated,

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Outbound HTTP errors.
    #[error("{0}")]
    Http(String),

    /// Handler execution errors.
    #[error("{0}")]
    Handler(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<FlowError> for String {
    fn from(val: FlowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for FlowError {
    fn from(error: std::io::Error) -> Self {
        FlowError::IoError(error.to_string())
    }
}

impl From<FlowError> for std::io::Error {
    fn from(val: FlowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(error: serde_json::Error) -> Self {
        FlowError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for FlowError {
    fn from(error: toml::de::Error) -> Self {
        FlowError::Config(error.to_string())
    }
}

impl From<reqwest::Error> for FlowError {
    fn from(error: reqwest::Error) -> Self {
        FlowError::Http(error.to_string())
    }
}
