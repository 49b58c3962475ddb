//! Handler capabilities bound to flow actions.
//!
//! Flow definitions name handlers by string; the names are resolved through a
//! [`HandlerRegistry`] once, while the graph is built.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{FlowError, Result, common::Vars};

#[async_trait]
pub trait Handler: Send + Sync {
    /// Executes the handler with already validated arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - The arguments of the action call.
    ///
    /// # Returns
    ///
    /// Returns a [`Result<Value>`] that is recorded in the conversation history.
    async fn call(
        &self,
        args: &Vars,
    ) -> Result<Value>;
}

/// A handler together with the name it was registered under.
#[derive(Clone)]
pub struct BoundHandler {
    name: String,
    handler: Arc<dyn Handler>,
}

impl BoundHandler {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the handler, settling any error into a result value.
    pub async fn invoke(
        &self,
        args: &Vars,
    ) -> Value {
        settle(self.handler.call(args).await)
    }
}

impl fmt::Debug for BoundHandler {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_tuple("BoundHandler").field(&self.name).finish()
    }
}

/// Convert a handler outcome into the value recorded for the turn.
///
/// Errors never abort a turn; they become `{"status": "error", "error": ...}`.
pub fn settle(output: Result<Value>) -> Value {
    match output {
        Ok(value) => value,
        Err(e) => json!({
            "status": "error",
            "error": e.to_string(),
        }),
    }
}

/// Mapping from capability name to handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn resolve(
        &self,
        name: &str,
    ) -> Result<BoundHandler> {
        let handler = self.handlers.get(name).ok_or_else(|| FlowError::Config(format!("handler '{}' is not registered", name)))?;
        Ok(BoundHandler {
            name: name.to_string(),
            handler: handler.clone(),
        })
    }
}
