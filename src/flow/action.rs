use serde_json::{Value, json};

use crate::{
    FlowError, Result,
    flow::{ActionSchema, BoundHandler, HandlerRegistry, NodeId},
    model::FunctionSpec,
};

/// What firing an action does.
#[derive(Debug, Clone)]
pub enum ActionEffect {
    /// Move to another node without running anything.
    Transition(NodeId),
    /// Run a handler, then follow the node-level transition (if any).
    Handler(BoundHandler),
    /// Run a handler, then move to the given node.
    HandlerThenTransition(BoundHandler, NodeId),
}

impl ActionEffect {
    /// Combine the optional parts of a declaration; `None` when neither is set.
    pub fn from_parts(
        handler: Option<BoundHandler>,
        transition_to: Option<NodeId>,
    ) -> Option<Self> {
        match (handler, transition_to) {
            (Some(handler), Some(target)) => Some(Self::HandlerThenTransition(handler, target)),
            (Some(handler), None) => Some(Self::Handler(handler)),
            (None, Some(target)) => Some(Self::Transition(target)),
            (None, None) => None,
        }
    }

    pub fn handler(&self) -> Option<&BoundHandler> {
        match self {
            Self::Transition(_) => None,
            Self::Handler(handler) | Self::HandlerThenTransition(handler, _) => Some(handler),
        }
    }

    pub fn transition_to(&self) -> Option<&NodeId> {
        match self {
            Self::Handler(_) => None,
            Self::Transition(target) | Self::HandlerThenTransition(_, target) => Some(target),
        }
    }
}

/// A named operation available within a node.
#[derive(Debug, Clone)]
pub struct Action {
    /// action name, unique within its node
    pub name: String,
    /// description shown to the LLM
    pub description: String,
    /// declared arguments
    pub schema: ActionSchema,
    /// handler and/or transition
    pub effect: ActionEffect,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ActionSchema,
        effect: ActionEffect,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            effect,
        }
    }

    /// Build an action from its declaration, resolving the handler by name.
    pub fn from_spec(
        spec: &FunctionSpec,
        registry: &HandlerRegistry,
    ) -> Result<Self> {
        if spec.name.is_empty() {
            return Err(FlowError::Config("action name must not be empty".to_string()));
        }

        let schema = ActionSchema::from_parameters(&spec.parameters).map_err(|e| FlowError::Config(format!("action '{}': {}", spec.name, e)))?;
        let handler = spec.handler.as_deref().map(|name| registry.resolve(name)).transpose()?;
        let effect = ActionEffect::from_parts(handler, spec.transition_to.clone())
            .ok_or_else(|| FlowError::Config(format!("action '{}' needs a handler or a transition_to", spec.name)))?;

        Ok(Self::new(spec.name.clone(), spec.description.clone(), schema, effect))
    }

    /// Tool definition in the OpenAI function-calling layout.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.schema.document_json(),
            }
        })
    }
}
