//! Conversation flow engine - the main entry point for weatherflow.
//!
//! The engine drives one conversation through a [`FlowGraph`]:
//! - Tracking the active node and the conversation history
//! - Validating structured action calls against the node's declared actions
//! - Awaiting action handlers (the only suspension points)
//! - Computing the next node, down to the terminal `end`

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span};

use crate::{
    FlowError, Result,
    common::Vars,
    flow::{FlowGraph, Message, NodeId},
    runtime::{FlowState, Record},
    utils,
};

/// A structured function-call request produced by the LLM.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Vars,
}

impl ActionCall {
    pub fn new(
        name: impl Into<String>,
        arguments: impl Into<Vars>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Input of one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowInput {
    /// free text from the user
    Text(String),
    /// a call to one of the current node's actions
    Call(ActionCall),
}

impl FlowInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn call(
        name: impl Into<String>,
        arguments: impl Into<Vars>,
    ) -> Self {
        Self::Call(ActionCall::new(name, arguments))
    }
}

impl From<ActionCall> for FlowInput {
    fn from(call: ActionCall) -> Self {
        Self::Call(call)
    }
}

/// What a turn produced.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    /// prompt messages of the node now active (empty at `end`)
    Messages(Vec<Message>),
    /// settled output of the action handler
    Result(Value),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FlowOutput {
    /// node active after the turn
    pub node: NodeId,
    pub content: Content,
}

/// Drives a single conversation.
///
/// `process` takes `&mut self`, so turns are processed strictly one after
/// another. Each conversation owns its engine; the graph itself is shared.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new().weather(WeatherConfig::from_env()).build()?;
///
/// let out = engine.process(FlowInput::call("get_weather", json!({"city": "Paris"}))).await?;
/// assert_eq!(out.node, "conversation");
/// ```
pub struct FlowEngine {
    /// conversation id, for logs
    id: String,
    graph: Arc<FlowGraph>,
    state: FlowState,
}

impl FlowEngine {
    /// Start a conversation at the graph's designated initial node.
    pub fn new(graph: Arc<FlowGraph>) -> Self {
        let initial_node = graph.initial_node().clone();
        Self::start(graph, initial_node)
    }

    /// Start a conversation at `initial_node`.
    pub fn initialize(
        graph: Arc<FlowGraph>,
        initial_node: &str,
    ) -> Result<Self> {
        if !graph.contains(initial_node) {
            return Err(FlowError::Config(format!("initial node '{}' not found", initial_node)));
        }
        Ok(Self::start(graph, initial_node.to_string()))
    }

    fn start(
        graph: Arc<FlowGraph>,
        initial_node: NodeId,
    ) -> Self {
        let id = utils::longid();
        let mut state = FlowState::new(initial_node);
        if let Some(node) = graph.node(state.current()) {
            node.messages().into_iter().for_each(|m| state.record(Record::Message(m)));
        }
        info!(conversation = %id, node = %state.current(), "conversation started");

        Self {
            id,
            graph,
            state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_node(&self) -> &NodeId {
        self.state.current()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn graph(&self) -> Arc<FlowGraph> {
        self.graph.clone()
    }

    /// Prompt messages of the current node.
    pub fn messages(&self) -> Vec<Message> {
        self.graph.node(self.state.current()).map(|n| n.messages()).unwrap_or_default()
    }

    /// Tool definitions the LLM may call on the current node.
    pub fn functions(&self) -> Vec<Value> {
        self.graph.node(self.state.current()).map(|n| n.functions()).unwrap_or_default()
    }

    /// Process one turn.
    ///
    /// Validation and lookup failures leave the state untouched. Handler
    /// failures never surface here; they are part of the returned result.
    pub async fn process(
        &mut self,
        input: FlowInput,
    ) -> Result<FlowOutput> {
        if self.state.is_terminated() {
            return Err(FlowError::EngineTerminated);
        }

        let graph = self.graph.clone();
        let node = graph.node(self.state.current()).ok_or_else(|| FlowError::Config(format!("node '{}' not found", self.state.current())))?;

        let (result, action_target) = match input {
            FlowInput::Text(text) => {
                debug!(conversation = %self.id, node = %node.id, "user text");
                self.state.record(Record::Message(Message::user(text)));
                (None, None)
            }
            FlowInput::Call(call) => {
                let action = node.action(&call.name).ok_or_else(|| FlowError::UnknownAction {
                    node: node.id.clone(),
                    action: call.name.clone(),
                })?;
                action.schema.validate(&action.name, &call.arguments)?;

                debug!(conversation = %self.id, node = %node.id, action = %action.name, "action call");
                self.state.record(Record::ActionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                let result = match action.effect.handler() {
                    Some(handler) => {
                        let value = handler.invoke(&call.arguments).instrument(info_span!("action", conversation = %self.id, action = %action.name)).await;
                        self.state.record(Record::ActionResult {
                            name: call.name,
                            result: value.clone(),
                        });
                        Some(value)
                    }
                    None => None,
                };
                (result, action.effect.transition_to().cloned())
            }
        };

        let next = action_target.or_else(|| node.transition_to.clone()).unwrap_or_else(|| node.id.clone());
        if self.state.move_to(next.clone()) {
            info!(conversation = %self.id, from = %node.id, to = %next, "node transition");
            if let Some(entered) = graph.node(&next) {
                entered.messages().into_iter().for_each(|m| self.state.record(Record::Message(m)));
            }
        }

        let content = match result {
            Some(value) => Content::Result(value),
            None => Content::Messages(graph.node(&next).map(|n| n.messages()).unwrap_or_default()),
        };

        Ok(FlowOutput {
            node: next,
            content,
        })
    }
}
