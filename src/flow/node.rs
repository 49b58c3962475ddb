use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    FlowError, Result,
    flow::{Action, HandlerRegistry},
    model::{MessageModel, NodeModel},
};

/// node id
pub type NodeId = String;

/// Reserved id of the terminal state.
pub const END_NODE: &str = "end";

/// Author of a conversation message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

impl TryFrom<&MessageModel> for Message {
    type Error = FlowError;

    fn try_from(model: &MessageModel) -> Result<Self> {
        let role = model.role.parse::<Role>().map_err(|_| FlowError::Config(format!("invalid message role '{}'", model.role)))?;
        Ok(Self::new(role, model.content.clone()))
    }
}

/// One conversational state.
#[derive(Debug, Clone)]
pub struct Node {
    /// node id
    pub id: NodeId,
    /// persona prompts
    pub role_messages: Vec<Message>,
    /// instructions for this step
    pub task_messages: Vec<Message>,
    /// available actions, in declaration order
    pub actions: Vec<Action>,
    /// node-level transition
    pub transition_to: Option<NodeId>,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        model: &NodeModel,
        registry: &HandlerRegistry,
    ) -> Result<Self> {
        let id = id.into();
        let role_messages = model.role_messages.iter().map(Message::try_from).collect::<Result<Vec<_>>>()?;
        let task_messages = model.task_messages.iter().map(Message::try_from).collect::<Result<Vec<_>>>()?;

        let mut names = HashSet::new();
        let mut actions = Vec::with_capacity(model.functions.len());
        for function in model.functions.iter() {
            if function.kind != "function" {
                return Err(FlowError::Config(format!("node '{}': unsupported function type '{}'", id, function.kind)));
            }
            let action = Action::from_spec(&function.function, registry).map_err(|e| FlowError::Config(format!("node '{}': {}", id, e)))?;
            if !names.insert(action.name.clone()) {
                return Err(FlowError::Config(format!("node '{}': duplicate action '{}'", id, action.name)));
            }
            actions.push(action);
        }

        Ok(Self {
            id,
            role_messages,
            task_messages,
            actions,
            transition_to: model.transition_to.clone(),
        })
    }

    pub fn action(
        &self,
        name: &str,
    ) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Role messages followed by task messages.
    pub fn messages(&self) -> Vec<Message> {
        self.role_messages.iter().chain(self.task_messages.iter()).cloned().collect()
    }

    /// Tool definitions of every action.
    pub fn functions(&self) -> Vec<Value> {
        self.actions.iter().map(|a| a.definition()).collect()
    }

    /// Every node id this node can move to.
    pub fn targets(&self) -> impl Iterator<Item = &NodeId> {
        self.transition_to.iter().chain(self.actions.iter().filter_map(|a| a.effect.transition_to()))
    }
}
