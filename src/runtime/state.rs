use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    common::Vars,
    flow::{END_NODE, Message, NodeId},
    utils,
};

/// Something that happened during a turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// prompt or user text
    Message(Message),
    /// a structured action call that passed validation
    ActionCall {
        name: String,
        arguments: Vars,
    },
    /// the settled handler output
    ActionResult {
        name: String,
        result: Value,
    },
    /// the active node changed
    Transition {
        from: NodeId,
        to: NodeId,
    },
}

/// A history record with the node it happened on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub node: NodeId,
    pub record: Record,
    /// unix millis
    pub timestamp: i64,
}

/// Mutable state of one conversation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowState {
    current: NodeId,
    history: Vec<HistoryEntry>,
}

impl FlowState {
    pub fn new(initial_node: impl Into<NodeId>) -> Self {
        Self {
            current: initial_node.into(),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &NodeId {
        &self.current
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_terminated(&self) -> bool {
        self.current == END_NODE
    }

    /// Append a record attributed to the current node.
    pub fn record(
        &mut self,
        record: Record,
    ) {
        self.history.push(HistoryEntry {
            node: self.current.clone(),
            record,
            timestamp: utils::time::time_millis(),
        });
    }

    /// Move to `to`, recording the transition when the node changes.
    pub fn move_to(
        &mut self,
        to: NodeId,
    ) -> bool {
        if to == self.current {
            return false;
        }
        let from = std::mem::replace(&mut self.current, to.clone());
        self.history.push(HistoryEntry {
            node: to.clone(),
            record: Record::Transition {
                from,
                to,
            },
            timestamp: utils::time::time_millis(),
        });
        true
    }
}
