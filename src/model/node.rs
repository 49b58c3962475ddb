use serde::{Deserialize, Serialize};

use crate::model::FunctionModel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeModel {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_messages: Vec<MessageModel>,
    #[serde(default)]
    pub task_messages: Vec<MessageModel>,
    #[serde(default)]
    pub functions: Vec<FunctionModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageModel {
    pub role: String,
    pub content: String,
}
