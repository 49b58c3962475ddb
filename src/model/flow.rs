use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FlowError, Result, model::NodeModel};

const WEATHER_FLOW: &str = include_str!("../../flows/weather.json");

/// Declarative flow definition, as deployed from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowModel {
    pub initial_node: String,
    pub nodes: IndexMap<String, NodeModel>,
}

impl FlowModel {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<FlowModel>(s).map_err(|e| FlowError::Config(format!("invalid flow definition: {}", e)))
    }

    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| FlowError::Config(format!("failed to load flow file {:?}: {}", path.as_ref(), e)))?;
        Self::from_json(&data)
    }

    /// The built-in weather bot flow: `greeting` -> `conversation` -> `end`.
    pub fn weather() -> Result<Self> {
        Self::from_json(WEATHER_FLOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_flow_parses() {
        let model = FlowModel::weather().unwrap();
        assert_eq!(model.initial_node, "greeting");
        assert_eq!(model.nodes.len(), 2);

        let greeting = &model.nodes["greeting"];
        assert_eq!(greeting.role_messages.len(), 1);
        assert_eq!(greeting.transition_to.as_deref(), Some("conversation"));
        assert_eq!(greeting.functions[0].function.handler.as_deref(), Some("get_weather"));

        let conversation = &model.nodes["conversation"];
        assert!(conversation.transition_to.is_none());
        let end = conversation.functions.iter().find(|f| f.function.name == "end_conversation").unwrap();
        assert_eq!(end.function.transition_to.as_deref(), Some("end"));
        assert!(end.function.handler.is_none());
    }

    #[test]
    fn test_minimal_node_defaults() {
        let model = FlowModel::from_json(r#"{"initial_node": "a", "nodes": {"a": {}}}"#).unwrap();
        let node = &model.nodes["a"];
        assert!(node.task_messages.is_empty());
        assert!(node.functions.is_empty());
        assert!(node.transition_to.is_none());
    }

    #[test]
    fn test_nodes_keep_document_order() {
        let model = FlowModel::from_json(r#"{"initial_node": "zeta", "nodes": {"zeta": {"transition_to": "alpha"}, "mid": {}, "alpha": {}}}"#).unwrap();
        let ids: Vec<_> = model.nodes.keys().cloned().collect();
        assert_eq!(ids, vec!["zeta", "mid", "alpha"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = FlowModel::from_json(r#"{"nodes": {}}"#).unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }
}
