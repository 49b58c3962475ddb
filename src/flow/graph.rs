//! Immutable conversation graph.
//!
//! The graph is validated as a whole when it is built: every node and action
//! is converted, handler names are resolved and each transition target must
//! name a node or `end`. Once built it is shared read-only between
//! conversations.

use std::collections::HashMap;

use crate::{
    FlowError, Result,
    flow::{ActionEffect, HandlerRegistry, Node, NodeId, END_NODE},
    model::FlowModel,
};

#[derive(Debug, Clone)]
pub struct FlowGraph {
    /// nodes by id
    nodes: HashMap<NodeId, Node>,
    /// node ids in declaration order
    order: Vec<NodeId>,
    /// designated starting node
    initial_node: NodeId,
}

impl FlowGraph {
    /// Build and validate a graph from its declaration.
    pub fn build(
        model: &FlowModel,
        registry: &HandlerRegistry,
    ) -> Result<Self> {
        let nodes = model.nodes.iter().map(|(id, node)| Node::new(id.clone(), node, registry)).collect::<Result<Vec<_>>>()?;
        Self::new(nodes, model.initial_node.clone())
    }

    /// Validate already constructed nodes.
    pub fn new(
        nodes: Vec<Node>,
        initial_node: impl Into<NodeId>,
    ) -> Result<Self> {
        let initial_node = initial_node.into();

        let mut order = Vec::with_capacity(nodes.len());
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if node.id == END_NODE {
                return Err(FlowError::Config(format!("node id '{}' is reserved for the terminal state", END_NODE)));
            }
            if map.contains_key(&node.id) {
                return Err(FlowError::Config(format!("duplicate node '{}'", node.id)));
            }
            order.push(node.id.clone());
            map.insert(node.id.clone(), node);
        }

        for node in map.values() {
            if let Some(target) = node.targets().find(|t| t.as_str() != END_NODE && !map.contains_key(*t)) {
                return Err(FlowError::Config(format!("node '{}' transitions to unknown node '{}'", node.id, target)));
            }
        }

        if !map.contains_key(&initial_node) {
            return Err(FlowError::Config(format!("initial node '{}' not found", initial_node)));
        }

        Ok(Self {
            nodes: map,
            order,
            initial_node,
        })
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn initial_node(&self) -> &NodeId {
        &self.initial_node
    }

    /// All node ids, in declaration order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Output a human-readable representation of the graph
    pub fn schema(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Flow Graph ===".to_string());
        lines.push(format!("Nodes: {}, Initial: {}", self.nodes.len(), self.initial_node));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for id in self.order.iter() {
            let node = &self.nodes[id];
            let next = node.transition_to.as_deref().unwrap_or("(stay)");
            lines.push(format!("[{}] messages: {}, actions: {}, next: {}", node.id, node.role_messages.len() + node.task_messages.len(), node.actions.len(), next));
            for action in node.actions.iter() {
                let effect = match &action.effect {
                    ActionEffect::Transition(target) => format!("-> {}", target),
                    ActionEffect::Handler(handler) => format!("handler {}", handler.name()),
                    ActionEffect::HandlerThenTransition(handler, target) => format!("handler {} -> {}", handler.name(), target),
                };
                lines.push(format!("  {}({}) {}", action.name, action.schema.params().keys().cloned().collect::<Vec<_>>().join(", "), effect));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::{common::Vars, flow::Handler};

    struct Noop;

    #[async_trait]
    impl Handler for Noop {
        async fn call(
            &self,
            _: &Vars,
        ) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register("get_weather", Arc::new(Noop));
        registry
    }

    fn model(value: Value) -> FlowModel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_build_weather_flow() {
        let graph = FlowGraph::build(&FlowModel::weather().unwrap(), &registry()).unwrap();
        assert_eq!(graph.initial_node(), "greeting");
        assert!(graph.contains("conversation"));
        assert!(!graph.contains(END_NODE));
        assert_eq!(graph.node_ids().len(), 2);

        let conversation = graph.node("conversation").unwrap();
        assert_eq!(conversation.actions.len(), 2);
    }

    #[test]
    fn test_node_ids_in_declaration_order() {
        let graph = FlowGraph::build(&FlowModel::from_json(r#"{"initial_node": "zeta", "nodes": {"zeta": {"transition_to": "alpha"}, "alpha": {}}}"#).unwrap(), &registry()).unwrap();
        assert_eq!(graph.node_ids(), &["zeta".to_string(), "alpha".to_string()]);

        let graph = FlowGraph::build(&FlowModel::weather().unwrap(), &registry()).unwrap();
        assert_eq!(graph.node_ids(), &["greeting".to_string(), "conversation".to_string()]);
        let schema = graph.schema();
        assert!(schema.find("[greeting]").unwrap() < schema.find("[conversation]").unwrap());
    }

    #[test]
    fn test_unregistered_handler() {
        let err = FlowGraph::build(&FlowModel::weather().unwrap(), &HandlerRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("handler 'get_weather' is not registered"));
    }

    #[test]
    fn test_missing_initial_node() {
        let err = FlowGraph::build(&model(json!({"initial_node": "start", "nodes": {"a": {}}})), &registry()).unwrap_err();
        assert_eq!(err, FlowError::Config("initial node 'start' not found".to_string()));
    }

    #[test]
    fn test_unknown_node_transition() {
        let err = FlowGraph::build(&model(json!({"initial_node": "a", "nodes": {"a": {"transition_to": "b"}}})), &registry()).unwrap_err();
        assert!(err.to_string().contains("unknown node 'b'"));
    }

    #[test]
    fn test_unknown_action_transition() {
        let err = FlowGraph::build(
            &model(json!({
                "initial_node": "a",
                "nodes": {"a": {"functions": [{"type": "function", "function": {"name": "go", "transition_to": "nowhere"}}]}}
            })),
            &registry(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown node 'nowhere'"));
    }

    #[test]
    fn test_end_is_reserved() {
        let err = FlowGraph::build(&model(json!({"initial_node": "end", "nodes": {"end": {}}})), &registry()).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_schema_output() {
        let graph = FlowGraph::build(&FlowModel::weather().unwrap(), &registry()).unwrap();
        let schema = graph.schema();
        assert!(schema.contains("[greeting]"));
        assert!(schema.contains("next: conversation"));
        assert!(schema.contains("get_weather(city) handler get_weather"));
        assert!(schema.contains("end_conversation() -> end"));
    }
}
