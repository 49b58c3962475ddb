mod action;
mod graph;
mod handler;
pub mod handlers;
mod node;
mod schema;

pub use action::{Action, ActionEffect};
pub use graph::FlowGraph;
pub use handler::{BoundHandler, Handler, HandlerRegistry, settle};
pub use node::{END_NODE, Message, Node, NodeId, Role};
pub use schema::{ActionSchema, ParamSpec, ParamType};
