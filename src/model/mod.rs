mod flow;
mod function;
mod node;

pub use flow::FlowModel;
pub use function::{FunctionModel, FunctionSpec};
pub use node::{MessageModel, NodeModel};
