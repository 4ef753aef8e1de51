mod load;
mod node;
mod render;
mod resolve;

pub use load::Session;
pub use node::{JobTree, NodeId};
pub use render::{render_tree, RenderOptions};
pub use resolve::resolve_root;

#[cfg(test)]
pub use node::NodeKind;
