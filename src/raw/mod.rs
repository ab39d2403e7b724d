mod node;
mod raw_tree;

pub(crate) use node::Node;
pub(crate) use raw_tree::RawTree;
