use super::Node;
use super::node::fmt_chain;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a combinator's parameter list.
///
/// A branch of exactly one element is stored unwrapped as `Node`; a branch of
/// two or more elements is stored as `Sequence`. The parser never produces a
/// one-element `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Count(u32),
    Node(Node),
    Sequence(Vec<Node>),
}

impl Param {
    /// Builds the entry for a parsed branch: one node unwraps, several stay a sequence.
    pub fn from_branch(mut nodes: Vec<Node>) -> Self {
        if nodes.len() == 1 {
            Param::Node(nodes.remove(0))
        } else {
            Param::Sequence(nodes)
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            Param::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        !matches!(self, Param::Count(_))
    }

    /// The nodes of this entry in execution order; empty for a count.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Param::Count(_) => &[],
            Param::Node(node) => std::slice::from_ref(node),
            Param::Sequence(nodes) => nodes,
        }
    }
}

impl From<Node> for Param {
    fn from(node: Node) -> Self {
        Param::Node(node)
    }
}

impl From<u32> for Param {
    fn from(count: u32) -> Self {
        Param::Count(count)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Count(n) => write!(f, "{}", n),
            Param::Node(node) => fmt::Display::fmt(node, f),
            Param::Sequence(nodes) => fmt_chain(nodes, f),
        }
    }
}
