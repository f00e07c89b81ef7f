use super::Node;
use super::node::fmt_chain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// An ordered sequence of nodes, executed left to right as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flow(Vec<Node>);

impl Flow {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }

    /// Total number of nodes, including those nested inside combinator params.
    pub fn node_count(&self) -> usize {
        self.0.iter().map(Node::node_count).sum()
    }

    /// Deepest combinator nesting anywhere in the flow.
    pub fn depth(&self) -> usize {
        self.0.iter().map(Node::depth).max().unwrap_or(0)
    }
}

impl Deref for Flow {
    type Target = [Node];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Node>> for Flow {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl From<Flow> for Vec<Node> {
    fn from(flow: Flow) -> Self {
        flow.0
    }
}

impl IntoIterator for Flow {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Flow {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq<Vec<Node>> for Flow {
    fn eq(&self, other: &Vec<Node>) -> bool {
        &self.0 == other
    }
}

impl PartialEq<Flow> for Vec<Node> {
    fn eq(&self, other: &Flow) -> bool {
        self == &other.0
    }
}

/// Writes the canonical DSL text, e.g. `a -> (parallel, b, c -> d, e)`.
impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_chain(&self.0, f)
    }
}
