use super::Param;
use crate::error::NodeModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a node in a parsed flow.
///
/// `Custom` carries the name of a combinator registered through
/// [`FlowParserBuilder::with_custom_combinator`](crate::parser::FlowParserBuilder::with_custom_combinator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Plain,
    Iteration,
    Parallel,
    Retry,
    Custom(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Plain => "plain",
            NodeType::Iteration => "iteration",
            NodeType::Parallel => "parallel",
            NodeType::Retry => "retry",
            NodeType::Custom(name) => name,
        }
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "plain" => NodeType::Plain,
            "iteration" => NodeType::Iteration,
            "parallel" => NodeType::Parallel,
            "retry" => NodeType::Retry,
            _ => NodeType::Custom(name),
        }
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step of a flow: either a plain node or a combinator wrapping further flows.
///
/// `params` is `None` exactly when the node is plain. Consumers rely on the
/// difference between a missing params field and an empty list, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawNode")]
pub struct Node {
    node_type: NodeType,
    node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Vec<Param>>,
}

impl Node {
    pub fn plain(node_id: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Plain,
            node_id: node_id.into(),
            params: None,
        }
    }

    /// Creates a combinator node.
    ///
    /// Passing `NodeType::Plain` is a logic error: the params are dropped so the
    /// node still has none. The parser refuses rules that report `Plain`, so
    /// parsed trees never lose branches this way.
    pub fn combinator(node_type: NodeType, node_id: impl Into<String>, params: Vec<Param>) -> Self {
        let params = match node_type {
            NodeType::Plain => None,
            _ => Some(params),
        };
        Self {
            node_type,
            node_id: node_id.into(),
            params,
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn params(&self) -> Option<&[Param]> {
        self.params.as_deref()
    }

    pub fn is_plain(&self) -> bool {
        self.params.is_none()
    }

    pub fn is_combinator(&self) -> bool {
        self.params.is_some()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children());
        }
        count
    }

    /// Combinator nesting depth of this subtree. A plain node has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            if node.is_combinator() {
                deepest = deepest.max(level + 1);
            }
            pending.extend(node.children().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Direct child nodes across all params, in order.
    fn children(&self) -> impl Iterator<Item = &Node> {
        self.params.iter().flatten().flat_map(Param::nodes)
    }
}

// Subtrees are detached onto a heap worklist so dropping stays flat at any depth.
impl Drop for Node {
    fn drop(&mut self) {
        let Some(mut pending) = self.params.take() else {
            return;
        };
        while let Some(param) = pending.pop() {
            match param {
                Param::Count(_) => {}
                Param::Node(mut node) => pending.extend(node.params.take().into_iter().flatten()),
                Param::Sequence(nodes) => {
                    for mut node in nodes {
                        pending.extend(node.params.take().into_iter().flatten());
                    }
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pieces(vec![Piece::Node(self)], f)
    }
}

/// Wire shape of a node before the model invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    node_type: NodeType,
    node_id: String,
    #[serde(default)]
    params: Option<Vec<Param>>,
}

impl TryFrom<RawNode> for Node {
    type Error = NodeModelError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNode {
            node_type,
            node_id,
            params,
        } = raw;
        match (node_type, params) {
            (NodeType::Plain, None) => Ok(Node::plain(node_id)),
            (NodeType::Plain, Some(_)) => Err(NodeModelError::PlainWithParams(node_id)),
            (node_type, None) => Err(NodeModelError::MissingParams {
                node_id,
                node_type: node_type.to_string(),
            }),
            (_, Some(params)) if params.is_empty() => Err(NodeModelError::EmptyParams(node_id)),
            (node_type, Some(params)) => {
                check_params(&node_type, &node_id, &params)?;
                Ok(Node::combinator(node_type, node_id, params))
            }
        }
    }
}

/// Shape rules the grammar guarantees for every combinator it builds.
fn check_params(node_type: &NodeType, node_id: &str, params: &[Param]) -> Result<(), NodeModelError> {
    for (index, param) in params.iter().enumerate() {
        if let Param::Sequence(nodes) = param {
            if nodes.len() < 2 {
                return Err(NodeModelError::ShortSequence {
                    node_id: node_id.to_string(),
                    index,
                    len: nodes.len(),
                });
            }
        }
    }

    match node_type {
        NodeType::Retry => match params {
            [Param::Count(_)] => Ok(()),
            _ => Err(NodeModelError::InvalidRetry(node_id.to_string())),
        },
        NodeType::Iteration | NodeType::Parallel => {
            match params.iter().position(|p| !p.is_branch()) {
                Some(index) => Err(NodeModelError::UnexpectedCount {
                    node_id: node_id.to_string(),
                    node_type: node_type.to_string(),
                    index,
                }),
                None => Ok(()),
            }
        }
        // Custom kinds only exist through a caller-supplied rule we cannot see here.
        NodeType::Plain | NodeType::Custom(_) => Ok(()),
    }
}

/// One unit of pending output while writing a tree in canonical form.
enum Piece<'a> {
    Node(&'a Node),
    Param(&'a Param),
    Text(&'static str),
}

/// Writes nodes joined by the sequence arrow.
pub(crate) fn fmt_chain(nodes: &[Node], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut stack = Vec::new();
    push_chain(&mut stack, nodes);
    write_pieces(stack, f)
}

fn push_chain<'a>(stack: &mut Vec<Piece<'a>>, nodes: &'a [Node]) {
    for (index, node) in nodes.iter().enumerate().rev() {
        stack.push(Piece::Node(node));
        if index > 0 {
            stack.push(Piece::Text(" -> "));
        }
    }
}

fn write_pieces(mut stack: Vec<Piece<'_>>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Text(text) => f.write_str(text)?,
            Piece::Param(Param::Count(n)) => write!(f, "{}", n)?,
            Piece::Param(Param::Node(node)) => stack.push(Piece::Node(node)),
            Piece::Param(Param::Sequence(nodes)) => push_chain(&mut stack, nodes),
            Piece::Node(node) => match &node.params {
                None => f.write_str(&node.node_id)?,
                Some(params) => {
                    write!(f, "({}, {}", node.node_type, node.node_id)?;
                    stack.push(Piece::Text(")"));
                    for param in params.iter().rev() {
                        stack.push(Piece::Param(param));
                        stack.push(Piece::Text(", "));
                    }
                }
            },
        }
    }
    Ok(())
}
