//! Common test utilities for building expected flow trees.
use flowdsl::prelude::*;

/// A plain node.
#[allow(dead_code)]
pub fn plain(id: &str) -> Node {
    Node::plain(id)
}

/// A branch entry made of several nodes (the wrapped form).
#[allow(dead_code)]
pub fn seq(ids: &[&str]) -> Param {
    Param::Sequence(ids.iter().map(|id| Node::plain(*id)).collect())
}

/// A branch entry made of a single node (the unwrapped form).
#[allow(dead_code)]
pub fn single(node: Node) -> Param {
    Param::Node(node)
}

#[allow(dead_code)]
pub fn iteration(id: &str, params: Vec<Param>) -> Node {
    Node::combinator(NodeType::Iteration, id, params)
}

#[allow(dead_code)]
pub fn parallel(id: &str, params: Vec<Param>) -> Node {
    Node::combinator(NodeType::Parallel, id, params)
}

#[allow(dead_code)]
pub fn retry(id: &str, count: u32) -> Node {
    Node::combinator(NodeType::Retry, id, vec![Param::Count(count)])
}

/// Parses `source`, panicking with the rendered diagnostic on failure.
#[allow(dead_code)]
pub fn parse_ok(source: &str) -> Flow {
    parse(source).unwrap_or_else(|e| panic!("{}", e.render(source)))
}

/// Parses `source` and returns the syntax error it must produce.
#[allow(dead_code)]
pub fn syntax_err(source: &str) -> SyntaxError {
    match parse(source) {
        Err(ParseError::Syntax(e)) => e,
        other => panic!("Expected a syntax error for {:?}, got {:?}", source, other),
    }
}

/// Nested `(iteration, lN, ...)` combinators `depth` levels deep around a single step.
#[allow(dead_code)]
pub fn nested_iterations(depth: usize) -> String {
    let mut source = String::with_capacity(depth * 24 + 4);
    for level in 0..depth {
        source.push_str(&format!("(iteration, l{}, ", level));
    }
    source.push_str("leaf");
    source.push_str(&")".repeat(depth));
    source
}
