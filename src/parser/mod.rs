use crate::ast::Flow;
use crate::error::ParseError;
use crate::lexer::tokenize;
use itertools::Itertools;
use std::sync::Arc;

mod combinators;
mod grammar;

pub use combinators::{CombinatorRule, ParamViolation, require_branches, require_count};

use combinators::{Registry, register_default_combinators};
use grammar::Grammar;

/// A configured flow DSL parser.
///
/// A `FlowParser` holds no per-parse state, so one instance can be shared
/// across threads and reused for any number of inputs.
pub struct FlowParser {
    registry: Registry,
    max_depth: Option<usize>,
}

pub struct FlowParserBuilder {
    registry: Registry,
    max_depth: Option<usize>,
}

impl FlowParserBuilder {
    pub fn new() -> Self {
        let mut registry = Registry::new();
        register_default_combinators(&mut registry);
        Self {
            registry,
            max_depth: None,
        }
    }

    /// Makes `alias` behave exactly like the already registered `keyword`.
    /// Unknown target keywords are ignored.
    pub fn with_keyword_alias(mut self, alias: &str, keyword: &str) -> Self {
        if let Some(rule) = self.registry.get(keyword).cloned() {
            self.registry.insert(alias.to_string(), rule);
        }
        self
    }

    /// Registers an additional combinator kind, replacing any rule with the same keyword.
    pub fn with_custom_combinator(mut self, rule: Box<dyn CombinatorRule>) -> Self {
        let rule: Arc<dyn CombinatorRule> = Arc::from(rule);
        self.registry.insert(rule.keyword().to_string(), rule);
        self
    }

    /// Caps how deeply combinators may nest. Unlimited unless set.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn build(self) -> FlowParser {
        FlowParser {
            registry: self.registry,
            max_depth: self.max_depth,
        }
    }
}

impl Default for FlowParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowParser {
    /// A parser recognising the built-in `iteration`, `parallel` and `retry` combinators.
    pub fn new() -> Self {
        FlowParserBuilder::new().build()
    }

    pub fn builder() -> FlowParserBuilder {
        FlowParserBuilder::new()
    }

    /// All keywords this parser accepts, sorted.
    pub fn keywords(&self) -> Vec<&str> {
        self.registry
            .keys()
            .map(String::as_str)
            .sorted_unstable()
            .collect()
    }

    /// Parses a complete DSL string into its top-level flow.
    ///
    /// Either the whole input is valid and a tree is returned, or the first
    /// error is reported with its byte offset.
    pub fn parse(&self, source: &str) -> Result<Flow, ParseError> {
        let result = tokenize(source).map_err(ParseError::from).and_then(|tokens| {
            Grammar::new(tokens, source.len(), &self.registry, self.max_depth)
                .parse_document()
                .map_err(ParseError::from)
        });

        match &result {
            Ok(flow) => tracing::debug!(
                nodes = flow.len(),
                total = flow.node_count(),
                depth = flow.depth(),
                "parsed flow"
            ),
            Err(e) => tracing::debug!(offset = e.offset(), error = %e, "failed to parse flow"),
        }
        result
    }
}

impl Default for FlowParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `source` with the default keyword set.
///
/// ```
/// use flowdsl::{Node, Param, parse};
///
/// let flow = parse("a -> (retry, b, 3)").unwrap();
/// assert_eq!(flow[0], Node::plain("a"));
/// assert_eq!(flow[1].params(), Some(&[Param::Count(3)][..]));
/// ```
pub fn parse(source: &str) -> Result<Flow, ParseError> {
    FlowParser::new().parse(source)
}
