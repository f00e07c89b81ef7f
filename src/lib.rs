//! # flowdsl - Workflow Flow DSL Parser
//!
//! **flowdsl** parses the compact textual notation used to describe how a
//! workflow run executed: sequential steps joined by arrows, plus combinators
//! for iteration, parallel branches and retries. The result is a nested,
//! strongly typed tree that trace and log tooling can compare against the
//! structure of an actual run.
//!
//! ## The Notation
//!
//! ```text
//! a -> b -> c                               three plain steps
//! (iteration, loop, body1 -> body2)         an iteration node with one branch
//! start -> (parallel, fan, x -> y, z)       a parallel node with two branches
//! (retry, flaky, 3)                         a node retried three times
//! ```
//!
//! A combinator branch with exactly one element is stored as a bare
//! [`Param::Node`]; a branch of two or more elements is stored as a
//! [`Param::Sequence`]. Plain nodes carry no params at all.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowdsl::prelude::*;
//!
//! # fn main() -> Result<(), ParseError> {
//! let flow = parse("a -> (parallel, b, c -> d, e)")?;
//!
//! assert_eq!(flow.len(), 2);
//! assert!(flow[0].is_plain());
//! assert_eq!(flow[1].node_type(), &NodeType::Parallel);
//!
//! let params = flow[1].params().unwrap();
//! assert_eq!(
//!     params[0],
//!     Param::Sequence(vec![Node::plain("c"), Node::plain("d")])
//! );
//! assert_eq!(params[1], Param::Node(Node::plain("e")));
//!
//! // The tree prints back as canonical DSL text.
//! assert_eq!(flow.to_string(), "a -> (parallel, b, c -> d, e)");
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Keywords
//!
//! Use [`FlowParser::builder`] to accept extra spellings of the built-in
//! combinators, register new combinator kinds, or bound nesting depth.
//!
//! ```rust
//! use flowdsl::prelude::*;
//!
//! let parser = FlowParser::builder()
//!     .with_keyword_alias("loop", "iteration")
//!     .build();
//! let flow = parser.parse("(loop, l, a -> b)").unwrap();
//! assert_eq!(flow[0].node_type(), &NodeType::Iteration);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod prelude;

pub use ast::{Flow, Node, NodeType, Param};
pub use error::{LexError, ParseError, SyntaxError};
pub use lexer::{Token, tokenize};
pub use parser::{FlowParser, FlowParserBuilder, parse};
