//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowdsl crate.
//!
//! # Example
//!
//! ```rust
//! use flowdsl::prelude::*;
//!
//! let flow = parse("(retry, a, 3)").unwrap();
//! assert_eq!(flow[0].params(), Some(&[Param::Count(3)][..]));
//! ```

// Parsing entry points
pub use crate::parser::{
    CombinatorRule, FlowParser, FlowParserBuilder, ParamViolation, parse, require_branches,
    require_count,
};

// Node model
pub use crate::ast::{Flow, Node, NodeType, Param};

// Error types
pub use crate::error::{Expected, LexError, NodeModelError, ParseError, SyntaxError};
