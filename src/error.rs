use std::fmt;
use thiserror::Error;

/// The construct the grammar was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A node identifier or a parenthesised combinator.
    Element,
    Identifier,
    CombinatorKeyword,
    Comma,
    CloseParen,
    CommaOrCloseParen,
    /// A branch flow or a numeric literal.
    Param,
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Expected::Element => "a node identifier or '('",
            Expected::Identifier => "a node identifier",
            Expected::CombinatorKeyword => "a combinator keyword",
            Expected::Comma => "','",
            Expected::CloseParen => "')'",
            Expected::CommaOrCloseParen => "',' or ')'",
            Expected::Param => "a flow or a number",
            Expected::EndOfInput => "'->' or end of input",
        };
        f.write_str(text)
    }
}

/// A character sequence that matches no token of the flow DSL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unexpected character sequence '{found}' at offset {offset}")]
pub struct LexError {
    pub offset: usize,
    pub found: String,
}

/// Errors raised when the token stream violates the flow grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Expected {expected} at offset {offset}, but found '{found}'")]
    UnexpectedToken {
        offset: usize,
        expected: Expected,
        found: String,
    },

    #[error("Expected {expected} at offset {offset}, but the input ended")]
    UnexpectedEnd { offset: usize, expected: Expected },

    #[error("Unknown combinator '{keyword}' at offset {offset}")]
    UnknownCombinator { offset: usize, keyword: String },

    #[error("Invalid parameter for '{keyword}' at offset {offset}: {message}")]
    InvalidParam {
        offset: usize,
        keyword: String,
        message: String,
    },

    #[error("Unconsumed input '{found}' at offset {offset} after a complete flow")]
    TrailingInput { offset: usize, found: String },

    #[error("Combinator nesting exceeds the limit of {limit} at offset {offset}")]
    DepthLimitExceeded { offset: usize, limit: usize },

    #[error("Combinator '{keyword}' at offset {offset} is registered as a plain node type")]
    PlainCombinator { offset: usize, keyword: String },
}

impl SyntaxError {
    pub fn offset(&self) -> usize {
        match self {
            SyntaxError::UnexpectedToken { offset, .. }
            | SyntaxError::UnexpectedEnd { offset, .. }
            | SyntaxError::UnknownCombinator { offset, .. }
            | SyntaxError::InvalidParam { offset, .. }
            | SyntaxError::TrailingInput { offset, .. }
            | SyntaxError::DepthLimitExceeded { offset, .. }
            | SyntaxError::PlainCombinator { offset, .. } => *offset,
        }
    }
}

/// Any failure of a `parse` call. Parsing is all-or-nothing, so no tree accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Byte offset into the source text where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.offset,
            ParseError::Syntax(e) => e.offset(),
        }
    }

    /// Renders the error with the offending source line and a caret under the error column.
    pub fn render(&self, source: &str) -> String {
        let offset = self.offset().min(source.len());
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);
        let line_no = source[..line_start].matches('\n').count() + 1;
        let column = source[line_start..offset].chars().count();

        format!(
            "{}\n  --> line {}, column {}\n   | {}\n   | {}^",
            self,
            line_no,
            column + 1,
            &source[line_start..line_end],
            " ".repeat(column)
        )
    }
}

/// Errors that can occur when a deserialized tree breaks the node model invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeModelError {
    #[error("Plain node '{0}' must not carry params")]
    PlainWithParams(String),

    #[error("Combinator node '{node_id}' of type '{node_type}' is missing its params")]
    MissingParams { node_id: String, node_type: String },

    #[error("Combinator node '{0}' has an empty params list")]
    EmptyParams(String),

    #[error("Param {index} of node '{node_id}' is a sequence of {len} nodes; sequences need at least two")]
    ShortSequence {
        node_id: String,
        index: usize,
        len: usize,
    },

    #[error("Param {index} of {node_type} node '{node_id}' is a number, but only flow branches are allowed")]
    UnexpectedCount {
        node_id: String,
        node_type: String,
        index: usize,
    },

    #[error("Retry node '{0}' must carry exactly one repeat count")]
    InvalidRetry(String),
}
