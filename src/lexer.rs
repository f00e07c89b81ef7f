//! Tokenizer for the flow DSL.
//!
//! Turns raw text such as `a -> (retry, b, 3)` into a stream of tokens paired
//! with their byte spans. Whitespace is skipped; anything that is not an
//! identifier, an integer, `->`, `,`, `(` or `)` is a [`LexError`].

use crate::error::LexError;
use logos::Logos;
use std::fmt;

pub type Span = std::ops::Range<usize>;

/// A token together with its byte range in the source.
pub type Spanned<'src> = (Token<'src>, Span);

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    #[token("->")]
    Arrow,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // All-digit runs are numbers; the grammar still accepts them as node ids.
    #[regex(r"[0-9]+", |lex| lex.slice(), priority = 3)]
    Number(&'src str),

    #[regex(r"[A-Za-z0-9_]+", |lex| lex.slice())]
    Ident(&'src str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Arrow => f.write_str("->"),
            Token::Comma => f.write_str(","),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Number(s) | Token::Ident(s) => f.write_str(s),
        }
    }
}

/// Tokenize DSL source text, failing on the first unrecognised character sequence.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, LexError> {
    let mut tokens = Vec::new();

    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(LexError {
                    offset: span.start,
                    found: source[span].to_string(),
                });
            }
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized flow source");
    Ok(tokens)
}
