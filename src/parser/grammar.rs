use super::combinators::{CombinatorRule, Registry};
use crate::ast::{Flow, Node, NodeType, Param};
use crate::error::{Expected, SyntaxError};
use crate::lexer::{Span, Spanned, Token};
use std::mem;
use std::sync::Arc;

/// Table-free parser over a token stream.
///
/// ```text
/// Flow       := Element (ARROW Element)*
/// Element    := Ident | Combinator
/// Combinator := LPAREN Keyword COMMA Ident (COMMA Param)+ RPAREN
/// Param      := Flow | Number
/// ```
///
/// Open combinators live on an explicit stack instead of the call stack, so
/// nesting depth is bounded only by memory.
pub(super) struct Grammar<'p, 'src> {
    tokens: Vec<Spanned<'src>>,
    pos: usize,
    /// Offset reported for errors at end of input.
    end: usize,
    registry: &'p Registry,
    max_depth: Option<usize>,
}

/// A combinator whose closing parenthesis has not been reached yet.
struct Frame<'p, 'src> {
    rule: &'p Arc<dyn CombinatorRule>,
    keyword: &'src str,
    node_id: &'src str,
    params: Vec<Param>,
    /// Source offset of each entry in `params`.
    offsets: Vec<usize>,
    /// Elements of the branch currently being read.
    branch: Vec<Node>,
}

enum Step {
    /// Read an element into the innermost open chain.
    Element,
    /// Read the next parameter of the innermost combinator.
    Param,
    /// An element is complete; attach it and look for `->`.
    Attach(Node),
    /// A parameter is complete; expect `,` or `)`.
    AfterParam,
}

impl<'p, 'src> Grammar<'p, 'src> {
    pub(super) fn new(
        tokens: Vec<Spanned<'src>>,
        end: usize,
        registry: &'p Registry,
        max_depth: Option<usize>,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            registry,
            max_depth,
        }
    }

    /// Parses the whole token stream as one flow; leftover tokens are an error.
    pub(super) fn parse_document(mut self) -> Result<Flow, SyntaxError> {
        let mut top: Vec<Node> = Vec::new();
        let mut open: Vec<Frame<'p, 'src>> = Vec::new();
        let mut step = Step::Element;

        loop {
            step = match step {
                Step::Element => {
                    let (token, span) = self.next_or_end(Expected::Element)?;
                    match token {
                        Token::LParen => {
                            open.push(self.open_combinator(span, open.len())?);
                            Step::Param
                        }
                        Token::Ident(id) | Token::Number(id) => Step::Attach(Node::plain(id)),
                        other => return Err(unexpected(&span, Expected::Element, other)),
                    }
                }

                Step::Param => {
                    let Some(frame) = open.last_mut() else {
                        unreachable!("parameters are only read inside a combinator")
                    };
                    frame.offsets.push(self.current_offset());
                    match self.parse_count(frame.keyword)? {
                        Some(count) => {
                            frame.params.push(Param::Count(count));
                            Step::AfterParam
                        }
                        None => Step::Element,
                    }
                }

                Step::Attach(node) => {
                    match open.last_mut() {
                        Some(frame) => frame.branch.push(node),
                        None => top.push(node),
                    }
                    if self.peek() == Some(Token::Arrow) {
                        self.pos += 1;
                        Step::Element
                    } else if let Some(frame) = open.last_mut() {
                        let branch = mem::take(&mut frame.branch);
                        frame.params.push(Param::from_branch(branch));
                        Step::AfterParam
                    } else {
                        break;
                    }
                }

                Step::AfterParam => {
                    let (token, span) = self.next_or_end(Expected::CommaOrCloseParen)?;
                    match token {
                        Token::Comma => Step::Param,
                        Token::RParen => {
                            let depth = open.len();
                            let Some(frame) = open.pop() else {
                                unreachable!("a parameter list always belongs to an open combinator")
                            };
                            Step::Attach(close_combinator(frame, depth)?)
                        }
                        other => return Err(unexpected(&span, Expected::CommaOrCloseParen, other)),
                    }
                }
            };
        }

        if let Some((token, span)) = self.tokens.get(self.pos) {
            return Err(SyntaxError::TrailingInput {
                offset: span.start,
                found: token.to_string(),
            });
        }
        Ok(Flow::new(top))
    }

    /// Reads `Keyword COMMA Ident COMMA` after an opening parenthesis.
    fn open_combinator(&mut self, open: Span, enclosing: usize) -> Result<Frame<'p, 'src>, SyntaxError> {
        if let Some(limit) = self.max_depth {
            if enclosing + 1 > limit {
                return Err(SyntaxError::DepthLimitExceeded {
                    offset: open.start,
                    limit,
                });
            }
        }

        let (token, span) = self.next_or_end(Expected::CombinatorKeyword)?;
        let keyword = match token {
            Token::Ident(keyword) => keyword,
            other => return Err(unexpected(&span, Expected::CombinatorKeyword, other)),
        };
        let registry = self.registry;
        let rule = registry
            .get(keyword)
            .ok_or_else(|| SyntaxError::UnknownCombinator {
                offset: span.start,
                keyword: keyword.to_string(),
            })?;
        if rule.node_type() == NodeType::Plain {
            return Err(SyntaxError::PlainCombinator {
                offset: span.start,
                keyword: keyword.to_string(),
            });
        }

        self.expect(Token::Comma, Expected::Comma)?;
        let node_id = self.expect_identifier()?;
        self.expect(Token::Comma, Expected::Comma)?;

        Ok(Frame {
            rule,
            keyword,
            node_id,
            params: Vec::new(),
            offsets: Vec::new(),
            branch: Vec::new(),
        })
    }

    /// A number directly followed by `,` or `)` is a literal; anything else starts a branch.
    fn parse_count(&mut self, keyword: &str) -> Result<Option<u32>, SyntaxError> {
        let (Some(Token::Number(text)), Some(Token::Comma | Token::RParen)) =
            (self.peek(), self.peek_nth(1))
        else {
            return Ok(None);
        };

        let offset = self.current_offset();
        self.pos += 1;
        text.parse::<u32>()
            .map(Some)
            .map_err(|_| SyntaxError::InvalidParam {
                offset,
                keyword: keyword.to_string(),
                message: format!("'{}' is out of range for a count", text),
            })
    }

    fn expect(&mut self, want: Token<'src>, expected: Expected) -> Result<(), SyntaxError> {
        let (token, span) = self.next_or_end(expected)?;
        if token == want {
            Ok(())
        } else {
            Err(unexpected(&span, expected, token))
        }
    }

    fn expect_identifier(&mut self) -> Result<&'src str, SyntaxError> {
        let (token, span) = self.next_or_end(Expected::Identifier)?;
        match token {
            Token::Ident(id) | Token::Number(id) => Ok(id),
            other => Err(unexpected(&span, Expected::Identifier, other)),
        }
    }

    fn next_or_end(&mut self, expected: Expected) -> Result<Spanned<'src>, SyntaxError> {
        match self.tokens.get(self.pos) {
            Some(spanned) => {
                self.pos += 1;
                Ok(spanned.clone())
            }
            None => Err(SyntaxError::UnexpectedEnd {
                offset: self.end,
                expected,
            }),
        }
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).map(|(token, _)| *token)
    }

    fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.end, |(_, span)| span.start)
    }
}

/// Checks a finished parameter list against its rule and builds the node.
fn close_combinator(frame: Frame<'_, '_>, depth: usize) -> Result<Node, SyntaxError> {
    let Frame {
        rule,
        keyword,
        node_id,
        params,
        offsets,
        ..
    } = frame;

    rule.check_params(&params).map_err(|violation| {
        let index = violation.index.min(offsets.len() - 1);
        SyntaxError::InvalidParam {
            offset: offsets[index],
            keyword: keyword.to_string(),
            message: violation.message,
        }
    })?;

    tracing::trace!(
        keyword,
        node_id,
        params = params.len(),
        depth,
        "parsed combinator"
    );
    Ok(Node::combinator(rule.node_type(), node_id, params))
}

fn unexpected(span: &Span, expected: Expected, found: Token<'_>) -> SyntaxError {
    SyntaxError::UnexpectedToken {
        offset: span.start,
        expected,
        found: found.to_string(),
    }
}
