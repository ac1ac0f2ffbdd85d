use std::iter::Peekable;

use log::debug;

use crate::{
    ast::{Expr, Statement},
    error::SyntaxError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{binary::parse_logical_or, block::parse_statement_list, utils::unexpected},
    },
};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a whole program.
///
/// The token stream must be the output of
/// [`tokenize`](crate::interpreter::lexer::tokenize), ending with an `Eof`
/// token. Every statement up to `Eof` is parsed; anything left over is an
/// error.
///
/// # Parameters
/// - `tokens`: The complete token sequence.
///
/// # Returns
/// The top-level statements in source order.
///
/// # Example
/// ```
/// use mathpy::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("x = 1\nprint(x)\n").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse(tokens: &[Token]) -> ParseResult<Vec<Statement>> {
    let mut iter = tokens.iter().peekable();
    let statements = parse_statement_list(&mut iter, &[])?;

    match iter.next() {
        None => {},
        Some(token) if token.kind == TokenKind::Eof => {},
        other => return Err(unexpected(other, "a statement")),
    }

    debug!("parsed {} top-level statements", statements.len());
    Ok(statements)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical OR, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of the expression.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_logical_or(tokens)
}
