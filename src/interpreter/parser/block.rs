use std::iter::Peekable;

use crate::{
    ast::Statement,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{peek_kind, skip_newlines},
        },
    },
};

/// Parses statements until a terminator keyword or the end of input.
///
/// Blank lines between statements are skipped. The terminator itself is left
/// in the stream for the caller to consume, so an `if` block can stop at
/// either `else` or `end` while loop and function bodies stop only at `end`.
///
/// Grammar: `statement_list := { NEWLINE | statement }`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first statement.
/// - `terminators`: Token kinds that end the list.
///
/// # Returns
/// The parsed statements in source order.
pub fn parse_statement_list<'a, I>(tokens: &mut Peekable<I>,
                                   terminators: &[TokenKind])
                                   -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_newlines(tokens);

        match peek_kind(tokens) {
            None | Some(TokenKind::Eof) => break,
            Some(kind) if terminators.contains(&kind) => break,
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok(statements)
}
