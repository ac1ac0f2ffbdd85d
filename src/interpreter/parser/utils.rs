use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::SyntaxError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{ParseResult, parse_expression},
    },
};

/// Returns the kind of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>)
                                                       -> Option<TokenKind>
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map(|token| token.kind)
}

/// Returns the kind of the token after the next one.
///
/// Used for the two-token decisions `ID =` (assignment) and `ID (` (call).
pub(in crate::interpreter::parser) fn peek_second_kind<'a, I>(tokens: &Peekable<I>)
                                                              -> Option<TokenKind>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    ahead.next().map(|token| token.kind)
}

/// Consumes the next token if it has the given kind.
///
/// # Returns
/// The consumed token, or `None` when the next token is of another kind.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>,
                                                 kind: TokenKind)
                                                 -> Option<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    tokens.next_if(|token| token.kind == kind)
}

/// Skips any number of newline tokens.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while eat(tokens, TokenKind::NewLine).is_some() {}
}

/// Builds the error for a token that does not fit the grammar.
///
/// The `Eof` token (or a missing token) becomes
/// [`SyntaxError::UnexpectedEndOfInput`]; anything else becomes
/// [`SyntaxError::UnexpectedToken`] carrying the token's text, with keywords
/// named as such (`keyword 'end'`).
pub(in crate::interpreter::parser) fn unexpected(token: Option<&Token>,
                                                 expected: &str)
                                                 -> SyntaxError {
    match token {
        Some(token) if token.kind != TokenKind::Eof => {
            let found = if token.kind.is_keyword() {
                format!("keyword '{}'", token.text)
            } else {
                token.text.clone()
            };
            SyntaxError::UnexpectedToken { expected: expected.to_string(),
                                           found,
                                           line:     token.line,
                                           column:   token.column, }
        },
        Some(token) => SyntaxError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                           line:     token.line,
                                                           column:   token.column, },
        None => SyntaxError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                    line:     0,
                                                    column:   0, },
    }
}

/// Consumes the next token, requiring it to be of the given kind.
///
/// # Errors
/// Returns a `SyntaxError` describing `expected` if the token differs.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == kind => Ok(token),
        other => Err(unexpected(other, expected)),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by function argument lists and parameter lists. It
/// repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list. The
/// closing token is consumed.
///
/// Grammar (simplified): `list := [ item ("," item)* ] closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token kind that terminates the list (e.g. `)`).
/// - `description`: How the closing token is named in error messages.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `SyntaxError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: TokenKind,
    description: &str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    if eat(tokens, closing).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some(token) if token.kind == TokenKind::Comma => {},
            Some(token) if token.kind == closing => break,
            other => return Err(unexpected(other, &format!("',' or {description}"))),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `SyntaxError` if the next token is not an identifier. Keywords
/// are never identifiers.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, TokenKind::Identifier, "an identifier").map(|token| token.text.clone())
}

/// Parses the elements of a bracketed literal after its opening bracket.
///
/// Newlines may appear after the opening bracket and before or after each
/// element. Elements are separated by commas; a trailing comma is accepted.
/// The closing bracket is consumed.
///
/// Grammar: `elements := { NEWLINE } [ expression { NEWLINE } { "," { NEWLINE }
/// expression { NEWLINE } } [ "," ] ] { NEWLINE } closing`
fn parse_bracketed_elements<'a, I>(tokens: &mut Peekable<I>,
                                   closing: TokenKind,
                                   description: &str)
                                   -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut elements = Vec::new();

    loop {
        skip_newlines(tokens);
        if eat(tokens, closing).is_some() {
            break;
        }

        elements.push(parse_expression(tokens)?);
        skip_newlines(tokens);

        match tokens.next() {
            Some(token) if token.kind == TokenKind::Comma => {},
            Some(token) if token.kind == closing => break,
            other => return Err(unexpected(other, &format!("',' or {description}"))),
        }
    }

    Ok(elements)
}

/// Parses a list literal of the form `[ expr1, expr2, ..., exprN ]`.
///
/// An empty list `[]` is accepted.
///
/// # Returns
/// An `Expr::ListLiteral` with its list of element expressions.
///
/// # Errors
/// Returns a `SyntaxError` if `[` is missing, an element fails to parse or the
/// closing `]` is missing.
pub fn parse_list_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let open = expect(tokens, TokenKind::LBracket, "'['")?;
    let elements = parse_bracketed_elements(tokens, TokenKind::RBracket, "']'")?;

    Ok(Expr::ListLiteral { elements,
                           line: open.line })
}

/// Parses a set literal of the form `{ expr1, expr2, ..., exprN }`.
///
/// Elements are parsed using [`parse_expression`] and collected into an
/// `Expr::SetLiteral` node.
/// An empty set `{}` is accepted.
///
/// Grammar: `set := "{" (expression ("," expression)*)? "}"`.
///
/// # Errors
/// Returns a `SyntaxError` if:
/// - `{` is missing,
/// - elements fail to parse,
/// - the closing `}` is missing.
pub fn parse_set_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let open = expect(tokens, TokenKind::LBrace, "'{'")?;
    let elements = parse_bracketed_elements(tokens, TokenKind::RBrace, "'}'")?;

    Ok(Expr::SetLiteral { elements,
                          line: open.line })
}
