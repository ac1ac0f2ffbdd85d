use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{BinaryOperator, Expr, Index, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::token_to_binary_operator,
            core::{ParseResult, parse_expression},
            utils::{
                eat, expect, parse_comma_separated, parse_list_literal, parse_set_literal,
                peek_kind, peek_second_kind, unexpected,
            },
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `+`   (identity)
/// - `-`   (numeric negation)
/// - `not` (logical not)
///
/// Unary operators are right-associative, so an input like `not -x` is parsed
/// as `not (-x)`. A prefix applies to the whole power expression that follows,
/// so `-2 ^ 2` is `-(2 ^ 2)`.
///
/// Grammar:
/// ```text
///     unary := ("+" | "-" | "not") unary
///            | power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let op = match peek_kind(tokens) {
        Some(TokenKind::Plus) => UnaryOperator::Plus,
        Some(TokenKind::Minus) => UnaryOperator::Negate,
        Some(TokenKind::Not) => UnaryOperator::Not,
        _ => return parse_power(tokens),
    };

    let line = tokens.next().map_or(0, |token| token.line);
    let expr = parse_unary(tokens)?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses exponentiation expressions.
///
/// Exponentiation is right-associative: `a ^ b ^ c` parses as `a ^ (b ^ c)`.
/// The exponent is parsed at the unary level, which allows `2 ^ -1`.
///
/// Grammar: `power := postfix [ ("^" | ".^") unary ]`
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let base = parse_postfix(tokens)?;

    if let Some(token) = tokens.peek()
       && let Some(op) = token_to_binary_operator(token.kind)
       && matches!(op, BinaryOperator::Pow | BinaryOperator::ElemPow)
    {
        let line = token.line;
        tokens.next();

        let exponent = parse_unary(tokens)?;

        return Ok(Expr::BinaryOp { left: Box::new(base),
                                   op,
                                   right: Box::new(exponent),
                                   line });
    }

    Ok(base)
}

/// Parses a primary expression followed by any number of subscripts.
///
/// Multiple chained subscripts are allowed:
/// ```text
///        a[0][1]
///        m[1:, 0]
/// ```
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut expr = parse_primary(tokens)?;

    while let Some(open) = eat(tokens, TokenKind::LBracket) {
        let indices = parse_subscript_indices(tokens)?;
        expect(tokens, TokenKind::RBracket, "']' to close the subscript")?;

        expr = Expr::Subscript { target: Box::new(expr),
                                 indices,
                                 line: open.line };
    }

    Ok(expr)
}

/// Parses the comma-separated entries between `[` and `]` of a subscript.
///
/// Each entry is either an expression or a slice `[start]:[end]` with both
/// bounds optional.
///
/// Grammar:
/// ```text
///     indices := index ("," index)*
///     index   := expression | [expression] ":" [expression]
/// ```
fn parse_subscript_indices<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Index>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut indices = Vec::new();

    loop {
        let start = if peek_kind(tokens) == Some(TokenKind::Colon) {
            None
        } else {
            Some(parse_expression(tokens)?)
        };

        let index = if eat(tokens, TokenKind::Colon).is_some() {
            let end = match peek_kind(tokens) {
                Some(TokenKind::Comma | TokenKind::RBracket) => None,
                _ => Some(parse_expression(tokens)?),
            };
            Index::Slice { start, end }
        } else {
            // `start` is only `None` when a colon was seen, which is handled above.
            match start {
                Some(expr) => Index::Single(expr),
                None => return Err(unexpected(tokens.peek().copied(), "an index")),
            }
        };
        indices.push(index);

        if eat(tokens, TokenKind::Comma).is_none() {
            break;
        }
    }

    Ok(indices)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - number and string literals
/// - identifiers
/// - function calls
/// - parenthesized expressions
/// - list literals (`[ ... ]`)
/// - set literals (`{ ... }`)
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER | STRING
///              | ID "(" [ expression ("," expression)* ] ")"
///              | ID
///              | "(" expression ")"
///              | "[" elements "]"
///              | "{" elements "}"
/// ```
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    match peek_kind(tokens) {
        Some(TokenKind::Number | TokenKind::String) => parse_literal(tokens),
        Some(TokenKind::Identifier) => parse_identifier_or_call(tokens),
        Some(TokenKind::LParen) => parse_grouping(tokens),
        Some(TokenKind::LBracket) => parse_list_literal(tokens),
        Some(TokenKind::LBrace) => parse_set_literal(tokens),
        _ => Err(unexpected(tokens.peek().copied(), "an expression")),
    }
}

/// Parses a number or string literal.
///
/// Numbers written without a `.` become integers; digits that overflow `i64`
/// fall back to a real value. String literals lose their quotes.
fn parse_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    let Some(token) = tokens.next() else {
        return Err(unexpected(None, "a literal"));
    };

    let value = match token.kind {
        TokenKind::String => {
            let text = token.text
                            .strip_prefix('"')
                            .and_then(|s| s.strip_suffix('"'))
                            .unwrap_or(&token.text);
            LiteralValue::Str(Rc::from(text))
        },
        TokenKind::Number => {
            if !token.text.contains('.')
               && let Ok(value) = token.text.parse::<i64>()
            {
                LiteralValue::Integer(value)
            } else {
                let value = token.text
                                 .parse::<f64>()
                                 .map_err(|_| unexpected(Some(token), "a number"))?;
                LiteralValue::Real(value)
            }
        },
        _ => return Err(unexpected(Some(token), "a literal")),
    };

    Ok(Expr::Literal { value,
                       line: token.line })
}

/// Parses an identifier, which is either a variable or a function call.
///
/// A call is recognised by a `(` immediately following the identifier.
///
/// Grammar:
/// ```text
///     ID [ "(" [ expression ("," expression)* ] ")" ]
/// ```
fn parse_identifier_or_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let is_call = peek_second_kind(tokens) == Some(TokenKind::LParen);
    let name = expect(tokens, TokenKind::Identifier, "an identifier")?;

    if !is_call {
        return Ok(Expr::Variable { name: name.text.clone(),
                                   line: name.line, });
    }

    expect(tokens, TokenKind::LParen, "'('")?;
    let arguments = parse_comma_separated(tokens, parse_expression, TokenKind::RParen, "')'")?;

    Ok(Expr::FunctionCall { name: name.text.clone(),
                            arguments,
                            line: name.line })
}

/// Parses a parenthesized expression.
///
/// Grammar: `grouping := "(" expression ")"`
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::LParen, "'('")?;
    let expr = parse_expression(tokens)?;
    expect(tokens, TokenKind::RParen, "')'")?;
    Ok(expr)
}
