use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Maps a token kind to its corresponding binary operator.
///
/// Returns `Some(BinaryOperator)` when the token represents a binary operator
/// (arithmetic, elementwise, set, comparison or logical). Returns `None` for
/// all other tokens.
///
/// # Example
/// ```
/// use mathpy::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(TokenKind::DotStar),
///            Some(BinaryOperator::ElemMul));
/// assert_eq!(token_to_binary_operator(TokenKind::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Caret => Some(BinaryOperator::Pow),
        TokenKind::DotPlus => Some(BinaryOperator::ElemAdd),
        TokenKind::DotMinus => Some(BinaryOperator::ElemSub),
        TokenKind::DotStar => Some(BinaryOperator::ElemMul),
        TokenKind::DotSlash => Some(BinaryOperator::ElemDiv),
        TokenKind::DotCaret => Some(BinaryOperator::ElemPow),
        TokenKind::Pipe => Some(BinaryOperator::Union),
        TokenKind::Ampersand => Some(BinaryOperator::Intersection),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

/// Parses one left-associative precedence level.
///
/// `operand` parses the next-tighter level and `accepts` selects the
/// operators that belong to this one.
///
/// Grammar: `level := operand (op operand)*`
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepts: fn(BinaryOperator) -> bool)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = operand(tokens)?;

    loop {
        if let Some(token) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token.kind)
           && accepts(op)
        {
            let line = token.line;
            tokens.next();

            let right = operand(tokens)?;

            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line };
            continue;
        }

        break;
    }

    Ok(left)
}

/// Parses logical OR expressions.
///
/// Handles left-associative chains of `or`. This is the lowest precedence
/// level.
///
/// Grammar: `logical_or := logical_and ("or" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_logical_and, |op| op == BinaryOperator::Or)
}

/// Parses logical AND expressions.
///
/// Grammar: `logical_and := comparison ("and" comparison)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_comparison, |op| op == BinaryOperator::And)
}

/// Parses relational and equality operators.
///
/// This parser handles all comparison operators:
/// `<`, `>`, `<=`, `>=`, `==`, `!=`. Chains such as `a < b < c` nest to the
/// left: `(a < b) < c`.
///
/// Grammar: `comparison := additive (cmp additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_additive, BinaryOperator::is_comparison)
}

/// Parses addition-level expressions.
///
/// Handles left-associative operators `+`, `-`, `.+`, `.-` and the set
/// operators `|` and `&`.
///
/// Grammar: `additive := multiplicative (("+" | "-" | ".+" | ".-" | "|" | "&")
/// multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op,
                 BinaryOperator::Add
                 | BinaryOperator::Sub
                 | BinaryOperator::ElemAdd
                 | BinaryOperator::ElemSub
                 | BinaryOperator::Union
                 | BinaryOperator::Intersection)
    })
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators `*`, `/`, `.*` and `./`.
///
/// Grammar: `multiplicative := unary (("*" | "/" | ".*" | "./") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, parse_unary, |op| {
        matches!(op,
                 BinaryOperator::Mul
                 | BinaryOperator::Div
                 | BinaryOperator::ElemMul
                 | BinaryOperator::ElemDiv)
    })
}
