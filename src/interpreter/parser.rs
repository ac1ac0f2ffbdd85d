/// Parser entry points and the shared result type.
///
/// Contains `parse`, which turns a whole token stream into statements, and
/// `parse_expression`, the top of the precedence ladder.
pub mod core;

/// Prefix operators, exponentiation, postfix subscripts and primary
/// expressions.
///
/// Handles everything that binds tighter than `*` and `/`.
pub mod unary;

/// Left-associative binary operator levels.
///
/// Implements `or`, `and`, comparisons, additive and multiplicative
/// operators.
pub mod binary;

/// Statement lists.
///
/// Parses sequences of statements up to a caller-supplied set of terminating
/// keywords, skipping blank lines.
pub mod block;

/// Token helpers shared by all parser levels.
///
/// Provides lookahead, expectation checks, error construction and the
/// comma-separated list parsers used by calls and literals.
pub mod utils;

/// Statement parsing.
///
/// Implements assignments, definitions, control flow, `return` and
/// `;`-separated statement groups.
pub mod statement;
