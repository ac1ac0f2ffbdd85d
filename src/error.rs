/// Lexing errors.
///
/// Raised when the tokenizer meets a character that starts no token.
pub mod lex_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include things like undefined names, unsupported operand
/// combinations, failed subscripts or singular matrices.
pub mod runtime_error;
/// Syntax errors.
///
/// Defines the errors the parser reports when the token stream does not match
/// the grammar.
pub mod syntax_error;

pub use lex_error::LexError;
pub use runtime_error::RuntimeError;
pub use syntax_error::SyntaxError;
