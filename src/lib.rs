//! # mathpy
//!
//! mathpy is an interpreter for a small MATLAB-flavoured scripting language
//! written in Rust. It tokenizes, parses and evaluates scripts with support
//! for numbers, strings, sets, numeric arrays, user-defined functions and a
//! library of mathematical builtins.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{evaluator::core::Interpreter, lexer::tokenize, parser::core::parse};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of a script as a tree. The AST is
/// built by the parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while running a script.
/// Every error carries the source location it refers to and renders as a
/// single line of text.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Implements `std::error::Error` so errors can be boxed and chained.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and environments to provide a complete runtime for
/// scripts.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
pub mod interpreter;
/// General utilities for safe numeric conversion and formatting.
///
/// These helpers are used throughout the evaluator, the value types and the
/// builtins.
///
/// # Responsibilities
/// - Convert between `i64`, `usize` and `f64` without silent data loss.
/// - Format reals the way the language prints them.
pub mod util;

/// Runs a script on an existing interpreter.
///
/// The whole source is tokenized and parsed before anything is executed, so
/// a syntax error anywhere in the script prevents all output. Globals defined
/// by the script remain in the interpreter afterwards.
///
/// # Errors
/// Returns the first lexing, parsing or runtime error.
///
/// # Examples
/// ```
/// use mathpy::{
///     interpreter::evaluator::{core::Interpreter, function::plot::TextPlotter},
///     run,
/// };
///
/// let mut interpreter = Interpreter::with_io(Box::new(std::io::sink()),
///                                            Box::new(TextPlotter::default()));
/// run("x = [1, 2] .* [3, 4]\n", &mut interpreter).unwrap();
///
/// assert_eq!(interpreter.global("x").unwrap().to_string(), "[3 8]");
/// ```
pub fn run(source: &str, interpreter: &mut Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    interpreter.interpret(&program)?;
    Ok(())
}

/// Runs a script on a fresh interpreter that prints to standard output.
///
/// # Errors
/// Returns an error if lexing, parsing or evaluation fails.
///
/// # Examples
/// ```
/// use mathpy::get_result;
///
/// // Simple assignment: no error should occur.
/// assert!(get_result("result = 2 + 2\n").is_ok());
///
/// // 'x' is not defined.
/// assert!(get_result("y = x + 1\n").is_err());
/// ```
pub fn get_result(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    run(source, &mut Interpreter::new())
}
