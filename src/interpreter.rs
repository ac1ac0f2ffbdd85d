/// Scopes of name bindings.
///
/// Defines `Environment`, a chain of scopes from a call frame to the global
/// scope, with lookup, local binding and the rebinding used by `for` loops.
pub mod environment;
/// Executes parsed programs.
///
/// The evaluator walks statements and expressions against an environment
/// chain. It implements the numeric, array and set operators, calls user
/// functions and builtins, and writes `print` output and `plot` data to the
/// sinks the interpreter was created with.
///
/// # Responsibilities
/// - Runs statements, including `if`, `while`, `for`, `def` and `return`.
/// - Dispatches operators on the runtime kinds of their operands.
/// - Reports runtime errors with the line they occurred on.
pub mod evaluator;
/// Turns source text into tokens.
///
/// Newlines are tokens of their own because they end statements. Spaces,
/// tabs and `#` comments are skipped. Every token records the line and column
/// it starts at.
///
/// # Responsibilities
/// - Recognises numbers, strings, identifiers, keywords and operators,
///   including the dotted elementwise operators.
/// - Reports the first character that starts no token.
pub mod lexer;
/// Builds the syntax tree from tokens.
///
/// A recursive descent parser with one function per precedence level. The
/// whole token stream is parsed before anything runs.
///
/// # Responsibilities
/// - Produces `Statement` and `Expr` nodes tagged with source lines.
/// - Reports the first unexpected token or a premature end of input.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares all the value types used during interpretation:
/// integers, reals, strings, booleans, arrays, sets, tuples and functions. It
/// also provides conversions, truthiness and the printed form of every value.
pub mod value;
