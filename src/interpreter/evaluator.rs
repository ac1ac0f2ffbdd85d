/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions, including
/// arithmetic, comparisons, logical operators, and set operations.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements the unary operators: identity, arithmetic negation and logical
/// NOT.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the interpreter, statement execution, the control-flow signal
/// and expression dispatch.
pub mod core;

/// Evaluation of for-loops.
///
/// Lists the elements of an iterable value, rebinds the loop variable and
/// executes the loop body.
pub mod for_loop;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;

/// List and set literals.
pub mod literal;

/// Indexing and slicing of arrays, strings and tuples.
pub mod subscript;
