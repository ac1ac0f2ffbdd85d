#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// A name was not bound anywhere along the environment chain.
    UndefinedName {
        /// The name that failed to resolve.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A binary operator was applied to operands it has no meaning for.
    UnsupportedOperator {
        /// The operator symbol.
        operator: String,
        /// Kind of the left operand.
        left:     &'static str,
        /// Kind of the right operand.
        right:    &'static str,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A unary operator was applied to an operand it has no meaning for.
    UnsupportedUnaryOperator {
        /// The operator symbol.
        operator: String,
        /// Kind of the operand.
        operand:  &'static str,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A call named something that is neither a function nor a builtin.
    NotCallable {
        /// The name used in the call.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `for` loop was given a value that cannot be iterated.
    NotIterable {
        /// Kind of the value.
        kind: &'static str,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a builtin.
    ArgumentCountMismatch {
        /// The builtin name.
        name:     String,
        /// Description of the accepted argument counts.
        expected: String,
        /// The number of arguments actually supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Two arrays could not be combined because their shapes disagree.
    ShapeMismatch {
        /// Shape of the left operand.
        left:  Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An array with more than one element was used as a condition.
    AmbiguousTruth {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted scalar division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index fell outside the axis it was applied to.
    IndexOutOfBounds {
        /// The index that was requested.
        index:  i64,
        /// The length of the indexed axis.
        length: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A subscript failed; wraps the underlying cause.
    Subscript {
        /// What went wrong while indexing.
        source: Box<Self>,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A linear-algebra routine could not produce a result.
    LinearAlgebra {
        /// Details about the failure.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An argument was invalid or out of range.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `return` statement executed outside any function body.
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The plotting sink reported a failure.
    Plot {
        /// Message from the plotter.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Writing program output failed.
    Output {
        /// Message from the underlying writer.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// Returns the source line attached to the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UndefinedName { line, .. }
            | Self::UnsupportedOperator { line, .. }
            | Self::UnsupportedUnaryOperator { line, .. }
            | Self::NotCallable { line, .. }
            | Self::NotIterable { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::TypeError { line, .. }
            | Self::ShapeMismatch { line, .. }
            | Self::AmbiguousTruth { line }
            | Self::DivisionByZero { line }
            | Self::Overflow { line }
            | Self::IndexOutOfBounds { line, .. }
            | Self::Subscript { line, .. }
            | Self::LinearAlgebra { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::ReturnOutsideFunction { line }
            | Self::Plot { line, .. }
            | Self::Output { line, .. } => *line,
        }
    }

    /// The message without its line prefix.
    fn reason(&self) -> String {
        match self {
            Self::UndefinedName { name, .. } => format!("Name '{name}' is not defined."),
            Self::UnsupportedOperator { operator,
                                        left,
                                        right,
                                        .. } => {
                format!("Unsupported operator '{operator}' for {left} and {right}.")
            },
            Self::UnsupportedUnaryOperator { operator, operand, .. } => {
                format!("Unsupported unary operator '{operator}' for {operand}.")
            },
            Self::NotCallable { name, .. } => format!("'{name}' is not a function."),
            Self::NotIterable { kind, .. } => format!("Value of type {kind} is not iterable."),
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          .. } => {
                format!("{name}() takes {expected} argument(s) ({found} given).")
            },
            Self::TypeError { details, .. } => format!("Type error: {details}."),
            Self::ShapeMismatch { left, right, .. } => {
                format!("Shapes {left:?} and {right:?} are not compatible.")
            },
            Self::AmbiguousTruth { .. } => {
                "The truth value of an array with more than one element is ambiguous.".to_string()
            },
            Self::DivisionByZero { .. } => "Division by zero.".to_string(),
            Self::Overflow { .. } => "Integer overflow while trying to compute result.".to_string(),
            Self::IndexOutOfBounds { index, length, .. } => {
                format!("Index {index} is out of bounds for axis with size {length}.")
            },
            Self::Subscript { source, .. } => format!("Subscript error: {}", source.reason()),
            Self::LinearAlgebra { details, .. } => format!("Linear algebra error: {details}."),
            Self::InvalidArgument { details, .. } => format!("Invalid argument: {details}."),
            Self::ReturnOutsideFunction { .. } => "'return' outside function.".to_string(),
            Self::Plot { details, .. } => format!("Plotting failed: {details}."),
            Self::Output { details, .. } => format!("Failed to write output: {details}."),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error on line {}: {}", self.line(), self.reason())
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Subscript { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
