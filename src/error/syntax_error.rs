#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while parsing a token stream.
pub enum SyntaxError {
    /// Found a token that does not fit the grammar at this point.
    UnexpectedToken {
        /// Description of what the parser was looking for.
        expected: String,
        /// Source text of the token encountered, prefixed with `keyword`
        /// for reserved words.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// Offset of the token from the start of its line.
        column:   usize,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// Description of what the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// Offset of the end of input from the start of its line.
        column:   usize,
    },
}

impl SyntaxError {
    /// Returns the line the error was reported on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. } | Self::UnexpectedEndOfInput { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected,
                                    found,
                                    line,
                                    column, } => write!(f,
                                                        "Error on line {line}, column {column}: Expected {expected}. Unexpected token: {found}"),
            Self::UnexpectedEndOfInput { expected, line, column } => write!(f,
                                                                            "Error on line {line}, column {column}: Expected {expected} but reached the end of input."),
        }
    }
}

impl std::error::Error for SyntaxError {}
