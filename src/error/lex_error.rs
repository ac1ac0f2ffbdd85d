/// A character that no token pattern accepts.
///
/// Tokenization stops at the first such character; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// The offending character.
    pub character: char,
    /// Byte offset of the character in the source.
    pub position:  usize,
    /// The source line where the error occurred.
    pub line:      usize,
    /// Offset of the character from the start of its line.
    pub column:    usize,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
               "Error on line {}, column {}: Unexpected character '{}' at position {}.",
               self.line, self.column, self.character, self.position)
    }
}

impl std::error::Error for LexError {}
