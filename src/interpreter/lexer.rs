use log::debug;
use logos::Logos;

use crate::error::LexError;

/// The category of a lexical token.
///
/// Longest match wins; on equal length the more specific pattern (keyword
/// over identifier, `==` over `=`) is chosen.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[logos(extras = LexerExtras)]
pub enum TokenKind {
    /// Numeric literal tokens, such as `42` or `3.14`.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    /// Double-quoted string literal without escapes, such as `"hello"`.
    #[regex(r#""[^"\n]*""#)]
    String,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Assign,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `.+`
    #[token(".+")]
    DotPlus,
    /// `.-`
    #[token(".-")]
    DotMinus,
    /// `.*`
    #[token(".*")]
    DotStar,
    /// `./`
    #[token("./")]
    DotSlash,
    /// `.^`
    #[token(".^")]
    DotCaret,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `|`
    #[token("|")]
    Pipe,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `def`
    #[token("def")]
    Def,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `return`
    #[token("return")]
    Return,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// `in`
    #[token("in")]
    In,
    /// `end`
    #[token("end")]
    End,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// Line break; statements and blocks are line oriented.
    #[token("\n", newline)]
    NewLine,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of input. Never matched, appended by [`tokenize`].
    Eof,
}

impl TokenKind {
    /// Whether the kind is one of the reserved words.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(self,
                 Self::Def
                 | Self::If
                 | Self::Else
                 | Self::For
                 | Self::While
                 | Self::Return
                 | Self::And
                 | Self::Or
                 | Self::Not
                 | Self::In
                 | Self::End)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset where that line starts,
/// so every token can be given a line and a column.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// A token together with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token category.
    pub kind:   TokenKind,
    /// The exact source text of the token (empty for [`TokenKind::Eof`]).
    pub text:   String,
    /// 1-based line number.
    pub line:   usize,
    /// 0-based byte offset from the start of the line.
    pub column: usize,
}

/// Advances line tracking past a newline.
fn newline(lex: &mut logos::Lexer<TokenKind>) {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
}

/// Converts source text into a flat sequence of tokens.
///
/// Whitespace and `#` comments are discarded; newlines are kept because the
/// grammar is line oriented. A [`TokenKind::Eof`] token is always appended.
///
/// # Errors
/// Returns a [`LexError`] naming the first character that starts no token.
///
/// # Example
/// ```
/// use mathpy::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("x = 1 .+ y # note").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Identifier,
///                 TokenKind::Assign,
///                 TokenKind::Number,
///                 TokenKind::DotPlus,
///                 TokenKind::Identifier,
///                 TokenKind::Eof]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer_with_extras(source, LexerExtras::default());
    let mut tokens = Vec::new();

    loop {
        let line = lexer.extras.line;
        let line_start = lexer.extras.line_start;

        let Some(kind) = lexer.next() else {
            break;
        };
        let span = lexer.span();

        let Ok(kind) = kind else {
            let character = source[span.start..].chars().next().unwrap_or('\0');
            return Err(LexError { character,
                                  position: span.start,
                                  line,
                                  column: span.start - line_start });
        };

        tokens.push(Token { kind,
                            text: lexer.slice().to_string(),
                            line,
                            column: span.start - line_start });
    }

    tokens.push(Token { kind:   TokenKind::Eof,
                        text:   String::new(),
                        line:   lexer.extras.line,
                        column: source.len() - lexer.extras.line_start, });

    debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_are_retagged_but_longer_identifiers_are_not() {
        assert_eq!(kinds("end ending in inside"),
                   vec![TokenKind::End,
                        TokenKind::Identifier,
                        TokenKind::In,
                        TokenKind::Identifier,
                        TokenKind::Eof]);
    }

    #[test]
    fn comparison_wins_over_assignment() {
        assert_eq!(kinds("a == b = c <= d"),
                   vec![TokenKind::Identifier,
                        TokenKind::EqualEqual,
                        TokenKind::Identifier,
                        TokenKind::Assign,
                        TokenKind::Identifier,
                        TokenKind::LessEqual,
                        TokenKind::Identifier,
                        TokenKind::Eof]);
    }

    #[test]
    fn number_followed_by_elementwise_operator() {
        assert_eq!(kinds("1.+2"),
                   vec![TokenKind::Number, TokenKind::DotPlus, TokenKind::Number, TokenKind::Eof]);
        let tokens = tokenize("3.25").unwrap();
        assert_eq!(tokens[0].text, "3.25");
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("x = 1\n  y = \"hi\" # comment\n").unwrap();
        let y = &tokens[4];
        assert_eq!(y.kind, TokenKind::Identifier);
        assert_eq!((y.line, y.column), (2, 2));

        let string = &tokens[6];
        assert_eq!(string.kind, TokenKind::String);
        assert_eq!(string.text, "\"hi\"");
        assert_eq!((string.line, string.column), (2, 6));

        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!((eof.line, eof.column), (3, 0));
    }

    #[test]
    fn unknown_character_is_reported_with_position() {
        let err = tokenize("x = 1\ny = $").unwrap_err();
        assert_eq!(err,
                   LexError { character: '$',
                              position:  10,
                              line:      2,
                              column:    4, });
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("print(\"abc)\n").unwrap_err();
        assert_eq!(err.character, '"');
    }
}
