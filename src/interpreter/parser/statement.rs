use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDef, Statement},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_statement_list,
            core::{ParseResult, parse_expression},
            utils::{
                eat, expect, parse_comma_separated, parse_identifier, peek_kind, peek_second_kind,
                unexpected,
            },
        },
    },
};

/// Whether the next token ends a statement.
///
/// A statement ends at a newline, at the end of input, or right before the
/// `end`/`else` keyword closing the surrounding block.
fn at_statement_boundary<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token>
{
    matches!(peek_kind(tokens),
             None | Some(TokenKind::NewLine | TokenKind::Eof | TokenKind::End | TokenKind::Else))
}

/// Consumes a run of `;` tokens.
///
/// # Returns
/// The line of the first `;`, or `None` if there was none.
fn eat_semicolons<'a, I>(tokens: &mut Peekable<I>) -> Option<usize>
    where I: Iterator<Item = &'a Token>
{
    let first = eat(tokens, TokenKind::Semicolon)?.line;
    while eat(tokens, TokenKind::Semicolon).is_some() {}
    Some(first)
}

/// Parses one logical line of statements.
///
/// Simple statements may be separated by `;`. A single statement is returned
/// as is; several on one line are grouped into a [`Statement::Compound`]. A
/// lone `;` produces [`Statement::NoOp`]. Trailing semicolons are allowed and
/// never required.
///
/// Separators are optional: a statement may be followed directly by the next
/// one on the same line, which the caller then parses separately.
///
/// Grammar: `line := [";"...] statement { ";" { ";" } statement } [";"...]`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a statement.
///
/// # Returns
/// A parsed [`Statement`] node.
///
/// # Errors
/// Returns a `SyntaxError` if a statement is malformed.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();
    let mut separator_line = None;

    loop {
        if let Some(line) = eat_semicolons(tokens) {
            separator_line.get_or_insert(line);
        } else if !statements.is_empty() {
            break;
        }

        if at_statement_boundary(tokens) {
            break;
        }
        statements.push(parse_single_statement(tokens)?);
    }

    if statements.is_empty() {
        return match separator_line {
            Some(line) => Ok(Statement::NoOp { line }),
            None => Err(unexpected(tokens.peek().copied(), "a statement")),
        };
    }

    if statements.len() == 1 {
        Ok(statements.remove(0))
    } else {
        Ok(Statement::Compound(statements))
    }
}

/// Parses a single statement.
///
/// A statement may be one of:
/// - an assignment (`x = ...`),
/// - a function definition (`def ...`),
/// - an `if`, `while` or `for` block,
/// - a `return`,
/// - an expression used as a statement.
///
/// Parsing is attempted in that order; if nothing else matches, the input is
/// parsed as an expression statement.
fn parse_single_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    if let Some(statement) = parse_assignment(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_function_definition(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_if(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_while(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_for(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_return(tokens)? {
        return Ok(statement);
    }

    let line = tokens.peek().map_or(0, |token| token.line);
    let expr = parse_expression(tokens)?;

    Ok(Statement::Expression { expr, line })
}

/// Parses an assignment of the form `<identifier> = <expression>`.
///
/// An assignment is recognised by an identifier immediately followed by `=`.
/// If the pattern does not match, no input is consumed.
///
/// # Returns
/// - `Ok(Some(Statement::Assign))` if an assignment is parsed,
/// - `Ok(None)` if no assignment is present.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    if peek_kind(tokens) != Some(TokenKind::Identifier)
       || peek_second_kind(tokens) != Some(TokenKind::Assign)
    {
        return Ok(None);
    }

    let name = expect(tokens, TokenKind::Identifier, "an identifier")?;
    expect(tokens, TokenKind::Assign, "'='")?;
    let value = parse_expression(tokens)?;

    Ok(Some(Statement::Assign { name: name.text.clone(),
                                value,
                                line: name.line }))
}

/// Consumes a `:` and the block that follows it, up to one of `terminators`.
///
/// The terminator is left for the caller.
fn parse_block_body<'a, I>(tokens: &mut Peekable<I>,
                           terminators: &[TokenKind])
                           -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::Colon, "':'")?;
    parse_statement_list(tokens, terminators)
}

/// Parses a function definition.
///
/// ```text
///     def name(param1, param2, ...):
///         ...
///     end
/// ```
///
/// The parameter list may be empty. The body is any statement list closed by
/// `end`.
///
/// # Returns
/// - `Ok(Some(Statement::FunctionDef))` if a definition is parsed,
/// - `Ok(None)` if the next token is not `def`.
///
/// # Errors
/// Returns a `SyntaxError` if the name, parentheses, parameters, `:` or the
/// closing `end` are missing or malformed.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = eat(tokens, TokenKind::Def) else {
        return Ok(None);
    };

    let name = parse_identifier(tokens)?;
    expect(tokens, TokenKind::LParen, "'('")?;
    let params = parse_comma_separated(tokens, parse_identifier, TokenKind::RParen, "')'")?;

    let body = parse_block_body(tokens, &[TokenKind::End])?;
    expect(tokens, TokenKind::End, "'end'")?;

    Ok(Some(Statement::FunctionDef(Rc::new(FunctionDef { name,
                                                          params,
                                                          body,
                                                          line: keyword.line }))))
}

/// Parses a conditional.
///
/// Grammar: `if := "if" expression ":" block [ "else" ":" block ] "end"`
///
/// The then-block ends at either `else` or `end`.
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = eat(tokens, TokenKind::If) else {
        return Ok(None);
    };

    let condition = parse_expression(tokens)?;
    let then_block = parse_block_body(tokens, &[TokenKind::Else, TokenKind::End])?;

    let else_block = if eat(tokens, TokenKind::Else).is_some() {
        Some(parse_block_body(tokens, &[TokenKind::End])?)
    } else {
        None
    };
    expect(tokens, TokenKind::End, "'end'")?;

    Ok(Some(Statement::If { condition,
                            then_block,
                            else_block,
                            line: keyword.line }))
}

/// Parses a `while` loop.
///
/// Grammar: `while := "while" expression ":" block "end"`
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = eat(tokens, TokenKind::While) else {
        return Ok(None);
    };

    let condition = parse_expression(tokens)?;
    let body = parse_block_body(tokens, &[TokenKind::End])?;
    expect(tokens, TokenKind::End, "'end'")?;

    Ok(Some(Statement::While { condition,
                               body,
                               line: keyword.line }))
}

/// Parses a `for` loop.
///
/// Grammar: `for := "for" ID "in" expression ":" block "end"`
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = eat(tokens, TokenKind::For) else {
        return Ok(None);
    };

    let var = parse_identifier(tokens)?;
    expect(tokens, TokenKind::In, "'in'")?;
    let iterable = parse_expression(tokens)?;
    let body = parse_block_body(tokens, &[TokenKind::End])?;
    expect(tokens, TokenKind::End, "'end'")?;

    Ok(Some(Statement::For { var,
                             iterable,
                             body,
                             line: keyword.line }))
}

/// Parses a `return` statement.
///
/// The returned expression is omitted when the statement ends right after the
/// keyword.
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = eat(tokens, TokenKind::Return) else {
        return Ok(None);
    };

    let value = if at_statement_boundary(tokens) || peek_kind(tokens) == Some(TokenKind::Semicolon)
    {
        None
    } else {
        Some(parse_expression(tokens)?)
    };

    Ok(Some(Statement::Return { value,
                                line: keyword.line }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Expr, LiteralValue},
        error::SyntaxError,
        interpreter::{lexer::tokenize, parser::core::parse},
    };

    fn program(source: &str) -> Vec<Statement> {
        parse(&tokenize(source).unwrap()).unwrap()
    }

    fn syntax_error(source: &str) -> SyntaxError {
        parse(&tokenize(source).unwrap()).unwrap_err()
    }

    #[test]
    fn assignment_and_expression_statements() {
        let statements = program("x = 1\n\n\nx\n");
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::Assign { name, line: 1, .. } if name == "x"));
        assert!(matches!(&statements[1], Statement::Expression { line: 4, .. }));
    }

    #[test]
    fn semicolons_group_statements_on_one_line() {
        let statements = program("a = 1; b = 2;\nc = 3;\n;\n");
        assert_eq!(statements.len(), 3);

        let Statement::Compound(group) = &statements[0] else {
            panic!("expected a compound statement");
        };
        assert_eq!(group.len(), 2);
        assert!(matches!(&statements[1], Statement::Assign { .. }));
        assert_eq!(statements[2], Statement::NoOp { line: 3 });
    }

    #[test]
    fn statements_on_one_line_need_no_separator() {
        let statements = program("a = 1 b = 2");
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[1], Statement::Assign { name, .. } if name == "b"));

        let statements = program("while 0: x = 1 end print(3)
");
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::While { .. }));
        assert!(matches!(&statements[1], Statement::Expression { .. }));
    }

    #[test]
    fn if_else_blocks() {
        let statements = program("if x > 1:\n  y = 1\nelse:\n  y = 2\n  z = 3\nend\n");
        let Statement::If { then_block,
                            else_block,
                            line,
                            .. } = &statements[0]
        else {
            panic!("expected an if statement");
        };
        assert_eq!(*line, 1);
        assert_eq!(then_block.len(), 1);
        assert_eq!(else_block.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn if_without_else_and_on_one_line() {
        let statements = program("if 1: print(1) end\n");
        assert!(matches!(&statements[0], Statement::If { else_block: None, .. }));
    }

    #[test]
    fn loops_and_function_definitions() {
        let source = "def f(a, b):\n  for i in range(a):\n    while b: b = b - 1 end\n  end\n  \
                      return a\nend\n";
        let statements = program(source);
        let Statement::FunctionDef(def) = &statements[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(def.name, "f");
        assert_eq!(def.params, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(def.body.len(), 2);
        assert!(matches!(&def.body[0], Statement::For { var, line: 2, .. } if var == "i"));
        assert_eq!(def.body[1],
                   Statement::Return { value: Some(Expr::Variable { name: "a".to_string(),
                                                                    line: 5, }),
                                       line:  5, });
    }

    #[test]
    fn bare_return_has_no_value() {
        let statements = program("def f():\n  return\nend\n");
        let Statement::FunctionDef(def) = &statements[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(def.params.len(), 0);
        assert_eq!(def.body[0], Statement::Return { value: None, line: 2 });

        let statements = program("def g(): return; end");
        let Statement::FunctionDef(def) = &statements[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(def.body[0], Statement::Return { value: None, line: 1 });
    }

    #[test]
    fn return_with_value_on_same_line() {
        let statements = program("def g(x): return x * 2 end");
        let Statement::FunctionDef(def) = &statements[0] else {
            panic!("expected a function definition");
        };
        assert!(matches!(&def.body[0], Statement::Return { value: Some(Expr::BinaryOp { .. }), .. }));
    }

    #[test]
    fn missing_end_is_reported() {
        assert!(matches!(syntax_error("while 1:\n  x = 1\n"),
                         SyntaxError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn stray_end_is_reported() {
        assert_eq!(syntax_error("x = 1\nend\n"),
                   SyntaxError::UnexpectedToken { expected: "a statement".to_string(),
                                                  found:    "keyword 'end'".to_string(),
                                                  line:     2,
                                                  column:   0, });
    }

    #[test]
    fn keywords_cannot_be_assigned() {
        assert!(matches!(syntax_error("in = 1"),
                         SyntaxError::UnexpectedToken { found, .. } if found == "keyword 'in'"));
        let statements = program("inside = 2");
        assert_eq!(statements[0],
                   Statement::Assign { name:  "inside".to_string(),
                                       value: Expr::Literal { value: LiteralValue::Integer(2),
                                                              line:  1, },
                                       line:  1, });
    }
}
