use std::rc::Rc;

/// Represents a literal value in the language.
///
/// Number literals without a fractional part become `Integer`; any literal
/// written with a `.` stays `Real`, so `2.0` remains a float.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A string literal with its quotes removed.
    Str(Rc<str>),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Each variant models a distinct syntactic construct and carries the source
/// line used in runtime error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal number or string.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation (e.g. negation).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, set union, etc.).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Function call expression (e.g. `sin(x)`).
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// List literal `[a, b, c]`; evaluates to a numeric array.
    ListLiteral {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Set literal `{a, b, c}`.
    SetLiteral {
        /// Elements of the set.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Subscript expression such as `a[1]`, `m[0, 1:]` or `a[0][1]`.
    Subscript {
        /// The value being indexed.
        target:  Box<Self>,
        /// One index or slice per indexed axis.
        indices: Vec<Index>,
        /// Line number in the source code.
        line:    usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use mathpy::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::ListLiteral { line, .. }
            | Self::SetLiteral { line, .. }
            | Self::Subscript { line, .. } => *line,
        }
    }
}

/// One entry of a subscript.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// A single position, e.g. the `2` in `a[2]`.
    Single(Expr),
    /// A half-open range `start:end`; either bound may be omitted.
    Slice {
        /// First position included.
        start: Option<Expr>,
        /// First position excluded.
        end:   Option<Expr>,
    },
}

/// Represents a user-defined function definition.
///
/// The same allocation is shared between the AST and every environment
/// binding created by executing the definition; its body is re-walked on each
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The parameter names, bound positionally.
    pub params: Vec<String>,
    /// The statements executed when the function is called.
    pub body:   Vec<Statement>,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Binds a name in the current environment.
    Assign {
        /// The name being bound.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// Several `;`-separated statements written on one line.
    Compound(Vec<Self>),
    /// A lone `;`.
    NoOp {
        /// Line number in the source code.
        line: usize,
    },
    /// `if cond: ... [else: ...] end`
    If {
        /// The condition, truth-coerced.
        condition:  Expr,
        /// Statements run when the condition holds.
        then_block: Vec<Self>,
        /// Statements run otherwise, if an `else` was written.
        else_block: Option<Vec<Self>>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `while cond: ... end`
    While {
        /// The condition, re-evaluated before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for var in iterable: ... end`
    For {
        /// The loop variable.
        var:      String,
        /// The expression producing the values to iterate.
        iterable: Expr,
        /// The loop body.
        body:     Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `def name(params): ... end`
    FunctionDef(Rc<FunctionDef>),
    /// `return [expr]`
    Return {
        /// The returned expression, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A standalone expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Gets the line number of the statement.
    ///
    /// A compound statement reports the line of its first member.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Assign { line, .. }
            | Self::NoOp { line }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Return { line, .. }
            | Self::Expression { line, .. } => *line,
            Self::FunctionDef(def) => def.line,
            Self::Compound(statements) => statements.first().map_or(0, Self::line_number),
        }
    }
}

/// Represents unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `+x`
    Plus,
    /// `-x`
    Negate,
    /// `not x`
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Plus => "+",
            Self::Negate => "-",
            Self::Not => "not",
        };
        write!(f, "{symbol}")
    }
}

/// Represents binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`, the matrix product when both operands are arrays.
    Mul,
    /// `/`, true division.
    Div,
    /// `^`
    Pow,
    /// `.+`
    ElemAdd,
    /// `.-`
    ElemSub,
    /// `.*`
    ElemMul,
    /// `./`
    ElemDiv,
    /// `.^`
    ElemPow,
    /// `|`, set union.
    Union,
    /// `&`, set intersection.
    Intersection,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOperator {
    /// Whether the operator is one of the six comparisons.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual)
    }

    /// Whether the operator is a dotted, always-elementwise operator.
    #[must_use]
    pub const fn is_elementwise(self) -> bool {
        matches!(self,
                 Self::ElemAdd | Self::ElemSub | Self::ElemMul | Self::ElemDiv | Self::ElemPow)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::ElemAdd => ".+",
            Self::ElemSub => ".-",
            Self::ElemMul => ".*",
            Self::ElemDiv => "./",
            Self::ElemPow => ".^",
            Self::Union => "|",
            Self::Intersection => "&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "and",
            Self::Or => "or",
        };
        write!(f, "{symbol}")
    }
}
