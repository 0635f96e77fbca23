use std::fmt;
use std::ops::Not;

use super::Value;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Arithmetic operators. `Add` doubles as text concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// The prefix a variable reference was written with. All sigils resolve
/// against the same value map; the sigil is kept for rendering and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSigil {
    /// `#{name}`: a declared program rule variable.
    DataValue,
    /// `A{name}`: an attribute-backed variable.
    Attribute,
    /// `V{name}`: an environment variable such as `current_date`.
    Environment,
    /// `C{id}`: a constant.
    Constant,
}

impl VariableSigil {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::DataValue),
            'A' => Some(Self::Attribute),
            'V' => Some(Self::Environment),
            'C' => Some(Self::Constant),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::DataValue => '#',
            Self::Attribute => 'A',
            Self::Environment => 'V',
            Self::Constant => 'C',
        }
    }
}

/// Expression AST of the bundled expression language.
///
/// Produced by [`parse_expression`](crate::parse::parse_expression) and
/// interpreted by [`D2ExpressionEvaluator`](crate::D2ExpressionEvaluator).
/// `Display` renders an expression back into parseable text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Variable { sigil: VariableSigil, name: String },
    Call { function: String, args: Vec<Expr> },
    Compare {
        lhs: Box<Expr>,
        op: CompareOp,
        rhs: Box<Expr>,
    },
    Arith {
        lhs: Box<Expr>,
        op: ArithOp,
        rhs: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Neg(Box<Expr>),
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
            ArithOp::Rem => write!(f, "%"),
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Text(s) => {
            f.write_str("'")?;
            for c in s.chars() {
                match c {
                    '\'' => f.write_str("\\'")?,
                    '\\' => f.write_str("\\\\")?,
                    c => write!(f, "{c}")?,
                }
            }
            f.write_str("'")
        }
        Value::Number(n) if *n < 0.0 => write!(f, "(-{})", -n),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write_literal(f, value),
            Expr::Variable { sigil, name } => write!(f, "{}{{{name}}}", sigil.as_char()),
            Expr::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Compare { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Expr::Arith { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Expr::And(a, b) => write!(f, "({a} && {b})"),
            Expr::Or(a, b) => write!(f, "({a} || {b})"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn compare(self, op: CompareOp, rhs: impl Into<Expr>) -> Expr {
        Expr::Compare {
            lhs: Box::new(self),
            op,
            rhs: Box::new(rhs.into()),
        }
    }

    #[must_use]
    pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Eq, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Gt, rhs)
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Lt, rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

macro_rules! literal_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Expr {
            fn from(value: $t) -> Self {
                Expr::Literal(Value::from(value))
            }
        })*
    };
}

literal_from!(f64, i64, bool, &str, String);

/// Reference a declared program rule variable: `#{name}`.
#[must_use]
pub fn var(name: &str) -> Expr {
    Expr::Variable {
        sigil: VariableSigil::DataValue,
        name: name.to_owned(),
    }
}

/// Reference an environment variable: `V{name}`.
#[must_use]
pub fn env(name: &str) -> Expr {
    Expr::Variable {
        sigil: VariableSigil::Environment,
        name: name.to_owned(),
    }
}

/// Call a library function, e.g. `call("d2:right", [var("x"), 3.into()])`.
#[must_use]
pub fn call(function: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Call {
        function: function.to_owned(),
        args: args.into_iter().collect(),
    }
}
