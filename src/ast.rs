use std::fmt;
use std::str::FromStr;

use crate::token::Span;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDeclaration {
        name: String,
        constant: bool,
        value: Option<Expression>,
        span: Span,
    },
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier {
        name: String,
        span: Span,
    },
    NumericLiteral(f64),
    StringLiteral(String),
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
        span: Span,
    },
    /// The assignee is only checked to be an identifier when evaluated.
    Assignment {
        assignee: Box<Expression>,
        value: Box<Expression>,
        span: Span,
    },
    Object(Vec<Property>),
}

impl Expression {
    /// Longest path from this node down to a literal or identifier.
    pub fn height(&self) -> usize {
        match self {
            Expression::Identifier { .. } | Expression::NumericLiteral(_) | Expression::StringLiteral(_) => 0,
            Expression::Binary { left, right, .. } => 1 + left.height().max(right.height()),
            Expression::Assignment { assignee, value, .. } => 1 + assignee.height().max(value.height()),
            Expression::Object(properties) => {
                1 + properties
                    .iter()
                    .filter_map(|property| property.value.as_ref())
                    .map(Expression::height)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

/// `key: value`, or the shorthand `key` which reads the variable `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = ();

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "+" => Ok(BinaryOperator::Add),
            "-" => Ok(BinaryOperator::Subtract),
            "*" => Ok(BinaryOperator::Multiply),
            "/" => Ok(BinaryOperator::Divide),
            "%" => Ok(BinaryOperator::Modulo),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
