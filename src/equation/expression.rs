use std::{fmt, str::FromStr};

use operator::Operator;

use super::{
    NumericConstant,
    parse::{SyntaxError, parse_complete},
};

/// A parsed formula in the single variable `x`.
///
/// The tree is produced by [`crate::equation::parse`] and is purely
/// syntactic: names are not resolved until evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(NumericConstant),
    /// A bare name such as `x` or `pi`.
    Name(String),
    Parentheses(Box<Expression>),
    // Operators
    Power(Box<Expression>, Box<Expression>),
    UnaryPlus(Box<Expression>),
    UnaryMinus(Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    FloorDivide(Box<Expression>, Box<Expression>),
    Modulo(Box<Expression>, Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    LessThan(Box<Expression>, Box<Expression>),
    LessThanOrEq(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEq(Box<Expression>, Box<Expression>),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    // Function calls
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Constant(NumericConstant(value))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expression::Name(name.into())
    }

    pub fn power(base: Expression, exponent: Expression) -> Self {
        Expression::Power(Box::new(base), Box::new(exponent))
    }

    pub fn unary_minus(expr: Expression) -> Self {
        Expression::UnaryMinus(Box::new(expr))
    }

    pub fn multiply(lhs: Expression, rhs: Expression) -> Self {
        Expression::Multiply(Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expression, rhs: Expression) -> Self {
        Expression::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn function_call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    /// Builds the node for a binary operator.
    ///
    /// Returns `None` for operators that are not binary.
    pub fn binary(op: Operator, lhs: Expression, rhs: Expression) -> Option<Self> {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        let expr = match op {
            Operator::Power => Expression::Power(lhs, rhs),
            Operator::Multiply => Expression::Multiply(lhs, rhs),
            Operator::Divide => Expression::Divide(lhs, rhs),
            Operator::FloorDivide => Expression::FloorDivide(lhs, rhs),
            Operator::Modulo => Expression::Modulo(lhs, rhs),
            Operator::Add => Expression::Add(lhs, rhs),
            Operator::Subtract => Expression::Subtract(lhs, rhs),
            Operator::LessThan => Expression::LessThan(lhs, rhs),
            Operator::LessThanOrEq => Expression::LessThanOrEq(lhs, rhs),
            Operator::GreaterThan => Expression::GreaterThan(lhs, rhs),
            Operator::GreaterThanOrEq => Expression::GreaterThanOrEq(lhs, rhs),
            Operator::Equal => Expression::Equal(lhs, rhs),
            Operator::NotEqual => Expression::NotEqual(lhs, rhs),
            Operator::Paren | Operator::UnaryPlus | Operator::UnaryMinus => return None,
        };
        Some(expr)
    }

    pub fn top_operator(&self) -> Option<Operator> {
        match self {
            Expression::Parentheses(_) => Some(Operator::Paren),
            Expression::Power(_, _) => Some(Operator::Power),
            Expression::UnaryPlus(_) => Some(Operator::UnaryPlus),
            Expression::UnaryMinus(_) => Some(Operator::UnaryMinus),
            Expression::Multiply(_, _) => Some(Operator::Multiply),
            Expression::Divide(_, _) => Some(Operator::Divide),
            Expression::FloorDivide(_, _) => Some(Operator::FloorDivide),
            Expression::Modulo(_, _) => Some(Operator::Modulo),
            Expression::Add(_, _) => Some(Operator::Add),
            Expression::Subtract(_, _) => Some(Operator::Subtract),
            Expression::LessThan(_, _) => Some(Operator::LessThan),
            Expression::LessThanOrEq(_, _) => Some(Operator::LessThanOrEq),
            Expression::GreaterThan(_, _) => Some(Operator::GreaterThan),
            Expression::GreaterThanOrEq(_, _) => Some(Operator::GreaterThanOrEq),
            Expression::Equal(_, _) => Some(Operator::Equal),
            Expression::NotEqual(_, _) => Some(Operator::NotEqual),
            Expression::Constant(_) | Expression::Name(_) | Expression::FunctionCall { .. } => {
                None
            }
        }
    }

    /// Levels below the root; a number or a bare name has height zero.
    pub fn height(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Name(_) => 0,
            Expression::Parentheses(expr)
            | Expression::UnaryPlus(expr)
            | Expression::UnaryMinus(expr) => expr.height() + 1,
            Expression::Power(lhs, rhs)
            | Expression::Multiply(lhs, rhs)
            | Expression::Divide(lhs, rhs)
            | Expression::FloorDivide(lhs, rhs)
            | Expression::Modulo(lhs, rhs)
            | Expression::Add(lhs, rhs)
            | Expression::Subtract(lhs, rhs)
            | Expression::LessThan(lhs, rhs)
            | Expression::LessThanOrEq(lhs, rhs)
            | Expression::GreaterThan(lhs, rhs)
            | Expression::GreaterThanOrEq(lhs, rhs)
            | Expression::Equal(lhs, rhs)
            | Expression::NotEqual(lhs, rhs) => lhs.height().max(rhs.height()) + 1,
            Expression::FunctionCall { arguments, .. } => {
                arguments.iter().map(Expression::height).max().unwrap_or(0) + 1
            }
        }
    }

    /// All names referenced by the expression, in source order, including
    /// the names of called functions.
    pub fn names(&self) -> Vec<&str> {
        let mut acc = Vec::new();
        self.names_recursive(&mut acc);
        acc
    }

    fn names_recursive<'a>(&'a self, acc: &mut Vec<&'a str>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Name(name) => acc.push(name),
            Expression::Parentheses(expr)
            | Expression::UnaryPlus(expr)
            | Expression::UnaryMinus(expr) => expr.names_recursive(acc),
            Expression::Power(lhs, rhs)
            | Expression::Multiply(lhs, rhs)
            | Expression::Divide(lhs, rhs)
            | Expression::FloorDivide(lhs, rhs)
            | Expression::Modulo(lhs, rhs)
            | Expression::Add(lhs, rhs)
            | Expression::Subtract(lhs, rhs)
            | Expression::LessThan(lhs, rhs)
            | Expression::LessThanOrEq(lhs, rhs)
            | Expression::GreaterThan(lhs, rhs)
            | Expression::GreaterThanOrEq(lhs, rhs)
            | Expression::Equal(lhs, rhs)
            | Expression::NotEqual(lhs, rhs) => {
                lhs.names_recursive(acc);
                rhs.names_recursive(acc);
            }
            Expression::FunctionCall { name, arguments } => {
                acc.push(name);
                for argument in arguments {
                    argument.names_recursive(acc);
                }
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Name(name) => write!(f, "{}", name),
            Expression::Parentheses(expr) => write!(f, "({})", expr),
            Expression::UnaryPlus(expr) => write!(f, "+{}", expr),
            Expression::UnaryMinus(expr) => write!(f, "-{}", expr),
            Expression::Power(lhs, rhs)
            | Expression::Multiply(lhs, rhs)
            | Expression::Divide(lhs, rhs)
            | Expression::FloorDivide(lhs, rhs)
            | Expression::Modulo(lhs, rhs)
            | Expression::Add(lhs, rhs)
            | Expression::Subtract(lhs, rhs)
            | Expression::LessThan(lhs, rhs)
            | Expression::LessThanOrEq(lhs, rhs)
            | Expression::GreaterThan(lhs, rhs)
            | Expression::GreaterThanOrEq(lhs, rhs)
            | Expression::Equal(lhs, rhs)
            | Expression::NotEqual(lhs, rhs) => {
                // Every binary variant has a top operator.
                match self.top_operator() {
                    Some(op) => write!(f, "{} {} {}", lhs, op, rhs),
                    None => Err(fmt::Error),
                }
            }
            Expression::FunctionCall { name, arguments } => {
                write!(f, "{}(", name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for Expression {
    type Err = SyntaxError;

    /// Parses a complete formula; trailing input is a syntax error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_complete(s)
    }
}

pub mod operator {
    //! ### Formula operators
    //!
    //! Supported operators from tightest to loosest binding. All binary
    //! operators except the power operator associate left to right.
    //!
    //! | Operators          | Precedence group                       |
    //! |:------------------:|:---------------------------------------|
    //! | ( )                | Parentheses                            |
    //! | **                 | Power                                  |
    //! | + -                | Unary operators                        |
    //! | * / // %           | Multiplication, division, modulo       |
    //! | + -                | Addition, subtraction                  |
    //! | < <= > >= == !=    | Comparisons                            |
    //!
    //! The power operator binds tighter than a unary operator on its left,
    //! so `-x**2` is `-(x**2)`, while `2**-1` is `2**(-1)`.
    //!
    //! Comparisons return one (1) when true and zero (0) when false. Modulo
    //! is the floored modulus: the sign of the result follows the divisor.

    use std::fmt;

    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub enum Operator {
        Paren,
        Power,
        UnaryPlus,
        UnaryMinus,
        Multiply,
        Divide,
        FloorDivide,
        Modulo,
        Add,
        Subtract,
        LessThan,
        LessThanOrEq,
        GreaterThan,
        GreaterThanOrEq,
        Equal,
        NotEqual,
    }

    impl fmt::Display for Operator {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let symbol = match self {
                Operator::Paren => "()",
                Operator::Power => "**",
                Operator::UnaryPlus | Operator::Add => "+",
                Operator::UnaryMinus | Operator::Subtract => "-",
                Operator::Multiply => "*",
                Operator::Divide => "/",
                Operator::FloorDivide => "//",
                Operator::Modulo => "%",
                Operator::LessThan => "<",
                Operator::LessThanOrEq => "<=",
                Operator::GreaterThan => ">",
                Operator::GreaterThanOrEq => ">=",
                Operator::Equal => "==",
                Operator::NotEqual => "!=",
            };
            write!(f, "{}", symbol)
        }
    }
}
