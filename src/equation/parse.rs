use std::fmt;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{map, map_res, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

use super::{Expression, NumericConstant, Operator};

/// How much of the unparsed input is quoted in a syntax error.
const NEAR_CHARS: usize = 12;

/// Deepest nesting of parentheses, calls, signs, exponents and operator
/// chains a formula may have. Parsing, evaluation and dropping the tree all
/// recurse once per level.
pub const MAX_NESTING: usize = 64;

/// What stopped the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    Unexpected,
    TooDeeplyNested,
}

/// The formula could not be parsed completely.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// One-based character column where parsing stopped.
    pub column: usize,
    /// The unparsed input at that column, shortened.
    pub near: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SyntaxErrorKind::TooDeeplyNested => write!(
                f,
                "expression nested too deeply at column {} (at most {} levels)",
                self.column, MAX_NESTING
            ),
            SyntaxErrorKind::Unexpected if self.near.is_empty() => write!(
                f,
                "invalid syntax at column {}: unexpected end of input",
                self.column
            ),
            SyntaxErrorKind::Unexpected => {
                write!(f, "invalid syntax at column {} near '{}'", self.column, self.near)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

impl SyntaxError {
    fn at(kind: SyntaxErrorKind, input: &str, rest: &str) -> Self {
        let consumed = &input[..input.len() - rest.len()];
        SyntaxError {
            kind,
            column: consumed.chars().count() + 1,
            near: rest.trim_end().chars().take(NEAR_CHARS).collect(),
        }
    }
}

/// Parse whitespace (spaces, tabs, newlines)
fn ws<'a, P, O>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// A non-recoverable error: no alternative is tried once the limit is hit.
fn too_deep(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Failure(Error::new(input, ErrorKind::TooLarge))
}

/// Enters one more nesting level.
fn nested(input: &str, depth: usize) -> Result<usize, nom::Err<Error<&str>>> {
    if depth >= MAX_NESTING {
        Err(too_deep(input))
    } else {
        Ok(depth + 1)
    }
}

/// Parse a name (variable, constant or function)
fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )
    .parse(input)
}

/// Parse an unsigned numeric literal
fn numeric_constant(input: &str) -> IResult<&str, NumericConstant> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = (one_of("eE"), opt(one_of("+-")), digit1);

    map_res(recognize(pair(mantissa, opt(exponent))), |s: &str| {
        s.parse::<NumericConstant>()
    })
    .parse(input)
}

/// Parse a parenthesised expression
fn parentheses(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, _) = ws(char('(')).parse(input)?;
    let (input, expr) = expression_at(input, nested(input, depth)?)?;
    let (input, _) = ws(char(')')).parse(input)?;
    Ok((input, Expression::Parentheses(Box::new(expr))))
}

/// Parse function arguments
fn function_arguments(input: &str, depth: usize) -> IResult<&str, Vec<Expression>> {
    let (input, _) = ws(char('(')).parse(input)?;
    let depth = nested(input, depth)?;
    terminated(
        separated_list0(ws(char(',')), |i| expression_at(i, depth)),
        ws(char(')')),
    )
    .parse(input)
}

/// Parse a function call
fn function_call(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, name) = identifier(input)?;
    let (input, arguments) = function_arguments(input, depth)?;
    Ok((input, Expression::FunctionCall { name, arguments }))
}

/// Parse primary expressions (atoms)
fn primary(input: &str, depth: usize) -> IResult<&str, Expression> {
    alt((
        map(numeric_constant, Expression::Constant),
        // Try a call before a bare name since both start with an identifier
        |i| function_call(i, depth),
        map(identifier, Expression::Name),
        |i| parentheses(i, depth),
    ))
    .parse(input)
}

/// Parse the power operator (right-associative, binds tighter than a unary
/// operator on its left but accepts one on its right)
fn power(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, base) = primary(input, depth)?;

    if let Ok((input, _)) = ws(tag("**")).parse(input) {
        let (input, exponent) = unary(input, nested(input, depth)?)?;
        Ok((
            input,
            Expression::Power(Box::new(base), Box::new(exponent)),
        ))
    } else {
        Ok((input, base))
    }
}

/// The operand of a unary sign, one level deeper.
fn signed(input: &str, depth: usize) -> IResult<&str, Expression> {
    unary(input, nested(input, depth)?)
}

/// Parse unary expressions (unary operators)
fn unary(input: &str, depth: usize) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('+')), |i| signed(i, depth)), |expr| {
            Expression::UnaryPlus(Box::new(expr))
        }),
        map(preceded(ws(char('-')), |i| signed(i, depth)), |expr| {
            Expression::UnaryMinus(Box::new(expr))
        }),
        |i| power(i, depth),
    ))
    .parse(input)
}

/// Folds a left-associative chain `operand (op operand)*`.
///
/// The chain builds a left-deep tree, so its height counts against the
/// nesting limit as well.
fn left_associative<'a>(
    input: &'a str,
    depth: usize,
    operand: fn(&'a str, usize) -> IResult<&'a str, Expression>,
    operator: fn(&'a str) -> IResult<&'a str, Operator>,
) -> IResult<&'a str, Expression> {
    let (mut input, mut left) = operand(input, depth)?;
    let mut height = left.height();

    while let Ok((new_input, op)) = operator(input) {
        let (new_input, right) = operand(new_input, depth)?;
        height = height.max(right.height()) + 1;
        if depth + height > MAX_NESTING {
            return Err(too_deep(input));
        }
        input = new_input;
        left = match Expression::binary(op, left, right) {
            Some(expr) => expr,
            None => unreachable!("operator parsers only yield binary operators"),
        };
    }

    Ok((input, left))
}

fn multiplicative_operator(input: &str) -> IResult<&str, Operator> {
    ws(alt((
        value(Operator::Multiply, terminated(char('*'), not(char('*')))),
        value(Operator::FloorDivide, tag("//")),
        value(Operator::Divide, char('/')),
        value(Operator::Modulo, char('%')),
    )))
    .parse(input)
}

fn additive_operator(input: &str) -> IResult<&str, Operator> {
    ws(alt((
        value(Operator::Add, char('+')),
        value(Operator::Subtract, char('-')),
    )))
    .parse(input)
}

fn comparison_operator(input: &str) -> IResult<&str, Operator> {
    ws(alt((
        value(Operator::LessThanOrEq, tag("<=")),
        value(Operator::GreaterThanOrEq, tag(">=")),
        value(Operator::Equal, tag("==")),
        value(Operator::NotEqual, tag("!=")),
        value(Operator::LessThan, char('<')),
        value(Operator::GreaterThan, char('>')),
    )))
    .parse(input)
}

/// Parse multiplication, division, floor division and modulo (left-associative)
fn multiplicative(input: &str, depth: usize) -> IResult<&str, Expression> {
    left_associative(input, depth, unary, multiplicative_operator)
}

/// Parse addition and subtraction (left-associative)
fn additive(input: &str, depth: usize) -> IResult<&str, Expression> {
    left_associative(input, depth, multiplicative, additive_operator)
}

/// Parse comparison operators
fn comparison(input: &str, depth: usize) -> IResult<&str, Expression> {
    left_associative(input, depth, additive, comparison_operator)
}

fn expression_at(input: &str, depth: usize) -> IResult<&str, Expression> {
    ws(|i| comparison(i, depth)).parse(input)
}

/// Parse an expression, possibly leaving trailing input
pub fn expression(input: &str) -> IResult<&str, Expression> {
    expression_at(input, 0)
}

/// Parse a complete formula, rejecting any trailing input
pub fn parse_complete(input: &str) -> Result<Expression, SyntaxError> {
    let unexpected = SyntaxErrorKind::Unexpected;
    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(SyntaxError::at(unexpected, input, rest)),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => Err(SyntaxError::at(
            SyntaxErrorKind::TooDeeplyNested,
            input,
            e.input,
        )),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            Err(SyntaxError::at(unexpected, input, e.input))
        }
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError::at(unexpected, input, "")),
    }
}
