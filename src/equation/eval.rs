//! # Formula evaluation
//!
//! Evaluates a parsed [`Expression`] over a [`SampleGrid`]. Every operation is
//! element-wise: the variable `x` evaluates to the whole grid, literals and
//! constants stay scalar until they meet a series, and the final result is
//! broadcast to one value per grid point.
//!
//! Only the names in [`bindings`](super::bindings) resolve. A formula is never
//! handed to anything that could run code, so it cannot reach I/O, imports or
//! any other capability of the host program.
//!
//! Numerical trouble on the grid is not an error: out-of-domain samples become
//! NaN and poles become infinities, exactly like array arithmetic. The number
//! of such samples is reported through [`WithWarnings`]. Plain numbers
//! (literals, `pi`, `e` and arithmetic on them) behave like Python numbers
//! instead, so `1/0` fails with [`EvaluationError::ZeroDivision`]. A function
//! result is always array-valued, even for a constant argument.
//!
//! ```rust
//! use curve_shape::{SampleGrid, equation::eval::evaluate};
//!
//! let grid = SampleGrid::linspace(0.0, 1.0, 3).unwrap();
//! let values = evaluate("2*x + 1", &grid).unwrap();
//! assert_eq!(values.as_slice(), &[1.0, 2.0, 3.0]);
//!
//! let err = evaluate("y + 1", &grid).unwrap_err();
//! assert_eq!(err.to_string(), "name 'y' is not defined");
//! ```

use log::debug;
use nalgebra::DVector;
use thiserror::Error;

use super::{
    Expression,
    bindings::{self, Binding},
    parse::SyntaxError,
};
use crate::{grid::SampleGrid, types::WithWarnings};

/// One evaluated value per grid point.
pub type ValueSeries = DVector<f64>;

/// Why a formula could not be evaluated. No partial result accompanies it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("function '{0}' must be called with an argument, e.g. {0}(x)")]
    BareFunction(String),

    #[error("{name}() takes exactly one argument ({given} given)")]
    Arity { name: String, given: usize },

    #[error("division by zero")]
    ZeroDivision,

    #[error("0.0 cannot be raised to a negative power")]
    NegativePowerOfZero,
}

/// An intermediate result: a scalar, or one value per grid point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Series(DVector<f64>),
}

impl Value {
    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(value) => Value::Scalar(f(value)),
            Value::Series(series) => Value::Series(series.map(f)),
        }
    }

    /// Applies `f` element-wise, broadcasting a scalar against a series.
    fn combine(self, other: Value, f: fn(f64, f64) -> f64) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(a, b)),
            (Value::Scalar(a), Value::Series(b)) => Value::Series(b.map(|b| f(a, b))),
            (Value::Series(a), Value::Scalar(b)) => Value::Series(a.map(|a| f(a, b))),
            (Value::Series(a), Value::Series(b)) => Value::Series(a.zip_map(&b, f)),
        }
    }

    /// Broadcasts the value to a series of `len` samples.
    pub fn into_series(self, len: usize) -> ValueSeries {
        match self {
            Value::Scalar(value) => DVector::from_element(len, value),
            Value::Series(series) => series,
        }
    }
}

/// Floored modulus: the result takes the sign of the divisor.
fn floored_modulo(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
        remainder + b
    } else {
        remainder
    }
}

fn floor_divide(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

fn truth(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

/// Evaluates expressions against one sample grid.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'g> {
    grid: &'g SampleGrid,
}

impl<'g> Evaluator<'g> {
    pub fn new(grid: &'g SampleGrid) -> Self {
        Evaluator { grid }
    }

    /// Evaluates `expression`, failing on the first unresolvable name before
    /// any arithmetic is done.
    pub fn evaluate(&self, expression: &Expression) -> Result<Value, EvaluationError> {
        if let Some(name) = expression
            .names()
            .into_iter()
            .find(|name| bindings::resolve(name).is_none())
        {
            return Err(EvaluationError::UnknownName(name.to_string()));
        }
        self.eval(expression)
    }

    fn eval(&self, expression: &Expression) -> Result<Value, EvaluationError> {
        let value = match expression {
            Expression::Constant(constant) => Value::Scalar(constant.0),
            Expression::Name(name) => self.lookup(name)?,
            Expression::Parentheses(inner) | Expression::UnaryPlus(inner) => self.eval(inner)?,
            Expression::UnaryMinus(inner) => self.eval(inner)?.map(|v| -v),
            Expression::Power(lhs, rhs) => self.power(lhs, rhs)?,
            Expression::Multiply(lhs, rhs) => self.binary(lhs, rhs, |a, b| a * b)?,
            Expression::Divide(lhs, rhs) => self.division(lhs, rhs, |a, b| a / b)?,
            Expression::FloorDivide(lhs, rhs) => self.division(lhs, rhs, floor_divide)?,
            Expression::Modulo(lhs, rhs) => self.division(lhs, rhs, floored_modulo)?,
            Expression::Add(lhs, rhs) => self.binary(lhs, rhs, |a, b| a + b)?,
            Expression::Subtract(lhs, rhs) => self.binary(lhs, rhs, |a, b| a - b)?,
            Expression::LessThan(lhs, rhs) => self.binary(lhs, rhs, |a, b| truth(a < b))?,
            Expression::LessThanOrEq(lhs, rhs) => self.binary(lhs, rhs, |a, b| truth(a <= b))?,
            Expression::GreaterThan(lhs, rhs) => self.binary(lhs, rhs, |a, b| truth(a > b))?,
            Expression::GreaterThanOrEq(lhs, rhs) => {
                self.binary(lhs, rhs, |a, b| truth(a >= b))?
            }
            Expression::Equal(lhs, rhs) => self.binary(lhs, rhs, |a, b| truth(a == b))?,
            Expression::NotEqual(lhs, rhs) => self.binary(lhs, rhs, |a, b| truth(a != b))?,
            Expression::FunctionCall { name, arguments } => self.call(name, arguments)?,
        };
        Ok(value)
    }

    fn lookup(&self, name: &str) -> Result<Value, EvaluationError> {
        match bindings::resolve(name) {
            Some(Binding::Constant(value)) => Ok(Value::Scalar(value)),
            Some(Binding::Variable) => Ok(Value::Series(self.grid.points().clone())),
            Some(Binding::Function(function)) => {
                Err(EvaluationError::BareFunction(function.name().to_string()))
            }
            None => Err(EvaluationError::UnknownName(name.to_string())),
        }
    }

    fn binary(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        op: fn(f64, f64) -> f64,
    ) -> Result<Value, EvaluationError> {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        Ok(lhs.combine(rhs, op))
    }

    fn division(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        op: fn(f64, f64) -> f64,
    ) -> Result<Value, EvaluationError> {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        match (&lhs, &rhs) {
            (Value::Scalar(_), Value::Scalar(divisor)) if *divisor == 0.0 => {
                Err(EvaluationError::ZeroDivision)
            }
            _ => Ok(lhs.combine(rhs, op)),
        }
    }

    fn power(&self, base: &Expression, exponent: &Expression) -> Result<Value, EvaluationError> {
        let base = self.eval(base)?;
        let exponent = self.eval(exponent)?;
        match (&base, &exponent) {
            (Value::Scalar(b), Value::Scalar(e)) if *b == 0.0 && *e < 0.0 => {
                Err(EvaluationError::NegativePowerOfZero)
            }
            _ => Ok(base.combine(exponent, f64::powf)),
        }
    }

    fn call(&self, name: &str, arguments: &[Expression]) -> Result<Value, EvaluationError> {
        let function = match bindings::resolve(name) {
            Some(Binding::Function(function)) => function,
            Some(_) => return Err(EvaluationError::NotCallable(name.to_string())),
            None => return Err(EvaluationError::UnknownName(name.to_string())),
        };

        match arguments {
            [argument] => {
                let argument = self.eval(argument)?.into_series(self.grid.len());
                Ok(Value::Series(argument.map(|v| function.apply(v))))
            }
            _ => Err(EvaluationError::Arity {
                name: name.to_string(),
                given: arguments.len(),
            }),
        }
    }
}

fn non_finite_warnings(values: &ValueSeries) -> Vec<String> {
    let nan = values.iter().filter(|v| v.is_nan()).count();
    let infinite = values.iter().filter(|v| v.is_infinite()).count();

    let mut warnings = Vec::new();
    if nan > 0 {
        warnings.push(format!("{} of {} samples are NaN", nan, values.len()));
    }
    if infinite > 0 {
        warnings.push(format!(
            "{} of {} samples are infinite",
            infinite,
            values.len()
        ));
    }
    warnings
}

/// Parses and evaluates `source` over `grid`, reporting non-finite samples
/// as warnings.
pub fn evaluate_with_warnings(
    source: &str,
    grid: &SampleGrid,
) -> Result<WithWarnings<ValueSeries, String>, EvaluationError> {
    let expression: Expression = source.parse()?;
    debug!("Parsed '{}' as {}", source.trim(), expression);

    let values = Evaluator::new(grid)
        .evaluate(&expression)?
        .into_series(grid.len());
    let warnings = non_finite_warnings(&values);
    Ok(WithWarnings::new(values, warnings))
}

/// Parses and evaluates `source` over `grid`.
pub fn evaluate(source: &str, grid: &SampleGrid) -> Result<ValueSeries, EvaluationError> {
    evaluate_with_warnings(source, grid).map(WithWarnings::unwrap)
}
