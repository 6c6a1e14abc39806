pub mod bindings;
pub mod eval;
pub mod expression;
pub mod numeric;
pub mod parse;

pub use eval::{EvaluationError, Evaluator, ValueSeries, evaluate, evaluate_with_warnings};
pub use expression::{Expression, operator::Operator};
pub use numeric::{NumericConstant, NumericConstantError};
pub use parse::{MAX_NESTING, SyntaxError, SyntaxErrorKind};
