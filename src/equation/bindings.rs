//! # Name bindings
//!
//! The closed set of names a formula may reference. Resolution is exact and
//! case-sensitive; anything not listed here is undefined.
//!
//! | Name                                    | Binding                     |
//! |:----------------------------------------|:----------------------------|
//! | `sin` `cos` `tan` `arcsin` `arccos`     | trigonometric functions     |
//! | `sign` `abs` `sqrt` `log` `exp`         | element-wise functions      |
//! | `pi` `e`                                | constants                   |
//! | `x`                                     | the sample grid             |
//!
//! Functions follow the floating-point conventions of array libraries:
//! arguments outside the domain produce NaN (`sqrt(-1)`, `arcsin(2)`,
//! `log(-1)`), poles produce infinities (`log(0)`), and nothing panics.
//!
//! ```rust
//! use curve_shape::equation::bindings::{self, Binding, MathFunction};
//!
//! assert_eq!(bindings::resolve("sqrt"), Some(Binding::Function(MathFunction::Sqrt)));
//! assert_eq!(bindings::resolve("x"), Some(Binding::Variable));
//! assert_eq!(bindings::resolve("np"), None);
//! assert_eq!(MathFunction::Sign.apply(0.0), 0.0);
//! ```

use std::{f64::consts, fmt};

/// Name of the independent variable bound to the sample grid.
pub const VARIABLE_NAME: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Sign,
    Abs,
    Sqrt,
    Log,
    Exp,
}

impl MathFunction {
    pub const ALL: [MathFunction; 10] = [
        MathFunction::Sin,
        MathFunction::Cos,
        MathFunction::Tan,
        MathFunction::Arcsin,
        MathFunction::Arccos,
        MathFunction::Sign,
        MathFunction::Abs,
        MathFunction::Sqrt,
        MathFunction::Log,
        MathFunction::Exp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MathFunction::Sin => "sin",
            MathFunction::Cos => "cos",
            MathFunction::Tan => "tan",
            MathFunction::Arcsin => "arcsin",
            MathFunction::Arccos => "arccos",
            MathFunction::Sign => "sign",
            MathFunction::Abs => "abs",
            MathFunction::Sqrt => "sqrt",
            MathFunction::Log => "log",
            MathFunction::Exp => "exp",
        }
    }

    /// Applies the function to one sample.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            MathFunction::Sin => value.sin(),
            MathFunction::Cos => value.cos(),
            MathFunction::Tan => value.tan(),
            MathFunction::Arcsin => value.asin(),
            MathFunction::Arccos => value.acos(),
            // `f64::signum` maps zero to one; the sign of zero is zero.
            MathFunction::Sign if value == 0.0 => 0.0,
            MathFunction::Sign => value.signum(),
            MathFunction::Abs => value.abs(),
            MathFunction::Sqrt => value.sqrt(),
            MathFunction::Log => value.ln(),
            MathFunction::Exp => value.exp(),
        }
    }
}

impl fmt::Display for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a name refers to during evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    Function(MathFunction),
    Constant(f64),
    /// The independent variable, i.e. the sample grid.
    Variable,
}

/// Resolves a name against the fixed binding table.
pub fn resolve(name: &str) -> Option<Binding> {
    let binding = match name {
        VARIABLE_NAME => Binding::Variable,
        "pi" => Binding::Constant(consts::PI),
        "e" => Binding::Constant(consts::E),
        _ => {
            return MathFunction::ALL
                .into_iter()
                .find(|function| function.name() == name)
                .map(Binding::Function);
        }
    };
    Some(binding)
}
