use std::fmt;

use serde::{Deserialize, Serialize};

/// The shape a sampled curve is classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Jump discontinuities or very steep transitions (square-wave-like).
    Rectangular,
    /// Slope discontinuities without value jumps (triangle-wave-like).
    Triangular,
    /// Second derivative zero everywhere.
    Linear,
    /// Second derivative a nonzero constant.
    Quadratic,
    /// Smoothly varying second derivative, e.g. sinusoids.
    SmoothCurved,
    /// Constant or entirely NaN; never reaches derivative estimation.
    ConstantOrInvalid,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Rectangular,
        Category::Triangular,
        Category::Linear,
        Category::Quadratic,
        Category::SmoothCurved,
        Category::ConstantOrInvalid,
    ];

    /// The label shown to users.
    ///
    /// `ConstantOrInvalid` has no label; it is reported with its own message.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Category::Rectangular => Some("RECTANGULAR WAVE"),
            Category::Triangular => Some("TRIANGULAR WAVE"),
            Category::Linear => Some("LINEAR FUNCTION"),
            Category::Quadratic => Some("QUADRATIC FUNCTION"),
            Category::SmoothCurved => Some("SINE-LIKE (SMOOTH / CURVED FUNCTION)"),
            Category::ConstantOrInvalid => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Rectangular => "Rectangular",
            Category::Triangular => "Triangular",
            Category::Linear => "Linear",
            Category::Quadratic => "Quadratic",
            Category::SmoothCurved => "SmoothCurved",
            Category::ConstantOrInvalid => "ConstantOrInvalid",
        };
        f.write_str(name)
    }
}
