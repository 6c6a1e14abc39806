#![allow(dead_code)]

use curve_shape::{Analysis, Category, ClassifierSettings, SampleGrid, analyze};

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Analyse `expression` on the default grid with default settings.
pub fn analyze_default(expression: &str) -> Analysis {
    analyze(expression, &SampleGrid::default(), &ClassifierSettings::default())
        .unwrap_or_else(|e| panic!("Failed to analyse '{}': {}", expression, e))
}

/// Category of `expression` on the default grid.
pub fn category_of(expression: &str) -> Category {
    analyze_default(expression).category()
}
