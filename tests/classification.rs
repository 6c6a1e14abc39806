//! End-to-end classification on the default grid of 20000 points over [-2, 2].

mod test_utils;

use curve_shape::analysis::{THRESHOLD, derivative::finite_difference};
use curve_shape::{
    Analysis, Category, ClassifierSettings, EvaluationError, SampleGrid, analyze, evaluate,
};
use test_utils::{analyze_default, assert_float_eq, category_of};

#[test]
fn test_reference_shapes() {
    let cases = [
        ("x", Category::Linear),
        ("2*x + 1", Category::Linear),
        ("x*x", Category::Quadratic),
        ("x**2", Category::Quadratic),
        ("-x**2 + 3", Category::Quadratic),
        ("sin(5*x)", Category::SmoothCurved),
        ("cos(x) + x", Category::SmoothCurved),
        ("x**3", Category::SmoothCurved),
        ("exp(x)", Category::SmoothCurved),
        ("sign(x)", Category::Rectangular),
        ("sign(sin(5*x))", Category::Rectangular),
        ("abs(x)", Category::Triangular),
        ("abs(x - 0.5) + abs(x + 0.5)", Category::Triangular),
        ("arcsin(sin(5*x))", Category::Triangular),
    ];

    for (expression, expected) in cases {
        assert_eq!(
            category_of(expression),
            expected,
            "classification of '{}'",
            expression
        );
    }
}

#[test]
fn test_constant_and_invalid() {
    for expression in ["5", "pi", "e * 2", "x - x", "sqrt(-1 - x*x)", "log(-1 - abs(x))"] {
        let analysis = analyze_default(expression);
        assert!(
            matches!(analysis, Analysis::Degenerate { .. }),
            "'{}' should be degenerate",
            expression
        );
        assert_eq!(analysis.category(), Category::ConstantOrInvalid);
        assert!(analysis.classification().is_none());
    }
}

#[test]
fn test_partially_nan_is_not_degenerate() {
    // Negative half is NaN, positive half is finite: classified, not degenerate.
    let analysis = analyze_default("sqrt(x)");
    assert!(matches!(analysis, Analysis::Classified { .. }));
}

#[test]
fn test_derivative_lengths() {
    let analysis = analyze_default("sin(5*x)");
    let classification = analysis.classification().unwrap();
    assert_eq!(analysis.values().len(), 20_000);
    assert_eq!(classification.first_derivative.len(), 19_999);
    assert_eq!(classification.second_derivative.len(), 19_998);
}

#[test]
fn test_linear_derivatives() {
    let analysis = analyze_default("x");
    let classification = analysis.classification().unwrap();
    assert!(classification.first_derivative.iter().all(|&d| d == 1.0));
    assert!(classification.second_derivative.iter().all(|&d| d == 0.0));
}

#[test]
fn test_quadratic_second_derivative() {
    let analysis = analyze_default("x*x");
    let second = &analysis.classification().unwrap().second_derivative;
    assert_float_eq(second.mean(), 2.0, 1e-6);
}

#[test]
fn test_non_finite_derivatives_are_cleaned() {
    for expression in ["log(x)", "1/x", "sqrt(x)", "tan(x)"] {
        let analysis = analyze_default(expression);
        let classification = analysis.classification().unwrap();
        assert!(
            classification
                .first_derivative
                .iter()
                .chain(classification.second_derivative.iter())
                .all(|d| d.is_finite()),
            "'{}' left non-finite derivatives",
            expression
        );
    }
}

#[test]
fn test_singularities_are_rectangular() {
    assert_eq!(category_of("1/x"), Category::Rectangular);
    assert_eq!(category_of("log(x)"), Category::Rectangular);
    assert_eq!(category_of("tan(2*x)"), Category::Rectangular);
}

#[test]
fn test_unknown_name() {
    let grid = SampleGrid::default();
    let err = analyze("y+1", &grid, &ClassifierSettings::default()).unwrap_err();
    assert_eq!(err, EvaluationError::UnknownName("y".to_string()));
    assert!(err.to_string().contains("'y'"));
}

#[test]
fn test_rejected_inputs_never_reach_evaluation() {
    let grid = SampleGrid::default();
    for expression in [
        "__import__('os').system('ls')",
        "open('/etc/passwd')",
        "np.sin(x)",
        "x.real",
        "lambda: 1",
        "[x for x in range(3)]",
    ] {
        assert!(
            evaluate(expression, &grid).is_err(),
            "'{}' should be rejected",
            expression
        );
    }
}

#[test]
fn test_analysis_is_idempotent() {
    for expression in ["sin(5*x)", "abs(x)", "sign(x)", "x*x", "5"] {
        assert_eq!(analyze_default(expression), analyze_default(expression));
    }
}

#[test]
fn test_steep_but_continuous_curves() {
    // A moderate slope stays linear; slope 2000 exceeds the threshold.
    assert_eq!(category_of("100*x"), Category::Linear);
    assert_eq!(category_of("2000*x"), Category::Rectangular);
}

#[test]
fn test_custom_threshold() {
    let grid = SampleGrid::default();
    let settings = ClassifierSettings {
        threshold: 4.0,
        ..ClassifierSettings::default()
    };
    // |d1| of sin(5*x) reaches 5.
    let analysis = analyze("sin(5*x)", &grid, &settings).unwrap();
    assert_eq!(analysis.category(), Category::Rectangular);
}

#[test]
fn test_coarse_grid() {
    let grid = SampleGrid::linspace(-1.0, 1.0, 11).unwrap();
    let settings = ClassifierSettings::default();
    let analysis = analyze("x*x", &grid, &settings).unwrap();
    assert_eq!(analysis.category(), Category::Quadratic);

    let classification = analysis.classification().unwrap();
    assert_eq!(classification.first_derivative.len(), 10);
    assert_eq!(classification.second_derivative.len(), 9);
}

#[test]
fn test_threshold_constant() {
    let grid = SampleGrid::default();
    let values = evaluate("sign(x)", &grid).unwrap();
    let first = finite_difference(values.as_slice(), grid.as_slice());
    assert!(first.amax() > THRESHOLD);
}
