//! Property tests over families of functions with known shapes.

mod test_utils;

use curve_shape::{Category, ClassifierSettings, SampleGrid, analyze};
use proptest::prelude::*;
use test_utils::category_of;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn lines_are_linear(
        a in prop_oneof![-3.0..-0.1f64, 0.1..3.0f64],
        b in -3.0..3.0f64,
    ) {
        let expression = format!("{} * x + {}", a, b);
        prop_assert_eq!(category_of(&expression), Category::Linear, "{}", expression);
    }

    #[test]
    fn parabolas_are_quadratic(
        a in prop_oneof![-2.0..-0.5f64, 0.5..2.0f64],
        b in -2.0..2.0f64,
        c in -2.0..2.0f64,
    ) {
        let expression = format!("{} * x * x + {} * x + {}", a, b, c);
        prop_assert_eq!(category_of(&expression), Category::Quadratic, "{}", expression);
    }

    #[test]
    fn sinusoids_are_smooth(k in 1.0..5.0f64) {
        let expression = format!("sin({} * x)", k);
        prop_assert_eq!(category_of(&expression), Category::SmoothCurved, "{}", expression);
    }

    #[test]
    fn steps_are_rectangular(c in -1.5..1.5f64) {
        let expression = format!("sign(x - {})", c);
        prop_assert_eq!(category_of(&expression), Category::Rectangular, "{}", expression);
    }

    #[test]
    fn kinks_are_triangular(c in -1.5..1.5f64) {
        let expression = format!("abs(x - {})", c);
        prop_assert_eq!(category_of(&expression), Category::Triangular, "{}", expression);
    }

    #[test]
    fn derivative_lengths_follow_the_grid(
        samples in 3usize..2000,
        expression in prop::sample::select(vec![
            "x", "x*x", "sin(3*x)", "abs(x)", "sign(x)", "1/x", "log(x)",
        ]),
    ) {
        let grid = SampleGrid::linspace(-2.0, 2.0, samples).unwrap();
        let settings = ClassifierSettings::default();
        let first = analyze(expression, &grid, &settings).unwrap();
        let second = analyze(expression, &grid, &settings).unwrap();
        // Values may hold NaN, so compare what was derived from them.
        prop_assert_eq!(first.category(), second.category());
        prop_assert_eq!(first.classification(), second.classification());

        if let Some(classification) = first.classification() {
            prop_assert_eq!(classification.first_derivative.len(), samples - 1);
            prop_assert_eq!(classification.second_derivative.len(), samples - 2);
            prop_assert!(classification.first_derivative.iter().all(|d| d.is_finite()));
            prop_assert!(classification.second_derivative.iter().all(|d| d.is_finite()));
        }
    }
}
