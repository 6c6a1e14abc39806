/// A successful result that may carry diagnostics.
///
/// Evaluation never fails on numerical trouble such as `sqrt` of a negative
/// sample or a division by zero; those samples simply become NaN or infinite.
/// Instead of silencing such events, the evaluator reports them as warnings
/// next to the value so callers can log or display them.
///
/// # Examples
///
/// ```rust
/// use curve_shape::types::WithWarnings;
///
/// let warning = "1 of 2 samples is NaN".to_string();
/// let result = WithWarnings::new(vec![1.0, f64::NAN], vec![warning]);
/// assert!(matches!(result, WithWarnings::Warning(_, _)));
///
/// let (values, warnings): (Vec<f64>, Vec<String>) = result.into();
/// assert_eq!(values.len(), 2);
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WithWarnings<T, W> {
    /// Result without diagnostics
    Ok(T),
    /// Result with diagnostics
    Warning(T, Vec<W>),
}

impl<T, W> WithWarnings<T, W> {
    /// Wraps `value`, choosing the variant by whether `warnings` is empty.
    pub fn new(value: T, warnings: Vec<W>) -> Self {
        if warnings.is_empty() {
            WithWarnings::Ok(value)
        } else {
            WithWarnings::Warning(value, warnings)
        }
    }

    /// Extracts the value, discarding any warnings.
    pub fn unwrap(self) -> T {
        match self {
            WithWarnings::Ok(data) => data,
            WithWarnings::Warning(data, _) => data,
        }
    }

}

impl<T, W> From<WithWarnings<T, W>> for (T, Vec<W>) {
    fn from(value: WithWarnings<T, W>) -> Self {
        match value {
            WithWarnings::Ok(data) => (data, Vec::new()),
            WithWarnings::Warning(data, warnings) => (data, warnings),
        }
    }
}
