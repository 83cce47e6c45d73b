/// Mean and sample standard deviation (`n - 1` denominator) of `values`.
///
/// A single value has a standard deviation of `0.0`. Returns `None` for an
/// empty slice.
///
/// ```
/// use evorun::evolution::statistics::mean_and_std_dev;
///
/// assert_eq!(mean_and_std_dev(&[2.0, 4.0, 6.0]), Some((4.0, 2.0)));
/// ```
pub fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() == 1 {
        return Some((mean, 0.0));
    }
    let squared: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((mean, (squared / (n - 1.0)).sqrt()))
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
