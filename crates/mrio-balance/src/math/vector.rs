use ndarray::Array1;

/// Elementwise reciprocal where `1/0` is defined as `1`.
///
/// Zero multipliers of structurally empty rows and columns therefore stay
/// finite in every half-step.
pub fn guarded_reciprocal(values: &Array1<f64>) -> Array1<f64> {
    values.mapv(|x| if x == 0.0 { 1.0 } else { 1.0 / x })
}

/// Elementwise (Hadamard) product of two vectors of equal length.
pub fn elementwise_multiply(lhs: &Array1<f64>, rhs: &Array1<f64>) -> Array1<f64> {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "Elementwise multiply requires equal length vectors"
    );
    lhs * rhs
}

/// Largest absolute elementwise difference, `0` for empty vectors.
///
/// A `NaN` in either input makes the result `NaN`, as does `inf - inf`.
pub fn max_abs_difference(lhs: &Array1<f64>, rhs: &Array1<f64>) -> f64 {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "max_abs_difference requires equal length vectors"
    );
    lhs.iter()
        .zip(rhs.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f64, |acc, d| {
            if acc.is_nan() || d.is_nan() {
                f64::NAN
            } else {
                acc.max(d)
            }
        })
}
