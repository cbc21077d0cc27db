use ndarray::{Array1, Array2, Axis};

use crate::math::vector::guarded_reciprocal;

/// Split a signed matrix into its positive part `P` and the magnitude of its
/// negative part `N`, so that `x = P - N` with `P, N >= 0`.
pub fn split_signs(x: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let positive = x.mapv(|v| if v > 0.0 { v } else { 0.0 });
    let negative = x.mapv(|v| if v < 0.0 { -v } else { 0.0 });
    (positive, negative)
}

/// Square diagonal matrix with `values` on the diagonal.
pub fn diagonalize(values: &Array1<f64>) -> Array2<f64> {
    Array2::from_diag(values)
}

/// Diagonal matrix of guarded reciprocals: `diag(1/x)` with `1/0 = 1`.
pub fn invd(values: &Array1<f64>) -> Array2<f64> {
    diagonalize(&guarded_reciprocal(values))
}

/// True matrix-vector product `A·x`.
pub fn matrix_vector_product(a: &Array2<f64>, x: &Array1<f64>) -> Array1<f64> {
    assert_eq!(
        a.ncols(),
        x.len(),
        "matrix_vector_product: vector length must equal column count"
    );
    a.dot(x)
}

/// True matrix-vector product with the transpose, `Aᵗ·x`.
pub fn transposed_matrix_vector_product(a: &Array2<f64>, x: &Array1<f64>) -> Array1<f64> {
    assert_eq!(
        a.nrows(),
        x.len(),
        "transposed_matrix_vector_product: vector length must equal row count"
    );
    a.t().dot(x)
}

/// `diag(left) · A · diag(right)` without building either diagonal matrix.
pub fn scale_rows_and_columns(
    a: &Array2<f64>,
    left: &Array1<f64>,
    right: &Array1<f64>,
) -> Array2<f64> {
    assert_eq!(a.nrows(), left.len(), "left scaling must match row count");
    assert_eq!(a.ncols(), right.len(), "right scaling must match column count");
    let mut out = a.clone();
    for ((i, j), v) in out.indexed_iter_mut() {
        *v *= left[i] * right[j];
    }
    out
}

pub fn row_sums(a: &Array2<f64>) -> Array1<f64> {
    a.sum_axis(Axis(1))
}

pub fn column_sums(a: &Array2<f64>) -> Array1<f64> {
    a.sum_axis(Axis(0))
}
