//! Named numeric helpers for the balancer.
//!
//! Every operation states whether it is elementwise or a true linear-algebra
//! product, so the iteration never relies on shape-driven broadcasting.
pub mod matrix;
pub mod vector;

pub use matrix::{
    column_sums, diagonalize, invd, matrix_vector_product, row_sums, scale_rows_and_columns,
    split_signs, transposed_matrix_vector_product,
};
pub use vector::{elementwise_multiply, guarded_reciprocal, max_abs_difference};
