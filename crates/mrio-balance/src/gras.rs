//! Generalized RAS (GRAS) balancing of signed matrices.
//!
//! GRAS updates a benchmark matrix `X0` so that its row and column sums match
//! new targets `u` and `v` while staying as close as possible to the relative
//! structure of `X0`. Unlike classical RAS it accepts negative entries: the
//! benchmark is split into its positive part `P` and negative magnitude `N`,
//! and the two parts are rescaled by reciprocal multipliers,
//!
//! ```text
//! X = diag(r)·P·diag(s) − diag(1/r)·N·diag(1/s)
//! ```
//!
//! The multipliers are found by alternating closed-form half-steps until the
//! column multipliers `s` stop moving.
//!
//! References: Junius & Oosterhaven (2003); Lenzen, Wood & Gallego (2007);
//! Temurshoev, Miller & Bouwmeester (2013).
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::BalanceConfig;
use crate::error::BalanceError;
use crate::math::{
    column_sums, elementwise_multiply, guarded_reciprocal, matrix_vector_product,
    max_abs_difference, row_sums,
    scale_rows_and_columns, split_signs, transposed_matrix_vector_product,
};

/// Largest multiplier magnitude accepted during iteration. Nonzero multipliers
/// must also stay above its reciprocal.
pub const MULTIPLIER_LIMIT: f64 = 1e100;

/// Output of a balancing run.
#[derive(Debug, Clone)]
pub struct BalanceResult {
    /// The balanced `m × n` matrix.
    pub matrix: Array2<f64>,
    /// Terminal row multipliers `r`.
    pub row_multipliers: Array1<f64>,
    /// Terminal column multipliers `s`.
    pub column_multipliers: Array1<f64>,
    /// `false` when the iteration cap was hit or the multipliers diverged
    /// before the tolerance was met.
    pub converged: bool,
    /// `true` when the multipliers left the representable range and iteration
    /// stopped at the last usable sweep.
    pub diverged: bool,
    /// Number of sweeps performed.
    pub iterations: usize,
    /// Largest change in `s` over the last accepted sweep, `inf` if none was.
    pub residual: f64,
}

/// Serializable digest of a [`BalanceResult`] measured against its targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSummary {
    pub converged: bool,
    pub diverged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub margin_error: f64,
}

impl BalanceResult {
    pub fn row_sums(&self) -> Array1<f64> {
        row_sums(&self.matrix)
    }

    pub fn column_sums(&self) -> Array1<f64> {
        column_sums(&self.matrix)
    }

    /// Largest absolute deviation of the balanced sums from the targets,
    /// `NaN` when the matrix holds a `NaN`.
    pub fn margin_error(&self, row_totals: &Array1<f64>, column_totals: &Array1<f64>) -> f64 {
        let rows = max_abs_difference(&self.row_sums(), row_totals);
        let cols = max_abs_difference(&self.column_sums(), column_totals);
        if rows.is_nan() || cols.is_nan() {
            f64::NAN
        } else {
            rows.max(cols)
        }
    }

    /// `true` when no entry of the balanced matrix is `NaN` or infinite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }

    pub fn summary(&self, row_totals: &Array1<f64>, column_totals: &Array1<f64>) -> BalanceSummary {
        BalanceSummary {
            converged: self.converged,
            diverged: self.diverged,
            iterations: self.iterations,
            residual: self.residual,
            margin_error: self.margin_error(row_totals, column_totals),
        }
    }
}

/// `sum(u) − sum(v)`. Balanced margins have a gap of zero.
pub fn margin_gap(row_totals: &Array1<f64>, column_totals: &Array1<f64>) -> f64 {
    row_totals.sum() - column_totals.sum()
}

/// GRAS balancer bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct GrasBalancer {
    config: BalanceConfig,
    label: Option<String>,
}

impl GrasBalancer {
    /// Create a new balancer.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidTolerance`] or
    /// [`BalanceError::InvalidIterationCap`] when `config` is unusable.
    pub fn new(config: BalanceConfig) -> Result<Self, BalanceError> {
        config.validate()?;
        Ok(Self {
            config,
            label: None,
        })
    }

    /// Attach a label (sector, region, table name) used in log messages.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("matrix")
    }

    /// Balance `benchmark` against `row_totals` and `column_totals`.
    ///
    /// Non-convergence is not an error: the result of the last sweep is
    /// returned with `converged == false`. When a multiplier overflows,
    /// collapses towards zero or turns `NaN` (grossly inconsistent margins),
    /// iteration stops at the last sweep whose multipliers were all within
    /// [`MULTIPLIER_LIMIT`], and the result is flagged as `diverged`.
    ///
    /// # Arguments
    ///
    /// * `benchmark` - The `m × n` benchmark matrix `X0`, any sign.
    /// * `row_totals` - Target row sums `u`, length `m`.
    /// * `column_totals` - Target column sums `v`, length `n`.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::ShapeMismatch`] when a margin vector does not
    /// match the benchmark dimensions.
    pub fn balance(
        &self,
        benchmark: &Array2<f64>,
        row_totals: &Array1<f64>,
        column_totals: &Array1<f64>,
    ) -> Result<BalanceResult, BalanceError> {
        let (nrows, ncols) = benchmark.dim();
        if row_totals.len() != nrows {
            return Err(BalanceError::ShapeMismatch {
                what: "row totals",
                expected: nrows,
                found: row_totals.len(),
            });
        }
        if column_totals.len() != ncols {
            return Err(BalanceError::ShapeMismatch {
                what: "column totals",
                expected: ncols,
                found: column_totals.len(),
            });
        }

        let gap = margin_gap(row_totals, column_totals);
        let scale = 1.0f64
            .max(row_totals.sum().abs())
            .max(column_totals.sum().abs());
        if gap.abs() > self.config.tolerance * scale {
            log::warn!(
                "GRAS [{}]: row totals and column totals differ by {:e}; margins are inconsistent",
                self.name(),
                gap
            );
        }

        let (positive, negative) = split_signs(benchmark);
        log::trace!(
            "GRAS [{}]: balancing {}x{} matrix ({} negative entries)",
            self.name(),
            nrows,
            ncols,
            negative.iter().filter(|&&v| v > 0.0).count()
        );

        let mut r = Array1::<f64>::ones(nrows);
        let mut s = column_step(&positive, &negative, &r, column_totals);

        let mut iterations = 0;
        let mut converged = false;
        let mut diverged = false;
        let mut residual = f64::INFINITY;
        loop {
            let r_next = row_step(&positive, &negative, &s, row_totals);
            if !multipliers_in_range(&r_next) {
                diverged = true;
                break;
            }
            r = r_next;

            let s_next = column_step(&positive, &negative, &r, column_totals);
            let delta = max_abs_difference(&s_next, &s);
            if !delta.is_finite() || !multipliers_in_range(&s_next) {
                diverged = true;
                break;
            }
            s = s_next;
            residual = delta;
            iterations += 1;
            self.log_progress(iterations, residual);

            if residual <= self.config.tolerance {
                converged = true;
                break;
            }
            if iterations >= self.config.max_iterations {
                break;
            }
        }

        // Terminal row multipliers consistent with the final column multipliers.
        // After a divergent row step the previous `r` is kept.
        let r_final = row_step(&positive, &negative, &s, row_totals);
        if multipliers_in_range(&r_final) {
            r = r_final;
        } else {
            converged = false;
            diverged = true;
        }

        if converged {
            log::debug!(
                "GRAS [{}]: converged after {} sweeps (max |ds| = {:e})",
                self.name(),
                iterations,
                residual
            );
        } else if diverged {
            log::warn!(
                "GRAS [{}]: multipliers diverged after {} sweeps (max |ds| = {:e}); margins are likely inconsistent, returning last usable iterate",
                self.name(),
                iterations,
                residual
            );
        } else {
            log::warn!(
                "GRAS [{}]: no convergence after {} sweeps (max |ds| = {:e}); returning last iterate",
                self.name(),
                iterations,
                residual
            );
        }

        let matrix = &scale_rows_and_columns(&positive, &r, &s)
            - &scale_rows_and_columns(&negative, &guarded_reciprocal(&r), &guarded_reciprocal(&s));

        Ok(BalanceResult {
            matrix,
            row_multipliers: r,
            column_multipliers: s,
            converged,
            diverged,
            iterations,
            residual,
        })
    }

    fn log_progress(&self, iterations: usize, residual: f64) {
        if self.config.verbose {
            log::info!(
                "GRAS [{}]: sweep {} max |ds| = {:e}",
                self.name(),
                iterations,
                residual
            );
        } else if self.config.log_interval > 0 && iterations % self.config.log_interval == 0 {
            log::debug!(
                "GRAS [{}]: sweep {} max |ds| = {:e}",
                self.name(),
                iterations,
                residual
            );
        }
    }
}

/// Balance with an explicit tolerance and the default iteration cap.
///
/// Equivalent to `GrasBalancer::new(BalanceConfig::new(tolerance, verbose))`
/// followed by [`GrasBalancer::balance`].
pub fn gras(
    benchmark: &Array2<f64>,
    row_totals: &Array1<f64>,
    column_totals: &Array1<f64>,
    tolerance: f64,
    verbose: bool,
) -> Result<BalanceResult, BalanceError> {
    GrasBalancer::new(BalanceConfig::new(tolerance, verbose))?.balance(
        benchmark,
        row_totals,
        column_totals,
    )
}

/// `true` when every multiplier is finite and either exactly zero or within
/// `[1/MULTIPLIER_LIMIT, MULTIPLIER_LIMIT]` in magnitude.
///
/// Exact zeros come from empty rows and columns or zero targets; a multiplier
/// drifting below the lower bound is about to underflow to a spurious zero.
fn multipliers_in_range(multipliers: &Array1<f64>) -> bool {
    multipliers.iter().all(|&x| {
        let magnitude = x.abs();
        x == 0.0 || (magnitude <= MULTIPLIER_LIMIT && magnitude >= 1.0 / MULTIPLIER_LIMIT)
    })
}

/// Column half-step: given `r`, solve for `s`.
fn column_step(
    positive: &Array2<f64>,
    negative: &Array2<f64>,
    r: &Array1<f64>,
    column_totals: &Array1<f64>,
) -> Array1<f64> {
    let pr = transposed_matrix_vector_product(positive, r);
    let nr = transposed_matrix_vector_product(negative, &guarded_reciprocal(r));
    solve_multipliers(column_totals, &pr, &nr)
}

/// Row half-step: given `s`, solve for `r`.
fn row_step(
    positive: &Array2<f64>,
    negative: &Array2<f64>,
    s: &Array1<f64>,
    row_totals: &Array1<f64>,
) -> Array1<f64> {
    let ps = matrix_vector_product(positive, s);
    let ns = matrix_vector_product(negative, &guarded_reciprocal(s));
    solve_multipliers(row_totals, &ps, &ns)
}

/// Per entry, the non-negative root of `p·x² − t·x − n = 0`:
/// `x = (t + sqrt(t² + 4·p·n)) / (2·p)`.
///
/// Where `p = 0` the quadratic degenerates to `−t·x − n = 0` and
/// `x = −n · (1/t)`, with the reciprocal guarded so that `t = 0` yields `−n`.
fn solve_multipliers(
    targets: &Array1<f64>,
    positive: &Array1<f64>,
    negative: &Array1<f64>,
) -> Array1<f64> {
    let fallback = elementwise_multiply(negative, &guarded_reciprocal(targets));
    let mut out = Array1::<f64>::zeros(targets.len());
    for i in 0..targets.len() {
        let (t, p, n) = (targets[i], positive[i], negative[i]);
        out[i] = if p == 0.0 {
            -fallback[i]
        } else {
            // p, n >= 0 so the discriminant is only negative through rounding
            let disc = (t * t + 4.0 * p * n).max(0.0);
            (t + disc.sqrt()) / (2.0 * p)
        };
    }
    out
}
