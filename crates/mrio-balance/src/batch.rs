//! Balancing many independent matrices, one job per sector or region.
//!
//! Each job is a pure call into [`GrasBalancer`], so jobs are fanned out over
//! the rayon thread pool. A job that fails, diverges or hits the iteration cap
//! never aborts the batch; its outcome is reported alongside the others.
use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::config::BalanceConfig;
use crate::error::BalanceError;
use crate::gras::{BalanceResult, GrasBalancer};

/// A labelled balancing problem.
#[derive(Debug, Clone)]
pub struct BalanceJob {
    /// Sector/region identifier used in logs and outcomes.
    pub label: String,
    pub benchmark: Array2<f64>,
    pub row_totals: Array1<f64>,
    pub column_totals: Array1<f64>,
}

impl BalanceJob {
    pub fn new(
        label: impl Into<String>,
        benchmark: Array2<f64>,
        row_totals: Array1<f64>,
        column_totals: Array1<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            benchmark,
            row_totals,
            column_totals,
        }
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub label: String,
    pub result: Result<BalanceResult, BalanceError>,
}

/// Counts of job outcomes in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converged: usize,
    pub capped: usize,
    pub diverged: usize,
    pub failed: usize,
}

/// Balance every job in parallel. Outcomes are returned in job order.
pub fn balance_all(jobs: &[BalanceJob], config: &BalanceConfig) -> Vec<JobOutcome> {
    log::info!("Balancing {} matrices", jobs.len());
    jobs.par_iter()
        .map(|job| {
            let result = GrasBalancer::new(config.clone()).and_then(|balancer| {
                balancer.with_label(job.label.as_str()).balance(
                    &job.benchmark,
                    &job.row_totals,
                    &job.column_totals,
                )
            });
            if let Err(e) = &result {
                log::error!("Balancing '{}' failed: {}", job.label, e);
            }
            JobOutcome {
                label: job.label.clone(),
                result,
            }
        })
        .collect()
}

pub fn summarize(outcomes: &[JobOutcome]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for outcome in outcomes {
        match &outcome.result {
            Ok(res) if res.converged => summary.converged += 1,
            Ok(res) if res.diverged => summary.diverged += 1,
            Ok(_) => summary.capped += 1,
            Err(_) => summary.failed += 1,
        }
    }
    summary
}
