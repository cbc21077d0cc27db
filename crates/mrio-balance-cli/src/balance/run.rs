use std::path::PathBuf;

use anyhow::{Context, Result};

use mrio_balance::io::{read_labelled_matrix, read_margins, write_labelled_matrix, LabelledMatrix};
use mrio_balance::{BalanceSummary, GrasBalancer};

use crate::balance::input::BalanceRunConfig;
use crate::util::table_label;

/// Result of a completed run: where the matrix went and how well it balanced.
#[derive(Debug)]
pub struct BalanceRunOutcome {
    pub output_file: PathBuf,
    pub summary: BalanceSummary,
}

/// Read the inputs, balance the benchmark and write the balanced table.
///
/// Hitting the iteration cap or diverging multipliers is reported in the
/// summary and logged; the last usable iterate is still written.
pub fn run_balance(config: &BalanceRunConfig) -> Result<BalanceRunOutcome> {
    let benchmark = read_labelled_matrix(&config.benchmark)?;
    let row_totals = read_margins(&config.row_totals)?
        .aligned_to(&benchmark.row_labels)
        .with_context(|| format!("Row totals in {} do not cover the benchmark rows", config.row_totals))?;
    let column_totals = read_margins(&config.column_totals)?
        .aligned_to(&benchmark.column_labels)
        .with_context(|| {
            format!(
                "Column totals in {} do not cover the benchmark columns",
                config.column_totals
            )
        })?;

    let label = config
        .label
        .clone()
        .unwrap_or_else(|| table_label(&config.benchmark));
    log::info!(
        "[mrio-balance] Balancing '{}' ({} x {})",
        label,
        benchmark.row_labels.len(),
        benchmark.column_labels.len()
    );

    let balancer = GrasBalancer::new(config.balance.clone())?.with_label(label.as_str());
    let result = balancer.balance(&benchmark.values, &row_totals, &column_totals)?;
    let summary = result.summary(&row_totals, &column_totals);

    if summary.diverged {
        log::warn!(
            "[mrio-balance] '{}' diverged; the margins are likely inconsistent (margin error {:e})",
            label,
            summary.margin_error
        );
    } else if !summary.converged {
        log::warn!(
            "[mrio-balance] '{}' hit the iteration cap; writing the last iterate (margin error {:e})",
            label,
            summary.margin_error
        );
    }

    let balanced = LabelledMatrix::new(benchmark.row_labels, benchmark.column_labels, result.matrix)?;
    let output_file = PathBuf::from(&config.output_file);
    write_labelled_matrix(&output_file, &balanced)?;
    log::info!("[mrio-balance] Wrote balanced matrix to {:?}", output_file);

    Ok(BalanceRunOutcome {
        output_file,
        summary,
    })
}
