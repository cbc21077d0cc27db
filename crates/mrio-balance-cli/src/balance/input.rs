use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use mrio_balance::BalanceConfig;

use crate::util::validate_table_file;

/// Inputs, outputs and solver settings for one balancing run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BalanceRunConfig {
    pub version: String,
    /// Benchmark matrix table (CSV/TSV) with row and column labels.
    pub benchmark: String,
    /// Target row totals, `label,value`.
    pub row_totals: String,
    /// Target column totals, `label,value`.
    pub column_totals: String,
    pub output_file: String,
    /// Label used in log messages; defaults to the benchmark file stem.
    pub label: Option<String>,
    pub balance: BalanceConfig,
}

impl Default for BalanceRunConfig {
    fn default() -> Self {
        BalanceRunConfig {
            version: clap::crate_version!().to_string(),
            benchmark: String::new(),
            row_totals: String::new(),
            column_totals: String::new(),
            output_file: String::from("balanced.csv"),
            label: None,
            balance: BalanceConfig::default(),
        }
    }
}

impl BalanceRunConfig {
    /// Load the JSON configuration file.
    pub fn load(config_path: &PathBuf) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: BalanceRunConfig = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        Ok(config)
    }

    /// Build the run configuration from an optional config file and the
    /// command-line overrides of the `balance` subcommand.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => BalanceRunConfig::default(),
        };

        if let Some(benchmark) = matches.get_one::<String>("benchmark") {
            config.benchmark = benchmark.clone();
        }
        if let Some(row_totals) = matches.get_one::<String>("row_totals") {
            config.row_totals = row_totals.clone();
        }
        if let Some(column_totals) = matches.get_one::<String>("column_totals") {
            config.column_totals = column_totals.clone();
        }
        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = output_file.clone();
        }
        if let Some(label) = matches.get_one::<String>("label") {
            config.label = Some(label.clone());
        }
        if let Some(&tolerance) = matches.get_one::<f64>("tolerance") {
            config.balance.tolerance = tolerance;
        }
        if let Some(&max_iterations) = matches.get_one::<usize>("max_iterations") {
            config.balance.max_iterations = max_iterations;
        }
        if matches.get_flag("verbose") {
            config.balance.verbose = true;
        }

        validate_table_file("benchmark", &config.benchmark)?;
        validate_table_file("row totals", &config.row_totals)?;
        validate_table_file("column totals", &config.column_totals)?;
        config.balance.validate()?;

        Ok(config)
    }
}
