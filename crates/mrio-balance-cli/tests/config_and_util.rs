//! Integration tests for run configuration, util helpers and end-to-end runs.

use mrio_balance_cli::balance::input::BalanceRunConfig;
use mrio_balance_cli::balance::run::run_balance;
use mrio_balance_cli::cli::build_cli;
use mrio_balance_cli::util::{table_label, validate_table_file};

fn write_inputs(dir: &tempfile::TempDir) -> BalanceRunConfig {
    let benchmark = dir.path().join("region_a.csv");
    let rows = dir.path().join("rows.csv");
    let cols = dir.path().join("cols.csv");
    std::fs::write(&benchmark, "sector,agri,transport\nagri,2,-1\ntransport,0,3\n").unwrap();
    std::fs::write(&rows, "sector,total\ntransport,4\nagri,2\n").unwrap();
    std::fs::write(&cols, "sector,total\nagri,3\ntransport,3\n").unwrap();

    BalanceRunConfig {
        benchmark: benchmark.to_str().unwrap().to_string(),
        row_totals: rows.to_str().unwrap().to_string(),
        column_totals: cols.to_str().unwrap().to_string(),
        output_file: dir.path().join("balanced.csv").to_str().unwrap().to_string(),
        ..BalanceRunConfig::default()
    }
}

// ---------------------------------------------------------------------------
// validate_table_file
// ---------------------------------------------------------------------------

#[test]
fn validate_tsv_table_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_table_file("benchmark", path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_wrong_extension_names_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    let err = validate_table_file("row totals", path.to_str().unwrap()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row totals table"), "{}", msg);
    assert!(msg.contains(".csv or .tsv"), "{}", msg);
}

#[test]
fn validate_missing_table_names_the_table() {
    let err = validate_table_file("column totals", "/nonexistent/path/data.csv").unwrap_err();
    assert!(err.to_string().contains("column totals table was not found"));
}

#[test]
fn validate_rejects_directory_and_empty_path() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("tables.csv");
    std::fs::create_dir(&sub).unwrap();
    assert!(validate_table_file("benchmark", sub.to_str().unwrap()).is_err());
    let err = validate_table_file("benchmark", "").unwrap_err();
    assert_eq!(err.to_string(), "No benchmark table given");
}

#[test]
fn table_label_uses_file_stem() {
    assert_eq!(table_label("/data/mrio/region_a.csv"), "region_a");
}

// ---------------------------------------------------------------------------
// BalanceRunConfig
// ---------------------------------------------------------------------------

#[test]
fn run_config_default_values() {
    let cfg = BalanceRunConfig::default();
    assert_eq!(cfg.output_file, "balanced.csv");
    assert_eq!(cfg.balance.tolerance, 1e-5);
    assert_eq!(cfg.balance.max_iterations, 100_000);
    assert!(cfg.label.is_none());
}

#[test]
fn run_config_round_trips_json() {
    let cfg = BalanceRunConfig::default();
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    assert!(json.contains("\"benchmark\""));
    assert!(json.contains("\"tolerance\""));
    let back: BalanceRunConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, back);
}

#[test]
fn command_line_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = write_inputs(&dir);
    cfg.balance.tolerance = 1e-3;
    let config_path = dir.path().join("balance.json");
    std::fs::write(&config_path, serde_json::to_string(&cfg).unwrap()).unwrap();

    let matches = build_cli()
        .try_get_matches_from([
            "mrio-balance",
            "balance",
            config_path.to_str().unwrap(),
            "--tolerance",
            "1e-9",
            "--label",
            "north",
        ])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    let loaded = BalanceRunConfig::from_arguments(Some(&config_path), sub).unwrap();

    assert_eq!(loaded.benchmark, cfg.benchmark);
    assert_eq!(loaded.balance.tolerance, 1e-9);
    assert_eq!(loaded.label.as_deref(), Some("north"));
}

#[test]
fn from_arguments_requires_existing_inputs() {
    let matches = build_cli()
        .try_get_matches_from(["mrio-balance", "balance", "-b", "/nonexistent/x.csv"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert!(BalanceRunConfig::from_arguments(None, sub).is_err());
}

#[test]
fn from_arguments_rejects_invalid_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_inputs(&dir);
    let matches = build_cli()
        .try_get_matches_from([
            "mrio-balance",
            "balance",
            "-b",
            cfg.benchmark.as_str(),
            "-r",
            cfg.row_totals.as_str(),
            "-c",
            cfg.column_totals.as_str(),
            "--tolerance",
            "0",
        ])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert!(BalanceRunConfig::from_arguments(None, sub).is_err());
}

// ---------------------------------------------------------------------------
// run_balance
// ---------------------------------------------------------------------------

#[test]
fn run_balance_writes_balanced_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = write_inputs(&dir);
    cfg.balance.tolerance = 1e-9;

    let outcome = run_balance(&cfg).unwrap();
    assert!(outcome.summary.converged);
    assert!(outcome.summary.margin_error < 1e-6);

    let balanced = mrio_balance::io::read_labelled_matrix(&outcome.output_file).unwrap();
    assert_eq!(balanced.row_labels, vec!["agri", "transport"]);
    let expected = [[3.0, -1.0], [0.0, 4.0]];
    for i in 0..2 {
        for j in 0..2 {
            assert!((balanced.values[(i, j)] - expected[i][j]).abs() < 1e-4);
        }
    }
}

#[test]
fn run_balance_reports_missing_margin_label() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_inputs(&dir);
    std::fs::write(&cfg.row_totals, "sector,total\nagri,2\n").unwrap();

    let err = run_balance(&cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("transport"));
}

#[test]
fn run_balance_flags_diverging_margins_and_writes_finite_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = write_inputs(&dir);
    std::fs::write(&cfg.benchmark, "sector,agri,transport\nagri,3,1\ntransport,1,2\n").unwrap();
    std::fs::write(&cfg.row_totals, "sector,total\nagri,1\ntransport,1\n").unwrap();
    std::fs::write(&cfg.column_totals, "sector,total\nagri,100\ntransport,200\n").unwrap();
    cfg.label = Some("inconsistent".to_string());

    let outcome = run_balance(&cfg).unwrap();
    assert!(!outcome.summary.converged);
    assert!(outcome.summary.diverged);
    assert!(outcome.summary.margin_error >= 100.0);

    let balanced = mrio_balance::io::read_labelled_matrix(&outcome.output_file).unwrap();
    assert!(balanced.values.iter().all(|v| v.is_finite()));
}
