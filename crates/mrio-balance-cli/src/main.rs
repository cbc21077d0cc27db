use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use mrio_balance_cli::balance::input::BalanceRunConfig;
use mrio_balance_cli::balance::run::run_balance;
use mrio_balance_cli::cli::build_cli;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MRIO_BALANCE_LOG", "error,mrio_balance=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("balance", sub_m)) => handle_balance(sub_m),
        Some(("template", _)) => {
            let template = serde_json::to_string_pretty(&BalanceRunConfig::default())?;
            println!("{}", template);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_balance(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    match config_path {
        Some(path) => log::info!("[mrio-balance] Using config: {:?}", path),
        None => eprintln!("[mrio-balance] No config file provided; using defaults and command-line options."),
    }

    let config = BalanceRunConfig::from_arguments(config_path, matches)?;

    match run_balance(&config) {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Balancing failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
