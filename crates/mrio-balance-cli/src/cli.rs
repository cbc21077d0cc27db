use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

/// Command-line definition of the `mrio-balance` binary.
pub fn build_cli() -> Command {
    Command::new("mrio-balance")
        .version(clap::crate_version!())
        .about("GRAS balancing of input-output tables against new row and column totals")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("balance")
                .about("Balance a benchmark matrix against row and column totals")
                .arg(
                    Arg::new("config")
                        .help("Path to a balance configuration file (JSON)")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("benchmark")
                        .short('b')
                        .long("benchmark")
                        .help(
                            "Benchmark matrix table (*.csv or *.tsv). \
                             Overrides the benchmark specified in the configuration file.",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("row_totals")
                        .short('r')
                        .long("row-totals")
                        .help("Target row totals table with columns label,value")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("column_totals")
                        .short('c')
                        .long("column-totals")
                        .help("Target column totals table with columns label,value")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path the balanced matrix is written to (*.csv or *.tsv)")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("label")
                        .long("label")
                        .help("Name of the table in log messages, e.g. a region or sector")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("tolerance")
                        .long("tolerance")
                        .help("Convergence tolerance on the column multipliers")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("max_iterations")
                        .long("max-iterations")
                        .help("Maximum number of sweeps before giving up")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .help("Log the convergence metric on every sweep")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("template").about("Print the default balance configuration as JSON"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
