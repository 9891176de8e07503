pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "flightline",
    about = "Flightline receipt pricing CLI",
    long_about = "Price fuel receipts, ingest fee-schedule overrides, and validate pricing snapshots.",
    after_help = "Examples:\n  flightline compose --snapshot schedule.json --order order.json\n  flightline ingest-overrides --snapshot schedule.json --csv overrides.csv\n  flightline validate --snapshot schedule.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Path to a flightline.toml config file")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compose a receipt: line items and rollups for one fuel order")]
    Compose {
        #[arg(long, help = "Pricing snapshot JSON (catalog, overrides, tiers)")]
        snapshot: PathBuf,
        #[arg(long, help = "Receipt input JSON (fuel order, services, waiver toggles)")]
        order: PathBuf,
    },
    #[command(about = "Apply a bulk override CSV to a snapshot and write it back")]
    IngestOverrides {
        #[arg(long, help = "Pricing snapshot JSON to update")]
        snapshot: PathBuf,
        #[arg(long, help = "CSV with aircraft_type_name, fee_code, override_amount[, override_caa_amount]")]
        csv: PathBuf,
        #[arg(long, help = "Write the updated snapshot to this path instead of in place")]
        out: Option<PathBuf>,
    },
    #[command(about = "Validate a pricing snapshot without composing anything")]
    Validate {
        #[arg(long, help = "Pricing snapshot JSON to check")]
        snapshot: PathBuf,
    },
    #[command(about = "Inspect effective configuration values")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compose { ref snapshot, ref order } => {
            commands::compose::run(snapshot, order, cli.config.as_deref())
        }
        Command::IngestOverrides { ref snapshot, ref csv, ref out } => {
            commands::ingest::run(snapshot, csv, out.as_deref())
        }
        Command::Validate { ref snapshot } => commands::validate::run(snapshot),
        Command::Config => commands::config::run(cli.config.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
