// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cmd::commands::{extract_command, pack_command};
use cmd::common::LogChoice;
use diagnostics::{LOG_ENV, LogLevel, log_warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "mergefs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge inputs into a directory tree
    Extract(ExtractArgs),
    /// Merge inputs into a zip archive
    Pack(PackArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Output directory (emptied first)
    #[arg(short, long)]
    out: PathBuf,

    /// Input files and folders
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Args)]
struct PackArgs {
    /// Output archive file
    #[arg(short, long)]
    out: PathBuf,

    /// Store entries without compression
    #[arg(long)]
    store: bool,

    /// Input files and folders
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn init_logging(quiet: bool) {
    if std::env::var_os(LOG_ENV).is_some() {
        diagnostics::init_diagnostics();
    } else if !quiet {
        diagnostics::init_with_level(LogLevel::Info);
    }
}

#[tokio::main]
#[allow(clippy::print_stdout)]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let log = LogChoice::new(cli.quiet);

    match &cli.command {
        Commands::Extract(args) => {
            let root = extract_command(&args.inputs, &args.out, log.sink()).await?;
            println!("{}", root.display());
        }
        Commands::Pack(args) => {
            let size = pack_command(&args.inputs, &args.out, args.store, log.sink()).await?;
            println!("{} ({size} bytes)", args.out.display());
        }
    }

    let warnings = log.warn_count();
    if warnings > 0 {
        log_warn!("Finished with {warnings} warnings", warnings: warnings);
    }

    Ok(())
}
