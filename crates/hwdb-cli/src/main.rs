// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! `hwdb`: command line access to the hardware database.
//!
//! ```text
//! hwdb get W33D0 to_be_powered
//! hwdb query dls_setup 07_20
//! hwdb dump --output normalised.yaml
//! hwdb licenses --license-file licenses --tres-file accountingStorageTRES
//! ```
//!
//! Every subcommand reads the file given by `--hwdb`, falling back to
//! `$HWDB_PATH` and then to the deployment path.

mod licenses;
mod property;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hwdb_core::{get_yaml_entries, Database};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "hwdb",
    version,
    about = "Hardware database command line interface",
    disable_help_subcommand = true
)]
struct Cli {
    /// Database file [default: $HWDB_PATH or the deployment path].
    #[arg(long, global = true)]
    hwdb: Option<PathBuf>,

    /// Log more (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one property of the entry at a short-format coordinate
    /// (W33, W5F2, W12H100, W33D0, W3A1).
    Get {
        /// Wafer, FPGA, HICANN, reticle or Ananas in short format.
        coordinate: String,
        /// Property of the entry to print.
        property: String,
    },
    /// Print the on-disk text of every document whose top-level KEY equals VALUE.
    Query {
        /// Top-level key, e.g. `dls_setup` or `hxcube_id`.
        key: String,
        /// Value to match, compared as text.
        value: String,
    },
    /// Load the database and write it back in normal form.
    Dump {
        /// Write here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write slurm license and TRES files.
    Licenses(LicenseArgs),
}

#[derive(Args)]
struct LicenseArgs {
    /// Licenses output file.
    #[arg(long, default_value = "licenses")]
    license_file: PathBuf,

    /// AccountingStorageTRES output file.
    #[arg(long, default_value = "accountingStorageTRES")]
    tres_file: PathBuf,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Database> {
    let mut db = Database::new();
    db.load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(db)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let path = cli.hwdb.unwrap_or_else(Database::default_path);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Get {
            coordinate,
            property,
        } => {
            let db = load(&path)?;
            let value = property::lookup(&db, &coordinate, &property)?;
            writeln!(stdout, "{value}")?;
        }
        Commands::Query { key, value } => {
            let found = get_yaml_entries(&path, &key, &value)
                .with_context(|| format!("querying {}", path.display()))?;
            stdout.write_all(found.as_bytes())?;
        }
        Commands::Dump { output } => {
            let db = load(&path)?;
            match output {
                Some(out) => db
                    .store(&out)
                    .with_context(|| format!("writing {}", out.display()))?,
                None => db.dump(&mut stdout)?,
            }
        }
        Commands::Licenses(args) => {
            let db = load(&path)?;
            licenses::write_files(&db, &args.license_file, &args.tres_file)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
