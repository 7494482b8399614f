//! Bulk loader for spawn rule documents
//!
//! Drops and recreates the target table, then inserts every document from a
//! JSON array file in batches. Destructive: do not point it at a table that is
//! serving search traffic.
//!
//! Usage:
//!   spawn-loader --file all_spawns_processed_ENRICHED.json [--database-url <url>] [--batch-size 500]
//!
//! Exit status: 0 ok, 2 configuration, 3 source file, 4 malformed input, 5 database.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use spawndex::loader::{self, LoadOptions, DEFAULT_BATCH_SIZE, DEFAULT_SOURCE_FILE, DEFAULT_TABLE};
use spawndex::logging;

#[derive(Parser, Debug)]
#[clap(name = "spawn-loader")]
#[clap(about = "Load spawn rule documents into PostgreSQL (replaces the table)")]
struct Args {
    /// JSON array of spawn documents
    #[clap(short, long, default_value = DEFAULT_SOURCE_FILE)]
    file: PathBuf,

    /// Database connection URL (or set DATABASE_URL env var)
    #[clap(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Target table, recreated on every run
    #[clap(short, long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Rows per INSERT statement
    #[clap(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Parse and validate the file without touching the database
    #[clap(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    logging::init_simple_logging("info,spawndex=debug");

    let options = LoadOptions {
        source: args.file,
        database_url: args.database_url,
        table: args.table,
        batch_size: args.batch_size,
        dry_run: args.dry_run,
    };

    match loader::run(&options).await {
        Ok(report) => {
            info!(
                documents = report.documents,
                batches = report.batches,
                elapsed_secs = %format!("{:.2}", report.elapsed.as_secs_f64()),
                "Load finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, exit_code = e.exit_code(), "Load failed");
            ExitCode::from(e.exit_code())
        }
    }
}
