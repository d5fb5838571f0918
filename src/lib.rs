pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod model;
pub mod progress;
pub mod runner;
pub mod splitter;
pub mod writer;

use anyhow::Context;
use clap::Parser;

use crate::cli::OutputFormat;
use crate::runner::StatementExecutor;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Configure ──────────────────────────────────────────────────
    let config = config::Config::from_cli(&args);
    logging::init_tracing(&config.log_level);

    // 2. ── Pick an executor: the database, or stdout ──────────────────
    let mut executor: Box<dyn StatementExecutor> = match &config.connection {
        Some(conn) => Box::new(
            database::MySqlExecutor::connect(conn)
                .with_context(|| format!("Preparing database '{}'", conn.database))?,
        ),
        None => {
            let stdout = std::io::stdout().lock();
            match args.format {
                OutputFormat::Text => Box::new(writer::TextWriter::new(stdout)),
                OutputFormat::Json => Box::new(writer::JsonLinesWriter::new(stdout)),
            }
        }
    };

    // 3. ── Split & run every script ───────────────────────────────────
    let report = runner::run_files(&args.files, &config.run, executor.as_mut())
        .with_context(|| "Running SQL scripts")?;

    // 4. ── Summary ────────────────────────────────────────────────────
    if !report.failures.is_empty() {
        tracing::warn!(
            failed = report.failures.len(),
            succeeded = report.succeeded(),
            "some statements failed and were skipped"
        );
    }

    Ok(())
}
