use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

// `-h` is the host, as for the mysql client, so help is long-only.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_flag = true)]
pub struct Cli {
    /// SQL script files, run in the order given
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Database to run the scripts in, created if missing. Without it the
    /// statements are only written to stdout.
    #[arg(short, long)]
    pub database: Option<String>,

    /// MySQL server host
    #[arg(short, long, default_value = "localhost")]
    pub host: String,

    /// MySQL server port
    #[arg(short = 'P', long, default_value_t = 3306, value_parser = clap::value_parser!(u16).range(1..32768))]
    pub port: u16,

    /// MySQL user
    #[arg(short, long, default_value = "root")]
    pub user: String,

    /// MySQL password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Keep `/*!...*/` conditional comments as statement text
    #[arg(long)]
    pub include_vendor_comments: bool,

    /// Abort on the first failing statement instead of reporting and moving on
    #[arg(short, long)]
    pub stop_on_error: bool,

    /// Log every statement as it is run
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// How statements are written to stdout when no database is given
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Statements separated by `-- statement N` comment lines
    Text,
    /// One JSON object per statement
    Json,
}
