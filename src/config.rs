use crate::cli::Cli;

/// Knobs for the statement splitter itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitterOptions {
    /// Keep `/*!...*/` comments as statement content instead of stripping them.
    pub include_vendor_comments: bool,
}

/// Knobs for the execution loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub splitter: SplitterOptions,
    pub stop_on_error: bool,
    pub progress: bool,
}

/// Where statements run when a database was named on the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl std::fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub run: RunOptions,
    /// `None` means statements are written out instead of executed.
    pub connection: Option<ConnectionOptions>,
}

impl Config {
    /// `RUST_LOG` wins over the verbosity flags when it is set.
    pub fn from_cli(cli: &Cli) -> Self {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_level(cli).to_string());

        Self {
            log_level,
            run: RunOptions {
                splitter: SplitterOptions {
                    include_vendor_comments: cli.include_vendor_comments,
                },
                stop_on_error: cli.stop_on_error,
                progress: !(cli.no_progress || cli.quiet || cli.verbose),
            },
            connection: cli.database.as_ref().map(|database| ConnectionOptions {
                host: cli.host.clone(),
                port: cli.port,
                user: cli.user.clone(),
                password: cli.password.clone(),
                database: database.clone(),
            }),
        }
    }
}

fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    }
}
