//! Runs statements against a MySQL server.
//!
//! Statements go over the text protocol, one round trip each, so anything the
//! server cannot prepare (`LOCK TABLES`, compound bodies) still works. Every
//! statement is preceded by [`DISABLE_CONSTRAINTS`] so dump data can load in
//! any table order.

use std::borrow::Cow;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};
use tokio::runtime::Runtime;

use crate::config::ConnectionOptions;
use crate::error::ExecError;
use crate::model::Statement;
use crate::runner::StatementExecutor;
use crate::splitter::{DEFAULT_TERMINATOR, LINE_SEPARATOR, delimiter_directive};

pub const DISABLE_CONSTRAINTS: &str = "SET FOREIGN_KEY_CHECKS=0;\nSET UNIQUE_CHECKS=0;";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to create database '{name}': {source}")]
    CreateDatabase {
        name: String,
        #[source]
        source: sqlx::Error,
    },
}

impl From<sqlx::Error> for ExecError {
    fn from(err: sqlx::Error) -> Self {
        let message = match &err {
            sqlx::Error::Database(db) => db.message().to_string(),
            other => other.to_string(),
        };
        Self {
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// Backtick-quote a schema name for use in DDL.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Text actually sent for one statement: the constraint switches, then the
/// statement itself.
pub fn command_text(sql: &str) -> String {
    format!("{DISABLE_CONSTRAINTS}{LINE_SEPARATOR}{sql}")
}

/// Remove what only the client understands from a split statement.
///
/// `DELIMITER` lines are dropped and a custom terminator they set is cut off
/// the end. `None` means nothing is left to send.
pub fn server_sql(sql: &str) -> Option<Cow<'_, str>> {
    let mut terminator = None;
    let mut kept = Vec::new();
    for line in sql.lines() {
        match delimiter_directive(line) {
            Some(token) => terminator = Some(token),
            None => kept.push(line),
        }
    }

    if terminator.is_none() {
        return (!sql.trim().is_empty()).then_some(Cow::Borrowed(sql));
    }

    let mut body = kept.join(LINE_SEPARATOR);
    if let Some(token) = terminator.filter(|t| !t.is_empty() && *t != DEFAULT_TERMINATOR) {
        let trimmed = body.trim_end();
        if let Some(stripped) = trimmed.strip_suffix(token) {
            body = stripped.trim_end().to_string();
        }
    }

    (!body.trim().is_empty()).then_some(Cow::Owned(body))
}

/// A [`StatementExecutor`] backed by one MySQL session.
///
/// The session is reopened on the next statement after a connection-level
/// failure; server-side errors leave it in place.
pub struct MySqlExecutor {
    runtime: Runtime,
    options: MySqlConnectOptions,
    server: String,
    conn: Option<MySqlConnection>,
}

impl MySqlExecutor {
    /// Connect, creating the target database first when it does not exist.
    pub fn connect(opts: &ConnectionOptions) -> Result<Self, DatabaseError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut server = MySqlConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .username(&opts.user);
        if let Some(password) = &opts.password {
            server = server.password(password);
        }

        let connect_err = |source| DatabaseError::Connect {
            host: opts.host.clone(),
            port: opts.port,
            source,
        };

        runtime.block_on(async {
            let mut master = MySqlConnection::connect_with(&server).await.map_err(connect_err)?;
            create_database_if_missing(&mut master, &opts.database).await?;
            let _ = master.close().await;
            Ok::<_, DatabaseError>(())
        })?;

        let options = server.database(&opts.database);
        let conn = runtime
            .block_on(MySqlConnection::connect_with(&options))
            .map_err(connect_err)?;
        tracing::info!(host = %opts.host, port = opts.port, database = %opts.database, "connected");

        Ok(Self {
            runtime,
            options,
            server: format!("{}:{}/{}", opts.host, opts.port, opts.database),
            conn: Some(conn),
        })
    }

    fn run(&mut self, text: &str) -> Result<(), sqlx::Error> {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::info!(server = %self.server, "reconnecting");
                self.runtime.block_on(MySqlConnection::connect_with(&self.options))?
            }
        };

        let result = self.runtime.block_on(conn.execute(text));
        match &result {
            // the session is gone; open a fresh one next time
            Err(err) if !matches!(err, sqlx::Error::Database(_)) => {}
            _ => self.conn = Some(conn),
        }
        result.map(|_| ())
    }
}

async fn create_database_if_missing(conn: &mut MySqlConnection, name: &str) -> Result<(), DatabaseError> {
    let create_err = |source| DatabaseError::CreateDatabase {
        name: name.to_string(),
        source,
    };

    let found: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .map_err(create_err)?;
    if found > 0 {
        return Ok(());
    }

    tracing::info!(database = name, "creating database");
    conn.execute(format!("CREATE DATABASE {}", quote_identifier(name)).as_str())
        .await
        .map_err(create_err)?;
    Ok(())
}

impl StatementExecutor for MySqlExecutor {
    fn execute(&mut self, statement: &Statement) -> Result<(), ExecError> {
        let Some(sql) = server_sql(&statement.sql) else {
            tracing::debug!(index = statement.index, "nothing for the server, skipped");
            return Ok(());
        };
        self.run(&command_text(&sql))?;
        Ok(())
    }
}

impl Drop for MySqlExecutor {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = self.runtime.block_on(conn.close());
        }
    }
}
