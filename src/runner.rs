//! Feeds split statements from each script file into an executor.
//!
//! The executor is whatever actually runs SQL; this loop only decides what
//! happens around it: ordering, progress, and whether a failure stops the run.

use std::path::{Path, PathBuf};

use crate::config::RunOptions;
use crate::error::{ExecError, RunError};
use crate::model::{Failure, RunReport, Statement};
use crate::progress::FileProgress;
use crate::splitter::StatementReader;

/// Something that can run one statement.
pub trait StatementExecutor {
    fn execute(&mut self, statement: &Statement) -> Result<(), ExecError>;
}

impl<F> StatementExecutor for F
where
    F: FnMut(&Statement) -> Result<(), ExecError>,
{
    fn execute(&mut self, statement: &Statement) -> Result<(), ExecError> {
        self(statement)
    }
}

/// Run every statement of every file, in order.
///
/// All files are checked up front so a typo in the last path does not leave
/// the first scripts half applied.
pub fn run_files(
    files: &[PathBuf],
    options: &RunOptions,
    executor: &mut dyn StatementExecutor,
) -> Result<RunReport, RunError> {
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        return Err(RunError::MissingFile(missing.clone()));
    }

    let mut report = RunReport::default();
    for (idx, file) in files.iter().enumerate() {
        run_file(file, idx, files.len(), options, executor, &mut report)?;
        report.files += 1;
    }

    tracing::info!(
        files = report.files,
        statements = report.statements,
        failed = report.failures.len(),
        "run complete"
    );
    Ok(report)
}

fn run_file(
    path: &Path,
    idx: usize,
    file_count: usize,
    options: &RunOptions,
    executor: &mut dyn StatementExecutor,
    report: &mut RunReport,
) -> Result<(), RunError> {
    let split_err = |source| RunError::Split {
        path: path.to_path_buf(),
        source,
    };

    let total_bytes = script_size(path);
    let mut reader = StatementReader::open(path, options.splitter).map_err(split_err)?;
    let progress = FileProgress::new(options.progress, idx, file_count, total_bytes);

    tracing::info!(file = %path.display(), bytes = ?total_bytes, "running script");

    let mut read_bytes = 0u64;
    let mut index = 0usize;
    while let Some(sql) = reader.next_statement().map_err(split_err)? {
        index += 1;
        read_bytes += reader.last_read_bytes();

        let statement = Statement {
            file: path.to_path_buf(),
            index,
            bytes: reader.last_read_bytes(),
            sql,
        };

        progress.suspend(|| {
            tracing::debug!(
                file = %path.display(),
                index,
                bytes = statement.bytes,
                "-----\n{}\n-----",
                statement.sql
            )
        });

        report.statements += 1;
        report.bytes += statement.bytes;

        if let Err(err) = executor.execute(&statement) {
            if options.stop_on_error {
                return Err(RunError::Statement {
                    path: path.to_path_buf(),
                    index,
                    source: err,
                });
            }

            progress.suspend(|| {
                tracing::warn!(
                    file = %path.display(),
                    index,
                    sql = %statement.sql,
                    "[FAIL] {err}"
                )
            });
            report.failures.push(Failure {
                file: statement.file,
                index,
                sql: statement.sql,
                message: err.to_string(),
            });
        }

        progress.set_position(read_bytes);
    }

    progress.finish();
    tracing::info!(file = %path.display(), statements = index, "script finished");
    Ok(())
}

/// File length for the progress bar; `None` when it cannot be read.
fn script_size(path: &Path) -> Option<u64> {
    match std::fs::metadata(path) {
        Ok(meta) => Some(meta.len()),
        Err(err) => {
            tracing::debug!(file = %path.display(), "no size for progress display: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn script(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write script");
        file
    }

    #[test]
    fn test_statements_reach_executor_in_order() {
        let first = script("select 1;\nselect 2;\n");
        let second = script("-- header\nselect 3;\n");
        let files = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let mut seen = Vec::<(usize, String)>::new();
        let mut executor = |s: &Statement| -> Result<(), ExecError> {
            seen.push((s.index, s.sql.clone()));
            Ok(())
        };

        let report = run_files(&files, &RunOptions::default(), &mut executor).expect("run ok");

        assert_eq!(
            seen,
            vec![
                (1, "select 1;".to_string()),
                (2, "select 2;".to_string()),
                (1, "select 3;".to_string()),
            ]
        );
        assert_eq!(report.files, 2);
        assert_eq!(report.statements, 3);
        assert_eq!(report.bytes, 9 + 9 + 9 + 9);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_missing_file_stops_before_running() {
        let present = script("select 1;\n");
        let files = vec![present.path().to_path_buf(), PathBuf::from("/definitely/not/here.sql")];

        let mut calls = 0;
        let mut executor = |_: &Statement| -> Result<(), ExecError> {
            calls += 1;
            Ok(())
        };

        let err = run_files(&files, &RunOptions::default(), &mut executor).unwrap_err();
        assert!(matches!(err, RunError::MissingFile(_)), "got {err:?}");
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_script_size() {
        let file = script("select 1;\n");
        assert_eq!(script_size(file.path()), Some(10));
        assert_eq!(script_size(Path::new("/definitely/not/here.sql")), None);
    }
}
