use serde::Serialize;
use std::path::PathBuf;

/// One statement as handed to an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Script the statement came from.
    pub file: PathBuf,
    /// 1-based position within that script.
    pub index: usize,
    /// Line content bytes consumed to assemble it.
    pub bytes: u64,
    pub sql: String,
}

/// A statement that failed while the run carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub file: PathBuf,
    pub index: usize,
    pub sql: String,
    pub message: String,
}

/// Outcome of a whole run over every script file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub files: usize,
    pub statements: usize,
    pub bytes: u64,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.statements - self.failures.len()
    }
}
