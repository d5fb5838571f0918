//! JSON-lines output: one object per statement.

use std::io::Write;

use crate::error::ExecError;
use crate::model::Statement;
use crate::runner::StatementExecutor;

pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatementExecutor for JsonLinesWriter<W> {
    fn execute(&mut self, statement: &Statement) -> Result<(), ExecError> {
        serde_json::to_writer(&mut self.out, statement)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
