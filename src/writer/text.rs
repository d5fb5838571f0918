//! Plain SQL output, one `-- statement N` header per statement.
//!
//! The headers are line comments, so the output splits back into exactly the
//! statements that were written.

use std::io::Write;

use crate::error::ExecError;
use crate::model::Statement;
use crate::runner::StatementExecutor;
use crate::splitter::LINE_SEPARATOR;

pub struct TextWriter<W: Write> {
    out: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatementExecutor for TextWriter<W> {
    fn execute(&mut self, statement: &Statement) -> Result<(), ExecError> {
        write!(
            self.out,
            "-- statement {} ({}){sep}{}{sep}{sep}",
            statement.index,
            statement.file.display(),
            statement.sql,
            sep = LINE_SEPARATOR
        )?;
        self.out.flush()?;
        Ok(())
    }
}
