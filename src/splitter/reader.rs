//! Pull-based statement assembly over a line-oriented source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::comments::{CommentState, strip_comments};
use super::terminator::TerminationState;
use crate::config::SplitterOptions;
use crate::error::SplitError;

/// Separator used to join the lines of one statement.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Yields one complete statement per call from a script source.
///
/// The reader owns its source; once the source is exhausted, closed, or has
/// failed, every further call reports end-of-stream.
pub struct StatementReader<R> {
    source: Option<R>,
    options: SplitterOptions,
    pending: Vec<String>,
    comments: CommentState,
    termination: TerminationState,
    line_buf: Vec<u8>,
    line_no: usize,
    last_read_bytes: u64,
}

impl StatementReader<BufReader<File>> {
    /// Open a script file for splitting.
    pub fn open(path: impl AsRef<Path>, options: SplitterOptions) -> Result<Self, SplitError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SplitError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), options))
    }
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(source: R, options: SplitterOptions) -> Self {
        Self {
            source: Some(source),
            options,
            pending: Vec::new(),
            comments: CommentState::default(),
            termination: TerminationState::default(),
            line_buf: Vec::new(),
            line_no: 0,
            last_read_bytes: 0,
        }
    }

    /// Line content bytes (separators excluded) consumed by the last
    /// `next_statement` call. Only good enough for progress display.
    pub fn last_read_bytes(&self) -> u64 {
        self.last_read_bytes
    }

    /// Terminator currently in effect, as last set by a `DELIMITER` line.
    pub fn terminator(&self) -> &str {
        self.termination.terminator()
    }

    /// Release the source. Later calls report end-of-stream.
    pub fn close(&mut self) {
        self.source = None;
    }

    /// Assemble the next statement, or `None` once the source is exhausted.
    pub fn next_statement(&mut self) -> Result<Option<String>, SplitError> {
        self.last_read_bytes = 0;
        self.pending.clear();
        self.termination.begin_statement();

        loop {
            let Some(line) = self.read_line()? else {
                return Ok(self.finalise());
            };

            let line = strip_comments(&line, &mut self.comments, self.options.include_vendor_comments);
            if line.trim().is_empty() {
                continue;
            }

            self.pending.push(line);
            if self.termination.is_terminated(&self.pending) {
                let statement = self.pending.join(LINE_SEPARATOR);
                self.pending.clear();
                return Ok(Some(statement));
            }
        }
    }

    /// Join whatever is left once the source ran dry.
    fn finalise(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let statement = self.pending.join(LINE_SEPARATOR);
        self.pending.clear();
        Some(statement)
    }

    /// Next raw line without its line separator, or `None` at end of source.
    ///
    /// Bytes that are not valid UTF-8 (latin1 text, unescaped blobs) are
    /// replaced rather than failing the whole script.
    fn read_line(&mut self) -> Result<Option<String>, SplitError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        self.line_buf.clear();
        let read = match source.read_until(b'\n', &mut self.line_buf) {
            Ok(read) => read,
            Err(source) => {
                self.source = None;
                return Err(SplitError::Read {
                    line: self.line_no + 1,
                    source,
                });
            }
        };
        if read == 0 {
            self.source = None;
            return Ok(None);
        }
        self.line_no += 1;

        let raw = self.line_buf.as_slice();
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        self.last_read_bytes += raw.len() as u64;

        let line = String::from_utf8_lossy(raw);
        if let std::borrow::Cow::Owned(_) = line {
            tracing::debug!(line = self.line_no, "invalid UTF-8 replaced");
        }
        Ok(Some(line.into_owned()))
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<String, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement().transpose()
    }
}
