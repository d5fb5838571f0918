//! Decides when the accumulated lines form a complete statement.
//!
//! Two things can end a statement:
//!
//! - a line ending in the active terminator (`;` unless a `DELIMITER`
//!   directive changed it), outside any procedural block, or
//! - the `END` that closes the outermost `BEGIN`.
//!
//! Known limitation: a `DELIMITER` directive is recognised wherever it shows
//! up as the last line, including inside the body of a statement. Scripts that
//! do that get best-effort splitting.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_TERMINATOR: &str = ";";

const BLOCK_START: &str = "begin";
const BLOCK_END: &str = "end";

static DELIMITER_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^delimiter\s+(\S*)").expect("delimiter regex is valid"));

/// The terminator named by a client-side `DELIMITER` line, if `line` is one.
pub fn delimiter_directive(line: &str) -> Option<&str> {
    DELIMITER_DIRECTIVE
        .captures(line.trim())
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

/// Classifier state carried from line to line (and statement to statement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationState {
    terminator: String,
    depth: usize,
    /// Accumulation length when `depth` last changed.
    last_depth_change: Option<usize>,
}

impl Default for TerminationState {
    fn default() -> Self {
        Self {
            terminator: DEFAULT_TERMINATOR.to_string(),
            depth: 0,
            last_depth_change: None,
        }
    }
}

impl TerminationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Forget the depth-change marker; lengths from the previous statement
    /// mean nothing for a fresh accumulation.
    pub fn begin_statement(&mut self) {
        self.last_depth_change = None;
    }

    /// Look at the newest line of `lines` and report whether the statement is
    /// complete. Must be called once per appended line.
    pub fn is_terminated(&mut self, lines: &[String]) -> bool {
        let Some(last) = lines.last() else {
            return false;
        };
        let last = last.trim();
        if last.is_empty() {
            return false;
        }

        // An unchanged accumulation must not count the same BEGIN/END twice.
        if self.last_depth_change == Some(lines.len()) {
            return false;
        }

        // Inner blocks of a `DELIMITER ;;` body still close with `END;`, so
        // plain `;` is stripped along with the active terminator's characters.
        let word = last
            .trim_end_matches(|c: char| c == ';' || self.terminator.contains(c))
            .trim()
            .to_lowercase();

        if word == BLOCK_START {
            self.last_depth_change = Some(lines.len());
            self.depth += 1;
            return false;
        }

        if word == BLOCK_END {
            self.last_depth_change = Some(lines.len());
            match self.depth.checked_sub(1) {
                Some(depth) => self.depth = depth,
                None => {
                    tracing::warn!(
                        lines = %lines.join("\n"),
                        "END without matching BEGIN, nesting depth clamped to 0"
                    );
                    self.depth = 0;
                }
            }
            return self.depth == 0;
        }

        if self.depth > 0 {
            return false;
        }

        if last.len() < self.terminator.len() {
            return false;
        }

        if let Some(token) = delimiter_directive(last) {
            tracing::debug!(terminator = token, "statement terminator redefined");
            self.terminator = token.to_string();
        }

        if self.terminator != DEFAULT_TERMINATOR {
            return false;
        }

        last.ends_with(self.terminator.as_str())
    }
}
