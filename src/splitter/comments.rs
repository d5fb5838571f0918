//! Line-level comment stripping.
//!
//! Only the shapes `mysqldump` actually produces are recognised:
//!
//! ```text
//! -- single line comment          (must start the line)
//! /* block comment */ rest        (must start the line, may span lines)
//! /*!40101 conditional SQL */     (vendor comment, optionally kept)
//! ```
//!
//! Anything else, including a `/*` in the middle of a line, is left alone.
//! There is no quoting awareness here; the markers are matched by position.

const LINE_COMMENT: &str = "--";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const VENDOR_MARK: char = '!';

/// Whether the previous line left a block comment open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentState {
    pub inside_block_comment: bool,
}

/// Remove comments from one raw line.
///
/// Returns an empty string when the whole line was comment. `state` carries an
/// unterminated block comment over to the next line of the same source.
pub fn strip_comments(
    line: &str,
    state: &mut CommentState,
    include_vendor_comments: bool,
) -> String {
    let mut rest = line;

    // A single line may close one comment and open another, so keep going
    // until nothing at the head of the line is comment any more.
    loop {
        if state.inside_block_comment {
            match rest.find(BLOCK_CLOSE) {
                Some(end) => {
                    rest = &rest[end + BLOCK_CLOSE.len()..];
                    state.inside_block_comment = false;
                    continue;
                }
                None => return String::new(),
            }
        }

        if rest.starts_with(LINE_COMMENT) {
            return String::new();
        }

        if block_open_position(rest, include_vendor_comments) != Some(0) {
            return rest.to_string();
        }

        let body = &rest[BLOCK_OPEN.len()..];
        match body.find(BLOCK_CLOSE) {
            Some(end) => rest = &body[end + BLOCK_CLOSE.len()..],
            None => {
                state.inside_block_comment = true;
                return String::new();
            }
        }
    }
}

/// Byte offset of the first block comment opener that should be stripped.
///
/// With `include_vendor_comments` set, `/*!` openers belong to the statement
/// and are stepped over.
fn block_open_position(line: &str, include_vendor_comments: bool) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = line[from..].find(BLOCK_OPEN) {
        let at = from + found;
        let after = at + BLOCK_OPEN.len();
        let is_vendor = line[after..].starts_with(VENDOR_MARK);
        if !(include_vendor_comments && is_vendor) {
            return Some(at);
        }
        from = after;
    }
    None
}
