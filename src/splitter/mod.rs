//! The statement splitter.
//!
//! Raw script lines go through `comments` first, survivors are accumulated
//! by `reader`, and `terminator` decides when the accumulation is a whole
//! statement.
pub mod comments;
pub mod reader;
pub mod terminator;

pub use comments::{CommentState, strip_comments};
pub use reader::{LINE_SEPARATOR, StatementReader};
pub use terminator::{DEFAULT_TERMINATOR, TerminationState, delimiter_directive};
