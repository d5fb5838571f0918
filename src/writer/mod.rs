//! Executors that write statements out instead of running them.
pub mod json;
pub mod text;

pub use json::JsonLinesWriter;
pub use text::TextWriter;
