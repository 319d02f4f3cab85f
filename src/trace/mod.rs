//! Trace input: records of observed reflective operations.
//!
//! A trace is a UTF-8 text file with one record per line:
//!
//! ```text
//! <kind>;<target>;<source>;<line>
//! ```
//!
//! See [`TraceFileParser`] for the exact acceptance rules.

mod parser;
mod record;

pub use parser::{TraceFileParser, parse_record};
pub use record::{OperationKind, TraceRecord, split_source};
