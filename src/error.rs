//! Error types for trace ingestion and index queries.
//!
//! Every error is fatal: a failed load produces no index at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::trace::OperationKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for everything this crate can fail at.
///
/// # Error Categories
///
/// ## Trace input
/// - [`Error::NoTraceFile`] - Construction requested without a trace path
/// - [`Error::TraceFileNotFound`] - The trace path does not exist
/// - [`Error::TraceFileIo`] - Reading the trace failed
/// - [`Error::MalformedRecord`] - A line violates the record format
///
/// ## Resolution against the program model
/// - [`Error::UnresolvedSourceClass`] - Call-site class unknown even after loading
/// - [`Error::UnresolvedSourceMethod`] - No method with the call-site name
/// - [`Error::UnresolvedTargetMethod`] - Invoke target signature unknown at load time
/// - [`Error::UnresolvedEntity`] - A stored descriptor fails to resolve at query time
#[derive(Error, Debug)]
pub enum Error {
    /// Trace ingestion was requested but no trace file was given.
    #[error("trace based reflection model enabled but no trace file given")]
    NoTraceFile,

    /// The trace file does not exist.
    #[error("trace file not found: {}", path.display())]
    TraceFileNotFound {
        /// The path that was opened
        path: PathBuf,
    },

    /// I/O failure while opening or reading the trace.
    #[error("failed to read trace file{}: {source}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    TraceFileIo {
        /// 1-indexed line being read, if the file was already open
        line: Option<usize>,
        /// The underlying failure
        source: std::io::Error,
    },

    /// A non-blank trace line does not form a valid record.
    #[error("malformed trace record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-indexed line in the trace file
        line: usize,
        /// What was wrong with it
        reason: RecordError,
    },

    /// The call-site class is unknown to the program model, even after an
    /// on-demand load.
    #[error("trace file refers to unknown class: {class}")]
    UnresolvedSourceClass {
        /// Fully qualified class name
        class: String,
    },

    /// The call-site class has no method with the recorded name.
    #[error("trace file refers to unknown method with name {method} in class {class}")]
    UnresolvedSourceMethod {
        /// Fully qualified class name
        class: String,
        /// Simple method name
        method: String,
    },

    /// A `Method.invoke` or `Constructor.newInstance` target is not a known
    /// method signature.
    #[error("unknown method for signature {signature} ({kind})")]
    UnresolvedTargetMethod {
        /// The operation that recorded the target
        kind: OperationKind,
        /// The signature as it appeared in the trace
        signature: String,
    },

    /// A stored descriptor no longer resolves when its entity view is
    /// requested.
    #[error("cannot resolve {descriptor} recorded for {kind}")]
    UnresolvedEntity {
        /// The operation category that was queried
        kind: OperationKind,
        /// The stored class name or signature
        descriptor: String,
    },
}

/// Reasons a single trace line is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line did not split into exactly four `;`-separated fields.
    #[error("expected 4 ';'-separated fields, found {0}")]
    FieldCount(usize),

    /// The kind token is not one of the four reflective operations.
    #[error("unknown entry kind: {0}")]
    UnknownKind(String),

    /// The line field is neither empty nor an integer that fits a line number.
    #[error("invalid line number: {0:?}")]
    InvalidLineNumber(String),

    /// The source field is not of the form `Class.method`.
    #[error("invalid source location: {0:?}")]
    InvalidSource(String),

    /// A class-name target is not a dotted identifier path.
    #[error("invalid class name: {0:?}")]
    InvalidClassName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message() {
        let err = Error::MalformedRecord {
            line: 3,
            reason: RecordError::UnknownKind("Foo.bar".into()),
        };

        assert_eq!(
            err.to_string(),
            "malformed trace record at line 3: unknown entry kind: Foo.bar"
        );
    }

    #[test]
    fn test_io_message_carries_line() {
        let err = Error::TraceFileIo {
            line: Some(4),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes"),
        };
        assert_eq!(err.to_string(), "failed to read trace file at line 4: bad bytes");

        let err = Error::TraceFileIo {
            line: None,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to read trace file: denied");
    }

    #[test]
    fn test_unresolved_target_message() {
        let err = Error::UnresolvedTargetMethod {
            kind: OperationKind::MethodInvoke,
            signature: "<a.B: void c()>".into(),
        };

        assert!(err.to_string().contains("<a.B: void c()>"));
        assert!(err.to_string().contains("Method.invoke"));
    }
}
