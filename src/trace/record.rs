//! Typed trace records.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::RecordError;

/// The four reflective operations a trace can record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    /// `Class.forName(name)`
    ClassForName,
    /// `Class.newInstance()`
    ClassNewInstance,
    /// `Constructor.newInstance(args)`
    ConstructorNewInstance,
    /// `Method.invoke(receiver, args)`
    MethodInvoke,
}

impl OperationKind {
    /// All kinds, in index order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::ClassForName,
        OperationKind::ClassNewInstance,
        OperationKind::ConstructorNewInstance,
        OperationKind::MethodInvoke,
    ];

    /// The token this kind is written as in a trace file.
    pub const fn token(self) -> &'static str {
        match self {
            OperationKind::ClassForName => "Class.forName",
            OperationKind::ClassNewInstance => "Class.newInstance",
            OperationKind::ConstructorNewInstance => "Constructor.newInstance",
            OperationKind::MethodInvoke => "Method.invoke",
        }
    }

    /// Dense index, for per-kind tables.
    pub const fn index(self) -> usize {
        match self {
            OperationKind::ClassForName => 0,
            OperationKind::ClassNewInstance => 1,
            OperationKind::ConstructorNewInstance => 2,
            OperationKind::MethodInvoke => 3,
        }
    }

    /// Whether targets of this kind are method signatures rather than class names.
    pub const fn targets_method(self) -> bool {
        matches!(
            self,
            OperationKind::ConstructorNewInstance | OperationKind::MethodInvoke
        )
    }
}

impl FromStr for OperationKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Class.forName" => Ok(OperationKind::ClassForName),
            "Class.newInstance" => Ok(OperationKind::ClassNewInstance),
            "Constructor.newInstance" => Ok(OperationKind::ConstructorNewInstance),
            "Method.invoke" => Ok(OperationKind::MethodInvoke),
            other => Err(RecordError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One observed reflective operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// What happened
    pub kind: OperationKind,
    /// Class name or method signature that was loaded, created or invoked
    pub target: Arc<str>,
    /// Fully qualified class of the call site
    pub source_class: SmolStr,
    /// Simple method name of the call site
    pub source_method: SmolStr,
    /// Source line of the call site, if known
    pub line: Option<u32>,
    /// 1-indexed line of the trace file this record came from
    pub trace_line: usize,
}

/// Split a `pkg.Class.method` call site at its last `.`.
///
/// Returns `None` unless both the class and the method part are non-empty.
pub fn split_source(source: &str) -> Option<(&str, &str)> {
    source
        .rsplit_once('.')
        .filter(|(class, method)| !class.is_empty() && !method.is_empty())
}

impl TraceRecord {
    /// `Class.method` form of the call site, as written in the trace.
    pub fn source(&self) -> String {
        format!("{}.{}", self.source_class, self.source_method)
    }
}
