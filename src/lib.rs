//! # reftrace-base
//!
//! Correlates a recorded trace of reflective calls (`Class.forName`,
//! `Class.newInstance`, `Constructor.newInstance`, `Method.invoke`) with a
//! static program model, producing for each calling method the classes and
//! methods it was observed to reach. A call-graph builder consumes the result
//! to see through reflection.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! index   → Frozen per-kind index + query API
//!   ↓
//! resolve → Call site → method(s), overload disambiguation by line
//!   ↓
//! trace   → Trace file parsing into typed records
//!   ↓
//! model   → ProgramModel trait, in-memory ClassDatabase
//!   ↓
//! base    → Primitives (ClassId, MethodId, LineRange)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use reftrace::{ClassDatabase, ReflectionIndex};
//!
//! let mut model = ClassDatabase::new();
//! // ... populate the model ...
//! let index = ReflectionIndex::from_file("refl.log", &mut model)?;
//!
//! let caller = model.find_method("<pkg.Caller: void run(int)>").unwrap();
//! for name in index.class_for_name_class_names(caller).iter() {
//!     println!("{name}");
//! }
//! let classes = index.query(&model).class_for_name_classes(caller)?;
//! ```

/// Foundation types: ClassId, MethodId, LineRange
pub mod base;

/// Error and Result types
pub mod error;

/// Program model abstraction and in-memory implementation
pub mod model;

/// Trace file records and parser
pub mod trace;

/// Call-site resolution against the program model
pub mod resolve;

/// Reflection index and query API
pub mod index;

pub use base::{ClassId, LineRange, MethodId};
pub use error::{Error, RecordError, Result};
pub use index::{ReflectionIndex, ReflectionIndexBuilder, ReflectionQuery, Targets};
pub use model::{ClassDatabase, ClassDef, ClassSource, MethodBody, MethodDef, MethodSignature, ProgramModel};
pub use resolve::{SourceResolution, SourceResolver};
pub use trace::{OperationKind, TraceFileParser, TraceRecord};
