//! Reflection index: call-site method → observed reflective targets.
//!
//! The index is built once from a whole trace and is immutable afterwards.
//! All mutation goes through [`ReflectionIndexBuilder`], which is consumed by
//! [`finish`](ReflectionIndexBuilder::finish).
//!
//! ## Key Data Structures
//!
//! - [`ReflectionIndex`] - Four per-kind maps from call site to target set
//! - [`ReflectionIndexBuilder`] - Single-pass construction from trace records
//! - [`ReflectionQuery`] - Resolves stored descriptors back to model entities

mod query;

pub use query::{ReflectionQuery, Targets};

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::base::MethodId;
use crate::error::{Error, Result};
use crate::model::{MethodSignature, ProgramModel};
use crate::resolve::SourceResolver;
use crate::trace::{OperationKind, TraceFileParser, TraceRecord};

/// Call-site method -> target descriptors, in first-observed order.
type Receivers = IndexMap<MethodId, IndexSet<Arc<str>>>;

/// Observed reflective targets, keyed by operation kind and call-site method.
///
/// Built by [`ReflectionIndexBuilder`]; there is no way to change an index
/// after that, so it can be shared between threads freely.
#[derive(Clone, Debug, Default)]
pub struct ReflectionIndex {
    /// One map per [`OperationKind`], indexed by [`OperationKind::index`].
    receivers: [Receivers; 4],
    /// Number of trace records that went into the index.
    records: usize,
}

impl ReflectionIndex {
    /// Build an index from a trace file.
    pub fn from_file<M>(path: impl AsRef<Path>, model: &mut M) -> Result<Self>
    where
        M: ProgramModel + ?Sized,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading reflection trace");
        let mut builder = ReflectionIndexBuilder::new(model);
        builder.add_records(TraceFileParser::open(path)?)?;
        Ok(builder.finish())
    }

    /// Build an index from an optional trace file.
    ///
    /// Fails with [`Error::NoTraceFile`] when no path is given.
    pub fn load<M>(path: Option<&Path>, model: &mut M) -> Result<Self>
    where
        M: ProgramModel + ?Sized,
    {
        let path = path.ok_or(Error::NoTraceFile)?;
        Self::from_file(path, model)
    }

    /// Build an index from trace text in any buffered reader.
    pub fn from_reader<M, R>(reader: R, model: &mut M) -> Result<Self>
    where
        M: ProgramModel + ?Sized,
        R: BufRead,
    {
        let mut builder = ReflectionIndexBuilder::new(model);
        builder.add_records(TraceFileParser::new(reader))?;
        Ok(builder.finish())
    }

    /// Start building an index by hand.
    pub fn builder<M>(model: &mut M) -> ReflectionIndexBuilder<'_, M>
    where
        M: ProgramModel + ?Sized,
    {
        ReflectionIndexBuilder::new(model)
    }

    /// Call-site methods that performed at least one operation of `kind`.
    pub fn call_sites(&self, kind: OperationKind) -> impl Iterator<Item = MethodId> + '_ {
        self.receivers[kind.index()].keys().copied()
    }

    /// Number of distinct (call site, target) pairs recorded for `kind`.
    pub fn pair_count(&self, kind: OperationKind) -> usize {
        self.receivers[kind.index()].values().map(|set| set.len()).sum()
    }

    /// Number of distinct (call site, target) pairs across all kinds.
    pub fn len(&self) -> usize {
        OperationKind::ALL.iter().map(|&kind| self.pair_count(kind)).sum()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.receivers.iter().all(|r| r.is_empty())
    }

    /// Number of trace records the index was built from.
    pub fn record_count(&self) -> usize {
        self.records
    }

    fn receivers(&self, kind: OperationKind) -> &Receivers {
        &self.receivers[kind.index()]
    }
}

/// Single-pass constructor for a [`ReflectionIndex`].
///
/// Each record is resolved and validated completely before anything is
/// inserted, so a rejected record leaves the builder unchanged.
pub struct ReflectionIndexBuilder<'m, M: ?Sized> {
    resolver: SourceResolver<'m, M>,
    index: ReflectionIndex,
}

impl<'m, M: ProgramModel + ?Sized> ReflectionIndexBuilder<'m, M> {
    /// Create a builder resolving against `model`.
    pub fn new(model: &'m mut M) -> Self {
        Self {
            resolver: SourceResolver::new(model),
            index: ReflectionIndex::default(),
        }
    }

    /// Add every record, stopping at the first error.
    pub fn add_records<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
    {
        for record in records {
            self.add_record(&record?)?;
        }
        Ok(())
    }

    /// Add one record.
    pub fn add_record(&mut self, record: &TraceRecord) -> Result<()> {
        let resolution = self.resolver.resolve_record(record)?;

        if record.kind.targets_method() {
            self.check_target_method(record.kind, &record.target)?;
        }

        let receivers = &mut self.index.receivers[record.kind.index()];
        for &caller in resolution.methods() {
            receivers
                .entry(caller)
                .or_default()
                .insert(record.target.clone());
        }
        self.index.records += 1;

        Ok(())
    }

    /// Freeze the index.
    pub fn finish(self) -> ReflectionIndex {
        let index = self.index;
        info!(
            records = index.records,
            pairs = index.len(),
            class_for_name = index.receivers(OperationKind::ClassForName).len(),
            class_new_instance = index.receivers(OperationKind::ClassNewInstance).len(),
            constructor_new_instance = index.receivers(OperationKind::ConstructorNewInstance).len(),
            method_invoke = index.receivers(OperationKind::MethodInvoke).len(),
            "reflection index built"
        );
        index
    }

    /// Invoke targets must exist at load time. The declaring class is loaded
    /// on demand first, like call-site classes are.
    fn check_target_method(&mut self, kind: OperationKind, signature: &str) -> Result<MethodId> {
        let model = self.resolver.model_mut();
        if model.find_method(signature).is_none() {
            if let Some(parsed) = MethodSignature::parse(signature) {
                model.load_class(&parsed.class);
            }
        }
        model
            .find_method(signature)
            .ok_or_else(|| Error::UnresolvedTargetMethod {
                kind,
                signature: signature.to_string(),
            })
    }
}
