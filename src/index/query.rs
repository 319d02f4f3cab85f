//! Query API: read-only views of a built [`ReflectionIndex`].
//!
//! Raw descriptor sets are served straight from the index. Entity views
//! ([`ReflectionQuery`]) resolve those descriptors against the program model
//! on every call; nothing is cached.

use std::sync::Arc;

use indexmap::IndexSet;

use super::ReflectionIndex;
use crate::base::{ClassId, MethodId};
use crate::error::{Error, Result};
use crate::model::ProgramModel;
use crate::trace::OperationKind;

/// The target descriptors recorded for one call site and one kind.
///
/// Empty when the call site never performed that operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Targets<'a> {
    set: Option<&'a IndexSet<Arc<str>>>,
}

impl<'a> Targets<'a> {
    /// Iterate over the descriptors in first-observed order.
    pub fn iter(self) -> impl Iterator<Item = &'a str> {
        self.set.into_iter().flatten().map(|s| &**s)
    }

    /// Check whether `descriptor` was recorded.
    pub fn contains(self, descriptor: &str) -> bool {
        self.set.is_some_and(|set| set.contains(descriptor))
    }

    /// Number of distinct descriptors.
    pub fn len(self) -> usize {
        self.set.map_or(0, |set| set.len())
    }

    /// Check if nothing was recorded.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Copy the descriptors out.
    pub fn to_vec(self) -> Vec<&'a str> {
        self.iter().collect()
    }
}

impl ReflectionIndex {
    /// Descriptors recorded for `caller` under `kind`.
    pub fn targets(&self, kind: OperationKind, caller: MethodId) -> Targets<'_> {
        Targets {
            set: self.receivers(kind).get(&caller),
        }
    }

    /// Class names `caller` passed to `Class.forName`.
    pub fn class_for_name_class_names(&self, caller: MethodId) -> Targets<'_> {
        self.targets(OperationKind::ClassForName, caller)
    }

    /// Class names `caller` instantiated through `Class.newInstance`.
    pub fn class_new_instance_class_names(&self, caller: MethodId) -> Targets<'_> {
        self.targets(OperationKind::ClassNewInstance, caller)
    }

    /// Constructor signatures `caller` invoked through `Constructor.newInstance`.
    pub fn constructor_new_instance_signatures(&self, caller: MethodId) -> Targets<'_> {
        self.targets(OperationKind::ConstructorNewInstance, caller)
    }

    /// Method signatures `caller` invoked through `Method.invoke`.
    pub fn method_invoke_signatures(&self, caller: MethodId) -> Targets<'_> {
        self.targets(OperationKind::MethodInvoke, caller)
    }

    /// Resolve descriptors against `model`.
    pub fn query<'a, M: ProgramModel + ?Sized>(&'a self, model: &'a M) -> ReflectionQuery<'a, M> {
        ReflectionQuery { index: self, model }
    }
}

/// Entity views of a [`ReflectionIndex`], resolved against a program model.
///
/// Only borrows the model immutably, so any number of queries can run at
/// once.
pub struct ReflectionQuery<'a, M: ?Sized> {
    index: &'a ReflectionIndex,
    model: &'a M,
}

impl<'a, M: ProgramModel + ?Sized> ReflectionQuery<'a, M> {
    /// Classes `caller` loaded through `Class.forName`.
    pub fn class_for_name_classes(&self, caller: MethodId) -> Result<IndexSet<ClassId>> {
        self.classes(OperationKind::ClassForName, caller)
    }

    /// Classes `caller` instantiated through `Class.newInstance`.
    pub fn class_new_instance_classes(&self, caller: MethodId) -> Result<IndexSet<ClassId>> {
        self.classes(OperationKind::ClassNewInstance, caller)
    }

    /// Constructors `caller` invoked through `Constructor.newInstance`.
    pub fn constructor_new_instance_constructors(&self, caller: MethodId) -> Result<IndexSet<MethodId>> {
        self.methods(OperationKind::ConstructorNewInstance, caller)
    }

    /// Methods `caller` invoked through `Method.invoke`.
    pub fn method_invoke_methods(&self, caller: MethodId) -> Result<IndexSet<MethodId>> {
        self.methods(OperationKind::MethodInvoke, caller)
    }

    fn classes(&self, kind: OperationKind, caller: MethodId) -> Result<IndexSet<ClassId>> {
        self.index
            .targets(kind, caller)
            .iter()
            .map(|name| self.model.find_class(name).ok_or_else(|| unresolved(kind, name)))
            .collect()
    }

    fn methods(&self, kind: OperationKind, caller: MethodId) -> Result<IndexSet<MethodId>> {
        self.index
            .targets(kind, caller)
            .iter()
            .map(|sig| self.model.find_method(sig).ok_or_else(|| unresolved(kind, sig)))
            .collect()
    }
}

fn unresolved(kind: OperationKind, descriptor: &str) -> Error {
    Error::UnresolvedEntity {
        kind,
        descriptor: descriptor.to_string(),
    }
}
