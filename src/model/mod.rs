//! Program model: the class/method database traces are resolved against.
//!
//! The reflection index never owns program entities. It talks to whatever
//! model the embedding analysis already has through [`ProgramModel`] and only
//! stores the [`ClassId`]/[`MethodId`] handles that model hands out.
//!
//! [`ClassDatabase`] is a self-contained in-memory implementation, with an
//! optional [`ClassSource`] for loading classes on demand.

mod data;
mod database;
mod signature;

pub use data::{ClassData, ClassDef, MethodBody, MethodData, MethodDef, Statement};
pub use database::{ClassDatabase, ClassSource};
pub use signature::{CONSTRUCTOR_NAME, MethodSignature};

use crate::base::{ClassId, MethodId};

/// Read access to classes and methods, plus on-demand class loading.
///
/// Ids returned by one model are only meaningful to that model.
pub trait ProgramModel {
    /// Look up a class that is already loaded.
    fn find_class(&self, name: &str) -> Option<ClassId>;

    /// Look up a class, loading it on demand if it is not present yet.
    ///
    /// Models without lazy loading can keep the default.
    fn load_class(&mut self, name: &str) -> Option<ClassId> {
        self.find_class(name)
    }

    /// Get a loaded class.
    fn class(&self, class: ClassId) -> Option<&ClassData>;

    /// Get a method.
    fn method(&self, method: MethodId) -> Option<&MethodData>;

    /// Look up a method by its full signature.
    fn find_method(&self, signature: &str) -> Option<MethodId>;

    /// Methods of `class` in declaration order.
    fn methods_of(&self, class: ClassId) -> &[MethodId] {
        self.class(class).map(|c| c.methods.as_slice()).unwrap_or_default()
    }
}
