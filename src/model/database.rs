//! In-memory program model.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::ProgramModel;
use super::data::{ClassData, ClassDef, MethodData};
use crate::base::{ClassId, MethodId};

/// Supplies class definitions that are not loaded yet.
pub trait ClassSource: Send + Sync {
    /// Produce the definition of `name`, or `None` if it does not exist.
    fn load(&mut self, name: &str) -> Option<ClassDef>;
}

impl<F> ClassSource for F
where
    F: FnMut(&str) -> Option<ClassDef> + Send + Sync,
{
    fn load(&mut self, name: &str) -> Option<ClassDef> {
        self(name)
    }
}

/// A class database held entirely in memory.
///
/// Classes and methods are stored in vectors and referenced by index, so ids
/// stay valid for the lifetime of the database. Nothing is ever removed.
#[derive(Default)]
pub struct ClassDatabase {
    classes: Vec<ClassData>,
    methods: Vec<MethodData>,
    /// Class name -> class index
    by_name: FxHashMap<SmolStr, ClassId>,
    /// Method signature -> method index
    by_signature: FxHashMap<Arc<str>, MethodId>,
    source: Option<Box<dyn ClassSource>>,
}

impl ClassDatabase {
    /// Create a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database that pulls unknown classes from `source`.
    pub fn with_source(source: impl ClassSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::default()
        }
    }

    /// Add a class and its methods.
    ///
    /// If a class with the same name is already present, the new definition
    /// is ignored and the existing id is returned.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        if let Some(&existing) = self.by_name.get(def.name.as_str()) {
            warn!(class = %def.name, "class already present, ignoring redefinition");
            return existing;
        }

        let class_id = ClassId::new(self.classes.len() as u32);
        let mut method_ids = Vec::with_capacity(def.methods.len());

        for method in def.methods {
            let signature: Arc<str> = Arc::from(method.signature_in(&def.name).to_string());
            if self.by_signature.contains_key(&signature) {
                warn!(%signature, "duplicate method signature, keeping first declaration");
                continue;
            }

            let method_id = MethodId::new(self.methods.len() as u32);
            self.by_signature.insert(signature.clone(), method_id);
            self.methods.push(MethodData {
                name: method.name,
                signature,
                class: class_id,
                declaration_lines: method.declaration_lines,
                body: method.body,
            });
            method_ids.push(method_id);
        }

        self.by_name.insert(def.name.clone(), class_id);
        self.classes.push(ClassData {
            name: def.name,
            methods: method_ids,
        });

        class_id
    }

    /// Builder-style [`add_class`](Self::add_class).
    pub fn with_class(mut self, def: ClassDef) -> Self {
        self.add_class(def);
        self
    }

    /// Get the number of loaded classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Get the number of methods across all classes.
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl ProgramModel for ClassDatabase {
    fn find_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn load_class(&mut self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.find_class(name) {
            return Some(id);
        }

        let def = self.source.as_mut()?.load(name)?;
        debug!(class = name, methods = def.methods.len(), "loaded class on demand");
        self.add_class(def);

        // The source may hand back a differently named class.
        self.find_class(name)
    }

    fn class(&self, class: ClassId) -> Option<&ClassData> {
        self.classes.get(class.index() as usize)
    }

    fn method(&self, method: MethodId) -> Option<&MethodData> {
        self.methods.get(method.index() as usize)
    }

    fn find_method(&self, signature: &str) -> Option<MethodId> {
        self.by_signature.get(signature).copied()
    }
}

impl fmt::Debug for ClassDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDatabase")
            .field("classes", &self.class_count())
            .field("methods", &self.method_count())
            .field("lazy", &self.source.is_some())
            .finish()
    }
}
