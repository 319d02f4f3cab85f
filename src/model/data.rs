//! Class and method data held by a program model.

use std::sync::Arc;

use smol_str::SmolStr;

use super::signature::{CONSTRUCTOR_NAME, MethodSignature};
use crate::base::{ClassId, LineRange, MethodId};

/// A class as stored in the program model.
#[derive(Clone, Debug)]
pub struct ClassData {
    /// Fully qualified name, e.g. `pkg.Caller`
    pub name: SmolStr,
    /// Methods in declaration order
    pub methods: Vec<MethodId>,
}

/// A method as stored in the program model.
#[derive(Clone, Debug)]
pub struct MethodData {
    /// Simple name (`run`, `<init>`)
    pub name: SmolStr,
    /// Full signature, unique across the model
    pub signature: Arc<str>,
    /// Declaring class
    pub class: ClassId,
    /// Line-range tag on the declaration itself
    pub declaration_lines: Option<LineRange>,
    /// The method body, if one is loaded
    pub body: Option<MethodBody>,
}

/// A loaded method body.
#[derive(Clone, Debug, Default)]
pub struct MethodBody {
    /// Line-range tag covering the body as a whole
    pub lines: Option<LineRange>,
    /// Statements in body order
    pub statements: Vec<Statement>,
}

impl MethodBody {
    /// Create an empty body with no line information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the whole body with a line range.
    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.lines = Some(LineRange::new(start, end));
        self
    }

    /// Append a statement tagged with a single source line.
    pub fn with_statement_at(mut self, line: u32) -> Self {
        self.statements.push(Statement {
            lines: Some(LineRange::line(line)),
        });
        self
    }

    /// Append a statement without debug information.
    pub fn with_untagged_statement(mut self) -> Self {
        self.statements.push(Statement { lines: None });
        self
    }
}

/// A single statement of a method body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statement {
    /// Line tag, when the body was compiled with debug information
    pub lines: Option<LineRange>,
}

// ============================================================================
// DEFINITIONS (input to the in-memory database)
// ============================================================================

/// Description of a class to be added to a [`ClassDatabase`](super::ClassDatabase).
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub(crate) name: SmolStr,
    pub(crate) methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Start a class definition with the given fully qualified name.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method. Declaration order is the order of these calls.
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Description of a method inside a [`ClassDef`].
#[derive(Clone, Debug)]
pub struct MethodDef {
    pub(crate) return_type: SmolStr,
    pub(crate) name: SmolStr,
    pub(crate) params: Vec<SmolStr>,
    pub(crate) declaration_lines: Option<LineRange>,
    pub(crate) body: Option<MethodBody>,
}

impl MethodDef {
    /// A method `return_type name(params)`.
    pub fn new<P, S>(return_type: impl Into<SmolStr>, name: impl Into<SmolStr>, params: P) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            declaration_lines: None,
            body: None,
        }
    }

    /// A constructor taking `params`.
    pub fn constructor<P, S>(params: P) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self::new("void", CONSTRUCTOR_NAME, params)
    }

    /// Tag the declaration with a line range.
    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.declaration_lines = Some(LineRange::new(start, end));
        self
    }

    /// Attach a body.
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// The signature this method gets when declared in `class`.
    pub fn signature_in(&self, class: &str) -> MethodSignature {
        MethodSignature::new(
            class,
            self.return_type.clone(),
            self.name.clone(),
            self.params.iter().cloned(),
        )
    }
}
