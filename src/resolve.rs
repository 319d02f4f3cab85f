//! Source resolution: mapping trace call sites to program methods.
//!
//! A trace only knows a call site as `pkg.Class.method` plus, maybe, a line
//! number. This module turns that into method ids of the program model.
//!
//! # Algorithm
//!
//! 1. Find the class, loading it on demand if the model has not seen it.
//! 2. Collect the methods with the recorded name (the overload set).
//! 3. A single candidate is the answer.
//! 4. Otherwise walk the candidates in declaration order and take the first
//!    one whose declaration, body, or any statement has a line-range tag
//!    containing the recorded line.
//! 5. If no candidate matches, keep the whole overload set. The reflective
//!    target is then attributed to every method that could have made the call.
//!
//! Failing to find the class or any method with the name is fatal.

use tracing::debug;

use crate::base::MethodId;
use crate::error::{Error, Result};
use crate::model::{MethodData, ProgramModel};
use crate::trace::{TraceRecord, split_source};

/// How a call site was mapped to methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceResolution {
    /// The class has exactly one method with the name.
    Unique(MethodId),
    /// Several overloads exist; line information singled one out.
    LineMatch(MethodId),
    /// Several overloads exist and none could be singled out; all of them
    /// are possible call sites, in declaration order.
    Fallback(Vec<MethodId>),
}

impl SourceResolution {
    /// All methods the call site maps to.
    pub fn methods(&self) -> &[MethodId] {
        match self {
            SourceResolution::Unique(m) | SourceResolution::LineMatch(m) => std::slice::from_ref(m),
            SourceResolution::Fallback(ms) => ms,
        }
    }

    /// Check whether a single method was identified.
    pub fn is_exact(&self) -> bool {
        !matches!(self, SourceResolution::Fallback(_))
    }
}

/// Resolves trace call sites against a program model.
///
/// Holds the model mutably because resolving may load classes on demand.
pub struct SourceResolver<'m, M: ?Sized> {
    model: &'m mut M,
}

impl<'m, M: ProgramModel + ?Sized> SourceResolver<'m, M> {
    /// Create a resolver over `model`.
    pub fn new(model: &'m mut M) -> Self {
        Self { model }
    }

    /// Shared access to the underlying model.
    pub fn model(&self) -> &M {
        &*self.model
    }

    /// Mutable access to the underlying model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut *self.model
    }

    /// Resolve the call site of a parsed record.
    pub fn resolve_record(&mut self, record: &TraceRecord) -> Result<SourceResolution> {
        self.resolve(&record.source_class, &record.source_method, record.line)
    }

    /// Resolve a `pkg.Class.method` call site.
    pub fn resolve_source(&mut self, source: &str, line: Option<u32>) -> Result<SourceResolution> {
        let (class, method) = split_source(source).ok_or_else(|| Error::UnresolvedSourceClass {
            class: source.to_string(),
        })?;
        self.resolve(class, method, line)
    }

    /// Resolve method `method` of class `class`, using `line` to pick between
    /// overloads.
    pub fn resolve(&mut self, class: &str, method: &str, line: Option<u32>) -> Result<SourceResolution> {
        let class_id = self
            .model
            .load_class(class)
            .ok_or_else(|| Error::UnresolvedSourceClass {
                class: class.to_string(),
            })?;

        let model: &M = &*self.model;
        let candidates: Vec<MethodId> = model
            .methods_of(class_id)
            .iter()
            .copied()
            .filter(|&m| model.method(m).is_some_and(|data| data.name.as_str() == method))
            .collect();

        let resolution = match candidates.len() {
            0 => {
                return Err(Error::UnresolvedSourceMethod {
                    class: class.to_string(),
                    method: method.to_string(),
                });
            }
            1 => SourceResolution::Unique(candidates[0]),
            _ => match line.and_then(|line| pick_by_line(model, &candidates, line)) {
                Some(hit) => SourceResolution::LineMatch(hit),
                None => {
                    debug!(
                        class,
                        method,
                        ?line,
                        candidates = candidates.len(),
                        "no overload covers the line, keeping all candidates"
                    );
                    SourceResolution::Fallback(candidates)
                }
            },
        };

        debug!(class, method, ?line, ?resolution, "resolved call site");
        Ok(resolution)
    }
}

/// First candidate, in the given order, with a line tag covering `line`.
fn pick_by_line<M: ProgramModel + ?Sized>(model: &M, candidates: &[MethodId], line: u32) -> Option<MethodId> {
    candidates
        .iter()
        .copied()
        .find(|&m| model.method(m).is_some_and(|data| covers_line(data, line)))
}

/// Check the declaration tag, then the body tag, then every statement tag.
fn covers_line(method: &MethodData, line: u32) -> bool {
    if method.declaration_lines.is_some_and(|r| r.contains(line)) {
        return true;
    }
    let Some(body) = &method.body else {
        return false;
    };
    body.lines.is_some_and(|r| r.contains(line))
        || body
            .statements
            .iter()
            .any(|stmt| stmt.lines.is_some_and(|r| r.contains(line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDatabase, ClassDef, MethodBody, MethodDef};

    const NO_PARAMS: [&str; 0] = [];

    fn sig(db: &ClassDatabase, s: &str) -> MethodId {
        db.find_method(s).unwrap()
    }

    fn overloaded(run: MethodDef, run_int: MethodDef) -> ClassDatabase {
        ClassDatabase::new().with_class(
            ClassDef::new("pkg.Caller")
                .method(run)
                .method(run_int)
                .method(MethodDef::new("void", "helper", NO_PARAMS)),
        )
    }

    #[test]
    fn test_unique_method() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS),
            MethodDef::new("void", "run", ["int"]),
        );
        let helper = sig(&db, "<pkg.Caller: void helper()>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "helper", None).unwrap();
        assert_eq!(result, SourceResolution::Unique(helper));
        assert!(result.is_exact());
    }

    #[test]
    fn test_declaration_lines_pick_overload() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS).with_lines(5, 8),
            MethodDef::new("void", "run", ["int"]).with_lines(10, 14),
        );
        let run_int = sig(&db, "<pkg.Caller: void run(int)>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(12)).unwrap();
        assert_eq!(result, SourceResolution::LineMatch(run_int));
    }

    #[test]
    fn test_body_lines_pick_overload() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS).with_body(MethodBody::new().with_lines(5, 8)),
            MethodDef::new("void", "run", ["int"]).with_body(MethodBody::new().with_lines(10, 14)),
        );
        let run = sig(&db, "<pkg.Caller: void run()>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(6)).unwrap();
        assert_eq!(result, SourceResolution::LineMatch(run));
    }

    #[test]
    fn test_statement_lines_pick_overload() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS)
                .with_body(MethodBody::new().with_statement_at(5).with_statement_at(6)),
            MethodDef::new("void", "run", ["int"])
                .with_body(MethodBody::new().with_untagged_statement().with_statement_at(12)),
        );
        let run_int = sig(&db, "<pkg.Caller: void run(int)>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(12)).unwrap();
        assert_eq!(result, SourceResolution::LineMatch(run_int));
    }

    #[test]
    fn test_first_candidate_in_declaration_order_wins() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS).with_lines(1, 20),
            MethodDef::new("void", "run", ["int"]).with_lines(10, 14),
        );
        let run = sig(&db, "<pkg.Caller: void run()>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(12)).unwrap();
        assert_eq!(result, SourceResolution::LineMatch(run));
    }

    #[test]
    fn test_fallback_without_line_metadata() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS),
            MethodDef::new("void", "run", ["int"]),
        );
        let run = sig(&db, "<pkg.Caller: void run()>");
        let run_int = sig(&db, "<pkg.Caller: void run(int)>");

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(7)).unwrap();
        assert_eq!(result, SourceResolution::Fallback(vec![run, run_int]));
        assert!(!result.is_exact());
    }

    #[test]
    fn test_fallback_when_line_outside_ranges() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS).with_lines(5, 8),
            MethodDef::new("void", "run", ["int"]).with_lines(10, 14),
        );

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", Some(9)).unwrap();
        assert_eq!(result.methods().len(), 2);
    }

    #[test]
    fn test_fallback_when_line_unknown() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS).with_lines(5, 8),
            MethodDef::new("void", "run", ["int"]).with_lines(10, 14),
        );

        let result = SourceResolver::new(&mut db).resolve("pkg.Caller", "run", None).unwrap();
        assert_eq!(result.methods().len(), 2);
    }

    #[test]
    fn test_unknown_class() {
        let mut db = ClassDatabase::new();

        let err = SourceResolver::new(&mut db).resolve("pkg.Nope", "run", None).unwrap_err();
        assert!(matches!(err, Error::UnresolvedSourceClass { class } if class == "pkg.Nope"));
    }

    #[test]
    fn test_unknown_method() {
        let mut db = overloaded(
            MethodDef::new("void", "run", NO_PARAMS),
            MethodDef::new("void", "run", ["int"]),
        );

        let err = SourceResolver::new(&mut db).resolve("pkg.Caller", "walk", Some(3)).unwrap_err();
        assert!(matches!(err, Error::UnresolvedSourceMethod { method, .. } if method == "walk"));
    }

    #[test]
    fn test_class_loaded_on_demand() {
        let mut db = ClassDatabase::with_source(|name: &str| {
            (name == "pkg.Lazy").then(|| ClassDef::new("pkg.Lazy").method(MethodDef::new("void", "go", NO_PARAMS)))
        });

        let result = SourceResolver::new(&mut db).resolve_source("pkg.Lazy.go", Some(1)).unwrap();
        assert!(result.is_exact());
        assert!(db.find_class("pkg.Lazy").is_some());
    }

    #[test]
    fn test_resolve_source_without_dot() {
        let mut db = ClassDatabase::new();

        let err = SourceResolver::new(&mut db).resolve_source("run", None).unwrap_err();
        assert!(matches!(err, Error::UnresolvedSourceClass { .. }));
    }
}
