//! Line-oriented trace file parser.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use super::record::{OperationKind, TraceRecord, split_source};
use crate::error::{Error, RecordError, Result};

/// Streams [`TraceRecord`]s out of a trace.
///
/// Blank lines are skipped. Every other line must be a valid record; the
/// first malformed line or read failure is yielded as an error and ends the
/// iteration.
pub struct TraceFileParser<R> {
    lines: io::Lines<R>,
    line_no: usize,
    done: bool,
}

impl TraceFileParser<BufReader<File>> {
    /// Open a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::TraceFileNotFound {
                path: path.to_owned(),
            },
            _ => Error::TraceFileIo { line: None, source: e },
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceFileParser<R> {
    /// Parse records from any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TraceFileParser<R> {
    type Item = Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::TraceFileIo {
                        line: Some(self.line_no + 1),
                        source: e,
                    }));
                }
            };
            self.line_no += 1;

            let text = line.strip_suffix('\r').unwrap_or(&line);
            if text.trim().is_empty() {
                continue;
            }

            return Some(match parse_record(text, self.line_no) {
                Ok(record) => {
                    trace!(line = self.line_no, kind = %record.kind, target = %record.target, "parsed record");
                    Ok(record)
                }
                Err(reason) => {
                    self.done = true;
                    Err(Error::MalformedRecord {
                        line: self.line_no,
                        reason,
                    })
                }
            });
        }
    }
}

/// Parse a single non-blank trace line.
///
/// `trace_line` is recorded on the result for diagnostics only.
pub fn parse_record(text: &str, trace_line: usize) -> std::result::Result<TraceRecord, RecordError> {
    let fields: Vec<&str> = text.split(';').collect();
    let &[kind, target, source, line] = fields.as_slice() else {
        return Err(RecordError::FieldCount(fields.len()));
    };

    let kind: OperationKind = kind.parse()?;

    if !kind.targets_method() && !is_class_name(target) {
        return Err(RecordError::InvalidClassName(target.to_string()));
    }

    let (source_class, source_method) =
        split_source(source).ok_or_else(|| RecordError::InvalidSource(source.to_string()))?;

    let line = parse_line(line)?;

    Ok(TraceRecord {
        kind,
        target: Arc::from(target),
        source_class: SmolStr::new(source_class),
        source_method: SmolStr::new(source_method),
        line,
        trace_line,
    })
}

/// Empty and negative line fields are unknown lines. Tracers write `-1` when
/// the frame has no line table and `-2` for native frames.
fn parse_line(field: &str) -> std::result::Result<Option<u32>, RecordError> {
    if field.is_empty() {
        return Ok(None);
    }
    let invalid = || RecordError::InvalidLineNumber(field.to_string());
    let line: i64 = field.parse().map_err(|_| invalid())?;
    if line < 0 {
        return Ok(None);
    }
    u32::try_from(line).map(Some).map_err(|_| invalid())
}

/// Check that `name` is a dot-separated path of identifiers.
///
/// `$` is accepted anywhere in a segment so nested and synthetic classes
/// (`a.Outer$Inner`, `a.Foo$1`) pass.
fn is_class_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first == '$' || first == '_' || unicode_ident::is_xid_start(first) => {
                    chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
                }
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_all(input: &str) -> Result<Vec<TraceRecord>> {
        TraceFileParser::new(Cursor::new(input)).collect()
    }

    #[test]
    fn test_parse_record_fields() {
        let record = parse_record("Class.forName;foo.Bar;pkg.Caller.run;10", 1).unwrap();

        assert_eq!(record.kind, OperationKind::ClassForName);
        assert_eq!(record.target.as_ref(), "foo.Bar");
        assert_eq!(record.source_class, "pkg.Caller");
        assert_eq!(record.source_method, "run");
        assert_eq!(record.line, Some(10));
        assert_eq!(record.source(), "pkg.Caller.run");
    }

    #[test]
    fn test_empty_line_field_is_unknown() {
        let record = parse_record("Method.invoke;<a.B: void c()>;pkg.Caller.run;", 1).unwrap();
        assert_eq!(record.line, None);
    }

    #[test]
    fn test_signature_target_may_contain_dots_and_spaces() {
        let record =
            parse_record("Constructor.newInstance;<a.B: void <init>(java.lang.String)>;x.Y.z;4", 1).unwrap();
        assert_eq!(record.target.as_ref(), "<a.B: void <init>(java.lang.String)>");
    }

    #[test]
    fn test_field_count() {
        assert_eq!(
            parse_record("Class.forName;foo.Bar;pkg.Caller.run", 1),
            Err(RecordError::FieldCount(3))
        );
        assert_eq!(
            parse_record("Class.forName;foo.Bar;pkg.Caller.run;1;2", 1),
            Err(RecordError::FieldCount(5))
        );
    }

    #[test]
    fn test_negative_line_is_unknown() {
        for line in ["-1", "-2"] {
            let record = parse_record(&format!("Class.forName;foo.Bar;pkg.Caller.run;{line}"), 1).unwrap();
            assert_eq!(record.line, None, "{line}");
        }
    }

    #[test]
    fn test_invalid_line_number() {
        assert_eq!(
            parse_record("Class.forName;foo.Bar;pkg.Caller.run;x", 1),
            Err(RecordError::InvalidLineNumber("x".into()))
        );
        assert_eq!(
            parse_record("Class.forName;foo.Bar;pkg.Caller.run;4294967296", 1),
            Err(RecordError::InvalidLineNumber("4294967296".into()))
        );
    }

    #[test]
    fn test_invalid_source() {
        assert!(matches!(
            parse_record("Class.forName;foo.Bar;run;1", 1),
            Err(RecordError::InvalidSource(_))
        ));
        assert!(matches!(
            parse_record("Class.forName;foo.Bar;pkg.Caller.;1", 1),
            Err(RecordError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_class_name_syntax() {
        assert!(is_class_name("foo.Bar"));
        assert!(is_class_name("Bar"));
        assert!(is_class_name("a.Outer$Inner"));
        assert!(is_class_name("a.Foo$1"));
        assert!(!is_class_name(""));
        assert!(!is_class_name("foo..Bar"));
        assert!(!is_class_name("foo.1Bar"));
        assert!(!is_class_name("foo Bar"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let records = parse_all("\nClass.forName;foo.Bar;pkg.Caller.run;10\n   \r\n\nClass.newInstance;foo.Baz;pkg.Caller.run;\r\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trace_line, 2);
        assert_eq!(records[1].trace_line, 5);
        assert_eq!(records[1].line, None);
    }

    #[test]
    fn test_first_error_stops_iteration() {
        let mut parser = TraceFileParser::new(Cursor::new(
            "Class.forName;foo.Bar;pkg.Caller.run;10\nFoo.bar;x;pkg.Caller.run;1\nClass.forName;foo.Baz;pkg.Caller.run;11\n",
        ));

        assert!(parser.next().unwrap().is_ok());
        match parser.next() {
            Some(Err(Error::MalformedRecord { line, reason })) => {
                assert_eq!(line, 2);
                assert_eq!(reason, RecordError::UnknownKind("Foo.bar".into()));
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_read_failure_reports_line() {
        let mut parser = TraceFileParser::new(Cursor::new(&b"Class.forName;foo.Bar;pkg.Caller.run;7\n\xff\n"[..]));

        assert!(parser.next().unwrap().is_ok());
        assert!(matches!(
            parser.next(),
            Some(Err(Error::TraceFileIo { line: Some(2), .. }))
        ));
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.trace");

        assert!(matches!(
            TraceFileParser::open(&path),
            Err(Error::TraceFileNotFound { .. })
        ));
    }
}
