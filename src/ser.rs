//! Record collection and JSON emission.
//!
//! Serialization runs in two stages once the validator has drained its
//! tokens:
//!
//! 1. [`Serializer::collect`] walks the finished records, checks names and
//!    field groups, and builds a [`Document`]. Anything it drops is reported.
//! 2. [`to_writer`] turns the document into a [`Line`] sequence and writes it.
//!    Each line decides its trailing comma by looking one line ahead, so no
//!    separator ever precedes a closing brace.
//!
//! ## Output shape
//!
//! ```text
//! {
//!   "Alpha": {
//!     "count": 5,
//!     "label": "first"
//!   },
//!   "Beta": {
//!   }
//! }
//! ```

use crate::diagnostics::Context;
use crate::value::quote;
use crate::{
    ConvertOptions, DiagnosticHandle, Document, FieldMap, FieldType, FieldValue, Record,
    ResolvedShape,
};
use std::io::{self, Write};

/// Checks records against the output shape and assembles a [`Document`].
pub struct Serializer<'a> {
    shape: ResolvedShape,
    diagnostics: &'a DiagnosticHandle,
}

impl<'a> Serializer<'a> {
    pub fn new(shape: ResolvedShape, diagnostics: &'a DiagnosticHandle) -> Self {
        Serializer { shape, diagnostics }
    }

    fn error(&self, object: usize, message: String) {
        self.diagnostics.report(Context::Object(object), message, None);
    }

    /// Builds the document, skipping unnamed and duplicate objects and
    /// invalid field groups.
    ///
    /// A name is reserved as soon as its record passes the name checks, so an
    /// object whose groups are all invalid still appears, empty.
    #[must_use]
    pub fn collect(&self, records: &[Record]) -> Document {
        let mut document = Document::new();
        for (index, record) in records.iter().enumerate() {
            let number = index + 1;
            let Some(name) = record.first_value(self.shape.object_name) else {
                self.error(number, "Object name was not set".to_string());
                continue;
            };
            if document.contains(name) {
                self.error(number, format!("Duplicate object name: \"{name}\""));
                continue;
            }
            let fields = self.collect_fields(number, record);
            document.insert(name.to_string(), fields);
        }
        tracing::debug!(
            records = records.len(),
            objects = document.len(),
            "records collected"
        );
        document
    }

    fn collect_fields(&self, number: usize, record: &Record) -> FieldMap {
        let shape = self.shape;
        let mut fields = FieldMap::new();
        let mut cursor = record
            .find_from(shape.object_name, 0)
            .map_or(0, |(index, _)| index);

        while let Some((name_index, name)) = record.find_from(shape.field_name, cursor + 1) {
            let Some((type_index, ty)) = record.find_from(shape.field_type, name_index + 1) else {
                self.error(number, "Required fields were not filled".to_string());
                break;
            };
            let Some((value_index, value)) = record.find_from(shape.field_value, type_index + 1)
            else {
                self.error(number, "Required fields were not filled".to_string());
                break;
            };
            cursor = value_index;

            let (Some(name), Some(ty), Some(value)) = (name, ty, value) else {
                self.error(number, "Required fields were not filled".to_string());
                continue;
            };

            let coerced = ty
                .parse::<FieldType>()
                .and_then(|ty| FieldValue::coerce(ty, value));
            match coerced {
                Ok(value) => {
                    if fields.contains(name) {
                        self.error(number, format!("Duplicate field name: \"{name}\""));
                    } else {
                        fields.insert(name.to_string(), value);
                    }
                }
                Err(err) => {
                    self.error(number, format!("{err}: \"{}\"", err.offending()));
                }
            }
        }
        fields
    }
}

/// One line of output before separators are decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line<'a> {
    Open,
    ObjectStart(&'a str),
    Field(&'a str, &'a FieldValue),
    ObjectEnd,
    Close,
}

impl Line<'_> {
    fn closes_block(&self) -> bool {
        matches!(self, Line::ObjectEnd | Line::Close)
    }

    fn render<W: Write>(&self, writer: &mut W, indent: usize, separated: bool) -> io::Result<()> {
        let comma = if separated { "," } else { "" };
        match self {
            Line::Open => writeln!(writer, "{{"),
            Line::ObjectStart(name) => {
                writeln!(writer, "{:indent$}{}: {{", "", quote(name))
            }
            Line::Field(name, value) => writeln!(
                writer,
                "{:width$}{}: {}{comma}",
                "",
                quote(name),
                value.to_json(),
                width = indent * 2
            ),
            Line::ObjectEnd => writeln!(writer, "{:indent$}}}{comma}", ""),
            Line::Close => writeln!(writer, "}}"),
        }
    }
}

/// Lays a document out as lines, without separators.
#[must_use]
pub fn lines(document: &Document) -> Vec<Line<'_>> {
    let mut lines = vec![Line::Open];
    for (name, fields) in document {
        lines.push(Line::ObjectStart(name));
        lines.extend(fields.iter().map(|(field, value)| Line::Field(field, value)));
        lines.push(Line::ObjectEnd);
    }
    lines.push(Line::Close);
    lines
}

/// Writes `lines`, adding a comma to a field or object end unless the next
/// line closes a block.
///
/// # Errors
///
/// Returns any error raised by `writer`.
pub fn write_lines<'a, W, I>(writer: &mut W, lines: I, indent: usize) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Line<'a>>,
{
    let mut lines = lines.into_iter().peekable();
    while let Some(line) = lines.next() {
        let separated = lines.peek().is_some_and(|next| !next.closes_block());
        line.render(writer, indent, separated)?;
    }
    writer.flush()
}

/// Writes `document` as JSON.
///
/// # Errors
///
/// Returns any error raised by `writer`.
pub fn to_writer<W: Write>(
    writer: &mut W,
    document: &Document,
    options: &ConvertOptions,
) -> io::Result<()> {
    write_lines(writer, lines(document), options.indent)
}

/// Renders `document` as a JSON string.
#[must_use]
pub fn to_string(document: &Document, options: &ConvertOptions) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = to_writer(&mut out, document, options);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    fn document(objects: &[(&str, &[(&str, FieldValue)])]) -> Document {
        objects
            .iter()
            .map(|(name, fields)| {
                (
                    name.to_string(),
                    fields
                        .iter()
                        .map(|(field, value)| (field.to_string(), value.clone()))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let out = to_string(&Document::new(), &ConvertOptions::default());
        assert_eq!(out, "{\n}\n");
    }

    #[test]
    fn test_last_field_and_object_have_no_comma() {
        let doc = document(&[
            ("A", &[("x", FieldValue::from(1u64)), ("y", FieldValue::from("v"))]),
            ("B", &[("z", FieldValue::from(2u64))]),
        ]);
        let out = to_string(&doc, &ConvertOptions::default());
        assert_eq!(
            out,
            "{\n  \"A\": {\n    \"x\": 1,\n    \"y\": \"v\"\n  },\n  \
             \"B\": {\n    \"z\": 2\n  }\n}\n"
        );
    }

    #[test]
    fn test_empty_object_between_others() {
        let doc = document(&[("A", &[]), ("B", &[("z", FieldValue::from(2u64))])]);
        let out = to_string(&doc, &ConvertOptions::default().with_indent(1));
        assert_eq!(out, "{\n \"A\": {\n },\n \"B\": {\n  \"z\": 2\n }\n}\n");
    }

    #[test]
    fn test_collect_reports_and_skips() {
        let schema = Schema::bundled().unwrap();
        let shape = crate::OutputShape::default().resolve(&schema).unwrap();
        let diagnostics = DiagnosticHandle::new();

        let mut named = Record::new(&schema);
        named
            .set_value(&schema, shape.object_name, "A".into())
            .unwrap();
        named.set_value(&schema, shape.field_name, "n".into()).unwrap();
        named.set_value(&schema, shape.field_type, "int".into()).unwrap();
        named.set_value(&schema, shape.field_value, "x1".into()).unwrap();

        let unnamed = Record::new(&schema);
        let duplicate = named.clone();

        let serializer = Serializer::new(shape, &diagnostics);
        let doc = serializer.collect(&[named, unnamed, duplicate]);
        assert_eq!(doc.len(), 1);
        assert!(doc.get("A").is_some_and(FieldMap::is_empty));

        let messages: Vec<_> = diagnostics
            .snapshot()
            .into_iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Object 1: Field value is not an integer: \"x1\"",
                "Object 2: Object name was not set",
                "Object 3: Duplicate object name: \"A\"",
            ]
        );
    }

    #[test]
    fn test_incomplete_group_and_duplicate_field() {
        let schema = Schema::bundled().unwrap();
        let shape = crate::OutputShape::default().resolve(&schema).unwrap();
        let diagnostics = DiagnosticHandle::new();

        let mut record = Record::new(&schema);
        record.set_value(&schema, shape.object_name, "A".into()).unwrap();
        for (name, value) in [("k", "1"), ("k", "2")] {
            record.set_value(&schema, shape.field_name, name.into()).unwrap();
            record.set_value(&schema, shape.field_type, "string".into()).unwrap();
            record.set_value(&schema, shape.field_value, value.into()).unwrap();
        }
        record.set_value(&schema, shape.field_name, "half".into()).unwrap();

        let doc = Serializer::new(shape, &diagnostics).collect(&[record]);
        let fields = doc.get("A").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("k"), Some(&FieldValue::from("1")));

        let messages: Vec<_> = diagnostics
            .snapshot()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(
            messages,
            vec!["Duplicate field name: \"k\"", "Required fields were not filled"]
        );
    }
}
