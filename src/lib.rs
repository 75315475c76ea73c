//! # tagson
//!
//! A streaming converter from a small tag-based markup dialect to JSON.
//!
//! ## What does it do?
//!
//! Input documents are sequences of `<tag>value</tag>` elements arranged in a
//! fixed tree described by a [`Schema`]. Each occurrence of the schema root is
//! one object; the converter extracts a name for every object plus a list of
//! typed fields, and writes the result as a two-level JSON object:
//!
//! ```text
//! <object>                                   {
//!   <obj_name>Alpha</obj_name>                 "Alpha": {
//!   <field>                                      "count": 5
//!     <name>count</name>              ==>      }
//!     <type>int</type>                       }
//!     <value>5</value>
//!   </field>
//! </object>
//! ```
//!
//! ## Key Features
//!
//! - **Streaming**: the lexer and the validator run on separate threads joined
//!   by a bounded channel
//! - **Forgiving**: malformed input never aborts a run; every problem becomes a
//!   [`Diagnostic`] and the validator resynchronizes at the next tag it can
//!   place
//! - **Schema driven**: the bundled schema can be replaced by any tree, either
//!   built with [`schema!`] or loaded from a JSON [`Profile`]
//! - **Exact output**: insertion order is kept and no separator is ever
//!   followed by a closing brace
//!
//! ## Quick Start
//!
//! ```rust
//! let json = tagson::to_json_string(
//!     "<object><obj_name>Alpha</obj_name>\
//!      <field><name>count</name><type>int</type><value>5</value></field>\
//!      </object>",
//! )
//! .unwrap();
//! assert_eq!(json, "{\n  \"Alpha\": {\n    \"count\": 5\n  }\n}\n");
//! ```
//!
//! ### Inspecting diagnostics
//!
//! ```rust
//! use tagson::Converter;
//!
//! let converter = Converter::bundled().unwrap();
//! let conversion = converter.convert_str(
//!     "<object><obj_name>Alpha</obj_name>\
//!      <field><name>count</name><type>int</type><value>five</value></field>\
//!      </object>",
//! );
//! assert!(conversion.document().get("Alpha").unwrap().is_empty());
//!
//! let diagnostics = converter.diagnostics().snapshot();
//! assert_eq!(
//!     diagnostics[0].to_string(),
//!     "Object 1: Field value is not an integer: \"five\""
//! );
//! ```
//!
//! ### Custom schemas
//!
//! ```rust
//! use tagson::{schema, ConvertOptions, Converter, OutputShape, Schema};
//!
//! let spec = schema!("item" * {
//!     "id",
//!     "attr" * { "key", "kind" = ["int", "string"], "val" },
//! });
//! let shape = OutputShape {
//!     object_name: "id".to_string(),
//!     field_group: "attr".to_string(),
//!     field_name: "key".to_string(),
//!     field_type: "kind".to_string(),
//!     field_value: "val".to_string(),
//! };
//! let converter =
//!     Converter::new(Schema::new(&spec).unwrap(), ConvertOptions::new().with_shape(shape))
//!         .unwrap();
//! let conversion = converter.convert_str("<item><id>x</id></item>");
//! assert_eq!(conversion.document().len(), 1);
//! ```
//!
//! See the [`format`] module for the complete input and output rules.

pub mod converter;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod format;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod record;
pub mod schema;
pub mod ser;
pub mod token;
pub mod validator;
pub mod value;

pub use converter::{Conversion, Converter, WriteOutcome};
pub use diagnostics::{Context, Diagnostic, DiagnosticHandle, DiagnosticSink, RunContext};
pub use document::{Document, FieldMap};
pub use error::{Error, Result};
pub use lexer::Lexer;
pub use options::{ConvertOptions, OutputShape, Profile, ResolvedShape};
pub use record::{Record, ValueRejection};
pub use schema::{NodeId, Schema, SchemaNode, SchemaSpec};
pub use ser::Serializer;
pub use token::Token;
pub use validator::Validator;
pub use value::{CoerceError, FieldType, FieldValue};

/// Converts `input` with the bundled schema and default options.
///
/// Diagnostics are discarded; use a [`Converter`] to inspect them.
///
/// # Examples
///
/// ```rust
/// let json = tagson::to_json_string("<object><obj_name>A</obj_name></object>").unwrap();
/// assert_eq!(json, "{\n  \"A\": {\n  }\n}\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::NothingToWrite`] if no object survives validation, or
/// [`Error::Io`] if the input could not be read to the end.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string(input: &str) -> Result<String> {
    let converter = Converter::bundled()?;
    let conversion = converter.convert_str(input);
    if let Some(err) = conversion.input_error() {
        return Err(err.clone());
    }
    if conversion.is_empty() {
        return Err(Error::NothingToWrite);
    }
    Ok(converter.to_json(&conversion))
}

/// Converts `input` with the given schema and options, writing the JSON to
/// `writer`.
///
/// # Errors
///
/// Returns [`Error::NothingToWrite`] if no object survives validation, or
/// [`Error::Io`] if reading the input or writing the output fails.
pub fn to_writer<R, W>(reader: R, writer: &mut W, converter: &Converter) -> Result<()>
where
    R: std::io::BufRead + Send,
    W: std::io::Write,
{
    let conversion = converter.convert(reader);
    if let Some(err) = conversion.input_error() {
        return Err(err.clone());
    }
    if conversion.is_empty() {
        return Err(Error::NothingToWrite);
    }
    ser::to_writer(writer, conversion.document(), converter.options())
        .map_err(|e| Error::io(&e.to_string()))
}
