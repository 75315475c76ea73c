//! Input and output format reference
//!
//! This module documents the markup dialect tagson reads and the JSON it
//! writes. It contains no code.
//!
//! # Input
//!
//! ## Tags
//!
//! A tag is everything from `<` up to the next `>`, inclusive:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `<name>` | opens `name` |
//! | `</name>` | closes `name` |
//!
//! There are no attributes, comments, processing instructions, entities or
//! self-closing tags. A tag whose name the schema does not know is reported as
//! `Found incorrect tag` and dropped. A `<` that never meets its `>` is
//! reported as `Unterminated tag` and ends the input.
//!
//! ## Text
//!
//! Text between tags is only meaningful directly after the opening tag of a
//! leaf. There it becomes the leaf's value, verbatim; surrounding whitespace
//! is kept. A value is rejected when it contains any of
//!
//! ```text
//! <  >  "  '  &
//! ```
//!
//! or a character that does not render visibly. That covers the Unicode
//! control (Cc), format (Cf) and private-use (Co) categories, noncharacters,
//! and every space or line separator except the plain space. Other unassigned
//! code points are accepted.
//!
//! Anywhere else, whitespace-only text is ignored and other text is reported
//! as `Found incorrectly placed text`.
//!
//! ## Schema
//!
//! The bundled schema is:
//!
//! ```text
//! object*                 one object per occurrence
//! ├── obj_name            object name, required and unique
//! └── field*              zero or more field groups
//!     ├── name            field name
//!     ├── type            "int" or "string"
//!     └── value           raw field value
//! ```
//!
//! `*` marks repeatable nodes. A repeated `field` inside one object starts a
//! new field group. Leaves appear at most once per group; a second value is
//! reported as `Duplicate value definition`.
//!
//! ## Recovery
//!
//! When a tag cannot be placed where it appears, the validator pops open tags
//! until an ancestor accepts it and continues from there. Values already
//! stored are kept. If no open ancestor accepts the tag, the current object is
//! abandoned.
//!
//! # Output
//!
//! The output is a JSON object with one member per accepted object, in input
//! order:
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
//!
//! - `int` values are written as bare unsigned integers in canonical form
//!   (`007` becomes `7`); values of any size are accepted
//! - `string` values are quoted and escaped
//! - an object whose field groups were all rejected is written empty
//! - field groups missing `name`, `type` or `value` are skipped
//! - a repeated object or field name keeps its first occurrence
//!
//! When no object is accepted, no output file is written.
//!
//! # Diagnostics
//!
//! Each diagnostic line names where it was raised:
//!
//! | Prefix | Raised by | Position |
//! |--------|-----------|----------|
//! | `Char n` | lexer | 0-based character offset of the token start |
//! | `String n` | validator | 1-based index of the token |
//! | `Object n` | serializer | 1-based index of the completed object |
//! | none | file handling | |
//!
//! The offending text follows in double quotes unless it contains characters
//! that do not render visibly.
