//! Configuration for conversions.
//!
//! - [`ConvertOptions`]: channel capacity, output indentation and shape
//! - [`OutputShape`]: which tags carry the object name and the field triple
//! - [`Profile`]: a schema plus a shape, loadable from JSON
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{ConvertOptions, OutputShape};
//!
//! let options = ConvertOptions::new()
//!     .with_channel_capacity(16)
//!     .with_indent(4)
//!     .with_shape(OutputShape {
//!         object_name: "name".to_string(),
//!         ..OutputShape::default()
//!     });
//! assert_eq!(options.indent, 4);
//! ```

use crate::{Error, NodeId, Result, Schema, SchemaSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names the leaves the serializer reads from every record.
///
/// `object_name` and `field_group` are children of the schema root; the three
/// field tags are leaves under `field_group`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputShape {
    pub object_name: String,
    pub field_group: String,
    pub field_name: String,
    pub field_type: String,
    pub field_value: String,
}

impl Default for OutputShape {
    fn default() -> Self {
        OutputShape {
            object_name: "obj_name".to_string(),
            field_group: "field".to_string(),
            field_name: "name".to_string(),
            field_type: "type".to_string(),
            field_value: "value".to_string(),
        }
    }
}

impl OutputShape {
    /// Looks the shape's tags up in `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if a tag is missing from its expected
    /// position or is not a leaf.
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedShape> {
        let root = schema.root();
        let leaf = |parent: NodeId, tag: &str| -> Result<NodeId> {
            let id = schema.child(parent, tag).ok_or_else(|| {
                Error::invalid_shape(format!("<{}> has no child <{tag}>", schema.tag(parent)))
            })?;
            if !schema.node(id).is_leaf() {
                return Err(Error::invalid_shape(format!("<{tag}> must be a leaf")));
            }
            Ok(id)
        };

        let object_name = leaf(root, &self.object_name)?;
        let group = schema.child(root, &self.field_group).ok_or_else(|| {
            Error::invalid_shape(format!(
                "<{}> has no child <{}>",
                schema.root_tag(),
                self.field_group
            ))
        })?;

        Ok(ResolvedShape {
            object_name,
            field_name: leaf(group, &self.field_name)?,
            field_type: leaf(group, &self.field_type)?,
            field_value: leaf(group, &self.field_value)?,
        })
    }
}

/// An [`OutputShape`] bound to the node ids of one schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedShape {
    pub object_name: NodeId,
    pub field_name: NodeId,
    pub field_type: NodeId,
    pub field_value: NodeId,
}

/// Options for one [`Converter`](crate::Converter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Tokens the lexer may queue before it blocks
    pub channel_capacity: usize,
    /// Spaces per nesting level in the output
    pub indent: usize,
    pub shape: OutputShape,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            channel_capacity: 256,
            indent: 2,
            shape: OutputShape::default(),
        }
    }
}

impl ConvertOptions {
    /// Creates default options (capacity 256, 2-space indent, bundled shape).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token channel capacity; zero is raised to one.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A schema tree and the output shape that goes with it.
///
/// ```json
/// {
///   "schema": { "tag": "root", "repeatable": true, "children": [ ... ] },
///   "shape": { "object_name": "name" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub schema: SchemaSpec,
    #[serde(default)]
    pub shape: OutputShape,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            schema: Schema::bundled_spec(),
            shape: OutputShape::default(),
        }
    }
}

impl Profile {
    /// Parses a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a profile from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputNotFound`]/[`Error::InputUnreadable`] if the file
    /// cannot be read, or [`Error::InvalidSchema`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::input_not_found(path));
        }
        let json = fs::read_to_string(path).map_err(|e| Error::input_unreadable(path, e))?;
        Self::from_json(&json)
    }

    /// Validates the schema tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] for an invalid tree.
    pub fn build_schema(&self) -> Result<Schema> {
        Schema::new(&self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::new();
        assert_eq!(options.channel_capacity, 256);
        assert_eq!(options.indent, 2);
        assert_eq!(ConvertOptions::new().with_channel_capacity(0).channel_capacity, 1);
    }

    #[test]
    fn test_default_shape_resolves_against_bundled_schema() {
        let schema = Schema::bundled().unwrap();
        let shape = OutputShape::default().resolve(&schema).unwrap();
        assert_eq!(schema.tag(shape.object_name), "obj_name");
        assert_eq!(schema.tag(shape.field_value), "value");
        assert_ne!(shape.object_name, shape.field_name);
    }

    #[test]
    fn test_shape_errors() {
        let schema = Schema::bundled().unwrap();
        let shape = OutputShape {
            field_group: "fields".to_string(),
            ..OutputShape::default()
        };
        assert!(matches!(shape.resolve(&schema), Err(Error::InvalidShape(_))));

        let shape = OutputShape {
            object_name: "field".to_string(),
            ..OutputShape::default()
        };
        assert!(shape.resolve(&schema).is_err());
    }

    #[test]
    fn test_profile_from_json_fills_shape_defaults() {
        let profile = Profile::from_json(
            r#"{
                "schema": {
                    "tag": "root",
                    "repeatable": true,
                    "children": [
                        { "tag": "name" },
                        { "tag": "field", "repeatable": true, "children": [
                            { "tag": "name" },
                            { "tag": "type", "allowed_values": ["int", "string"] },
                            { "tag": "value" }
                        ]}
                    ]
                },
                "shape": { "object_name": "name" }
            }"#,
        )
        .unwrap();
        assert_eq!(profile.shape.field_group, "field");

        let schema = profile.build_schema().unwrap();
        assert!(profile.shape.resolve(&schema).is_ok());
    }

    #[test]
    fn test_default_profile_is_bundled() {
        let profile = Profile::default();
        assert_eq!(profile.schema, Schema::bundled_spec());
    }
}
