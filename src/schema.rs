//! Schema trees describing which tags may nest where.
//!
//! A schema is written as a [`SchemaSpec`], a plain owned tree that can be
//! built in code (or with the [`schema!`](crate::schema!) macro) and loaded
//! from JSON. [`Schema::new`] validates it and flattens it into an arena of
//! [`SchemaNode`]s addressed by [`NodeId`]. The arena is read-only after
//! construction and is shared by reference between the lexer and validator
//! threads.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{Schema, SchemaSpec};
//!
//! let spec = SchemaSpec::container(
//!     "object",
//!     vec![
//!         SchemaSpec::leaf("obj_name"),
//!         SchemaSpec::container(
//!             "field",
//!             vec![
//!                 SchemaSpec::leaf("name"),
//!                 SchemaSpec::leaf("type").with_allowed_values(["int", "string"]),
//!                 SchemaSpec::leaf("value"),
//!             ],
//!         )
//!         .repeatable(),
//!     ],
//! )
//! .repeatable();
//!
//! let schema = Schema::new(&spec).unwrap();
//! let field = schema.child(schema.root(), "field").unwrap();
//! assert!(schema.node(field).is_repeatable());
//! assert!(schema.is_leaf_tag("type"));
//! ```

use crate::{Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An owned, unvalidated description of one schema node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub tag: String,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaSpec>,
}

impl SchemaSpec {
    /// Creates an unconstrained leaf node.
    #[must_use]
    pub fn leaf(tag: impl Into<String>) -> Self {
        SchemaSpec {
            tag: tag.into(),
            repeatable: false,
            allowed_values: None,
            children: Vec::new(),
        }
    }

    /// Creates a container node with the given children.
    #[must_use]
    pub fn container(tag: impl Into<String>, children: Vec<SchemaSpec>) -> Self {
        SchemaSpec {
            tag: tag.into(),
            repeatable: false,
            allowed_values: None,
            children,
        }
    }

    /// Marks the node as repeatable.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Restricts a leaf to the given value domain.
    #[must_use]
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Index of a node inside a [`Schema`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One validated node of a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaNode {
    tag: String,
    repeatable: bool,
    allowed_values: Option<IndexSet<String>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl SchemaNode {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn allowed_values(&self) -> Option<&IndexSet<String>> {
        self.allowed_values.as_ref()
    }

    /// Returns `true` if `value` is inside this node's value domain.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .as_ref()
            .map_or(true, |allowed| allowed.contains(value))
    }
}

/// A validated, immutable schema tree stored as an arena.
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
    leaf_tags: HashSet<String>,
    container_tags: HashSet<String>,
}

impl Schema {
    /// Validates `spec` and builds the arena.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if a tag is empty or contains markup
    /// characters, two siblings share a tag, or a container declares a value
    /// domain.
    pub fn new(spec: &SchemaSpec) -> Result<Self> {
        let mut schema = Schema {
            nodes: Vec::new(),
            leaf_tags: HashSet::new(),
            container_tags: HashSet::new(),
        };
        schema.insert(spec, None)?;
        Ok(schema)
    }

    /// Parses a [`SchemaSpec`] from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] for malformed JSON or an invalid tree.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: SchemaSpec = serde_json::from_str(json)?;
        Schema::new(&spec)
    }

    /// The schema shipped with the command-line tool.
    ///
    /// ```text
    /// object (repeatable)
    ///   obj_name
    ///   field (repeatable)
    ///     name
    ///     type  [int, string]
    ///     value
    /// ```
    #[must_use]
    pub fn bundled_spec() -> SchemaSpec {
        crate::schema!("object" * {
            "obj_name",
            "field" * {
                "name",
                "type" = ["int", "string"],
                "value",
            },
        })
    }

    /// Builds the bundled schema.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the bundled tree is valid.
    pub fn bundled() -> Result<Self> {
        Schema::new(&Schema::bundled_spec())
    }

    fn insert(&mut self, spec: &SchemaSpec, parent: Option<NodeId>) -> Result<NodeId> {
        validate_tag(&spec.tag)?;
        if !spec.children.is_empty() && spec.allowed_values.is_some() {
            return Err(Error::invalid_schema(format!(
                "container <{}> cannot restrict its values",
                spec.tag
            )));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            tag: spec.tag.clone(),
            repeatable: spec.repeatable,
            allowed_values: spec
                .allowed_values
                .as_ref()
                .map(|values| values.iter().cloned().collect()),
            children: Vec::with_capacity(spec.children.len()),
            parent,
        });

        if spec.children.is_empty() {
            self.leaf_tags.insert(spec.tag.clone());
        } else {
            self.container_tags.insert(spec.tag.clone());
        }

        let mut seen = HashSet::new();
        for child in &spec.children {
            if !seen.insert(child.tag.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "<{}> appears twice under <{}>",
                    child.tag, spec.tag
                )));
            }
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }

        Ok(id)
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    #[must_use]
    pub fn root_tag(&self) -> &str {
        self.tag(self.root())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds the child of `parent` carrying `tag`.
    #[must_use]
    pub fn child(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].tag == tag)
    }

    /// Returns `true` if any node carries `tag`.
    #[must_use]
    pub fn is_known_tag(&self, tag: &str) -> bool {
        self.leaf_tags.contains(tag) || self.container_tags.contains(tag)
    }

    /// Returns `true` if some leaf carries `tag`, meaning a value may follow it.
    #[must_use]
    pub fn is_leaf_tag(&self, tag: &str) -> bool {
        self.leaf_tags.contains(tag)
    }

    /// Collects the leaves of the subtree rooted at `id`, depth-first.
    #[must_use]
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = &self.nodes[id.0];
        if node.is_leaf() {
            out.push(id);
        } else {
            for &child in &node.children {
                self.collect_leaves(child, out);
            }
        }
    }
}

fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(Error::invalid_schema("tag must not be empty"));
    }
    if tag
        .chars()
        .any(|ch| matches!(ch, '<' | '>' | '/') || ch.is_whitespace())
    {
        return Err(Error::invalid_schema(format!(
            "tag {tag:?} contains markup characters or whitespace"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_schema_layout() {
        let schema = Schema::bundled().unwrap();
        assert_eq!(schema.root_tag(), "object");
        assert!(schema.node(schema.root()).is_repeatable());

        let field = schema.child(schema.root(), "field").unwrap();
        let ty = schema.child(field, "type").unwrap();
        assert_eq!(schema.node(ty).parent(), Some(field));
        assert!(schema.node(ty).allows("int"));
        assert!(!schema.node(ty).allows("float"));

        let leaves: Vec<_> = schema
            .leaves(schema.root())
            .into_iter()
            .map(|id| schema.tag(id).to_string())
            .collect();
        assert_eq!(leaves, vec!["obj_name", "name", "type", "value"]);
    }

    #[test]
    fn test_tag_classification() {
        let schema = Schema::bundled().unwrap();
        assert!(schema.is_known_tag("object"));
        assert!(!schema.is_leaf_tag("object"));
        assert!(schema.is_leaf_tag("value"));
        assert!(!schema.is_known_tag("values"));
    }

    #[test]
    fn test_same_tag_under_different_parents() {
        let spec = SchemaSpec::container(
            "root",
            vec![
                SchemaSpec::leaf("name"),
                SchemaSpec::container("field", vec![SchemaSpec::leaf("name")]).repeatable(),
            ],
        );
        let schema = Schema::new(&spec).unwrap();
        let outer = schema.child(schema.root(), "name").unwrap();
        let field = schema.child(schema.root(), "field").unwrap();
        let inner = schema.child(field, "name").unwrap();
        assert_ne!(outer, inner);
    }

    #[test]
    fn test_rejects_duplicate_siblings() {
        let spec = SchemaSpec::container(
            "root",
            vec![SchemaSpec::leaf("a"), SchemaSpec::leaf("a")],
        );
        assert!(matches!(Schema::new(&spec), Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_bad_tags_and_constrained_containers() {
        assert!(Schema::new(&SchemaSpec::leaf("")).is_err());
        assert!(Schema::new(&SchemaSpec::leaf("a b")).is_err());
        assert!(Schema::new(&SchemaSpec::leaf("</a>")).is_err());

        let spec = SchemaSpec::container("root", vec![SchemaSpec::leaf("a")])
            .with_allowed_values(["x"]);
        assert!(Schema::new(&spec).is_err());
    }

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(
            r#"{
                "tag": "item",
                "repeatable": true,
                "children": [
                    { "tag": "label" },
                    { "tag": "kind", "allowed_values": ["a", "b"] }
                ]
            }"#,
        )
        .unwrap();
        let kind = schema.child(schema.root(), "kind").unwrap();
        assert_eq!(schema.node(kind).allowed_values().map(|v| v.len()), Some(2));
        assert!(Schema::from_json("{\"tag\": 3}").is_err());
    }
}
