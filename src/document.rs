//! Ordered output model.
//!
//! A [`Document`] maps object names to [`FieldMap`]s, and a [`FieldMap`] maps
//! field names to [`FieldValue`]s. Both wrap [`IndexMap`] so objects and fields
//! come out in the order their records and slots went in.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{Document, FieldMap, FieldValue};
//!
//! let mut fields = FieldMap::new();
//! fields.insert("count".to_string(), FieldValue::from(5u64));
//!
//! let mut document = Document::new();
//! document.insert("Alpha".to_string(), fields);
//!
//! assert_eq!(document.len(), 1);
//! assert_eq!(
//!     document.get("Alpha").and_then(|f| f.get("count")),
//!     Some(&FieldValue::from(5u64))
//! );
//! ```

use crate::FieldValue;
use indexmap::IndexMap;

/// The fields of one output object, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(IndexMap<String, FieldValue>);

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        FieldMap(IndexMap::new())
    }

    /// Inserts a field, returning the previous value for that name.
    pub fn insert(&mut self, name: String, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        FieldMap(IndexMap::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every accepted object, keyed by name, in record order.
///
/// A name present here is reserved even when its field map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document(IndexMap<String, FieldMap>);

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    /// Inserts an object, returning the previous fields for that name.
    pub fn insert(&mut self, name: String, fields: FieldMap) -> Option<FieldMap> {
        self.0.insert(name, fields)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldMap> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, FieldMap> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldMap> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldMap)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, FieldMap)>>(iter: T) -> Self {
        Document(IndexMap::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a FieldMap);
    type IntoIter = indexmap::map::Iter<'a, String, FieldMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let document: Document = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|name| (name.to_string(), FieldMap::new()))
            .collect();
        let keys: Vec<_> = document.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_object_still_reserves_name() {
        let mut document = Document::new();
        document.insert("A".to_string(), FieldMap::new());
        assert!(document.contains("A"));
        assert!(!document.is_empty());
        assert!(document.get("A").is_some_and(FieldMap::is_empty));
    }
}
