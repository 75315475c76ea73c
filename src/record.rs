//! Slot storage for one top-level schema instance.
//!
//! A [`Record`] keeps the leaf nodes of the schema in depth-first order next
//! to their (optional) values. When a leaf under a repeatable container is
//! assigned a second time, the container's leaf slots are appended again, so
//! every repeated block gets its own set of slots.

use crate::{NodeId, Schema};
use thiserror::Error;

/// Why a value was not stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueRejection {
    #[error("Duplicate value definition")]
    Duplicate,

    #[error("Value \"{value}\" is not allowed in this tag")]
    NotAllowed { value: String },

    #[error("Tag has no slot in this record")]
    NoSlot,
}

/// Leaf values of one top-level schema instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    slots: Vec<NodeId>,
    values: Vec<Option<String>>,
}

impl Record {
    /// Creates a record with one unset slot per leaf of the schema root.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let slots = schema.leaves(schema.root());
        let values = vec![None; slots.len()];
        Record { slots, values }
    }

    /// Appends a fresh, unset copy of the leaf slots under `node`.
    pub fn append_block(&mut self, schema: &Schema, node: NodeId) {
        let leaves = schema.leaves(node);
        self.values.extend(std::iter::repeat(None).take(leaves.len()));
        self.slots.extend(leaves);
    }

    fn last_slot(&self, node: NodeId) -> Option<usize> {
        self.slots.iter().rposition(|&slot| slot == node)
    }

    /// Stores `value` in the last slot for `node`.
    ///
    /// If that slot is taken and the leaf's parent is repeatable, a new block
    /// is appended first. The value domain is checked after that, so a
    /// rejected value in a repeated block still opens the new block.
    ///
    /// # Errors
    ///
    /// Returns the reason the value was dropped; the record is otherwise
    /// unchanged apart from any appended block.
    pub fn set_value(
        &mut self,
        schema: &Schema,
        node: NodeId,
        value: String,
    ) -> Result<(), ValueRejection> {
        let mut index = self.last_slot(node).ok_or(ValueRejection::NoSlot)?;

        if self.values[index].is_some() {
            match schema.node(node).parent() {
                Some(parent) if schema.node(parent).is_repeatable() => {
                    self.append_block(schema, parent);
                    index = self.last_slot(node).ok_or(ValueRejection::NoSlot)?;
                }
                _ => return Err(ValueRejection::Duplicate),
            }
        }

        if !schema.node(node).allows(&value) {
            return Err(ValueRejection::NotAllowed { value });
        }

        self.values[index] = Some(value);
        Ok(())
    }

    /// Finds the first slot for `node` at or after `start`.
    ///
    /// Returns the slot index together with its value.
    #[must_use]
    pub fn find_from(&self, node: NodeId, start: usize) -> Option<(usize, Option<&str>)> {
        self.slots
            .iter()
            .enumerate()
            .skip(start)
            .find(|&(_, &slot)| slot == node)
            .map(|(index, _)| (index, self.values[index].as_deref()))
    }

    /// The value of the first slot for `node`.
    #[must_use]
    pub fn first_value(&self, node: NodeId) -> Option<&str> {
        self.find_from(node, 0).and_then(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(slot, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Option<&str>)> + '_ {
        self.slots
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_deref))
    }
}
