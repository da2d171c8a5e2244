//! Position ordering of component fields.
//!
//! The Storyblok editor lays fields out in the order they appear in the JSON
//! body and ignores their `pos` value, so outgoing schemas are re-ordered by
//! position before they are sent.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::client::types::FieldInput;

/// Order fields ascending by position.
///
/// The sort is stable and the input is traversed in name order, so fields
/// sharing a position come out sorted by name.
pub fn order_fields(fields: &BTreeMap<String, FieldInput>) -> IndexMap<String, FieldInput> {
    let mut entries: Vec<(&String, &FieldInput)> = fields.iter().collect();
    entries.sort_by_key(|(_, field)| field.pos);
    entries
        .into_iter()
        .map(|(name, field)| (name.clone(), field.clone()))
        .collect()
}
