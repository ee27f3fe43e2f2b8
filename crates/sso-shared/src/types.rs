//! Common types

use std::collections::BTreeMap;

/// Principal attributes keyed by attribute name. Values are multi-valued.
pub type AttributeMap = BTreeMap<String, Vec<String>>;
