//! Configuration tree nodes.
//!
//! | Type    | Purpose                                              |
//! |---------|------------------------------------------------------|
//! | `Node`  | One value: null, bool, number, string, list or table |
//! | `Table` | Shared, lock-guarded mapping from keys to nodes      |
//!
//! Every table sits behind its own reader/writer lock and is shared by
//! reference, so a table reachable from several containers is guarded by
//! one lock regardless of which container touches it.

mod ser;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Entries of a table, ordered by key.
pub type Entries = BTreeMap<String, Node>;

// ============================================================================
// Node
// ============================================================================

/// A single value in the configuration tree.
///
/// Numbers are always stored as `f64`, even when the source literal was
/// integral. Integer accessors truncate.
#[derive(Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Table),
}

impl Node {
    /// Name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub const fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Mapping(table) => Some(table),
            _ => None,
        }
    }

    /// Snapshot this node (and everything below it) as a JSON value.
    ///
    /// Nested tables are read-locked one at a time while copying.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => ser::number_to_json(*n),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Sequence(items) => JsonValue::Array(items.iter().map(Node::to_json).collect()),
            Self::Mapping(table) => table.to_json(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Mapping(table) => f.debug_tuple("Mapping").field(table).finish(),
        }
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(map) => Self::Mapping(Table::from(map)),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Table> for Node {
    fn from(value: Table) -> Self {
        Self::Mapping(value)
    }
}

// ============================================================================
// Table
// ============================================================================

/// A mapping node shared by reference.
///
/// Cloning a `Table` clones the handle, not the entries: both handles see
/// the same entries and contend on the same lock.
#[derive(Clone, Default)]
pub struct Table(Arc<RwLock<Entries>>);

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Entries) -> Self {
        Self(Arc::new(RwLock::new(entries)))
    }

    /// Acquire the shared lock.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.0.read()
    }

    /// Acquire the exclusive lock.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.0.write()
    }

    /// Clone the node stored under `key`, holding the read lock only for the lookup.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.read().get(key).cloned()
    }

    /// Insert or overwrite a direct entry, returning the previous node.
    pub fn insert(&self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.write().insert(key.into(), node.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// True if both handles point at the same entries.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn to_json(&self) -> JsonValue {
        let entries = self.read();
        JsonValue::Object(
            entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

impl From<Map<String, JsonValue>> for Table {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self::from_entries(
            map.into_iter()
                .map(|(key, value)| (key, Node::from(value)))
                .collect(),
        )
    }
}

impl FromIterator<(String, Node)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_become_f64() {
        let node = Node::from(json!({"int": 5, "float": 2.5, "neg": -3}));
        let table = node.as_table().unwrap();
        assert_eq!(table.get("int"), Some(Node::Number(5.0)));
        assert_eq!(table.get("float"), Some(Node::Number(2.5)));
        assert_eq!(table.get("neg"), Some(Node::Number(-3.0)));
    }

    #[test]
    fn test_table_clone_shares_entries() {
        let table = Table::new();
        let alias = table.clone();
        alias.insert("name", "cfgtree");

        assert!(table.ptr_eq(&alias));
        assert_eq!(table.get("name"), Some(Node::from("cfgtree")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_structural_equality() {
        let a = Node::from(json!({"x": [1, "two", null], "y": {"z": true}}));
        let b = Node::from(json!({"y": {"z": true}, "x": [1, "two", null]}));
        let c = Node::from(json!({"x": [1, "two", null], "y": {"z": false}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Node::Number(1.0), Node::from("1"));
    }

    #[test]
    fn test_to_json_snapshot() {
        let source = json!({"name": "svc", "port": 8080, "ratio": 0.5, "tags": ["a", "b"]});
        let node = Node::from(source.clone());
        assert_eq!(node.to_json(), source);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::Null.kind(), "null");
        assert_eq!(Node::from(1.0).kind(), "number");
        assert_eq!(Node::from(Table::new()).kind(), "mapping");
        assert_eq!(Node::Sequence(vec![]).kind(), "sequence");
    }
}
