//! The configuration container.
//!
//! # Module Structure
//!
//! ```text
//! container/
//! ├── path      # key splitting and tree walking
//! ├── coerce    # typed accessors and their default variants
//! └── mod.rs    # Container (this file)
//! ```
//!
//! # Locking
//!
//! A container's lock is the lock of its root table. Readers take it in
//! shared mode for the duration of a lookup; `set` takes it exclusively.
//! A sub-container shares the parent's nested table, and with it that
//! table's lock, so writes through a child are synchronised with reads of
//! the same subtree through the parent.

mod coerce;
mod path;

pub use coerce::parse_bool;
pub use path::{KEY_DELIMITER, resolve};

use crate::error::{ConfigError, Result};
use crate::tree::{Node, Table};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

/// A mutable, thread-safe configuration store over one root table.
#[derive(Clone, Default)]
pub struct Container {
    root: Table,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing table. The table is shared, not copied.
    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Resolve `key` to a node. `""` yields the root table.
    pub fn get(&self, key: &str) -> Option<Node> {
        resolve(&self.root, key)
    }

    /// Resolve `key` to a node, failing when nothing is there.
    pub fn raw(&self, key: &str) -> Result<Node> {
        self.get(key).ok_or_else(|| ConfigError::not_found(key))
    }

    pub fn default_raw(&self, key: &str, default: Node) -> Node {
        self.raw(key).unwrap_or(default)
    }

    /// Insert or overwrite a top-level string entry.
    ///
    /// The key is taken literally: `set("a::b", ..)` creates a single key
    /// named `a::b` and never walks or creates intermediate tables.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.root.insert(key, Node::String(value.into()));
    }

    /// Return the direct child `name` as a map of strings.
    ///
    /// Only a table whose values are all strings qualifies; nothing is coerced.
    pub fn section(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let table = match self.root.get(name) {
            Some(Node::Mapping(table)) => table,
            None | Some(Node::Null) => return Err(ConfigError::not_found(name)),
            Some(other) => {
                return Err(ConfigError::Type {
                    key: name.to_string(),
                    expected: "mapping",
                    found: other.kind(),
                });
            }
        };

        let entries = table.read();
        entries
            .iter()
            .map(|(key, value)| match value {
                Node::String(s) => Ok((key.clone(), s.clone())),
                other => Err(ConfigError::Type {
                    key: format!("{name}{KEY_DELIMITER}{key}"),
                    expected: "string",
                    found: other.kind(),
                }),
            })
            .collect()
    }

    /// Carve out the table at `key` as its own container.
    ///
    /// The child shares the table with this container: writes through the
    /// child show up here. Replacing `key` here later does not affect a
    /// child that was already extracted.
    pub fn sub(&self, key: &str) -> Result<Container> {
        match self.get(key) {
            Some(Node::Mapping(table)) => Ok(Container::from_table(table)),
            Some(other) => Err(ConfigError::Type {
                key: key.to_string(),
                expected: "mapping",
                found: other.kind(),
            }),
            None => Err(ConfigError::not_found(key)),
        }
    }

    /// Decode the table at `key` (`""` for the whole store) into `T`.
    ///
    /// Keys are matched to field names exactly first, then ignoring case.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Server { host: String, port: u16 }
    ///
    /// let server: Server = container.decode("server")?;
    /// ```
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let snapshot = self.sub(key)?.root.to_json();
        Ok(crate::decode::from_value(&snapshot)?)
    }

    /// Render the whole tree as indented JSON.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.root).map_err(ConfigError::Serialize)
    }

    /// Change notification is not supported; this always fails.
    pub fn on_change<F>(&self, _key: &str, _callback: F) -> Result<()>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Err(ConfigError::Unsupported("watching a key for changes"))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("root", &self.root).finish()
    }
}

// ============================================================================
// tests
// ============================================================================
