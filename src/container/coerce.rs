//! Typed accessors.
//!
//! | Accessor  | Accepts                                  | On failure          |
//! |-----------|------------------------------------------|---------------------|
//! | `bool`    | bool, `1`/`0`, common true/false tokens  | error               |
//! | `int`     | number (truncated), base-10 string       | error               |
//! | `int64`   | number (truncated)                       | error               |
//! | `float`   | number                                   | error               |
//! | `string`  | string                                   | `""`, never errors  |
//! | `strings` | string, split on `;`                     | `None`, never errors|
//!
//! Each accessor has a `default_*` twin that swallows every failure,
//! missing keys and wrong types alike, and returns the caller's fallback.

use super::Container;
use crate::error::{ConfigError, Result};
use crate::tree::Node;

/// Separator between the items of a string list.
const LIST_SEPARATOR: char = ';';

/// Interpret a node as a boolean.
///
/// Accepts native booleans, the numbers `1` and `0`, and these spellings:
///
/// ```text
/// true:  1 t T true TRUE True YES yes Yes Y y ON on On
/// false: 0 f F false FALSE False NO no No N n OFF off Off
/// ```
pub fn parse_bool(node: &Node) -> Option<bool> {
    match node {
        Node::Bool(b) => Some(*b),
        Node::Number(n) if *n == 1.0 => Some(true),
        Node::Number(n) if *n == 0.0 => Some(false),
        Node::String(s) => match s.as_str() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" | "YES" | "yes" | "Yes" | "Y" | "y"
            | "ON" | "on" | "On" => Some(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" | "NO" | "no" | "No" | "N" | "n"
            | "OFF" | "off" | "Off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Short description of a node for coercion errors.
fn describe(node: &Node) -> String {
    match node {
        Node::String(s) => format!("string {s:?}"),
        Node::Number(n) => format!("number {n}"),
        Node::Bool(b) => format!("bool {b}"),
        other => other.kind().to_string(),
    }
}

fn coercion(key: &str, target: &'static str, node: &Node) -> ConfigError {
    ConfigError::Coercion {
        key: key.to_string(),
        target,
        found: describe(node),
    }
}

impl Container {
    pub fn bool(&self, key: &str) -> Result<bool> {
        let node = self.raw(key)?;
        parse_bool(&node).ok_or_else(|| coercion(key, "bool", &node))
    }

    pub fn default_bool(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    /// Numbers are truncated toward zero; strings must be plain base-10 integers.
    pub fn int(&self, key: &str) -> Result<isize> {
        match self.raw(key)? {
            Node::Number(n) => Ok(n as isize),
            Node::String(s) => s.parse().map_err(|source| ConfigError::InvalidInt {
                key: key.to_string(),
                source,
            }),
            other => Err(coercion(key, "int", &other)),
        }
    }

    pub fn default_int(&self, key: &str, default: isize) -> isize {
        self.int(key).unwrap_or(default)
    }

    /// Only numbers qualify, truncated toward zero. Strings are rejected.
    pub fn int64(&self, key: &str) -> Result<i64> {
        match self.raw(key)? {
            Node::Number(n) => Ok(n as i64),
            other => Err(coercion(key, "int64", &other)),
        }
    }

    pub fn default_int64(&self, key: &str, default: i64) -> i64 {
        self.int64(key).unwrap_or(default)
    }

    pub fn float(&self, key: &str) -> Result<f64> {
        match self.raw(key)? {
            Node::Number(n) => Ok(n),
            other => Err(coercion(key, "float", &other)),
        }
    }

    pub fn default_float(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    /// The string at `key`, or `""` when the key is missing or holds another type.
    pub fn string(&self, key: &str) -> String {
        match self.get(key) {
            Some(Node::String(s)) => s,
            _ => String::new(),
        }
    }

    /// Falls back on an empty result as well, since `string` cannot tell
    /// an empty value from a missing one.
    pub fn default_string(&self, key: &str, default: &str) -> String {
        let value = self.string(key);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    /// The string at `key` split on `;`, or `None` when that string is empty.
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        let value = self.string(key);
        if value.is_empty() {
            return None;
        }
        Some(value.split(LIST_SEPARATOR).map(str::to_string).collect())
    }

    pub fn default_strings(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.strings(key).unwrap_or(default)
    }
}

// ============================================================================
// tests
// ============================================================================
