//! JSON documents.
//!
//! An object document becomes the root table directly. An array document
//! is wrapped under a single [`ROOT_ARRAY_KEY`] entry so that the root is
//! always a table:
//!
//! ```text
//! [1, 2, 3]   =>   {"rootArray": [1, 2, 3]}
//! ```

use super::Format;
use super::env::expand_env;
use crate::container::Container;
use crate::debug;
use crate::error::{ConfigError, Result};
use crate::tree::Table;
use serde_json::{Map, Value};

/// Key under which an array-rooted document is stored.
pub const ROOT_ARRAY_KEY: &str = "rootArray";

/// The built-in `json` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl JsonFormat {
    /// Parse `bytes` into a fresh container.
    ///
    /// When the document is neither an object nor an array, the error from
    /// the object attempt is reported.
    pub fn parse_document(bytes: &[u8]) -> Result<Container> {
        let mut map = match serde_json::from_slice::<Map<String, Value>>(bytes) {
            Ok(map) => map,
            Err(object_err) => match serde_json::from_slice::<Vec<Value>>(bytes) {
                Ok(items) => {
                    debug!("json"; "array document wrapped under `{ROOT_ARRAY_KEY}`");
                    let mut map = Map::new();
                    map.insert(ROOT_ARRAY_KEY.to_string(), Value::Array(items));
                    map
                }
                Err(_) => return Err(ConfigError::Parse(object_err)),
            },
        };

        expand_env(&mut map);
        debug!("json"; "parsed document with {} top-level keys", map.len());
        Ok(Container::from_table(Table::from(map)))
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Container> {
        Self::parse_document(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use serde_json::error::Category;

    #[test]
    fn test_parse_object() {
        let c = JsonFormat::parse_document(br#"{"name": "svc", "db": {"port": 5432}}"#).unwrap();
        assert_eq!(c.string("name"), "svc");
        assert_eq!(c.int("db::port").unwrap(), 5432);
        assert!(c.get(ROOT_ARRAY_KEY).is_none());
    }

    #[test]
    fn test_parse_empty_object() {
        let c = JsonFormat::parse_document(b"{}").unwrap();
        assert!(c.root().is_empty());
    }

    #[test]
    fn test_array_document_is_wrapped() {
        let source = br#"[{"a": 1}, "two", [3.5, null], true]"#;
        let c = JsonFormat::parse_document(source).unwrap();
        assert_eq!(c.root().keys(), vec![ROOT_ARRAY_KEY.to_string()]);

        let expected: serde_json::Value = serde_json::from_slice(source).unwrap();
        assert_eq!(c.get(ROOT_ARRAY_KEY), Some(Node::from(expected.clone())));
        assert_eq!(c.get(ROOT_ARRAY_KEY).unwrap().to_json(), expected);
        assert_eq!(c.int("rootArray::0::a").unwrap(), 1);
        assert_eq!(c.string("rootArray::1"), "two");
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        assert!(matches!(
            JsonFormat::parse_document(b"42"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            JsonFormat::parse_document(b""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_reports_object_error() {
        // truncated array: the array attempt fails with EOF, the object
        // attempt fails with a type mismatch, and the latter is reported
        match JsonFormat::parse_document(b"[1, 2") {
            Err(ConfigError::Parse(err)) => assert_eq!(err.classify(), Category::Data),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_fallback_applied() {
        let c = JsonFormat::parse_document(
            br#"{"url": "${CFGTREE_SURELY_UNSET_VAR||http://localhost}", "list": ["${CFGTREE_SURELY_UNSET_VAR||x}"],
                 "password": "pa$CFGTREE_SURELY_UNSET_VAR", "unset": "${CFGTREE_SURELY_UNSET_VAR}"}"#,
        )
        .unwrap();
        assert_eq!(c.string("url"), "http://localhost");
        assert_eq!(c.string("list::0"), "x");
        assert_eq!(c.string("password"), "pa$CFGTREE_SURELY_UNSET_VAR");
        assert_eq!(c.get("unset"), Some(Node::from("")));
    }

    #[test]
    fn test_format_trait() {
        let format = JsonFormat;
        assert_eq!(format.name(), "json");
        let c = format.parse(br#"{"k": "v"}"#).unwrap();
        assert_eq!(c.string("k"), "v");
    }
}
