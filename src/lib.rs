//! cfgtree - a hierarchical in-memory configuration store.
//!
//! Documents are parsed into a tree of shared, individually locked tables
//! and queried with `::`-delimited keys.
//!
//! | Module      | Contents                                           |
//! |-------------|----------------------------------------------------|
//! | `tree`      | `Node`, `Table`                                    |
//! | `container` | `Container`, path resolution, typed accessors      |
//! | `decode`    | case-insensitive decoding into `Deserialize` types |
//! | `format`    | `Format`, `Registry`, `JsonFormat`, env expansion  |
//! | `error`     | `ConfigError`, `DecodeError`                       |
//! | `logger`    | `log!`, `debug!`, `debug_do!`                      |
//!
//! # Example
//!
//! ```ignore
//! let registry = Registry::with_defaults();
//! let config = registry.parse("json", br#"{"db": {"port": 5432}}"#)?;
//!
//! assert_eq!(config.int("db::port")?, 5432);
//! assert_eq!(config.default_string("db::host", "localhost"), "localhost");
//! ```

pub mod container;
pub mod decode;
pub mod error;
pub mod format;
pub mod logger;
pub mod tree;

pub use container::{Container, KEY_DELIMITER, parse_bool};
pub use error::{ConfigError, DecodeError, Result};
pub use format::{Format, JsonFormat, ROOT_ARRAY_KEY, Registry};
pub use tree::{Node, Table};
