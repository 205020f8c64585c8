//! Document formats and the registry that selects between them.
//!
//! # Module Structure
//!
//! ```text
//! format/
//! ├── env       # ${VAR||fallback} expansion over parsed documents
//! ├── json      # JsonFormat, the built-in format
//! └── mod.rs    # Format trait, Registry (this file)
//! ```
//!
//! A [`Registry`] is an explicit value rather than process-wide state:
//! build one with [`Registry::with_defaults`], register extra formats on
//! it, and pass it to whatever needs to load documents.

mod env;
mod json;

pub use env::{expand_env, expand_str};
pub use json::{JsonFormat, ROOT_ARRAY_KEY};

use crate::container::Container;
use crate::debug;
use crate::error::{ConfigError, Result};

/// A named parser that turns raw bytes into a container.
pub trait Format: Send + Sync {
    /// Name used to select this format, e.g. `json`.
    fn name(&self) -> &'static str;

    /// Parse a complete document.
    fn parse(&self, bytes: &[u8]) -> Result<Container>;
}

/// Formats available for loading, in registration order.
#[derive(Default)]
pub struct Registry {
    formats: Vec<Box<dyn Format>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in formats.
    pub fn with_defaults() -> Self {
        Self {
            formats: vec![Box::new(JsonFormat)],
        }
    }

    /// Add a format. Names are unique; registering one twice fails.
    pub fn register(&mut self, format: impl Format + 'static) -> Result<()> {
        let name = format.name();
        if self.get(name).is_some() {
            return Err(ConfigError::DuplicateFormat(name));
        }
        debug!("format"; "registered `{name}`");
        self.formats.push(Box::new(format));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Format> {
        self.formats
            .iter()
            .find(|format| format.name() == name)
            .map(|format| format.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|format| format.name()).collect()
    }

    /// Parse `bytes` with the format registered as `name`.
    pub fn parse(&self, name: &str, bytes: &[u8]) -> Result<Container> {
        let format = self
            .get(name)
            .ok_or_else(|| ConfigError::UnknownFormat(name.to_string()))?;
        format.parse(bytes)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("formats", &self.names())
            .finish()
    }
}
