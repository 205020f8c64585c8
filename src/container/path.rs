//! Multi-segment key resolution.
//!
//! A key such as `database::primary::host` is split on `::` and walked
//! one table at a time:
//!
//! ```text
//! database::primary::host
//! └─ root["database"] ─ ["primary"] ─ ["host"]
//! ```
//!
//! Walking past a scalar does not fail: the scalar is kept and the
//! remaining segments are skipped over, so `name::anything` resolves to
//! `name` when `name` is a string.

use crate::tree::{Node, Table};

/// Separator between the segments of a nested key.
pub const KEY_DELIMITER: &str = "::";

/// Resolve `key` against `root`.
///
/// - `""` resolves to the root table itself.
/// - A missing segment in a table stops the walk and yields `None`.
/// - A decimal segment indexes into a sequence; out of range yields `None`.
/// - A segment applied to any other node is skipped and the node is kept.
/// - A `null` result is reported as absent.
///
/// Each table is read-locked while its entry is examined. Sequences and
/// scalars are walked in place under that lock; only a nested table handle
/// or the final node is cloned out.
pub fn resolve(root: &Table, key: &str) -> Option<Node> {
    if key.is_empty() {
        return Some(Node::Mapping(root.clone()));
    }

    let mut segments = key.split(KEY_DELIMITER);
    let mut segment = segments.next()?;
    let mut table = root.clone();

    loop {
        let entries = table.read();
        let mut node = entries.get(segment)?;
        let descend = loop {
            let Some(next) = segments.next() else {
                return (!node.is_null()).then(|| node.clone());
            };
            match node {
                Node::Mapping(child) => break (child.clone(), next),
                Node::Sequence(items) => {
                    if let Ok(index) = next.parse::<usize>() {
                        node = items.get(index)?;
                    }
                }
                _ => {}
            }
        };
        drop(entries);
        (table, segment) = descend;
    }
}
