//! Environment placeholder expansion for parsed documents.
//!
//! Runs once over every string in a freshly parsed document. Only a string
//! that is a placeholder in its entirety is replaced:
//!
//! | Value                  | Result                                        |
//! |------------------------|-----------------------------------------------|
//! | `${NAME}`              | value of `NAME`, or `""` if unset/empty       |
//! | `${NAME\|\|fallback}`    | value of `NAME`, or `fallback` if unset/empty |
//! | anything else          | unchanged                                     |
//!
//! Strings that merely contain `$`, such as `pa$word` or `prefix-${NAME}`,
//! are left alone.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Separates a variable name from its fallback inside `${...}`.
const FALLBACK_SEPARATOR: &str = "||";

/// Expand placeholders in every string of `map`, descending into nested
/// tables and sequences.
pub fn expand_env(map: &mut Map<String, Value>) {
    for value in map.values_mut() {
        expand_value(value);
    }
}

fn expand_value(value: &mut Value) {
    match value {
        Value::String(text) => {
            let expanded = match expand_str(text) {
                Cow::Borrowed(_) => return,
                Cow::Owned(expanded) => expanded,
            };
            *text = expanded;
        }
        Value::Array(items) => items.iter_mut().for_each(expand_value),
        Value::Object(map) => expand_env(map),
        _ => {}
    }
}

/// Expand `input` from the process environment if it is a whole-value placeholder.
pub fn expand_str(input: &str) -> Cow<'_, str> {
    expand_str_with(input, |name| std::env::var(name).ok())
}

fn expand_str_with<F>(input: &str, lookup: F) -> Cow<'_, str>
where
    F: FnOnce(&str) -> Option<String>,
{
    let Some(placeholder) = input
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Cow::Borrowed(input);
    };

    let (name, fallback) = placeholder
        .split_once(FALLBACK_SEPARATOR)
        .unwrap_or((placeholder, ""));
    match lookup(name) {
        Some(value) if !value.is_empty() => Cow::Owned(value),
        _ => Cow::Owned(fallback.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("example.org".to_string()),
            "USER" => Some("root".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_whole_value() {
        assert_eq!(expand_str_with("${HOST}", fake_env), "example.org");
        assert_eq!(expand_str_with("${HOST||local}", fake_env), "example.org");
    }

    #[test]
    fn test_expand_fallback() {
        assert_eq!(expand_str_with("${MISSING||local}", fake_env), "local");
        assert_eq!(expand_str_with("${EMPTY||local}", fake_env), "local");
        assert_eq!(expand_str_with("${MISSING||}", fake_env), "");
        // only the first separator splits
        assert_eq!(expand_str_with("${MISSING||a||b}", fake_env), "a||b");
    }

    #[test]
    fn test_unset_without_fallback_is_empty() {
        assert_eq!(expand_str_with("${MISSING}", fake_env), "");
        assert_eq!(expand_str_with("${EMPTY}", fake_env), "");
    }

    #[test]
    fn test_partial_placeholders_are_kept() {
        for text in [
            "pa$USER-word",
            "prefix-${USER}",
            "${USER}-suffix",
            "$USER",
            "price: $5",
            "${",
            "plain text",
        ] {
            let expanded = expand_str_with(text, fake_env);
            assert_eq!(expanded, text);
            assert!(matches!(expanded, Cow::Borrowed(_)), "{text}");
        }
    }

    #[test]
    fn test_expand_env_walks_document() {
        let mut doc = match json!({
            "a": "${CFGTREE_TEST_UNSET_VAR||one}",
            "nested": {"b": "${CFGTREE_TEST_UNSET_VAR||two}"},
            "list": ["${CFGTREE_TEST_UNSET_VAR||three}", 4],
            "secret": "pa$CFGTREE_TEST_UNSET_VAR",
            "number": 5
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        expand_env(&mut doc);
        assert_eq!(
            Value::Object(doc),
            json!({
                "a": "one",
                "nested": {"b": "two"},
                "list": ["three", 4],
                "secret": "pa$CFGTREE_TEST_UNSET_VAR",
                "number": 5
            })
        );
    }
}
