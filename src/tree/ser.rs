//! Serialization of tree nodes.
//!
//! Integral numbers within the exactly representable range are written
//! without a fractional part, so `5` round-trips as `5` rather than `5.0`.

use super::{Node, Table};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn as_exact_int(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT).then_some(n as i64)
}

pub(super) fn number_to_json(n: f64) -> JsonValue {
    match as_exact_int(n) {
        Some(i) => JsonValue::from(i),
        None => serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number),
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => match as_exact_int(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(table) => table.serialize(serializer),
        }
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries = self.read();
        serializer.collect_map(entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_written_as_integers() {
        let node = Node::from(json!({"port": 8080, "ratio": 0.25, "neg": -7}));
        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(text, r#"{"neg":-7,"port":8080,"ratio":0.25}"#);
    }

    #[test]
    fn test_huge_numbers_stay_floats() {
        let text = serde_json::to_string(&Node::Number(1e300)).unwrap();
        assert_eq!(text, "1e300");
        assert_eq!(number_to_json(1e300), json!(1e300));
    }

    #[test]
    fn test_nested_serialization() {
        let node = Node::from(json!({"a": {"b": [true, null, "x"]}}));
        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(text, r#"{"a":{"b":[true,null,"x"]}}"#);
    }
}
