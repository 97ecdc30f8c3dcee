//! Request hashing (§6): the cache key is the SHA-256 of a canonicalised
//! JSON value — object keys sorted, no insignificant whitespace.

use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

pub fn canonical_hash(value: &Value) -> String {
    let canonical = canonicalize(value);
    let bytes = serde_json::to_vec(&canonical).expect("canonicalised value always serialises");
    let digest = Sha256::digest(&bytes);
    format!("{digest:x}")
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map.iter().map(|(k, v)| (k.clone(), canonicalize(v))).collect();
            serde_json::to_value(sorted).expect("a BTreeMap<String, Value> always serialises to an object")
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_affect_hash() {
        let a = json!({"b": 1, "a": {"y": 2, "x": 1}});
        let b = json!({"a": {"x": 1, "y": 2}, "b": 1});
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn different_values_hash_differently() {
        assert_ne!(canonical_hash(&json!({"a": 1})), canonical_hash(&json!({"a": 2})));
    }
}
