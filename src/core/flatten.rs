//! Flattening of nested token trees into dash-joined leaf maps.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::token::{has_complex_signature, Token};

/// A flattened token-set: dash-joined path → leaf token, in source order.
pub type FlattenedTokenMap = IndexMap<String, Token>;

/// Flatten a nested token tree into a map keyed by dash-joined path.
///
/// Each object node is classified in precedence order: leaf token, shadow
/// composite, animation/complex (skipped entirely), grouping node
/// (recursed). Iteration follows source order, so output ordering is
/// reproducible across runs.
pub fn flatten(tree: &Value) -> FlattenedTokenMap {
    let mut result = FlattenedTokenMap::new();
    if let Value::Object(map) = tree {
        flatten_into(map, "", &mut result);
    }
    result
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, result: &mut FlattenedTokenMap) {
    for (key, value) in map {
        let Value::Object(node) = value else {
            continue;
        };
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}-{}", prefix, key)
        };

        if let Some(token) = Token::classify(node) {
            result.insert(path, token);
        } else if has_complex_signature(node) {
            // animation and other complex tokens never reach CSS
            continue;
        } else {
            flatten_into(node, &path, result);
        }
    }
}
