//! The merged token store and token-set file loading.
//!
//! All token-set files taking part in one conversion run are merged into a
//! single [`TokenStore`] so that `{dotted.path}` references resolve across
//! file boundaries. The store is built once per run and read-only
//! afterwards; it is passed by reference into every evaluation.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::token::Token;
use crate::utils::error::{ConversionWarning, TokenError, TokenResult};

/// Name of the Tokens Studio manifest listing token sets in order.
pub const MANIFEST_FILE: &str = "$metadata.json";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "tokenSetOrder")]
    token_set_order: Vec<String>,
}

/// Read-only merged view over every loaded token-set tree.
///
/// Top-level keys of later sets overwrite earlier ones, matching the
/// token-set order used to build the store.
#[derive(Debug, Default)]
pub struct TokenStore {
    roots: IndexMap<String, Value>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge one token-set tree into the store (last writer wins
    /// per top-level key).
    pub fn merge_tree(&mut self, tree: &Value) {
        if let Value::Object(map) = tree {
            for (key, value) in map {
                self.roots.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Walk a dotted path through the merged trees.
    ///
    /// Returns `None` as soon as any segment is missing; an unresolved
    /// path is not an error.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.roots.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolve a dotted path and classify the target as a leaf token.
    pub fn resolve_token(&self, path: &str) -> Option<Token> {
        self.resolve(path)
            .and_then(Value::as_object)
            .and_then(Token::classify)
    }
}

/// Path of the JSON file backing a token set.
pub fn token_set_path(tokens_dir: &Path, set_name: &str) -> PathBuf {
    tokens_dir.join(format!("{}.json", set_name))
}

/// Read the `$metadata.json` manifest. Missing manifest is fatal: without
/// it the conversion cannot know which sets to load or in what order.
pub fn read_manifest(tokens_dir: &Path) -> TokenResult<Vec<String>> {
    let path = tokens_dir.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&path)
        .map_err(|_| TokenError::missing_manifest(path.display().to_string()))?;
    let manifest: Manifest = serde_json::from_str(&raw)
        .map_err(|err| TokenError::json(path.display().to_string(), err.to_string()))?;
    Ok(manifest.token_set_order)
}

/// Load one token-set file as a raw JSON tree.
pub fn load_token_set(tokens_dir: &Path, set_name: &str) -> TokenResult<Value> {
    let path = token_set_path(tokens_dir, set_name);
    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw)
        .map_err(|err| TokenError::json(path.display().to_string(), err.to_string()))
}

/// Build the merged store for a list of token sets.
///
/// Missing and unparsable files are skipped with a warning; reference
/// resolution is best-effort over whatever did load.
pub fn build_store(
    tokens_dir: &Path,
    set_names: &[String],
) -> (TokenStore, Vec<ConversionWarning>) {
    let mut store = TokenStore::new();
    let mut warnings = Vec::new();

    for set_name in set_names {
        let path = token_set_path(tokens_dir, set_name);
        if !path.exists() {
            warnings.push(
                ConversionWarning::new(format!("token file not found: {}", path.display()))
                    .with_context(set_name.clone()),
            );
            continue;
        }
        match load_token_set(tokens_dir, set_name) {
            Ok(tree) => store.merge_tree(&tree),
            Err(err) => warnings.push(
                ConversionWarning::new(err.to_string()).with_context(set_name.clone()),
            ),
        }
    }

    (store, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_walks_segments() {
        let mut store = TokenStore::new();
        store.merge_tree(&json!({
            "palette": {"gray": {"900": {"value": "#1a1a1a", "type": "color"}}}
        }));
        let token = store.resolve_token("palette.gray.900").unwrap();
        assert_eq!(token.token_type.as_deref(), Some("color"));
        assert!(store.resolve("palette.gray.100").is_none());
        assert!(store.resolve("missing.path").is_none());
    }

    #[test]
    fn test_merge_is_last_writer_wins() {
        let mut store = TokenStore::new();
        store.merge_tree(&json!({"base": {"unit": {"value": "8", "type": "sizing"}}}));
        store.merge_tree(&json!({"base": {"unit": {"value": "4", "type": "sizing"}}}));
        let token = store.resolve_token("base.unit").unwrap();
        assert_eq!(
            token,
            crate::core::token::Token::text("4", Some("sizing"))
        );
    }

    #[test]
    fn test_resolve_stops_at_scalar() {
        let mut store = TokenStore::new();
        store.merge_tree(&json!({"a": {"b": {"value": "x"}}}));
        assert!(store.resolve("a.b.value.deeper").is_none());
    }
}
