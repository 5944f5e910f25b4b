//! Theme assembly: composing ordered token sets into one CSS-variable map.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::eval::{is_bare_number, EngineOptions, Evaluator};
use super::flatten::flatten;
use super::store::{load_token_set, token_set_path, TokenStore};
use crate::utils::error::{ConversionWarning, TokenError, TokenResult};
use crate::utils::naming::dashed_to_css_variable;

/// Name fragments marking a CSS variable as size-related. Flattened names
/// no longer carry the token's declared type, so the second unit-inference
/// pass keys off the variable name instead.
static SIZE_KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "spread",
    "blur",
    "offset-x",
    "offset-y",
    "offset",
    "width",
    "height",
    "size",
    "radius",
    "spacing",
    "padding",
    "margin",
    "gap",
    "border-width",
};

/// A scalar CSS value. Composite tokens never reach this type; overrides
/// may contribute numbers as well as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Text(String),
    Number(f64),
}

impl CssValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CssValue::Text(text) => Some(text),
            CssValue::Number(_) => None,
        }
    }

    fn from_json(value: &Value) -> Option<CssValue> {
        match value {
            Value::String(text) => Some(CssValue::Text(text.clone())),
            Value::Number(number) => number.as_f64().map(CssValue::Number),
            _ => None,
        }
    }
}

/// Final output map: `--kebab-case-name` → scalar CSS value.
pub type CssVariableMap = IndexMap<String, CssValue>;

/// Icon-set and light/dark metadata carried through to the generated record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_light: Option<bool>,
}

/// Declarative theme definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub name: String,
    /// Token sets composing the theme, lowest priority first; later sets
    /// overwrite earlier ones on variable-name collisions.
    pub token_sets: Vec<String>,
    /// Literal override patch, applied last and always winning.
    #[serde(default)]
    pub overrides: IndexMap<String, Value>,
    #[serde(flatten)]
    pub flags: ThemeFlags,
}

/// One assembled theme, ready for module emission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOutput {
    pub theme_name: String,
    pub flags: ThemeFlags,
    pub css_variables: CssVariableMap,
}

#[derive(Debug, Deserialize)]
struct ThemesFile {
    themes: Vec<ThemeConfig>,
}

/// Read a themes config file (`{"themes": [...]}`).
pub fn read_theme_configs(path: &Path) -> TokenResult<Vec<ThemeConfig>> {
    let raw = fs::read_to_string(path)?;
    let file: ThemesFile = serde_json::from_str(&raw)
        .map_err(|err| TokenError::invalid_config(err.to_string()))?;
    if file.themes.is_empty() {
        return Err(TokenError::invalid_config("no themes defined"));
    }
    Ok(file.themes)
}

/// Flatten and evaluate one token-set tree into `out` (last writer wins
/// per variable name).
pub fn evaluate_set_into(
    tree: &Value,
    evaluator: &mut Evaluator<'_>,
    out: &mut CssVariableMap,
) {
    for (name, token) in flatten(tree) {
        let value = evaluator.evaluate(&token);
        out.insert(dashed_to_css_variable(&name), CssValue::Text(value));
    }
}

/// Append `px` to bare-numeric values whose variable name matches a
/// size keyword.
pub fn coerce_size_units(map: &mut CssVariableMap) {
    for (name, value) in map.iter_mut() {
        if !is_size_related(name) {
            continue;
        }
        let coerced = match value {
            CssValue::Text(text) if is_bare_number(text) => format!("{}px", text.trim()),
            CssValue::Number(number) => format!("{}px", number),
            _ => continue,
        };
        *value = CssValue::Text(coerced);
    }
}

fn is_size_related(name: &str) -> bool {
    SIZE_KEYWORDS.iter().any(|keyword| name.contains(*keyword))
}

/// Assemble one theme from its token sets.
///
/// Missing set files only warn; an unparsable set file fails this theme
/// (the caller decides whether sibling themes continue). The override
/// patch is applied after size coercion and is not re-coerced unless
/// [`EngineOptions::recoerce_after_patch`] is set.
pub fn assemble_theme(
    tokens_dir: &Path,
    config: &ThemeConfig,
    options: EngineOptions,
) -> TokenResult<(ThemeOutput, Vec<ConversionWarning>)> {
    let mut warnings = Vec::new();
    let mut store = TokenStore::new();
    let mut trees = Vec::new();

    for set_name in &config.token_sets {
        let path = token_set_path(tokens_dir, set_name);
        if !path.exists() {
            warnings.push(
                ConversionWarning::new(format!("token file not found: {}", path.display()))
                    .with_context(set_name.clone()),
            );
            continue;
        }
        let tree = load_token_set(tokens_dir, set_name)?;
        store.merge_tree(&tree);
        trees.push(tree);
    }

    let mut evaluator = Evaluator::new(&store, options);
    let mut css_variables = CssVariableMap::new();
    for tree in &trees {
        evaluate_set_into(tree, &mut evaluator, &mut css_variables);
    }
    warnings.extend(evaluator.take_warnings());

    coerce_size_units(&mut css_variables);

    for (name, value) in &config.overrides {
        match CssValue::from_json(value) {
            Some(scalar) => {
                css_variables.insert(name.clone(), scalar);
            }
            None => warnings.push(
                ConversionWarning::new("override is not a scalar value")
                    .with_context(name.clone()),
            ),
        }
    }
    if options.recoerce_after_patch {
        coerce_size_units(&mut css_variables);
    }

    Ok((
        ThemeOutput {
            theme_name: config.name.clone(),
            flags: config.flags.clone(),
            css_variables,
        },
        warnings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_size_units_by_name() {
        let mut map = CssVariableMap::new();
        map.insert("--shadow-blur".to_string(), CssValue::Text("4".to_string()));
        map.insert("--font-weight".to_string(), CssValue::Text("700".to_string()));
        map.insert("--panel-width".to_string(), CssValue::Number(320.0));
        map.insert("--panel-height".to_string(), CssValue::Text("100%".to_string()));
        coerce_size_units(&mut map);

        assert_eq!(map["--shadow-blur"], CssValue::Text("4px".to_string()));
        assert_eq!(map["--font-weight"], CssValue::Text("700".to_string()));
        assert_eq!(map["--panel-width"], CssValue::Text("320px".to_string()));
        assert_eq!(map["--panel-height"], CssValue::Text("100%".to_string()));
    }

    #[test]
    fn test_evaluate_set_into_last_wins() {
        let store = TokenStore::new();
        let mut evaluator = Evaluator::new(&store, EngineOptions::default());
        let mut out = CssVariableMap::new();
        evaluate_set_into(
            &json!({"foo": {"value": "1px", "type": "sizing"}}),
            &mut evaluator,
            &mut out,
        );
        evaluate_set_into(
            &json!({"foo": {"value": "2px", "type": "sizing"}}),
            &mut evaluator,
            &mut out,
        );
        assert_eq!(out["--foo"], CssValue::Text("2px".to_string()));
    }

    #[test]
    fn test_theme_config_parses_flags_and_overrides() {
        let config: ThemeConfig = serde_json::from_value(json!({
            "name": "dark-contrast",
            "tokenSets": ["palette", "dark"],
            "iconSet": "v2",
            "isLight": false,
            "overrides": {"--foo": "3px"}
        }))
        .unwrap();
        assert_eq!(config.name, "dark-contrast");
        assert_eq!(config.flags.icon_set.as_deref(), Some("v2"));
        assert_eq!(config.flags.is_light, Some(false));
        assert_eq!(config.overrides.len(), 1);
    }
}
