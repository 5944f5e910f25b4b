//! The token value evaluation engine.
//!
//! This module turns one leaf token into its final CSS value string:
//! rgba composition, reference substitution (eager inlining or lazy
//! `var()` deferral), single binary multiplication, type-driven unit
//! inference, shadow rendering and color modification.

use fxhash::FxHashSet;
use lazy_static::lazy_static;
use regex::Regex;

use super::color::{apply_modify, compose_rgba, CssProfile};
use super::scan::{scan_value, Operand, Part};
use super::store::TokenStore;
use super::token::{ShadowKind, ShadowSpec, Token, TokenValue};
use crate::utils::error::ConversionWarning;
use crate::utils::naming::css_variable_reference;

/// How `{dotted.path}` references are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Look the reference up in the store and inline its evaluated value
    /// at build time. Unresolvable paths fall back to `var()` references;
    /// re-entered paths are cut with a warning.
    Eager,
    /// Rewrite every reference to `var(--dashed-path)` and let the CSS
    /// custom-property cascade resolve it at runtime.
    #[default]
    Lazy,
}

/// Behavioral flags for one conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub resolution: ResolutionMode,
    pub profile: CssProfile,
    /// Re-run size-keyword px coercion over patched values. Off by
    /// default: a patch is literal and always wins as written.
    pub recoerce_after_patch: bool,
}

/// Token types whose bare numeric values receive a `px` suffix.
static SIZING_TYPES: phf::Set<&'static str> = phf::phf_set! {
    "sizing",
    "spacing",
    "borderRadius",
    "borderWidth",
    "baseUnit",
};

const UNIT_SUFFIXES: [&str; 4] = ["px", "%", "em", "rem"];

lazy_static! {
    static ref BARE_NUMBER: Regex = Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)$").unwrap();
}

/// Evaluates leaf tokens against a merged store.
///
/// Warnings (circular references) accumulate on the evaluator and are
/// drained by the caller once a token-set or theme is done.
pub struct Evaluator<'a> {
    store: &'a TokenStore,
    options: EngineOptions,
    warnings: Vec<ConversionWarning>,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a TokenStore, options: EngineOptions) -> Self {
        Self {
            store,
            options,
            warnings: Vec::new(),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn take_warnings(&mut self) -> Vec<ConversionWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Evaluate one leaf token to its final CSS value.
    ///
    /// The visited set guarding cycle detection is scoped to this call, so
    /// detection stays local to one resolution chain.
    pub fn evaluate(&mut self, token: &Token) -> String {
        let mut visited = FxHashSet::default();
        self.evaluate_token(token, &mut visited)
    }

    fn evaluate_token(&mut self, token: &Token, visited: &mut FxHashSet<String>) -> String {
        let rendered = self.render_value(&token.value, token.token_type.as_deref(), visited);
        match &token.modify {
            Some(modify) => apply_modify(&rendered, modify),
            None => rendered,
        }
    }

    fn render_value(
        &mut self,
        value: &TokenValue,
        token_type: Option<&str>,
        visited: &mut FxHashSet<String>,
    ) -> String {
        match value {
            TokenValue::Text(raw) => self.render_text(raw, token_type, visited),
            TokenValue::Shadow(spec) => self.render_shadow(spec, visited),
        }
    }

    fn render_text(
        &mut self,
        raw: &str,
        token_type: Option<&str>,
        visited: &mut FxHashSet<String>,
    ) -> String {
        // The product split happens on the raw value, before any reference
        // is substituted; a `*` inside an inlined sub-value is opaque text.
        let rendered = match split_product(raw) {
            Some((left, right)) => {
                let left = self.render_parts(left, visited);
                let right = self.render_parts(right, visited);
                fold_product(&left, &right)
            }
            None => self.render_parts(raw, visited),
        };
        infer_unit(rendered, token_type)
    }

    fn render_parts(&mut self, raw: &str, visited: &mut FxHashSet<String>) -> String {
        let mut rendered = String::new();
        for part in scan_value(raw) {
            match part {
                Part::Literal(text) => rendered.push_str(&text),
                Part::Reference(path) => {
                    let substituted = self.substitute(&path, visited);
                    rendered.push_str(&substituted);
                }
                Part::Rgba { color, opacity } => {
                    let color = self.render_operand(&color, visited);
                    let opacity = self.render_operand(&opacity, visited);
                    rendered.push_str(&compose_rgba(&color, &opacity, self.options.profile));
                }
            }
        }
        rendered
    }

    fn render_operand(&mut self, operand: &Operand, visited: &mut FxHashSet<String>) -> String {
        match operand {
            Operand::Reference(path) => self.substitute(path, visited),
            Operand::Literal(text) => text.clone(),
        }
    }

    fn substitute(&mut self, path: &str, visited: &mut FxHashSet<String>) -> String {
        match self.options.resolution {
            ResolutionMode::Lazy => css_variable_reference(path),
            ResolutionMode::Eager => {
                if visited.contains(path) {
                    self.warnings.push(
                        ConversionWarning::new("circular reference detected")
                            .with_context(path.to_string()),
                    );
                    return format!("{{{}}}", path);
                }
                match self.store.resolve_token(path) {
                    Some(token) => {
                        visited.insert(path.to_string());
                        let value = self.evaluate_token(&token, visited);
                        visited.remove(path);
                        value
                    }
                    // unknown paths read as externally provided custom properties
                    None => css_variable_reference(path),
                }
            }
        }
    }

    fn render_shadow(&mut self, spec: &ShadowSpec, visited: &mut FxHashSet<String>) -> String {
        let mut segments = Vec::new();
        for geometry in [&spec.x, &spec.y, &spec.blur, &spec.spread] {
            if let Some(raw) = geometry {
                segments.push(self.render_text(raw, Some("sizing"), visited));
            }
        }
        if let Some(raw) = &spec.color {
            segments.push(self.render_text(raw, Some("color"), visited));
        }
        let list = segments.join(" ");
        match spec.kind {
            ShadowKind::Inner => format!("inset {}", list),
            ShadowKind::Drop => list,
        }
    }
}

/// Split a raw value carrying exactly one `*` into its two operands.
/// Values with zero or multiple `*`, or an empty side, are not products.
fn split_product(raw: &str) -> Option<(&str, &str)> {
    if raw.matches('*').count() != 1 {
        return None;
    }
    let (left, right) = raw.split_once('*')?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}

/// Fold two rendered operands into a numeric product or a `calc()` call.
fn fold_product(left: &str, right: &str) -> String {
    if let (Ok(a), Ok(b)) = (left.parse::<f64>(), right.parse::<f64>()) {
        format!("{}", a * b)
    } else {
        format!("calc({} * {})", left, right)
    }
}

/// Append `px` to bare numeric values of sizing-family tokens. Values that
/// already carry a unit or contain function syntax are left alone.
fn infer_unit(value: String, token_type: Option<&str>) -> String {
    let Some(token_type) = token_type else {
        return value;
    };
    if !SIZING_TYPES.contains(token_type) {
        return value;
    }
    if value.contains('(') || UNIT_SUFFIXES.iter().any(|unit| value.contains(*unit)) {
        return value;
    }
    let trimmed = value.trim();
    if BARE_NUMBER.is_match(trimmed) {
        format!("{}px", trimmed)
    } else {
        value
    }
}

/// Whether a rendered value is a bare number (no unit, no function syntax).
pub(crate) fn is_bare_number(value: &str) -> bool {
    BARE_NUMBER.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(tree: serde_json::Value) -> TokenStore {
        let mut store = TokenStore::new();
        store.merge_tree(&tree);
        store
    }

    fn lazy(store: &TokenStore) -> Evaluator<'_> {
        Evaluator::new(store, EngineOptions::default())
    }

    fn eager(store: &TokenStore) -> Evaluator<'_> {
        Evaluator::new(
            store,
            EngineOptions {
                resolution: ResolutionMode::Eager,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_lazy_reference_becomes_var() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token::text("{palette.gray.900}", Some("color"));
        assert_eq!(eval.evaluate(&token), "var(--palette-gray-900)");
    }

    #[test]
    fn test_eager_reference_inlines_value() {
        let store = store(json!({
            "palette": {"gray": {"900": {"value": "#1a1a1a", "type": "color"}}}
        }));
        let mut eval = eager(&store);
        let token = Token::text("{palette.gray.900}", Some("color"));
        assert_eq!(eval.evaluate(&token), "#1a1a1a");
    }

    #[test]
    fn test_eager_missing_reference_falls_back_to_var() {
        let store = store(json!({}));
        let mut eval = eager(&store);
        let token = Token::text("{palette.unknown}", Some("color"));
        assert_eq!(eval.evaluate(&token), "var(--palette-unknown)");
        assert!(eval.take_warnings().is_empty());
    }

    #[test]
    fn test_eager_chain_resolves_transitively() {
        let store = store(json!({
            "semantic": {"primary": {"value": "{palette.base}", "type": "color"}},
            "palette": {"base": {"value": "#19B394", "type": "color"}}
        }));
        let mut eval = eager(&store);
        let token = Token::text("{semantic.primary}", Some("color"));
        assert_eq!(eval.evaluate(&token), "#19B394");
    }

    #[test]
    fn test_cycle_terminates_with_warning() {
        let store = store(json!({
            "a": {"value": "{b}", "type": "color"},
            "b": {"value": "{a}", "type": "color"}
        }));
        let mut eval = eager(&store);
        let token = store.resolve_token("a").unwrap();
        let result = eval.evaluate(&token);
        assert!(result.contains('{'), "placeholder should stay literal: {}", result);
        let warnings = eval.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("circular"));
    }

    #[test]
    fn test_rgba_composition_with_deferred_references() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token::text("rgba({palette.gray.900}, {opacity.x040})", Some("color"));
        assert_eq!(
            eval.evaluate(&token),
            "rgba(from var(--palette-gray-900) r g b / var(--opacity-x040))"
        );
    }

    #[test]
    fn test_rgba_composition_legacy_profile() {
        let store = store(json!({}));
        let mut eval = Evaluator::new(
            &store,
            EngineOptions {
                profile: CssProfile::Legacy,
                ..Default::default()
            },
        );
        let token = Token::text("rgba( #19B394 , {opacity.x010} )", Some("color"));
        assert_eq!(eval.evaluate(&token), "rgba(#19B394, var(--opacity-x010))");
    }

    #[test]
    fn test_multiplication_of_two_numbers() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token::text("4 * 2", Some("spacing"));
        assert_eq!(eval.evaluate(&token), "8px");
    }

    #[test]
    fn test_multiplication_with_reference_wraps_in_calc() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token::text("4 * {base-unit}", Some("spacing"));
        assert_eq!(eval.evaluate(&token), "calc(4 * var(--base-unit))");
    }

    #[test]
    fn test_double_star_left_unevaluated() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token::text("2 * 3 * 4", Some("spacing"));
        assert_eq!(eval.evaluate(&token), "2 * 3 * 4");
    }

    #[test]
    fn test_unit_inference_on_bare_number() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        assert_eq!(eval.evaluate(&Token::text("2", Some("sizing"))), "2px");
        assert_eq!(eval.evaluate(&Token::text("0.5", Some("borderWidth"))), "0.5px");
    }

    #[test]
    fn test_unit_inference_skips_existing_units_and_functions() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        assert_eq!(eval.evaluate(&Token::text("2rem", Some("sizing"))), "2rem");
        assert_eq!(eval.evaluate(&Token::text("50%", Some("sizing"))), "50%");
        assert_eq!(
            eval.evaluate(&Token::text("{base.unit}", Some("sizing"))),
            "var(--base-unit)"
        );
    }

    #[test]
    fn test_unit_inference_ignores_non_sizing_types() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        assert_eq!(eval.evaluate(&Token::text("0.4", Some("opacity"))), "0.4");
        assert_eq!(eval.evaluate(&Token::text("700", None)), "700");
    }

    #[test]
    fn test_idempotent_on_resolved_values() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        assert_eq!(eval.evaluate(&Token::text("#19B394", Some("color"))), "#19B394");
        assert_eq!(eval.evaluate(&Token::text("4px", Some("sizing"))), "4px");
    }

    #[test]
    fn test_shadow_rendering_without_type() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token {
            value: TokenValue::Shadow(ShadowSpec {
                x: Some("0px".to_string()),
                y: Some("2px".to_string()),
                blur: Some("4px".to_string()),
                spread: None,
                color: Some("{palette.gray.900}".to_string()),
                kind: ShadowKind::Drop,
            }),
            token_type: None,
            modify: None,
        };
        assert_eq!(
            eval.evaluate(&token),
            "0px 2px 4px var(--palette-gray-900)"
        );
    }

    #[test]
    fn test_inner_shadow_gets_inset_prefix() {
        let store = store(json!({}));
        let mut eval = lazy(&store);
        let token = Token {
            value: TokenValue::Shadow(ShadowSpec {
                x: Some("0".to_string()),
                y: Some("1".to_string()),
                blur: Some("2".to_string()),
                spread: Some("0".to_string()),
                color: Some("#000".to_string()),
                kind: ShadowKind::Inner,
            }),
            token_type: None,
            modify: None,
        };
        // bare numeric geometry picks up px via sizing-typed evaluation
        assert_eq!(eval.evaluate(&token), "inset 0px 1px 2px 0px #000");
    }

    #[test]
    fn test_eager_inline_of_modified_color_is_not_refolded() {
        // the `*` inside the inlined relative-color function must not be
        // mistaken for a multiplication of the outer value
        let store = store(json!({
            "palette": {"primary": {
                "value": "#336699",
                "type": "color",
                "$extensions": {
                    "studio.tokens": {
                        "modify": {"type": "darken", "value": 0.2, "space": "hsl"}
                    }
                }
            }}
        }));
        let mut eval = eager(&store);
        let token = Token::text("{palette.primary}", Some("color"));
        assert_eq!(eval.evaluate(&token), "hsl(from #336699 h s calc(l * 0.8))");
    }

    #[test]
    fn test_product_splits_on_raw_value_before_substitution() {
        let store = store(json!({
            "base": {"unit": {"value": "8", "type": "sizing"}}
        }));
        let mut eval = eager(&store);
        let token = Token::text("4 * {base.unit}", Some("spacing"));
        // the resolved operand carries a unit, so the product stays a calc()
        assert_eq!(eval.evaluate(&token), "calc(4 * 8px)");
    }

    #[test]
    fn test_modify_renders_relative_color_over_substituted_base() {
        let store = store(json!({
            "palette": {"primary": {"value": "#336699", "type": "color"}}
        }));
        let mut eval = eager(&store);
        let mut token = Token::text("{palette.primary}", Some("color"));
        token.modify = Some(crate::core::token::ColorModify {
            kind: crate::core::token::ModifyKind::Darken,
            amount: 0.2,
            space: crate::core::token::ModifySpace::Hsl,
        });
        assert_eq!(
            eval.evaluate(&token),
            "hsl(from #336699 h s calc(l * 0.8))"
        );
    }
}
