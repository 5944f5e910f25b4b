//! Leaf token model and best-effort classification of raw JSON nodes.
//!
//! Token trees arrive as untyped JSON; this module decides which nodes are
//! leaf tokens (plain values or shadow composites), which are complex
//! tokens to skip, and which are grouping nodes to descend into.

use serde_json::{Map, Value};

/// Fields whose presence marks a node as a shadow/effect composite.
const SHADOW_FIELDS: [&str; 5] = ["x", "y", "blur", "spread", "color"];

/// Fields whose presence marks a node as an animation or other complex
/// token that never reduces to a scalar CSS value.
const COMPLEX_FIELDS: [&str; 4] = ["duration", "x1", "y1", "stiffness"];

/// The raw value carried by a leaf token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A plain string value, possibly containing `{dotted.path}` references
    /// or a multiplication expression.
    Text(String),
    /// A shadow composite rendered to a CSS `box-shadow` value list.
    Shadow(ShadowSpec),
}

/// Shadow geometry and color. Each field may itself contain references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowSpec {
    pub x: Option<String>,
    pub y: Option<String>,
    pub blur: Option<String>,
    pub spread: Option<String>,
    pub color: Option<String>,
    pub kind: ShadowKind,
}

/// Shadow placement; `Inner` renders with an `inset` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowKind {
    #[default]
    Drop,
    Inner,
}

impl ShadowKind {
    fn from_type(type_name: Option<&str>) -> Self {
        match type_name {
            Some("innerShadow") => ShadowKind::Inner,
            _ => ShadowKind::Drop,
        }
    }
}

/// A color modification directive from the Tokens Studio vendor extension
/// (`$extensions` → `studio.tokens` → `modify`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColorModify {
    pub kind: ModifyKind,
    pub amount: f64,
    pub space: ModifySpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyKind {
    Darken,
    Lighten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifySpace {
    Hsl,
    Lch,
}

impl ColorModify {
    /// The lightness multiplier applied in the relative-color function.
    pub fn multiplier(&self) -> f64 {
        match self.kind {
            ModifyKind::Darken => 1.0 - self.amount,
            ModifyKind::Lighten => 1.0 + self.amount,
        }
    }
}

/// One flattened leaf token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: TokenValue,
    /// Declared token type (`color`, `sizing`, ...), used for unit inference.
    pub token_type: Option<String>,
    pub modify: Option<ColorModify>,
}

impl Token {
    pub fn text(value: impl Into<String>, token_type: Option<&str>) -> Self {
        Token {
            value: TokenValue::Text(value.into()),
            token_type: token_type.map(str::to_string),
            modify: None,
        }
    }

    /// Classify a JSON object node as a leaf token, or `None` for grouping,
    /// complex and malformed nodes.
    ///
    /// The `value` field must be a string to count as a plain token; numeric
    /// or otherwise non-string `value` fields are not leaves (the strict
    /// rule). A `value` holding an object with shadow geometry, or shadow
    /// geometry directly on the node, yields a shadow leaf.
    pub fn classify(node: &Map<String, Value>) -> Option<Token> {
        let declared_type = node.get("type").and_then(Value::as_str);

        if let Some(Value::String(text)) = node.get("value") {
            return Some(Token {
                value: TokenValue::Text(text.clone()),
                token_type: declared_type.map(str::to_string),
                modify: parse_modify(node),
            });
        }

        if let Some(Value::Object(inner)) = node.get("value") {
            if has_shadow_signature(inner) {
                // the shadow object's own `type` decides placement; the
                // node-level type (`boxShadow`) is only a fallback
                let kind_hint = inner
                    .get("type")
                    .and_then(Value::as_str)
                    .or(declared_type);
                return Some(Token {
                    value: TokenValue::Shadow(ShadowSpec::from_node(inner, kind_hint)),
                    token_type: declared_type.map(str::to_string),
                    modify: None,
                });
            }
            return None;
        }

        if node.get("value").is_none() && has_shadow_signature(node) {
            return Some(Token {
                value: TokenValue::Shadow(ShadowSpec::from_node(node, declared_type)),
                token_type: declared_type.map(str::to_string),
                modify: None,
            });
        }

        None
    }
}

impl ShadowSpec {
    fn from_node(node: &Map<String, Value>, type_hint: Option<&str>) -> Self {
        ShadowSpec {
            x: node.get("x").and_then(scalar_text),
            y: node.get("y").and_then(scalar_text),
            blur: node.get("blur").and_then(scalar_text),
            spread: node.get("spread").and_then(scalar_text),
            color: node.get("color").and_then(scalar_text),
            kind: ShadowKind::from_type(type_hint),
        }
    }
}

/// Whether any shadow geometry/color field is present on the node.
pub fn has_shadow_signature(node: &Map<String, Value>) -> bool {
    SHADOW_FIELDS.iter().any(|field| node.contains_key(*field))
}

/// Whether any animation/complex field is present on the node.
pub fn has_complex_signature(node: &Map<String, Value>) -> bool {
    COMPLEX_FIELDS.iter().any(|field| node.contains_key(*field))
}

/// Render a JSON scalar as token text; strings pass through, numbers are
/// formatted, everything else is dropped.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn parse_modify(node: &Map<String, Value>) -> Option<ColorModify> {
    let modify = node
        .get("$extensions")?
        .get("studio.tokens")?
        .get("modify")?
        .as_object()?;

    let kind = match modify.get("type")?.as_str()? {
        "darken" => ModifyKind::Darken,
        "lighten" => ModifyKind::Lighten,
        _ => return None,
    };
    let amount = match modify.get("value")? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse().ok()?,
        _ => return None,
    };
    let space = match modify.get("space")?.as_str()? {
        "hsl" => ModifySpace::Hsl,
        "lch" => ModifySpace::Lch,
        _ => return None,
    };

    Some(ColorModify {
        kind,
        amount,
        space,
    })
}
