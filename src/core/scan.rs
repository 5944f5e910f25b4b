//! Scanner for the token-value mini-language.
//!
//! Raw token values mix literal CSS text, `{dotted.path}` references and
//! `rgba(<color>, <opacity>)` composition calls. Decomposing a value into
//! parts up front keeps composition and reference substitution independent
//! of each other instead of relying on the order of rewrite passes.

/// One argument of an `rgba()` composition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A `{dotted.path}` reference.
    Reference(String),
    /// Literal text, e.g. `#19B394`.
    Literal(String),
}

/// One segment of a scanned token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text copied through untouched.
    Literal(String),
    /// A `{dotted.path}` reference.
    Reference(String),
    /// A two-argument `rgba()` call where at least one argument is a
    /// reference; composed into a single CSS color function.
    Rgba { color: Operand, opacity: Operand },
}

/// Decompose a raw token value into literal, reference and rgba parts.
///
/// Anything that does not scan as a reference or a well-formed two-argument
/// rgba composition stays literal text; malformed syntax is never an error.
pub fn scan_value(input: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after_brace) = rest.strip_prefix('{') {
            if let Some(end) = after_brace.find('}') {
                flush_literal(&mut parts, &mut literal);
                parts.push(Part::Reference(after_brace[..end].trim().to_string()));
                rest = &after_brace[end + 1..];
                continue;
            }
        }
        if rest.starts_with("rgba") {
            if let Some((color, opacity, consumed)) = scan_rgba(rest) {
                flush_literal(&mut parts, &mut literal);
                parts.push(Part::Rgba { color, opacity });
                rest = &rest[consumed..];
                continue;
            }
        }
        let Some(ch) = rest.chars().next() else { break };
        literal.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush_literal(&mut parts, &mut literal);
    parts
}

fn flush_literal(parts: &mut Vec<Part>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(Part::Literal(std::mem::take(literal)));
    }
}

/// Try to scan an rgba composition at the start of `input` (which begins
/// with `rgba`). Returns the two operands and the number of bytes consumed.
///
/// Only the exact composition shape qualifies: two top-level arguments with
/// at least one reference among them. Plain CSS colors like
/// `rgba(0, 0, 0, 0.5)` are left for the literal path.
fn scan_rgba(input: &str) -> Option<(Operand, Operand, usize)> {
    let after_name = &input[4..];
    let open = after_name.find(|c: char| !c.is_whitespace())?;
    if !after_name[open..].starts_with('(') {
        return None;
    }

    let body_start = 4 + open + 1;
    let mut depth = 0usize;
    let mut arg_start = body_start;
    let mut args: Vec<&str> = Vec::new();

    for (offset, ch) in input[body_start..].char_indices() {
        let pos = body_start + offset;
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            ')' => {
                args.push(&input[arg_start..pos]);
                if args.len() != 2 {
                    return None;
                }
                let color = parse_operand(args[0])?;
                let opacity = parse_operand(args[1])?;
                if !matches!(color, Operand::Reference(_))
                    && !matches!(opacity, Operand::Reference(_))
                {
                    return None;
                }
                return Some((color, opacity, pos + 1));
            }
            ',' if depth == 0 => {
                args.push(&input[arg_start..pos]);
                arg_start = pos + 1;
            }
            _ => {}
        }
    }
    None
}

fn parse_operand(raw: &str) -> Option<Operand> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(inner) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if !inner.contains('{') && !inner.contains('}') {
            return Some(Operand::Reference(inner.trim().to_string()));
        }
    }
    Some(Operand::Literal(trimmed.to_string()))
}
