//! Naming contract between token paths, CSS custom properties and
//! generated-module export identifiers.
//!
//! CSS variable names are derived mechanically from dotted token paths;
//! export identifiers additionally have to stay unique across every
//! generated module and must never collide with the reserved `default`.

use fxhash::FxHashSet;

/// Convert a dotted token path to its CSS custom-property name.
///
/// `palette.gray.900` becomes `--palette-gray-900`. The mapping is
/// last-write-wins on collisions (mixed-case paths can fold together
/// after lowercasing); callers relying on uniqueness must keep their
/// source paths case-distinct.
pub fn css_variable_name(path: &str) -> String {
    format!("--{}", path.replace('.', "-").to_lowercase())
}

/// Convert a dotted token path to a deferred `var()` reference.
pub fn css_variable_reference(path: &str) -> String {
    format!("var({})", css_variable_name(path))
}

/// Convert a flattened dashed token name to its CSS custom-property name.
pub fn dashed_to_css_variable(name: &str) -> String {
    format!("--{}", name.to_lowercase())
}

/// Split a token-set identifier into its subdirectory part and basename.
///
/// `creator/themes/default` splits into (`creator/themes`, `default`);
/// a bare `palette` has an empty subdirectory.
pub fn split_set_name(set_name: &str) -> (&str, &str) {
    match set_name.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", set_name),
    }
}

fn sanitize_identifier(part: &str) -> String {
    part.replace('-', "_").replace('/', "_")
}

/// Derive a collision-free export identifier for a generated module.
///
/// The basename with dashes mapped to underscores is used directly when
/// free; the literal `default` is reserved and always gets the sanitized
/// subdirectory prefix, as does any identifier already claimed by an
/// earlier token set. The chosen name is recorded in `used`.
pub fn export_identifier(set_name: &str, used: &mut FxHashSet<String>) -> String {
    let (sub_dir, base) = split_set_name(set_name);
    let mut export_name = sanitize_identifier(base);

    if export_name == "default" || used.contains(&export_name) {
        export_name = format!("{}_{}", sanitize_identifier(sub_dir), export_name);
    }
    used.insert(export_name.clone());
    export_name
}
