//! High-level conversion entry points.
//!
//! Two output modes exist, matching the two bundling layouts downstream:
//! manifest-driven per-set modules and theme-driven bundles. Both share
//! the same engine; only composition and patching differ.

use std::path::Path;

use fxhash::FxHashSet;

use crate::core::eval::{EngineOptions, Evaluator};
use crate::core::store::{build_store, load_token_set, read_manifest, token_set_path, TokenStore};
use crate::core::theme::{
    assemble_theme, evaluate_set_into, read_theme_configs, CssVariableMap,
};
use crate::emit::{generate_module, write_modules, GeneratedModule, SetOutput};
use crate::utils::error::{ConversionWarning, TokenResult};

/// What one conversion run produced.
#[derive(Debug, Default)]
pub struct ConversionSummary {
    /// Import paths of the modules written (index excluded).
    pub written: Vec<String>,
    /// Token sets or themes skipped because of per-item failures.
    pub skipped: Vec<String>,
    pub warnings: Vec<ConversionWarning>,
}

/// Manifest-driven mode: convert every token set listed in
/// `$metadata.json` into one generated module each.
///
/// A missing manifest is fatal. Missing or broken set files only cost
/// their own module; every other set still converts.
pub fn convert_token_sets(
    tokens_dir: &Path,
    out_dir: &Path,
    options: EngineOptions,
) -> TokenResult<ConversionSummary> {
    let set_names = read_manifest(tokens_dir)?;
    let (store, mut warnings) = build_store(tokens_dir, &set_names);

    let mut used = FxHashSet::default();
    let mut modules = Vec::new();
    let mut skipped = Vec::new();

    for set_name in &set_names {
        if !token_set_path(tokens_dir, set_name).exists() {
            // already warned while building the store
            skipped.push(set_name.clone());
            continue;
        }
        match convert_one_set(tokens_dir, set_name, &store, options, &mut used, &mut warnings) {
            Ok(module) => modules.push(module),
            Err(err) => {
                warnings.push(
                    ConversionWarning::new(err.to_string()).with_context(set_name.clone()),
                );
                skipped.push(set_name.clone());
            }
        }
    }

    write_modules(out_dir, &modules)?;
    Ok(ConversionSummary {
        written: modules.into_iter().map(|m| m.import_path).collect(),
        skipped,
        warnings,
    })
}

fn convert_one_set(
    tokens_dir: &Path,
    set_name: &str,
    store: &TokenStore,
    options: EngineOptions,
    used: &mut FxHashSet<String>,
    warnings: &mut Vec<ConversionWarning>,
) -> TokenResult<GeneratedModule> {
    let tree = load_token_set(tokens_dir, set_name)?;
    let mut evaluator = Evaluator::new(store, options);
    let mut css_variables = CssVariableMap::new();
    evaluate_set_into(&tree, &mut evaluator, &mut css_variables);
    warnings.extend(evaluator.take_warnings());

    let record = SetOutput {
        file_name: set_name.to_string(),
        css_variables,
    };
    generate_module(set_name, &record, used)
}

/// Theme-driven mode: assemble every theme from the config file and emit
/// one module per theme.
///
/// Failure inside one theme skips that theme only; siblings still emit.
pub fn convert_themes(
    tokens_dir: &Path,
    themes_config: &Path,
    out_dir: &Path,
    options: EngineOptions,
) -> TokenResult<ConversionSummary> {
    let configs = read_theme_configs(themes_config)?;

    let mut used = FxHashSet::default();
    let mut modules = Vec::new();
    let mut skipped = Vec::new();
    let mut warnings = Vec::new();

    for config in &configs {
        let outcome = assemble_theme(tokens_dir, config, options).and_then(|(output, mut theme_warnings)| {
            warnings.append(&mut theme_warnings);
            generate_module(&config.name, &output, &mut used)
        });
        match outcome {
            Ok(module) => modules.push(module),
            Err(err) => {
                warnings.push(
                    ConversionWarning::new(format!("theme skipped: {}", err))
                        .with_context(config.name.clone()),
                );
                skipped.push(config.name.clone());
            }
        }
    }

    write_modules(out_dir, &modules)?;
    Ok(ConversionSummary {
        written: modules.into_iter().map(|m| m.import_path).collect(),
        skipped,
        warnings,
    })
}
