//! Generated-module emission.
//!
//! Output records are embedded into TypeScript source modules, one per
//! token set or theme, with a deterministic collision-free export
//! identifier each and an aggregating `index.ts` of re-exports.

use std::fs;
use std::path::Path;

use fxhash::FxHashSet;
use serde::Serialize;

use crate::core::theme::CssVariableMap;
use crate::utils::error::{TokenError, TokenResult};
use crate::utils::naming::export_identifier;

/// Output record for one converted token set (manifest mode).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOutput {
    pub file_name: String,
    pub css_variables: CssVariableMap,
}

/// One generated source module, ready to be written.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    /// Path relative to the output directory, without extension; also the
    /// import specifier used by the index module.
    pub import_path: String,
    pub export_name: String,
    pub source: String,
}

/// Render one output record into a module with a unique export identifier.
pub fn generate_module<T: Serialize>(
    set_name: &str,
    record: &T,
    used: &mut FxHashSet<String>,
) -> TokenResult<GeneratedModule> {
    let export_name = export_identifier(set_name, used);
    let json = serde_json::to_string_pretty(record)
        .map_err(|err| TokenError::json(set_name, err.to_string()))?;
    let source = format!(
        "// Auto-generated from {}.json\nexport const {} = {} as const;\n\nexport default {};\n",
        set_name, export_name, json, export_name
    );
    Ok(GeneratedModule {
        import_path: set_name.to_string(),
        export_name,
        source,
    })
}

/// Render the aggregating index module.
pub fn generate_index(modules: &[GeneratedModule]) -> String {
    let mut content = String::from("// Re-export all modules for convenience\n");
    for module in modules {
        content.push_str(&format!(
            "export {{ {} }} from './{}';\n",
            module.export_name, module.import_path
        ));
    }
    content
}

/// Write every module plus `index.ts` under the output directory,
/// mirroring token-set subdirectories.
pub fn write_modules(out_dir: &Path, modules: &[GeneratedModule]) -> TokenResult<()> {
    for module in modules {
        let path = out_dir.join(format!("{}.ts", module.import_path));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &module.source)?;
    }
    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join("index.ts"), generate_index(modules))?;
    Ok(())
}
