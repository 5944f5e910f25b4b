//! Tokcss - design-token to CSS custom-property transpiler
//!
//! Converts nested design-token JSON trees (Tokens Studio layout) into
//! CSS custom-property maps bundled as generated source modules, one per
//! token set or theme. The engine flattens token trees, resolves
//! `{dotted.path}` references across files (eagerly inlined or deferred
//! to `var()` lookups), evaluates rgba composition, darken/lighten
//! modification and multiplication expressions, infers units, and guards
//! against circular references.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tokcss::{convert_token_sets, EngineOptions};
//!
//! let summary = convert_token_sets(
//!     Path::new("tokens"),
//!     Path::new("prebuild"),
//!     EngineOptions::default(),
//! )?;
//! println!("wrote {} modules", summary.written.len());
//! # Ok::<(), tokcss::TokenError>(())
//! ```

pub mod convert;
pub mod core;
pub mod emit;
pub mod utils;

// Re-export the public surface
pub use crate::convert::{convert_themes, convert_token_sets, ConversionSummary};
pub use crate::core::color::CssProfile;
pub use crate::core::eval::{EngineOptions, Evaluator, ResolutionMode};
pub use crate::core::flatten::{flatten, FlattenedTokenMap};
pub use crate::core::store::{
    build_store, load_token_set, read_manifest, TokenStore, MANIFEST_FILE,
};
pub use crate::core::theme::{
    assemble_theme, read_theme_configs, CssValue, CssVariableMap, ThemeConfig, ThemeFlags,
    ThemeOutput,
};
pub use crate::core::token::{ShadowKind, ShadowSpec, Token, TokenValue};
pub use crate::emit::{
    generate_index, generate_module, write_modules, GeneratedModule, SetOutput,
};
pub use crate::utils::error::{ConversionWarning, TokenError, TokenResult};
pub use crate::utils::naming::{css_variable_name, css_variable_reference, export_identifier};
