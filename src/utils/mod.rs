//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Naming rules for CSS variables and generated exports

pub mod error;
pub mod naming;

// Re-export commonly used items
pub use error::{ConversionWarning, TokenError, TokenResult};
pub use naming::{css_variable_name, css_variable_reference, export_identifier};
