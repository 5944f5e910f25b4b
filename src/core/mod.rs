//! The token resolution engine.
//!
//! Leaf-first: raw JSON trees are classified ([`token`]), flattened to
//! dash-joined paths ([`flatten`]), merged into a cross-file store
//! ([`store`]), evaluated to final CSS values ([`eval`] over the scanned
//! mini-language of [`scan`] and the color rendering of [`color`]) and
//! composed into themes ([`theme`]).

pub mod color;
pub mod eval;
pub mod flatten;
pub mod scan;
pub mod store;
pub mod theme;
pub mod token;
