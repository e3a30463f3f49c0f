//! Lumen stylesheet templates
//!
//! Style templates are plain text (`.qss` files) in which bare identifiers
//! stand in for resolved design-token values. [`StyleTemplateEngine`]
//! substitutes every whole-word occurrence of a known variable with its
//! current value and caches both template sources and expanded output.
//!
//! Unlike token documents, a missing template file is a hard error: a
//! component that claims a template must actually ship one, while token
//! lookups are allowed to fall through to defaults.

mod engine;
mod error;
pub mod parse;

pub use engine::StyleTemplateEngine;
pub use error::StyleError;
