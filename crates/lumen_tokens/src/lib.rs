//! Lumen design-token documents
//!
//! Token documents are YAML mappings from token names to values: color
//! palette primitives, per-theme namespaces, and per-component entries whose
//! values reference the shared document. This crate covers the storage side
//! of the theme pipeline:
//!
//! - [`TokenFile`]: loads a document from disk through a process-wide cache
//!   keyed by path and file modification time
//! - [`resolver`]: turns component entries into concrete values against a
//!   base document and an active theme name
//!
//! Missing token files are not an error: they load as empty documents so a
//! component without local overrides simply inherits everything. Malformed
//! YAML, by contrast, surfaces as [`TokenError::Parse`].

mod error;
mod file;
pub mod resolver;

pub use error::TokenError;
pub use file::TokenFile;

// The document tree type used throughout the theme pipeline.
pub use serde_yaml::{Mapping, Value};
