use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    /// Template files must exist; there is no empty-document fallback the
    /// way token loads have.
    #[error("style template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("failed to read style template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
