//! Theme engine configuration and resource path conventions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Theme selected when none is configured.
pub const DEFAULT_THEME: &str = "Default";

/// The component group the stock widget kinds live under.
pub const CONTROLS_GROUP: &str = "controls";

/// Where the theme engine finds its resources.
///
/// Component documents follow a fixed convention below `components_root`:
/// `<group>/<name>/<name>.yaml` for tokens and `<group>/<name>/<name>.qss`
/// for the stylesheet template. The common resource document is a single
/// file holding the shared palette and the per-theme namespaces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Root directory of the component resource tree.
    pub components_root: PathBuf,
    /// The shared token document, including theme namespaces.
    pub common_resources: PathBuf,
    /// Theme active at startup.
    pub initial_theme: String,
}

impl ThemeConfig {
    pub fn new(components_root: impl Into<PathBuf>, common_resources: impl Into<PathBuf>) -> Self {
        Self {
            components_root: components_root.into(),
            common_resources: common_resources.into(),
            initial_theme: DEFAULT_THEME.to_string(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.initial_theme = theme.into();
        self
    }
}

/// `<root>/<group>/<name>/<name>.yaml`
pub fn component_token_path(root: &Path, group: &str, name: &str) -> PathBuf {
    root.join(group).join(name).join(format!("{name}.yaml"))
}

/// `<root>/<group>/<name>/<name>.qss`
pub fn component_style_path(root: &Path, group: &str, name: &str) -> PathBuf {
    root.join(group).join(name).join(format!("{name}.qss"))
}
