//! The contract between the theme engine and live widgets.
//!
//! The engine never touches toolkit types directly. A widget takes part in
//! theming by implementing [`Styleable`]; the optional hooks cover the two
//! side channels some widgets carry (an instance-specific template file and
//! icons that must be re-tinted after a restyle).

use std::path::PathBuf;

/// A stylesheet sink.
///
/// Implementations are registered with a [`crate::WidgetRegistry`] through
/// a `Weak` handle, so implementing this trait never extends a widget's
/// lifetime.
pub trait Styleable: Send + Sync {
    /// Apply expanded stylesheet text.
    ///
    /// Errors are logged by the registry and the widget keeps its previous
    /// appearance; one widget's failure never aborts a batch restyle.
    fn set_style_sheet(&self, text: &str) -> anyhow::Result<()>;

    /// Instance-specific template path, tried when the component's
    /// conventional template is missing or fails to apply.
    fn style_template_path(&self) -> Option<PathBuf> {
        None
    }

    /// Icon-refresh capability, if this widget carries themable icons.
    fn icon_refresh(&self) -> Option<&dyn IconRefresh> {
        None
    }
}

/// Optional capability: re-derive icon pixmaps after a theme change.
pub trait IconRefresh {
    fn refresh_icon(&self);
}
