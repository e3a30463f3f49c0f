//! Non-owning bindings between live widgets and their component identity.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use lumen_style::StyleTemplateEngine;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::config::{component_style_path, CONTROLS_GROUP};
use crate::widget::Styleable;

/// Tracks registered widgets and replays style application across them.
///
/// Widgets are held through [`Weak`] handles: the registry is never the
/// owner, and entries for destroyed widgets are pruned before every batch
/// operation. Template paths are cached per component name, with a negative
/// cache for components known to ship no template, so repeated
/// registrations don't probe the filesystem again.
pub struct WidgetRegistry {
    engine: Arc<StyleTemplateEngine>,
    components_root: PathBuf,

    widgets: Mutex<Vec<Binding>>,
    style_paths: Mutex<FxHashMap<String, PathBuf>>,
    missing_styles: Mutex<FxHashSet<String>>,
}

struct Binding {
    widget: Weak<dyn Styleable>,
    component: Option<String>,
}

impl WidgetRegistry {
    pub fn new(engine: Arc<StyleTemplateEngine>, components_root: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            components_root: components_root.into(),
            widgets: Mutex::new(Vec::new()),
            style_paths: Mutex::new(FxHashMap::default()),
            missing_styles: Mutex::new(FxHashSet::default()),
        }
    }

    /// Record a non-owning association and apply the component's style.
    ///
    /// Registering the same widget again replaces its component identity.
    /// A widget whose component has no template (and which provides no
    /// fallback of its own) is still registered; it just stays unstyled.
    pub fn register(&self, widget: &Arc<dyn Styleable>, component: Option<&str>) {
        let handle = Arc::downgrade(widget);
        {
            let mut widgets = self.widgets.lock().unwrap();
            widgets.retain(|binding| binding.widget.strong_count() > 0);
            if let Some(existing) = widgets
                .iter_mut()
                .find(|binding| binding.widget.ptr_eq(&handle))
            {
                existing.component = component.map(str::to_string);
            } else {
                widgets.push(Binding {
                    widget: handle,
                    component: component.map(str::to_string),
                });
            }
        }

        if !self.apply_style(widget.as_ref(), component) {
            debug!("no style applied for component {component:?}");
        }
    }

    /// Re-resolve and reapply style text to every still-alive widget, then
    /// run the icon-refresh hook on widgets that expose one.
    pub fn update_all(&self) {
        for (widget, component) in self.alive() {
            if !self.apply_style(widget.as_ref(), component.as_deref()) {
                debug!("skipped restyling component {component:?}");
            }
            if let Some(icons) = widget.icon_refresh() {
                icons.refresh_icon();
            }
        }
    }

    /// Currently-alive registration count.
    pub fn len(&self) -> usize {
        self.alive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the template path caches (positive and negative).
    pub fn clear_path_cache(&self) {
        self.style_paths.lock().unwrap().clear();
        self.missing_styles.lock().unwrap().clear();
    }

    fn alive(&self) -> Vec<(Arc<dyn Styleable>, Option<String>)> {
        let mut widgets = self.widgets.lock().unwrap();
        widgets.retain(|binding| binding.widget.strong_count() > 0);
        widgets
            .iter()
            .filter_map(|binding| {
                binding
                    .widget
                    .upgrade()
                    .map(|widget| (widget, binding.component.clone()))
            })
            .collect()
    }

    fn apply_style(&self, widget: &dyn Styleable, component: Option<&str>) -> bool {
        if let Some(path) = self.style_path(component) {
            if self.apply_from_path(widget, &path) {
                return true;
            }
        }

        // Second chance: an instance-specific template on the widget itself.
        if let Some(path) = widget.style_template_path() {
            if path.exists() {
                return self.apply_from_path(widget, &path);
            }
        }
        false
    }

    fn apply_from_path(&self, widget: &dyn Styleable, path: &Path) -> bool {
        let text = match self.engine.expand_file(path) {
            Ok(text) => text,
            Err(error) => {
                warn!("failed to expand style template {}: {error}", path.display());
                return false;
            }
        };
        if let Err(error) = widget.set_style_sheet(&text) {
            warn!("failed to apply style from {}: {error:#}", path.display());
            return false;
        }
        true
    }

    fn style_path(&self, component: Option<&str>) -> Option<PathBuf> {
        let name = component?;
        if name.is_empty() {
            return None;
        }

        if let Some(path) = self.style_paths.lock().unwrap().get(name) {
            return Some(path.clone());
        }
        if self.missing_styles.lock().unwrap().contains(name) {
            return None;
        }

        let path = component_style_path(&self.components_root, CONTROLS_GROUP, name);
        if path.exists() {
            self.style_paths
                .lock()
                .unwrap()
                .insert(name.to_string(), path.clone());
            Some(path)
        } else {
            warn!(
                "style template not found for component '{name}': {}",
                path.display()
            );
            self.missing_styles.lock().unwrap().insert(name.to_string());
            None
        }
    }
}
