//! Process-wide theme orchestration.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use lumen_style::StyleTemplateEngine;
use lumen_tokens::{resolver, Mapping, TokenFile, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::config::{component_token_path, ThemeConfig, CONTROLS_GROUP};
use crate::registry::WidgetRegistry;
use crate::widget::Styleable;
use crate::ThemeError;

/// Global theme manager instance.
static THEME_MANAGER: OnceLock<ThemeManager> = OnceLock::new();

/// The stateful core of the theme pipeline.
///
/// Tracks the active theme name, the set of loaded components, and the
/// accumulated map of every resolved token seen so far. Components load
/// lazily on first registration or value request and stay loaded until a
/// theme switch forces a full reload.
///
/// Cache mutations happen under per-cache mutexes; file reads and
/// resolution run outside any lock, so concurrent loads may race benignly
/// (both compute the same result, the first write wins).
pub struct ThemeManager {
    config: ThemeConfig,
    theme: RwLock<String>,

    /// The shared resource document, loaded once at construction.
    common: Value,

    /// Accumulated token map across all loaded components, layered on top
    /// of the common document's top level.
    resources: Mutex<FxHashMap<String, Value>>,

    /// Per-component resolved maps plus the document path they came from.
    resolved: Mutex<FxHashMap<String, ResolvedComponent>>,

    /// Raw (unresolved) component documents, for default-value lookups.
    raw_docs: Mutex<FxHashMap<PathBuf, Mapping>>,

    /// Components currently in the `Loaded` state.
    loaded: Mutex<FxHashSet<String>>,

    engine: Arc<StyleTemplateEngine>,
    registry: WidgetRegistry,
}

#[derive(Clone)]
struct ResolvedComponent {
    data: Arc<FxHashMap<String, Value>>,
    path: PathBuf,
}

impl ThemeManager {
    /// Build a standalone manager. Most applications want [`init`] +
    /// [`get`] instead; standalone construction exists for tests and for
    /// embedding several independent resource trees.
    ///
    /// [`init`]: Self::init
    /// [`get`]: Self::get
    pub fn new(config: ThemeConfig) -> Result<Self, ThemeError> {
        let common = TokenFile::load(&config.common_resources)?;

        let mut resources = FxHashMap::default();
        if let Value::Mapping(map) = &common {
            for (key, value) in map {
                if let Value::String(name) = key {
                    resources.insert(name.clone(), value.clone());
                }
            }
        }

        let engine = Arc::new(StyleTemplateEngine::new());
        engine.set_variables(display_map(&resources));
        let registry = WidgetRegistry::new(Arc::clone(&engine), config.components_root.clone());

        Ok(Self {
            theme: RwLock::new(config.initial_theme.clone()),
            common,
            resources: Mutex::new(resources),
            resolved: Mutex::new(FxHashMap::default()),
            raw_docs: Mutex::new(FxHashMap::default()),
            loaded: Mutex::new(FxHashSet::default()),
            engine,
            registry,
            config,
        })
    }

    /// Initialize the global manager. Safe to call multiple times; the
    /// first successful call wins.
    pub fn init(config: ThemeConfig) -> Result<(), ThemeError> {
        let manager = Self::new(config)?;
        let _ = THEME_MANAGER.set(manager);
        Ok(())
    }

    /// Get the global manager instance.
    pub fn get() -> &'static ThemeManager {
        THEME_MANAGER
            .get()
            .expect("ThemeManager not initialized. Call ThemeManager::init() at app startup.")
    }

    /// Try to get the global manager (returns `None` if not initialized).
    pub fn try_get() -> Option<&'static ThemeManager> {
        THEME_MANAGER.get()
    }

    /// The active theme name.
    pub fn theme(&self) -> String {
        self.theme.read().unwrap().clone()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &StyleTemplateEngine {
        &self.engine
    }

    /// Ensure `component` is loaded, then bind `widget` to it and apply its
    /// stylesheet.
    pub fn register(
        &self,
        widget: &Arc<dyn Styleable>,
        group: &str,
        component: &str,
    ) -> Result<(), ThemeError> {
        self.load_component(group, component)?;
        self.registry.register(widget, Some(component));
        Ok(())
    }

    /// Resolve `component`'s tokens against the active theme and merge them
    /// into the accumulated map. Loading an already-loaded component is a
    /// cheap set lookup.
    pub fn load_component(&self, group: &str, component: &str) -> Result<(), ThemeError> {
        if self.loaded.lock().unwrap().contains(component) {
            return Ok(());
        }

        let (data, path) = self.resolved_component(group, component)?;

        // Null entries fall back to the raw document's defaults before the
        // merge, so the accumulated map never shadows a usable default with
        // nothing.
        let mut merged = Vec::with_capacity(data.len());
        for (name, value) in data.iter() {
            let value = if value.is_null() {
                self.default_value(&path, name)?
            } else {
                value.clone()
            };
            merged.push((name.clone(), value));
        }

        let variables = {
            let mut resources = self.resources.lock().unwrap();
            for (name, value) in merged {
                resources.insert(name, value);
            }
            display_map(&resources)
        };
        self.engine.set_variables(variables);

        self.loaded.lock().unwrap().insert(component.to_string());
        Ok(())
    }

    /// The resolved value of `name` within `component`, falling back to the
    /// raw document's default when the entry resolved to null or is absent.
    pub fn resolved_value(
        &self,
        name: &str,
        group: &str,
        component: &str,
    ) -> Result<Value, ThemeError> {
        let (data, path) = self.resolved_component(group, component)?;
        match data.get(name) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => self.default_value(&path, name),
        }
    }

    /// The raw, unresolved default for `name` from the component document
    /// at `token_path`.
    ///
    /// A raw string value naming a top-level entry of the common document
    /// is substituted once: a single level of indirection, never a dotted
    /// walk. Defaults are a last-resort lookup, not a second resolver.
    pub fn default_value(&self, token_path: &Path, name: &str) -> Result<Value, ThemeError> {
        let raw = {
            let cached = self.raw_docs.lock().unwrap().get(token_path).cloned();
            match cached {
                Some(raw) => raw,
                None => {
                    let raw = TokenFile::as_mapping(token_path)?;
                    self.raw_docs
                        .lock()
                        .unwrap()
                        .entry(token_path.to_path_buf())
                        .or_insert_with(|| raw.clone());
                    raw
                }
            }
        };

        let mut value = raw.get(name).cloned().unwrap_or(Value::Null);
        if let Value::String(text) = &value {
            if let Some(common_value) = self.common.get(text.as_str()) {
                value = common_value.clone();
            }
        }
        Ok(value)
    }

    /// Switch the active theme.
    ///
    /// No-op when unchanged. Otherwise the resolved cache and loaded set
    /// are cleared under their locks, every previously-loaded component is
    /// reloaded against the new theme, and the registry restyles every
    /// still-alive widget. The reload loop runs outside the cache locks, so
    /// a concurrent registration may load against the new theme before the
    /// batch restyle lands; it observes the same final state.
    ///
    /// Per-component reload failures are logged and skipped; re-theming is
    /// best-effort across the set, like every other batch operation here.
    pub fn set_theme(&self, theme: &str) {
        {
            let mut current = self.theme.write().unwrap();
            if *current == theme {
                return;
            }
            debug!("ThemeManager::set_theme: {} -> {}", *current, theme);
            *current = theme.to_string();
        }

        self.resolved.lock().unwrap().clear();
        let components_to_reload: Vec<String> = {
            let mut loaded = self.loaded.lock().unwrap();
            let snapshot = loaded.iter().cloned().collect();
            loaded.clear();
            snapshot
        };

        for component in &components_to_reload {
            if let Err(error) = self.load_component(CONTROLS_GROUP, component) {
                warn!("failed to reload component '{component}' after theme switch: {error}");
            }
        }

        self.registry.update_all();
    }

    /// Drop every cache this manager owns (resolved maps, raw documents,
    /// loaded set, template path caches, template text). The common
    /// document and accumulated resources stay; use a fresh manager for a
    /// clean slate.
    pub fn clear_caches(&self) {
        self.resolved.lock().unwrap().clear();
        self.raw_docs.lock().unwrap().clear();
        self.loaded.lock().unwrap().clear();
        self.registry.clear_path_cache();
        self.engine.clear_cache();
    }

    fn resolved_component(
        &self,
        group: &str,
        component: &str,
    ) -> Result<(Arc<FxHashMap<String, Value>>, PathBuf), ThemeError> {
        if let Some(hit) = self.resolved.lock().unwrap().get(component) {
            return Ok((Arc::clone(&hit.data), hit.path.clone()));
        }

        let path = component_token_path(&self.config.components_root, group, component);
        let document = TokenFile::load(&path)?;
        let theme = self.theme();
        let data = Arc::new(resolver::resolve_component(&document, &self.common, &theme));

        let mut resolved = self.resolved.lock().unwrap();
        let entry = resolved
            .entry(component.to_string())
            .or_insert_with(|| ResolvedComponent {
                data,
                path: path.clone(),
            });
        Ok((Arc::clone(&entry.data), entry.path.clone()))
    }
}

/// Stringify the accumulated resources for template substitution. Strings
/// keep their text, scalars their display form; the rare non-scalar
/// fallback value serializes to compact YAML.
fn display_map(resources: &FxHashMap<String, Value>) -> FxHashMap<String, String> {
    resources
        .iter()
        .map(|(name, value)| (name.clone(), display_value(value)))
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_value_keeps_scalar_text() {
        assert_eq!(display_value(&Value::from("#FF0000")), "#FF0000");
        assert_eq!(display_value(&Value::from(4)), "4");
        assert_eq!(display_value(&Value::from(true)), "true");
        assert_eq!(display_value(&Value::Null), "null");
    }

    #[test]
    fn display_value_serializes_nested_values() {
        let value: Value = serde_yaml::from_str("Fill: \"#F3F3F3\"").unwrap();
        assert_eq!(display_value(&value), "Fill: '#F3F3F3'");
    }
}
