//! Variable substitution over stylesheet template text.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::StyleError;

/// Substitutes symbolic variable names in template text with their resolved
/// values.
///
/// Variables are matched as whole tokens: an occurrence immediately preceded
/// or followed by a letter, digit, or underscore does not count, and longer
/// names are tried before shorter ones that prefix them. Template sources
/// and expanded outputs are cached; the expanded cache is dropped whenever
/// the variable set changes, while template text lives until
/// [`clear_cache`](Self::clear_cache); there is no modification-time check
/// on template files.
pub struct StyleTemplateEngine {
    inner: RwLock<EngineState>,
}

#[derive(Default)]
struct EngineState {
    variables: FxHashMap<String, String>,
    pattern: Option<Regex>,
    templates: FxHashMap<PathBuf, String>,
    expanded: FxHashMap<PathBuf, String>,
}

impl Default for StyleTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTemplateEngine {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(EngineState::default()),
        }
    }

    pub fn with_variables(variables: FxHashMap<String, String>) -> Self {
        let engine = Self::new();
        engine.set_variables(variables);
        engine
    }

    /// Replace the active variable mapping.
    ///
    /// Rebuilds the matching pattern and drops every cached expansion;
    /// template sources stay cached.
    pub fn set_variables(&self, variables: FxHashMap<String, String>) {
        let pattern = build_pattern(&variables);
        let mut state = self.inner.write().unwrap();
        state.variables = variables;
        state.pattern = pattern;
        state.expanded.clear();
    }

    /// Substitute every known variable occurrence in `text`.
    ///
    /// With no variables set the text passes through unchanged; unmatched
    /// text is never touched.
    pub fn expand(&self, text: &str) -> String {
        let state = self.inner.read().unwrap();
        let Some(pattern) = &state.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let token = &caps[0];
                state
                    .variables
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| token.to_string())
            })
            .into_owned()
    }

    /// Expand the template at `path`, caching both the source text and the
    /// expanded output. The cached output is returned until the variable
    /// set changes.
    pub fn expand_file(&self, path: &Path) -> Result<String, StyleError> {
        if let Some(hit) = self.inner.read().unwrap().expanded.get(path) {
            return Ok(hit.clone());
        }

        let template = self.template(path)?;
        let output = self.expand(&template);
        self.inner
            .write()
            .unwrap()
            .expanded
            .insert(path.to_path_buf(), output.clone());
        Ok(output)
    }

    /// Expand several templates and join them with newlines, in order.
    pub fn expand_files<I, P>(&self, paths: I) -> Result<String, StyleError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut parts = Vec::new();
        for path in paths {
            parts.push(self.expand_file(path.as_ref())?);
        }
        Ok(parts.join("\n"))
    }

    /// Drop cached template sources and expansions.
    pub fn clear_cache(&self) {
        let mut state = self.inner.write().unwrap();
        state.templates.clear();
        state.expanded.clear();
    }

    fn template(&self, path: &Path) -> Result<String, StyleError> {
        if let Some(hit) = self.inner.read().unwrap().templates.get(path) {
            return Ok(hit.clone());
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(StyleError::TemplateNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(StyleError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        self.inner
            .write()
            .unwrap()
            .templates
            .insert(path.to_path_buf(), text.clone());
        Ok(text)
    }
}

/// Compile the variable names into one alternation, longest name first so a
/// name that is a prefix of a longer one never matches inside it. `\b`
/// bounds each occurrence on the identifier class `[A-Za-z0-9_]`.
fn build_pattern(variables: &FxHashMap<String, String>) -> Option<Regex> {
    if variables.is_empty() {
        return None;
    }

    let mut names: Vec<&str> = variables.keys().map(String::as_str).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\b(?:{alternation})\b");

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            warn!("failed to compile variable pattern: {error}");
            None
        }
    }
}
