//! Resolution of component token entries against a base document.
//!
//! A component document maps token names to *references*: a literal value, a
//! key into the active theme's namespace, a dotted path, or a `{a.b.c}`
//! expression into the base document. [`resolve_component`] turns each entry
//! into a concrete value using a first-match-wins candidate walk; entries
//! that resolve nowhere keep their original value so callers can decide how
//! to interpret a still-symbolic token.

use rustc_hash::FxHashMap;
use serde_yaml::{Mapping, Value};

/// Expand a `{a.b.c}` reference against `base`.
///
/// Non-reference values pass through unchanged. A reference whose path
/// misses, or crosses a non-mapping node, yields `None` so the caller can
/// fall back.
///
/// ```
/// use lumen_tokens::resolver::resolve_reference;
/// use lumen_tokens::Value;
///
/// let base: Value = serde_yaml::from_str("Default:\n  Accent: \"#FF0000\"\n").unwrap();
/// let reference = Value::from("{Default.Accent}");
/// assert_eq!(resolve_reference(&reference, &base), Some(Value::from("#FF0000")));
/// assert_eq!(resolve_reference(&Value::from("{Missing.Path}"), &base), None);
/// assert_eq!(resolve_reference(&Value::from("plain"), &base), Some(Value::from("plain")));
/// ```
pub fn resolve_reference(value: &Value, base: &Value) -> Option<Value> {
    let Value::String(text) = value else {
        return Some(value.clone());
    };
    let Some(path) = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Some(value.clone());
    };

    let mut current = base;
    for segment in path.split('.') {
        match current {
            Value::Mapping(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current.clone())
}

/// The sub-mapping for `theme` inside `base`: a top-level key named after
/// the theme, else an entry under the reserved `Themes` container, else an
/// empty mapping. Never fails.
pub fn theme_namespace(base: &Value, theme: &str) -> Mapping {
    let Value::Mapping(root) = base else {
        return Mapping::new();
    };
    if let Some(Value::Mapping(namespace)) = root.get(theme) {
        return namespace.clone();
    }
    if let Some(Value::Mapping(themes)) = root.get("Themes") {
        if let Some(Value::Mapping(namespace)) = themes.get(theme) {
            return namespace.clone();
        }
    }
    Mapping::new()
}

/// Resolve every entry of a component document against `base` and the
/// active theme's namespace.
///
/// Each entry's value produces an ordered candidate list (a scalar is one
/// candidate, a sequence contributes each element, a mapping each value,
/// null none), with `{a.b.c}` expressions pre-expanded against `base`. The
/// first candidate that resolves wins:
///
/// 1. a mapping or sequence candidate is accepted as-is
/// 2. a candidate matching a key in the theme namespace takes that value
/// 3. a dotted candidate is walked into the theme namespace
/// 4. any remaining non-reference candidate is accepted as a literal
///
/// Entries with no resolving candidate keep their original, unresolved
/// value, which may still be a reference expression or a mapping.
pub fn resolve_component(
    component: &Value,
    base: &Value,
    theme: &str,
) -> FxHashMap<String, Value> {
    let mut resolved = FxHashMap::default();
    let Value::Mapping(entries) = component else {
        return resolved;
    };

    let namespace = theme_namespace(base, theme);

    for (key, attrs) in entries {
        let Value::String(name) = key else {
            continue;
        };
        let candidates = candidate_keys(attrs, base);
        let found = first_match(&candidates, &namespace);
        resolved.insert(name.clone(), found.unwrap_or_else(|| attrs.clone()));
    }

    resolved
}

fn candidate_keys(attrs: &Value, base: &Value) -> Vec<Option<Value>> {
    match attrs {
        Value::String(_) => vec![resolve_reference(attrs, base)],
        Value::Sequence(items) => items
            .iter()
            .map(|item| resolve_reference(item, base))
            .collect(),
        Value::Mapping(map) => map
            .values()
            .map(|item| resolve_reference(item, base))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![Some(other.clone())],
    }
}

fn first_match(candidates: &[Option<Value>], namespace: &Mapping) -> Option<Value> {
    for candidate in candidates {
        // Not-found sentinels from reference expansion are skipped.
        let Some(key) = candidate else {
            continue;
        };

        if matches!(key, Value::Mapping(_) | Value::Sequence(_)) {
            return Some(key.clone());
        }
        if let Some(value) = namespace.get(key) {
            return Some(value.clone());
        }
        match key {
            Value::String(text) => {
                if text.contains('.') {
                    if let Some(value) = walk(namespace, text) {
                        return Some(value.clone());
                    }
                }
                // Unresolved `{...}` expressions yield to the next candidate.
                if !text.starts_with('{') {
                    return Some(key.clone());
                }
            }
            other => return Some(other.clone()),
        }
    }
    None
}

fn walk<'a>(namespace: &'a Mapping, path: &str) -> Option<&'a Value> {
    let mut found: Option<&'a Value> = None;
    let mut current = Some(namespace);
    for segment in path.split('.') {
        let map = current?;
        let next = map.get(segment)?;
        found = Some(next);
        current = match next {
            Value::Mapping(map) => Some(map),
            _ => None,
        };
    }
    found
}
