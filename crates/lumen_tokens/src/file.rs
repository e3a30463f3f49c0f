//! Freshness-aware token document loading.
//!
//! All loads go through a process-wide cache keyed by the path as given.
//! A cached parse is reused as long as the file's modification time matches
//! the one recorded at parse time, so repeated loads of an unchanged file
//! cost a `stat` and a clone.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::TokenError;

static FILE_CACHE: OnceLock<Mutex<FxHashMap<PathBuf, CacheEntry>>> = OnceLock::new();

#[cfg(test)]
static PARSE_COUNTS: OnceLock<Mutex<FxHashMap<PathBuf, usize>>> = OnceLock::new();

fn cache() -> &'static Mutex<FxHashMap<PathBuf, CacheEntry>> {
    FILE_CACHE.get_or_init(|| Mutex::new(FxHashMap::default()))
}

#[derive(Clone)]
struct CacheEntry {
    mtime: Option<SystemTime>,
    data: Value,
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

fn read_document(path: &Path) -> Result<Value, TokenError> {
    #[cfg(test)]
    {
        let counts = PARSE_COUNTS.get_or_init(|| Mutex::new(FxHashMap::default()));
        *counts.lock().unwrap().entry(path.to_path_buf()).or_insert(0) += 1;
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            debug!(
                "token file {} not found, loading empty document",
                path.display()
            );
            return Ok(Value::Mapping(Mapping::new()));
        }
        Err(source) => {
            return Err(TokenError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let data: Value = serde_yaml::from_str(&text).map_err(|source| TokenError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty file parses to null; callers expect a mapping-shaped document.
    Ok(match data {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// A handle to one token document, plus the process-wide load cache.
///
/// The associated functions ([`TokenFile::load`], [`TokenFile::force_reload`],
/// [`TokenFile::as_mapping`], [`TokenFile::clear_cache`]) operate on the
/// shared cache directly; [`TokenFile::open`] additionally keeps the parsed
/// document on the handle for repeated access without a cache round trip.
pub struct TokenFile {
    path: PathBuf,
    data: Value,
}

impl TokenFile {
    /// Open a document handle, loading through the cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenError> {
        let path = path.into();
        let data = Self::load(&path)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Re-read this handle's file through the cache and refresh the held
    /// document. Picks up on-disk changes via the modification-time check.
    pub fn reload(&mut self) -> Result<&Value, TokenError> {
        self.data = Self::load(&self.path)?;
        Ok(&self.data)
    }

    /// Top-level key/value copy of the held document. Non-mapping documents
    /// yield an empty mapping.
    pub fn to_map(&self) -> Mapping {
        match &self.data {
            Value::Mapping(map) => map.clone(),
            _ => Mapping::new(),
        }
    }

    /// Deserialize the held document into a typed view.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, TokenError> {
        serde_yaml::from_value(self.data.clone()).map_err(|source| TokenError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load a document, reusing the cached parse while the file's
    /// modification time is unchanged.
    ///
    /// A missing file loads as an empty document; callers must tolerate
    /// empty documents rather than treat them as an error signal.
    pub fn load(path: &Path) -> Result<Value, TokenError> {
        let mtime = file_mtime(path);
        if let Some(entry) = cache().lock().unwrap().get(path) {
            if entry.mtime == mtime {
                return Ok(entry.data.clone());
            }
        }

        // Parse outside the lock; last writer wins with identical content.
        let data = read_document(path)?;
        cache().lock().unwrap().insert(
            path.to_path_buf(),
            CacheEntry {
                mtime,
                data: data.clone(),
            },
        );
        Ok(data)
    }

    /// Re-parse unconditionally and overwrite the cache entry, regardless of
    /// modification time. For externally-triggered refreshes, e.g. after a
    /// program rewrites a token file in place.
    pub fn force_reload(path: &Path) -> Result<Value, TokenError> {
        let data = read_document(path)?;
        let mtime = file_mtime(path);
        cache().lock().unwrap().insert(
            path.to_path_buf(),
            CacheEntry {
                mtime,
                data: data.clone(),
            },
        );
        Ok(data)
    }

    /// Defensive top-level copy of the cached/loaded document. Non-mapping
    /// documents yield an empty mapping.
    pub fn as_mapping(path: &Path) -> Result<Mapping, TokenError> {
        match Self::load(path)? {
            Value::Mapping(map) => Ok(map),
            _ => Ok(Mapping::new()),
        }
    }

    /// Drop every cached parse. Useful for tests and development reloads.
    pub fn clear_cache() {
        cache().lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    // Tests that depend on cache retention serialize against the one test
    // that clears the global cache.
    static CACHE_GUARD: Mutex<()> = Mutex::new(());

    fn parse_count(path: &Path) -> usize {
        PARSE_COUNTS
            .get_or_init(|| Mutex::new(FxHashMap::default()))
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.sync_all().unwrap();
        path
    }

    #[test]
    fn load_parses_yaml_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\nRadius: 4\n");

        let doc = TokenFile::load(&path).unwrap();
        assert_eq!(doc.get("Accent").and_then(Value::as_str), Some("#FF0000"));
        assert_eq!(doc.get("Radius").and_then(Value::as_i64), Some(4));
    }

    #[test]
    fn repeated_load_reuses_cached_parse() {
        let _guard = CACHE_GUARD.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        TokenFile::load(&path).unwrap();
        let before = parse_count(&path);
        TokenFile::load(&path).unwrap();
        TokenFile::load(&path).unwrap();
        assert_eq!(parse_count(&path), before, "unchanged file must not re-parse");
    }

    #[test]
    fn force_reload_reparses() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        TokenFile::load(&path).unwrap();
        let before = parse_count(&path);
        TokenFile::force_reload(&path).unwrap();
        assert_eq!(parse_count(&path), before + 1);
    }

    #[test]
    fn changed_file_is_reparsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        let doc = TokenFile::load(&path).unwrap();
        assert_eq!(doc.get("Accent").and_then(Value::as_str), Some("#FF0000"));

        // force_reload sidesteps filesystems with coarse mtime granularity.
        write_file(&dir, "tokens.yaml", "Accent: \"#00FF00\"\n");
        let doc = TokenFile::force_reload(&path).unwrap();
        assert_eq!(doc.get("Accent").and_then(Value::as_str), Some("#00FF00"));
    }

    #[test]
    fn missing_file_loads_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let doc = TokenFile::load(&path).unwrap();
        assert_eq!(doc, Value::Mapping(Mapping::new()));
        assert!(TokenFile::as_mapping(&path).unwrap().is_empty());
    }

    #[test]
    fn empty_file_loads_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.yaml", "");

        let doc = TokenFile::load(&path).unwrap();
        assert_eq!(doc, Value::Mapping(Mapping::new()));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.yaml", "Accent: [unclosed\n");

        let err = TokenFile::load(&path).unwrap_err();
        assert!(matches!(err, TokenError::Parse { .. }));
    }

    #[test]
    fn as_mapping_returns_defensive_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        let mut copy = TokenFile::as_mapping(&path).unwrap();
        copy.insert(Value::from("Extra"), Value::from("x"));

        let fresh = TokenFile::as_mapping(&path).unwrap();
        assert!(fresh.get("Extra").is_none());
    }

    #[test]
    fn handle_reload_refreshes_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        let mut file = TokenFile::open(&path).unwrap();
        assert_eq!(
            file.data().get("Accent").and_then(Value::as_str),
            Some("#FF0000")
        );

        write_file(&dir, "tokens.yaml", "Accent: \"#0000FF\"\n");
        TokenFile::force_reload(&path).unwrap();
        file.reload().unwrap();
        assert_eq!(
            file.data().get("Accent").and_then(Value::as_str),
            Some("#0000FF")
        );
    }

    #[test]
    fn typed_view_deserializes() {
        #[derive(serde::Deserialize)]
        struct Palette {
            #[serde(rename = "Accent")]
            accent: String,
        }

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        let file = TokenFile::open(&path).unwrap();
        let palette: Palette = file.to_typed().unwrap();
        assert_eq!(palette.accent, "#FF0000");
    }

    #[test]
    fn clear_cache_forces_reparse() {
        let _guard = CACHE_GUARD.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tokens.yaml", "Accent: \"#FF0000\"\n");

        TokenFile::load(&path).unwrap();
        let before = parse_count(&path);
        TokenFile::clear_cache();
        TokenFile::load(&path).unwrap();
        assert_eq!(parse_count(&path), before + 1);
    }
}
