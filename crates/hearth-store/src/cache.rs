use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use hearth_core::error::Result;

/// Durable key/value store: one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this cache writes under.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Serialize `value` under `key`, swallowing failures.
    ///
    /// Persistence is best-effort: errors are logged at `warn` and never
    /// propagated, per the persistence contract.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_put(key, value) {
            warn!("Failed to persist '{}': {}", key, e);
        }
    }

    /// Serialize `value` under `key`, returning the error for callers
    /// that need to react.
    pub fn try_put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(value)?;
        std::fs::write(self.path_for(key), json)?;
        Ok(())
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `None` when the key is missing or the payload is malformed;
    /// a malformed payload is logged and treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Malformed payload under '{}', ignoring: {}", key, e);
                None
            }
        }
    }

    /// Delete the value under `key`, if present. Missing keys are fine.
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove '{}': {}", key, e),
        }
    }

    /// Whether a value exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn make_cache() -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        (dir, cache)
    }

    // ---- Roundtrip ----

    #[test]
    fn test_put_then_get() {
        let (_dir, cache) = make_cache();
        let value = Sample {
            name: "a".to_string(),
            count: 3,
        };
        cache.put("sample", &value);
        assert_eq!(cache.get::<Sample>("sample"), Some(value));
    }

    #[test]
    fn test_put_overwrites() {
        let (_dir, cache) = make_cache();
        cache.put("k", &1u32);
        cache.put("k", &2u32);
        assert_eq!(cache.get::<u32>("k"), Some(2));
    }

    #[test]
    fn test_put_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("cache");
        let cache = FileCache::new(&nested);
        cache.put("k", &true);
        assert_eq!(cache.get::<bool>("k"), Some(true));
    }

    // ---- Missing and malformed ----

    #[test]
    fn test_get_missing_key() {
        let (_dir, cache) = make_cache();
        assert_eq!(cache.get::<Sample>("nothing"), None);
    }

    #[test]
    fn test_get_malformed_payload_treated_absent() {
        let (_dir, cache) = make_cache();
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join("bad.json"), b"{ not json at all").unwrap();
        assert_eq!(cache.get::<Sample>("bad"), None);
    }

    #[test]
    fn test_get_type_mismatch_treated_absent() {
        let (_dir, cache) = make_cache();
        cache.put("k", &"a string");
        assert_eq!(cache.get::<u32>("k"), None);
    }

    // ---- Remove ----

    #[test]
    fn test_remove_deletes() {
        let (_dir, cache) = make_cache();
        cache.put("k", &42u32);
        assert!(cache.contains("k"));
        cache.remove("k");
        assert!(!cache.contains("k"));
        assert_eq!(cache.get::<u32>("k"), None);
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let (_dir, cache) = make_cache();
        cache.remove("never-there");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, cache) = make_cache();
        cache.put("k", &1u32);
        cache.remove("k");
        cache.remove("k");
        assert!(!cache.contains("k"));
    }

    // ---- try_put ----

    #[test]
    fn test_try_put_reports_unwritable_dir() {
        // A path under a regular file cannot be created as a directory
        let file = tempfile::NamedTempFile::new().unwrap();
        let cache = FileCache::new(file.path().join("sub"));
        assert!(cache.try_put("k", &1u32).is_err());
    }

    #[test]
    fn test_put_swallows_unwritable_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cache = FileCache::new(file.path().join("sub"));
        // Must not panic or propagate
        cache.put("k", &1u32);
        assert_eq!(cache.get::<u32>("k"), None);
    }

    // ---- Last-writer-wins between handles ----

    #[test]
    fn test_two_handles_share_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileCache::new(dir.path());
        let b = FileCache::new(dir.path());
        a.put("k", &"first");
        b.put("k", &"second");
        assert_eq!(a.get::<String>("k").as_deref(), Some("second"));
    }
}
