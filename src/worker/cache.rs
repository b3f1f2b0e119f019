use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::worker::fetch::{AssetResponse, ResponseSource};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Named caches, one directory each, under a common root.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<cache dir>/eldritch-v2`
    pub fn default_root() -> PathBuf {
        let mut path = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("eldritch-v2");
        path
    }

    pub fn open(&self, name: &str) -> Result<Cache, CacheError> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)?;
        Ok(Cache { dir })
    }

    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns whether a cache by that name existed.
    pub fn delete(&self, name: &str) -> Result<bool, CacheError> {
        match fs::remove_dir_all(self.root.join(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    content_type: Option<String>,
}

/// One named cache. Entries are keyed by absolute URL.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    pub fn match_url(&self, url: &str) -> Result<Option<AssetResponse>, CacheError> {
        let (meta_path, body_path) = self.entry_paths(url);

        let meta = match fs::read_to_string(&meta_path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: EntryMeta = serde_json::from_str(&meta)?;
        if meta.url != url {
            return Ok(None);
        }
        let body = fs::read(&body_path)?;

        Ok(Some(AssetResponse {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body,
            source: ResponseSource::Cache,
        }))
    }

    pub fn put(&self, url: &str, response: &AssetResponse) -> Result<(), CacheError> {
        let (meta_path, body_path) = self.entry_paths(url);
        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status,
            content_type: response.content_type.clone(),
        };

        // Meta goes last; an entry without it is a miss.
        fs::write(&body_path, &response.body)?;
        fs::write(&meta_path, serde_json::to_vec(&meta)?)?;
        Ok(())
    }

    fn entry_paths(&self, url: &str) -> (PathBuf, PathBuf) {
        let key = entry_key(url);
        (
            self.dir.join(format!("{key}.json")),
            self.dir.join(format!("{key}.bin")),
        )
    }
}

/// Fixed-length file stem for a URL. The URL itself lives in the meta file.
fn entry_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> AssetResponse {
        AssetResponse {
            url: "http://localhost/eldritch-v2/app.js".into(),
            status: 200,
            content_type: Some("text/javascript".into()),
            body: body.as_bytes().to_vec(),
            source: ResponseSource::Network,
        }
    }

    #[test]
    fn keys_are_distinct_and_safe() {
        let a = entry_key("http://h/a/b");
        let b = entry_key("http://h/a_b");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn long_urls_fit_in_a_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStorage::new(dir.path().to_path_buf())
            .open("eldritch-v2-cache-v22")
            .unwrap();
        let url = format!("http://localhost/eldritch-v2/{}?q=%20", "deep/".repeat(100));

        cache.put(&url, &response("long")).unwrap();
        let hit = cache.match_url(&url).unwrap().unwrap();
        assert_eq!(hit.url, url);
        assert_eq!(hit.body, b"long");
    }

    #[test]
    fn put_then_match() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf());
        let cache = storage.open("eldritch-v2-cache-v22").unwrap();
        let url = "http://localhost/eldritch-v2/app.js";

        assert!(cache.match_url(url).unwrap().is_none());
        cache.put(url, &response("console.log(1)")).unwrap();

        let hit = cache.match_url(url).unwrap().unwrap();
        assert_eq!(hit.body, b"console.log(1)");
        assert_eq!(hit.source, ResponseSource::Cache);
        assert_eq!(hit.content_type.as_deref(), Some("text/javascript"));
    }

    #[test]
    fn keys_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().join("caches"));
        assert!(storage.keys().unwrap().is_empty());

        storage.open("b").unwrap();
        storage.open("a").unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);

        assert!(storage.delete("a").unwrap());
        assert!(!storage.delete("a").unwrap());
        assert_eq!(storage.keys().unwrap(), vec!["b"]);
    }
}
