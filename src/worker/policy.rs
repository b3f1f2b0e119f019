use reqwest::{Method, Url};

use crate::worker::cache::{Cache, CacheError, CacheStorage};
use crate::worker::fetch::{AssetRequest, AssetResponse, FetchError, Fetcher, ResponseSource};

pub const CACHE_PREFIX: &str = "eldritch-v2-cache-";
pub const CACHE_VERSION: u32 = 22;

/// Served in place of any page that cannot be reached or found in cache.
pub const ROOT_DOCUMENT: &str = "index.html";

/// Shell assets fetched on install, relative to the asset base URL.
pub const CORE_ASSETS: [&str; 7] = [
    "",
    "index.html",
    "app.js",
    "manifest.json",
    "icon-192.png",
    "icon-512.png",
    "icon-512-maskable.png",
];

pub fn cache_name(version: u32) -> String {
    format!("{CACHE_PREFIX}v{version}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Passthrough,
    NetworkFirst,
    CacheFirst,
}

pub fn route(request: &AssetRequest, scope: &Url) -> Route {
    if request.method != Method::GET || request.url.origin() != scope.origin() {
        return Route::Passthrough;
    }

    let wants_html = request
        .accept
        .as_deref()
        .is_some_and(|a| a.contains("text/html"));

    if request.navigate || wants_html {
        Route::NetworkFirst
    } else {
        Route::CacheFirst
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub missed: Vec<String>,
}

/// Fetch interception for the shell's own assets.
pub struct OfflineCache {
    storage: CacheStorage,
    fetcher: Box<dyn Fetcher>,
    scope: Url,
    name: String,
}

impl OfflineCache {
    pub fn new(storage: CacheStorage, fetcher: Box<dyn Fetcher>, scope: Url, version: u32) -> Self {
        Self {
            storage,
            fetcher,
            scope,
            name: cache_name(version),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Best effort: a missing asset is reported, never fatal.
    pub fn install(&self) -> Result<InstallReport, CacheError> {
        let cache = self.storage.open(&self.name)?;
        let mut report = InstallReport::default();

        for path in CORE_ASSETS {
            let Ok(url) = self.scope.join(path) else {
                report.missed.push(path.to_string());
                continue;
            };

            let stored = match self.fetcher.fetch(&AssetRequest::get(url.clone())) {
                Ok(resp) if resp.is_ok() => cache.put(url.as_str(), &resp).is_ok(),
                Ok(_) | Err(_) => false,
            };

            if stored {
                report.cached.push(url.to_string());
            } else {
                log::warn!("Precache miss: {url}");
                report.missed.push(url.to_string());
            }
        }

        Ok(report)
    }

    /// Drop every older shell cache. Caches outside the prefix are left alone.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        let mut deleted = Vec::new();
        for key in self.storage.keys()? {
            if key.starts_with(CACHE_PREFIX) && key != self.name {
                self.storage.delete(&key)?;
                log::info!("Removed stale cache {key}");
                deleted.push(key);
            }
        }
        Ok(deleted)
    }

    pub fn handle(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        match route(request, &self.scope) {
            Route::Passthrough => self.fetcher.fetch(request),
            Route::NetworkFirst => Ok(self.network_first(request)),
            Route::CacheFirst => Ok(self.cache_first(request)),
        }
    }

    fn open_cache(&self) -> Option<Cache> {
        match self.storage.open(&self.name) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!("Cache {} unavailable: {e}", self.name);
                None
            }
        }
    }

    fn lookup(cache: Option<&Cache>, url: &str) -> Option<AssetResponse> {
        let cache = cache?;
        match cache.match_url(url) {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("Unreadable cache entry for {url}: {e}");
                None
            }
        }
    }

    fn store(cache: Option<&Cache>, response: &AssetResponse) {
        let Some(cache) = cache else {
            return;
        };
        if !response.is_ok() {
            return;
        }
        if let Err(e) = cache.put(&response.url, response) {
            log::warn!("Could not cache {}: {e}", response.url);
        }
    }

    /// Network, then the cached copy, then the cached root document,
    /// then a synthetic 503. Whatever answers carries the requested URL.
    fn network_first(&self, request: &AssetRequest) -> AssetResponse {
        let cache = self.open_cache();

        match self.fetcher.fetch(request) {
            Ok(fresh) => {
                Self::store(cache.as_ref(), &fresh);
                return fresh;
            }
            Err(e) => log::debug!("Network failed for {}: {e}", request.url),
        }

        if let Some(hit) = Self::lookup(cache.as_ref(), request.url.as_str()) {
            return hit;
        }

        let root = self.scope.join(ROOT_DOCUMENT).ok();
        if let Some(mut hit) = root.and_then(|u| Self::lookup(cache.as_ref(), u.as_str())) {
            hit.url = request.url.to_string();
            hit.source = ResponseSource::RootFallback;
            return hit;
        }

        AssetResponse::offline(&request.url)
    }

    fn cache_first(&self, request: &AssetRequest) -> AssetResponse {
        let cache = self.open_cache();

        if let Some(hit) = Self::lookup(cache.as_ref(), request.url.as_str()) {
            return hit;
        }

        match self.fetcher.fetch(request) {
            Ok(fresh) => {
                Self::store(cache.as_ref(), &fresh);
                fresh
            }
            Err(e) => {
                log::debug!("Network failed for {}: {e}", request.url);
                AssetResponse::offline(&request.url)
            }
        }
    }
}
