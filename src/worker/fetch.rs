use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("host unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: Method,
    pub url: Url,
    pub accept: Option<String>,
    /// Top-level document load.
    pub navigate: bool,
}

impl AssetRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            accept: None,
            navigate: false,
        }
    }

    pub fn navigate(url: Url) -> Self {
        Self {
            accept: Some("text/html".into()),
            navigate: true,
            ..Self::get(url)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// The cached root document stood in for the requested page.
    RootFallback,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl AssetResponse {
    pub fn offline(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            status: 503,
            content_type: Some("text/plain".into()),
            body: b"Offline".to_vec(),
            source: ResponseSource::Offline,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait Fetcher: Send {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError>;
}

/* =========================
   HTTP
   ========================= */

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        if let Some(accept) = &request.accept {
            builder = builder.header(ACCEPT, accept.as_str());
        }

        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes()?.to_vec();

        Ok(AssetResponse {
            url: request.url.to_string(),
            status,
            content_type,
            body,
            source: ResponseSource::Network,
        })
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct FakeNet {
        pub online: bool,
        pub pages: HashMap<String, Vec<u8>>,
        pub requests: Vec<String>,
    }

    /// In-memory network. Clones share the same state.
    #[derive(Clone, Default)]
    pub struct FakeFetcher {
        pub net: Arc<Mutex<FakeNet>>,
    }

    impl FakeFetcher {
        pub fn online(pages: &[(&str, &str)]) -> Self {
            let fetcher = Self::default();
            {
                let mut net = fetcher.net.lock().unwrap();
                net.online = true;
                for (url, body) in pages {
                    net.pages.insert(url.to_string(), body.as_bytes().to_vec());
                }
            }
            fetcher
        }

        pub fn set_online(&self, online: bool) {
            self.net.lock().unwrap().online = online;
        }

        pub fn set_page(&self, url: &str, body: &str) {
            self.net
                .lock()
                .unwrap()
                .pages
                .insert(url.to_string(), body.as_bytes().to_vec());
        }

        pub fn request_count(&self) -> usize {
            self.net.lock().unwrap().requests.len()
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
            let mut net = self.net.lock().unwrap();
            let url = request.url.to_string();
            net.requests.push(url.clone());

            if !net.online {
                return Err(FetchError::Unreachable(url));
            }

            let (status, body) = match net.pages.get(&url) {
                Some(body) => (200, body.clone()),
                None => (404, b"Not Found".to_vec()),
            };

            Ok(AssetResponse {
                url,
                status,
                content_type: None,
                body,
                source: ResponseSource::Network,
            })
        }
    }
}
