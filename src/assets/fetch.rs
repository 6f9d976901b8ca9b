use std::{
    cell::RefCell,
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{CardforgeError, CardforgeResult};

/// Source of encoded asset bytes addressed by site-relative URIs.
pub trait AssetFetcher {
    /// Fetch the bytes behind `uri` (already normalized by [`fix_uri`]).
    fn fetch(&self, uri: &str) -> impl Future<Output = CardforgeResult<Vec<u8>>>;
}

/// Normalize a site-relative asset URI.
///
/// Leading `/` is dropped (sources are written site-root relative, e.g. `/img/blank.png`), `\` is
/// turned into `/`, `.` and empty segments are removed, and `..` segments are rejected.
pub fn fix_uri(source: &str) -> CardforgeResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(CardforgeError::validation("asset uri must be non-empty"));
    }
    if s.contains("://") {
        return Err(CardforgeError::validation(format!(
            "remote asset uris are not supported: '{s}'"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardforgeError::validation("asset uris must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardforgeError::validation("asset uri must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Fetches assets from a directory acting as the site root.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used to resolve URIs.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetFetcher for FsFetcher {
    async fn fetch(&self, uri: &str) -> CardforgeResult<Vec<u8>> {
        let path = self.root.join(Path::new(uri));
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(CardforgeError::from)
    }
}

/// In-memory fetcher for tests and debugging. Records every request in order.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a normalized URI.
    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(uri.into(), bytes);
    }

    /// URIs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, uri: &str) -> CardforgeResult<Vec<u8>> {
        self.requests.borrow_mut().push(uri.to_string());
        // Let sibling loads interleave the way real IO would.
        tokio::task::yield_now().await;
        self.assets
            .get(uri)
            .cloned()
            .ok_or_else(|| CardforgeError::missing_asset(format!("no asset at '{uri}'")))
    }
}

impl<F: AssetFetcher> AssetFetcher for &F {
    fn fetch(&self, uri: &str) -> impl Future<Output = CardforgeResult<Vec<u8>>> {
        (**self).fetch(uri)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
