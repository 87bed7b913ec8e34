use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::{ApiMetadata, CacheConfig, ScanConfig};
use crate::doc::OpenApiDocument;
use crate::error::Error;
use crate::scanner::{ApiScanner, ScanOptions};

/// Builds the document served by the JSON endpoint.
///
/// Owns the caching policy: the scanner output is cached pre-overlay and the
/// static metadata is reapplied on every request, so responses always carry
/// the current configuration even on a cache hit.
pub struct DocumentAssembler {
    scanner: Arc<dyn ApiScanner>,
    store: Arc<dyn CacheStore>,
    paths: Vec<PathBuf>,
    options: ScanOptions,
    cache: CacheConfig,
    meta: ApiMetadata,
}

impl DocumentAssembler {
    pub fn new(
        scanner: Arc<dyn ApiScanner>,
        store: Arc<dyn CacheStore>,
        scan: ScanConfig,
        cache: CacheConfig,
        meta: ApiMetadata,
    ) -> Self {
        Self {
            scanner,
            store,
            paths: scan.paths,
            options: ScanOptions {
                aliases: scan.aliases,
            },
            cache,
            meta,
        }
    }

    pub async fn assemble(&self) -> Result<OpenApiDocument, Error> {
        let mut doc = if self.cache.enable {
            self.cached_document().await?
        } else {
            self.scanner.scan(&self.paths, &self.options)?
        };
        self.meta.overlay(&mut doc);
        Ok(doc)
    }

    /// Remove the cached document so the next request regenerates it.
    pub async fn invalidate(&self) -> Result<(), Error> {
        self.store.delete(&self.cache.key).await
    }

    async fn cached_document(&self) -> Result<OpenApiDocument, Error> {
        match self.store.get(&self.cache.key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(doc) => {
                    debug!("serving document from cache");
                    return Ok(doc);
                }
                Err(err) => {
                    // a corrupt entry must not poison the endpoint
                    warn!("cached document is unreadable, regenerating: {err}");
                }
            },
            Ok(None) => debug!("document not cached yet"),
            // backend down, fail open and regenerate
            Err(err) => warn!("cache backend unavailable, regenerating: {err}"),
        }
        self.scan_and_store().await
    }

    async fn scan_and_store(&self) -> Result<OpenApiDocument, Error> {
        let doc = self.scanner.scan(&self.paths, &self.options)?;
        match serde_json::to_vec(&doc) {
            Ok(bytes) => {
                if let Err(err) = self
                    .store
                    .set(&self.cache.key, Bytes::from(bytes), self.cache.expiration)
                    .await
                {
                    // a write failure must not fail the request
                    warn!("could not cache generated document: {err}");
                }
            }
            Err(err) => warn!("could not serialize document for caching: {err}"),
        }
        Ok(doc)
    }
}
