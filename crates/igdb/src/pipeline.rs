//! The per-identifier cover lookup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modninja_store::{KeyValueStore, StoreError};

use crate::cache::{CoverCache, clear_index, indexed_image_id, load_index, record_index};
use crate::client::{self, Client};
use crate::search::{pick_candidate, search_terms};
use crate::token::ensure_token;

/// Why a lookup produced no cover.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("no cover found for {0:?}")]
    NotFound(String),

    #[error("token request failed: {0}")]
    Token(#[source] client::Error),

    #[error("search failed: {0}")]
    Search(#[source] client::Error),

    #[error("download failed: {0}")]
    Download(#[source] client::Error),

    #[error("cover cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoverError {
    /// True when the lookup failed because the service was unreachable.
    pub fn is_offline(&self) -> bool {
        match self {
            CoverError::Token(e) | CoverError::Search(e) | CoverError::Download(e) => {
                e.is_transport()
            }
            _ => false,
        }
    }
}

/// Which stage produced the cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverHit {
    Manual(PathBuf),
    Indexed(PathBuf),
    Fetched(PathBuf),
}

impl CoverHit {
    pub fn path(&self) -> &Path {
        match self {
            CoverHit::Manual(p) | CoverHit::Indexed(p) | CoverHit::Fetched(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            CoverHit::Manual(p) | CoverHit::Indexed(p) | CoverHit::Fetched(p) => p,
        }
    }
}

/// Resolves identifiers to cached cover images.
pub struct CoverFetcher {
    client: Client,
    cache: CoverCache,
    store: Arc<dyn KeyValueStore>,
}

impl CoverFetcher {
    pub fn new(client: Client, cache: CoverCache, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            cache,
            store,
        }
    }

    pub fn cache(&self) -> &CoverCache {
        &self.cache
    }

    /// Returns the local cover for `identifier`, or `None`.
    ///
    /// Never fails: every error is logged and reported as no cover.
    pub async fn get_cover_image(&self, identifier: &str) -> Option<PathBuf> {
        match self.lookup(identifier).await {
            Ok(hit) => Some(hit.into_path()),
            Err(CoverError::NotFound(_)) => {
                tracing::debug!(identifier, "no cover art available");
                None
            }
            Err(e) if e.is_offline() => {
                tracing::info!(identifier, error = %e, "cover service unreachable");
                None
            }
            Err(e) => {
                tracing::warn!(identifier, error = %e, "cover lookup failed");
                None
            }
        }
    }

    /// Runs the lookup stages against the current clock.
    pub async fn lookup(&self, identifier: &str) -> Result<CoverHit, CoverError> {
        self.lookup_at(identifier, chrono::Utc::now().timestamp())
            .await
    }

    /// Runs the lookup stages with `now` as the token clock (epoch seconds).
    pub async fn lookup_at(&self, identifier: &str, now: i64) -> Result<CoverHit, CoverError> {
        self.cache.ensure_dir()?;

        if let Some(path) = self.cache.manual_override(identifier) {
            tracing::debug!(identifier, path = %path.display(), "using manual cover override");
            return Ok(CoverHit::Manual(path));
        }

        if let Some(image_id) = indexed_image_id(self.store.as_ref(), identifier) {
            if let Some(path) = self.cache.cached_image(&image_id) {
                return Ok(CoverHit::Indexed(path));
            }
            tracing::debug!(identifier, image_id, "indexed cover missing on disk, refetching");
        }

        let token = ensure_token(&self.client, self.store.as_ref(), now)
            .await
            .map_err(CoverError::Token)?;

        let image_id = self.search(identifier, &token).await?;

        let path = match self.cache.cached_image(&image_id) {
            Some(path) => path,
            None => {
                let data = self
                    .client
                    .download_cover(&image_id)
                    .await
                    .map_err(CoverError::Download)?;
                self.cache.save_image(&image_id, &data)?
            }
        };

        if let Err(e) = record_index(self.store.as_ref(), identifier, &image_id) {
            tracing::warn!(identifier, error = %e, "failed to record cover index");
        }

        tracing::info!(identifier, image_id, "cover cached");
        Ok(CoverHit::Fetched(path))
    }

    /// Tries each search term in order, returning the first usable image id.
    async fn search(&self, identifier: &str, token: &str) -> Result<String, CoverError> {
        for term in search_terms(identifier) {
            let games = match self.client.search_games(token, &term).await {
                Ok(games) => games,
                Err(e) if e.is_transport() => return Err(CoverError::Search(e)),
                Err(e) => {
                    tracing::warn!(term, error = %e, "unusable search response");
                    continue;
                }
            };

            match pick_candidate(&games, &term).and_then(|g| g.cover_image_id()) {
                Some(image_id) => return Ok(image_id.to_string()),
                None => {
                    tracing::debug!(term, candidates = games.len(), "no candidate with cover art");
                }
            }
        }
        Err(CoverError::NotFound(identifier.to_string()))
    }

    /// Deletes every indexed image and forgets the index.
    ///
    /// Manual overrides stay in place.
    pub fn clear_cache(&self) -> Result<usize, CoverError> {
        let index = load_index(self.store.as_ref());
        let removed = self.cache.clear(index.values().map(String::as_str))?;
        clear_index(self.store.as_ref())?;
        tracing::info!(removed, dir = %self.cache.dir().display(), "cover cache cleared");
        Ok(removed)
    }
}
