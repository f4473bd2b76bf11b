//! IGDB cover art lookup with on-disk caching.
//!
//! Resolves a game identifier (usually the mod manager's folder name) to a
//! local cover image. Each lookup walks these stages, stopping at the first
//! one that produces an image:
//!
//! 1. **Manual override**: `<cache>/<identifier>.jpg|png`
//! 2. **Index**: previously recorded image id whose file is still cached
//! 3. **Token**: OAuth client-credentials token, reused until near expiry
//! 4. **Search**: formatted term, then the raw identifier as fallback
//! 5. **Pick**: exact name match with a cover, else first with a cover
//! 6. **Fetch**: download unless cached, then record in the index
//!
//! Failures past stage 2 are logged and reported as "no cover"; artwork is
//! never allowed to fail the caller.

pub mod cache;
pub mod client;
pub mod pipeline;
pub mod search;
pub mod token;
pub mod types;

#[cfg(test)]
mod mock;

pub use cache::CoverCache;
pub use client::{Client, IgdbConfig};
pub use pipeline::{CoverError, CoverFetcher, CoverHit};
pub use search::{format_search_term, pick_candidate, search_terms};
pub use types::{CachedToken, Cover, Game, TokenResponse};
