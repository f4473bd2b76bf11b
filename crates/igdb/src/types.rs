//! API and persisted types for IGDB.

use serde::{Deserialize, Serialize};

/// OAuth client-credentials response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

/// Token as persisted under the `igdbToken` store key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub token: String,
    /// Expiry as Unix epoch seconds.
    pub exp: i64,
}

/// Cover reference on a search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub image_id: Option<String>,
}

/// A game returned by the search endpoint.
///
/// The query only requests `name` and `cover.image_id`; IGDB also returns
/// `id`, which is kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cover: Option<Cover>,
}

impl Game {
    /// Returns the cover image id when the game has usable cover art.
    pub fn cover_image_id(&self) -> Option<&str> {
        self.cover
            .as_ref()
            .and_then(|c| c.image_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}
