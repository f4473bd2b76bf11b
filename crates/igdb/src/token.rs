//! Access token reuse and refresh.

use modninja_store::{KEY_IGDB_TOKEN, KeyValueStore, StoreExt};

use crate::client::{Client, Error};
use crate::types::CachedToken;

/// A cached token is refreshed once it is this close to expiry.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Returns the stored token if it stays valid past the refresh margin.
pub fn cached_token(store: &dyn KeyValueStore, now: i64) -> Option<String> {
    let cached: CachedToken = store.get_typed(KEY_IGDB_TOKEN)?;
    let fresh = cached.exp > now.saturating_add(REFRESH_MARGIN_SECS);
    (!cached.token.is_empty() && fresh).then_some(cached.token)
}

/// Returns a usable bearer token, fetching and storing a new one if needed.
///
/// `now` is Unix epoch seconds. A token that cannot be persisted is still
/// returned; it just will not survive the process.
pub async fn ensure_token(
    client: &Client,
    store: &dyn KeyValueStore,
    now: i64,
) -> Result<String, Error> {
    if let Some(token) = cached_token(store, now) {
        tracing::trace!("reusing cached IGDB token");
        return Ok(token);
    }

    let resp = client.fetch_token().await?;
    if resp.access_token.is_empty() {
        return Err(Error::EmptyToken);
    }

    let cached = CachedToken {
        token: resp.access_token,
        exp: now.saturating_add(resp.expires_in),
    };
    if let Err(e) = store.set_typed(KEY_IGDB_TOKEN, &cached) {
        tracing::warn!(error = %e, "failed to persist IGDB token");
    }

    tracing::debug!(exp = cached.exp, "fetched new IGDB token");
    Ok(cached.token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::IgdbConfig;
    use crate::mock::{MockServer, Route};
    use modninja_store::MemoryStore;

    const NOW: i64 = 1_700_000_000;

    fn store_with(token: &str, exp: i64) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .set_typed(
                KEY_IGDB_TOKEN,
                &CachedToken {
                    token: token.into(),
                    exp,
                },
            )
            .unwrap();
        store
    }

    async fn token_server() -> MockServer {
        MockServer::start(vec![Route::ok(
            "/oauth2/token",
            r#"{"access_token":"fresh","expires_in":5000,"token_type":"bearer"}"#,
        )])
        .await
    }

    fn client_for(url: &str) -> Client {
        Client::new(IgdbConfig::new("cid", "secret").with_base_url(url)).unwrap()
    }

    #[test]
    fn cached_token_margin() {
        let store = store_with("old", NOW + 3600);
        assert_eq!(cached_token(&store, NOW).as_deref(), Some("old"));
        assert_eq!(cached_token(&store, NOW + 3539).as_deref(), Some("old"));
        assert!(cached_token(&store, NOW + 3540).is_none());
    }

    #[test]
    fn empty_store_has_no_token() {
        assert!(cached_token(&MemoryStore::new(), NOW).is_none());
    }

    #[tokio::test]
    async fn valid_token_skips_endpoint() {
        let server = token_server().await;
        let store = store_with("old", NOW + 3600);

        for offset in [0, 1800, 3539] {
            let token = ensure_token(&client_for(&server.url), &store, NOW + offset)
                .await
                .unwrap();
            assert_eq!(token, "old");
        }
        assert_eq!(server.hits("/oauth2/token"), 0);
    }

    #[tokio::test]
    async fn near_expiry_refreshes_and_persists() {
        let server = token_server().await;
        let store = store_with("old", NOW + 30);

        let token = ensure_token(&client_for(&server.url), &store, NOW)
            .await
            .unwrap();
        assert_eq!(token, "fresh");
        assert_eq!(server.hits("/oauth2/token"), 1);

        let stored: CachedToken = store.get_or_default(KEY_IGDB_TOKEN);
        assert_eq!(stored.exp, NOW + 5000);

        // Second call reuses what was just stored.
        ensure_token(&client_for(&server.url), &store, NOW + 10)
            .await
            .unwrap();
        assert_eq!(server.hits("/oauth2/token"), 1);
    }

    #[tokio::test]
    async fn huge_expiry_saturates() {
        let server = MockServer::start(vec![Route::ok(
            "/oauth2/token",
            r#"{"access_token":"long","expires_in":9223372036854775807}"#,
        )])
        .await;
        let store = MemoryStore::new();

        let token = ensure_token(&client_for(&server.url), &store, NOW)
            .await
            .unwrap();
        assert_eq!(token, "long");

        let stored: CachedToken = store.get_or_default(KEY_IGDB_TOKEN);
        assert_eq!(stored.exp, i64::MAX);
        assert_eq!(cached_token(&store, i64::MAX - 10), None);
        assert_eq!(cached_token(&store, NOW).as_deref(), Some("long"));
    }

    #[tokio::test]
    async fn malformed_response_is_error() {
        let server =
            MockServer::start(vec![Route::ok("/oauth2/token", "<html>oops</html>")]).await;
        let store = MemoryStore::new();

        let err = ensure_token(&client_for(&server.url), &store, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(store.get(KEY_IGDB_TOKEN).is_none());
    }

    #[tokio::test]
    async fn empty_access_token_is_error() {
        let server = MockServer::start(vec![Route::ok(
            "/oauth2/token",
            r#"{"access_token":"","expires_in":100}"#,
        )])
        .await;

        let err = ensure_token(&client_for(&server.url), &MemoryStore::new(), NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyToken));
    }
}
