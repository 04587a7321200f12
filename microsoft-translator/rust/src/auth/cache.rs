//! Access token cache.
//!
//! Tokens are stored under a key derived from the client credentials, so two
//! providers configured with different credentials never share a token.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::auth::token::AccessToken;
use crate::errors::TranslatorResult;

/// Derives the cache key for a set of client credentials.
pub fn cache_key(client_id: &str, client_secret: &str, scope: &str, grant_type: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [client_id, client_secret, scope, grant_type] {
        hasher.update(part.as_bytes());
        // Separator keeps ("ab", "c") and ("a", "bc") apart.
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Access token cache interface.
#[async_trait]
pub trait AccessTokenCache: Send + Sync {
    /// Returns the token stored under `key`, if any and not yet expired.
    async fn get(&self, key: &str) -> TranslatorResult<Option<AccessToken>>;

    /// Stores a token under `key`, replacing any previous one.
    async fn put(&self, key: &str, token: AccessToken) -> TranslatorResult<()>;

    /// Removes the token stored under `key`. Returns true if one was present.
    async fn remove(&self, key: &str) -> TranslatorResult<bool>;

    /// Removes all tokens.
    async fn clear(&self) -> TranslatorResult<()>;
}

/// In-memory access token cache.
#[derive(Default)]
pub struct InMemoryAccessTokenCache {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl InMemoryAccessTokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Returns true if the cache holds no tokens.
    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl AccessTokenCache for InMemoryAccessTokenCache {
    async fn get(&self, key: &str) -> TranslatorResult<Option<AccessToken>> {
        {
            let tokens = self.tokens.read().await;
            match tokens.get(key) {
                None => return Ok(None),
                Some(token) if !token.is_expired(std::time::Duration::ZERO) => {
                    return Ok(Some(token.clone()))
                }
                Some(_) => {}
            }
        }

        // Expired: evict, unless a fresh token replaced it meanwhile.
        let mut tokens = self.tokens.write().await;
        if tokens
            .get(key)
            .is_some_and(|token| token.is_expired(std::time::Duration::ZERO))
        {
            tokens.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, token: AccessToken) -> TranslatorResult<()> {
        self.tokens.write().await.insert(key.to_string(), token);
        Ok(())
    }

    async fn remove(&self, key: &str) -> TranslatorResult<bool> {
        Ok(self.tokens.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> TranslatorResult<()> {
        self.tokens.write().await.clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryAccessTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAccessTokenCache").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    #[test]
    fn test_cache_key_is_stable_hex() {
        let key = cache_key("id", "secret", "scope", "client_credentials");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key("id", "secret", "scope", "client_credentials"));
    }

    #[test]
    fn test_cache_key_differs_per_credentials() {
        let base = cache_key("id", "secret", "scope", "client_credentials");
        assert_ne!(base, cache_key("id2", "secret", "scope", "client_credentials"));
        assert_ne!(base, cache_key("id", "secret2", "scope", "client_credentials"));
        assert_ne!(base, cache_key("id", "secret", "scope2", "client_credentials"));
        assert_ne!(
            cache_key("ab", "c", "scope", "grant"),
            cache_key("a", "bc", "scope", "grant")
        );
    }

    #[test]
    fn test_cache_key_does_not_leak_secret() {
        let key = cache_key("id", "my-secret", "scope", "grant");
        assert!(!key.contains("my-secret"));
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryAccessTokenCache::new();
        cache
            .put("key", AccessToken::new("token-1", Duration::from_secs(600)))
            .await
            .unwrap();

        let token = cache.get("key").await.unwrap().unwrap();
        assert_eq!(token.token, "token-1");
        assert!(cache.get("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_token_is_evicted() {
        let cache = InMemoryAccessTokenCache::new();
        let expired = AccessToken {
            token: "old".to_string(),
            expires_at: Utc::now() - ChronoDuration::seconds(5),
        };
        cache.put("key", expired).await.unwrap();
        assert_eq!(cache.len().await, 1);

        assert!(cache.get("key").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache = InMemoryAccessTokenCache::new();
        cache
            .put("a", AccessToken::new("token-a", Duration::from_secs(60)))
            .await
            .unwrap();
        cache
            .put("b", AccessToken::new("token-b", Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(cache.remove("a").await.unwrap());
        assert!(!cache.remove("a").await.unwrap());
        assert_eq!(cache.len().await, 1);

        cache.clear().await.unwrap();
        assert!(cache.is_empty().await);
    }
}
