//! OAuth access tokens for the translator API.
//!
//! This module provides:
//!
//! - **Token**: token endpoint response and the cached access token
//! - **Cache**: access token cache keyed by the client credentials
//! - **Provider**: client-credentials token acquisition with cache reuse

pub mod cache;
pub mod provider;
pub mod token;

pub use cache::{cache_key, AccessTokenCache, InMemoryAccessTokenCache};
pub use provider::{AccessTokenProvider, OAuthAccessTokenProvider, StaticTokenProvider};
pub use token::{AccessToken, TokenResponse};
