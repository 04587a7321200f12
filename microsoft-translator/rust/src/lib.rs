//! Microsoft Translator Client Library
//!
//! An async Rust client for the Microsoft Translator HTTP API. Translates
//! text, detects languages, splits text into sentences, synthesizes speech
//! and lists supported languages.
//!
//! # Features
//!
//! - **OAuth**: client-credentials access tokens, cached until shortly before
//!   they expire; clients built with the same `token_cache` share tokens
//! - **Translation**: single texts and batches, plain text or HTML
//! - **Detection**: language detection and sentence breaking
//! - **Speech**: WAV or MP3 audio for any supported language
//! - **Observability**: `tracing` spans on every call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use microsoft_translator::MicrosoftTranslator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let translator = MicrosoftTranslator::from_env()?;
//!
//!     let language = translator.detect("This is a test").await?;
//!     let dutch = translator.translate("This is a test", "nl", Some(&language)).await?;
//!     println!("{} -> {}", language, dutch);
//!     Ok(())
//! }
//! ```
//!
//! # Sharing a token cache
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use microsoft_translator::{InMemoryAccessTokenCache, MicrosoftTranslator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(InMemoryAccessTokenCache::new());
//!
//! let first = MicrosoftTranslator::builder()
//!     .client_id("client-a")
//!     .client_secret("secret-a")
//!     .token_cache(cache.clone())
//!     .build()?;
//! let second = MicrosoftTranslator::builder()
//!     .client_id("client-b")
//!     .client_secret("secret-b")
//!     .token_cache(cache)
//!     .build()?;
//! # let _ = (first, second);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;
pub mod xml;

// Re-exports for convenience
pub use client::{MicrosoftTranslator, MicrosoftTranslatorBuilder};
pub use config::{TranslatorConfig, TranslatorConfigBuilder};
pub use errors::{TranslatorError, TranslatorResult};

pub use auth::{
    AccessToken, AccessTokenCache, AccessTokenProvider, InMemoryAccessTokenCache,
    OAuthAccessTokenProvider, StaticTokenProvider,
};
pub use observability::{init_tracing, LogConfig, LogFormat};
pub use types::{AudioFormat, ContentType, SpeakOptions, TranslateOptions};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
