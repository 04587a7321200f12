//! Access token types.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,
    /// Token type (usually "http://schemas.xmlsoap.org/ws/2009/11/swt-token-profile-1.0").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds; the provider sends it as a string.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub expires_in: u64,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Converts the response into an access token issued at `issued_at`.
    pub fn into_access_token(self, issued_at: DateTime<Utc>) -> AccessToken {
        let lifetime = to_chrono(Duration::from_secs(self.expires_in));
        AccessToken {
            token: self.access_token,
            expires_at: issued_at
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// Access token with its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token expiring `lifetime` from now.
    pub fn new(token: impl Into<String>, lifetime: Duration) -> Self {
        let lifetime = to_chrono(lifetime);
        Self {
            token: token.into(),
            expires_at: Utc::now()
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns true if the token expires within `margin` from now.
    pub fn is_expired(&self, margin: Duration) -> bool {
        match Utc::now().checked_add_signed(to_chrono(margin)) {
            Some(deadline) => deadline >= self.expires_at,
            None => true,
        }
    }

    /// Remaining lifetime, zero if already expired.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or_default()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Converts a std duration, saturating at roughly a century.
fn to_chrono(duration: Duration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or_else(|_| ChronoDuration::weeks(5200))
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Number(n) => Ok(n),
        Seconds::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid expires_in value: {}", s))),
    }
}
