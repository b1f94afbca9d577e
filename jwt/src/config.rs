//! Token provider configuration

use crate::error::{JwtError, JwtResult};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Shortest accepted HMAC secret, in bytes
pub const MIN_SECRET_LEN: usize = 8;

/// Token lifetime used when none is configured
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Environment variable holding the signing secret
pub const ENV_SECRET: &str = "JWT_SECRET";

/// Environment variable holding the token lifetime in seconds
pub const ENV_TTL_SECONDS: &str = "JWT_TTL_SECONDS";

/// Shared secret and expiry policy for a [`TokenProvider`](crate::TokenProvider).
///
/// Construction validates the secret length, so a value of this type is
/// always usable. Clones share one copy of the secret, which is wiped from
/// memory when the last clone drops.
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawProviderConfig")]
pub struct ProviderConfig {
    secret: Arc<Zeroizing<Vec<u8>>>,
    ttl_seconds: i64,
}

#[derive(Deserialize)]
struct RawProviderConfig {
    secret: String,
    #[serde(default = "default_ttl_seconds")]
    ttl_seconds: i64,
}

fn default_ttl_seconds() -> i64 {
    DEFAULT_TTL_SECONDS
}

impl TryFrom<RawProviderConfig> for ProviderConfig {
    type Error = JwtError;

    fn try_from(raw: RawProviderConfig) -> JwtResult<Self> {
        Self::new(raw.secret.into_bytes(), raw.ttl_seconds)
    }
}

impl ProviderConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    /// Returns [`JwtError::Configuration`] when the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes or the ttl is not positive.
    pub fn new(secret: impl Into<Vec<u8>>, ttl_seconds: i64) -> JwtResult<Self> {
        let secret = Zeroizing::new(secret.into());
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::configuration(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }
        if ttl_seconds <= 0 {
            return Err(JwtError::configuration(format!(
                "ttl must be positive, got {ttl_seconds}"
            )));
        }
        Ok(Self {
            secret: Arc::new(secret),
            ttl_seconds,
        })
    }

    /// Load from `JWT_SECRET` and the optional `JWT_TTL_SECONDS`.
    ///
    /// # Errors
    /// Returns [`JwtError::Configuration`] if the secret is unset, the ttl is
    /// not an integer, or [`ProviderConfig::new`] rejects the values.
    pub fn from_env() -> JwtResult<Self> {
        let secret = std::env::var(ENV_SECRET)
            .map_err(|_| JwtError::configuration(format!("{ENV_SECRET} is not set")))?;
        let ttl_seconds = match std::env::var(ENV_TTL_SECONDS) {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|e| {
                JwtError::configuration(format!("{ENV_TTL_SECONDS} is not an integer: {e}"))
            })?,
            Err(_) => DEFAULT_TTL_SECONDS,
        };
        Self::new(secret.into_bytes(), ttl_seconds)
    }

    /// Signing secret
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Token lifetime in seconds
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
