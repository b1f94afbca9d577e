//! Process-wide provider configuration.
//!
//! For services that want a single `load` at startup instead of threading a
//! [`TokenProvider`] through their call sites. The configuration can be set
//! exactly once; later calls to [`load`] fail rather than swapping the secret
//! under in-flight requests.

use crate::{
    claims::DomainClaims,
    config::ProviderConfig,
    error::{JwtError, JwtResult},
    provider::TokenProvider,
};
use once_cell::sync::OnceCell;
use tracing::info;

static CONFIG: OnceCell<ProviderConfig> = OnceCell::new();

/// Install the process-wide configuration.
///
/// # Errors
/// Returns [`JwtError::Configuration`] if a configuration was already loaded.
pub fn load(config: ProviderConfig) -> JwtResult<()> {
    let ttl = config.ttl_seconds();
    CONFIG
        .set(config)
        .map_err(|_| JwtError::configuration("token provider is already loaded"))?;
    info!(ttl_seconds = ttl, "token provider loaded");
    Ok(())
}

/// Whether [`load`] has completed
#[must_use]
pub fn is_loaded() -> bool {
    CONFIG.get().is_some()
}

/// Provider over the process-wide configuration.
///
/// Providers share the loaded secret, so calling this per request is cheap.
///
/// # Errors
/// Returns [`JwtError::NotLoaded`] before [`load`] has been called.
pub fn provider<C: DomainClaims>() -> JwtResult<TokenProvider<C>> {
    CONFIG
        .get()
        .cloned()
        .map(TokenProvider::new)
        .ok_or(JwtError::NotLoaded)
}
