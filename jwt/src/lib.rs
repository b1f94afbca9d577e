//! Signed identity and session tokens (HS256 JWT)
//!
//! This crate provides:
//! - Issuance of compact HS256 tokens carrying the registered claims plus a
//!   domain payload ([`NoClaims`], [`UserClaims`], [`PassportClaims`] or any
//!   serde struct)
//! - An ordered verification pipeline: structure, signature, expiry,
//!   not-before, issued-at, audience, issuer
//! - A validated [`ProviderConfig`] and an optional process-wide provider in
//!   [`global`]
//!
//! Tokens are byte-compatible with standard JWT libraries.

pub mod claims;
pub mod clock;
pub mod config;
pub(crate) mod crypto;
mod error;
pub mod global;
mod provider;
mod types;
mod validation;

pub use claims::{Claims, DomainClaims, NoClaims, PassportClaims, StandardClaims, UserClaims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ProviderConfig, DEFAULT_TTL_SECONDS, MIN_SECRET_LEN};
pub use error::*;
pub use provider::{IssueRequest, TokenProvider, Verified};
pub use types::{JwtHeader, HS256};
