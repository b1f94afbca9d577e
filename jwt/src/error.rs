//! JWT error types

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors produced while configuring, issuing or verifying tokens.
///
/// Only [`JwtError::Configuration`] signals a programmer error; every other
/// variant is an ordinary rejection the caller maps to an authentication
/// failure. None of them are transient, so retrying is pointless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Provider configuration rejected (short secret, bad ttl, double load)
    #[error("Invalid provider configuration: {0}")]
    Configuration(String),

    /// The process-wide provider was used before being loaded
    #[error("Token provider has not been loaded")]
    NotLoaded,

    /// Serializing or signing the claims failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Token is not three base64url segments of valid JSON
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Header names an algorithm other than HS256
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature does not match the header and claims
    #[error("Invalid JWT signature")]
    InvalidSignature,

    /// Claims are valid JSON but do not fit the expected payload type
    #[error("Claims do not match the expected type: {0}")]
    ClaimsType(String),

    /// `exp` is not after the current time
    #[error("JWT token has expired")]
    TokenExpired,

    /// `nbf` is after the current time
    #[error("JWT token not yet valid")]
    TokenNotYetValid,

    /// `iat` is after the current time
    #[error("JWT token used before issued")]
    TokenUsedBeforeIssued,

    /// `aud` does not match the expected audience
    #[error("JWT audience mismatch (jti {jti:?})")]
    AudienceMismatch {
        /// Token id of the rejected token, kept for audit logging
        jti: String,
    },

    /// `iss` does not match the expected issuer
    #[error("JWT issuer mismatch (jti {jti:?})")]
    IssuerMismatch {
        /// Token id of the rejected token, kept for audit logging
        jti: String,
    },
}

impl JwtError {
    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Token id carried by an audience or issuer mismatch.
    ///
    /// Those two rejections happen after the signature was verified, so the
    /// id is trustworthy enough to log even though the token was refused.
    #[must_use]
    pub fn jti(&self) -> Option<&str> {
        match self {
            Self::AudienceMismatch { jti } | Self::IssuerMismatch { jti } => Some(jti),
            _ => None,
        }
    }

    /// Whether the error comes from the time-based claims
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::TokenExpired | Self::TokenNotYetValid | Self::TokenUsedBeforeIssued
        )
    }
}
