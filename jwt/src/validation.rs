//! Registered claims validation
//!
//! Runs after the signature has been checked. The stages are ordered and the
//! first failure wins: expiry, not-before, issued-at, audience, issuer.

use crate::claims::StandardClaims;
use crate::error::{JwtError, JwtResult};
use tracing::{debug, info};

/// Expected audience and issuer for a verification call
#[derive(Debug, Clone, Copy)]
pub(crate) struct Expectation<'a> {
    /// Required `aud` value
    pub(crate) audience: &'a str,
    /// Required `iss` value
    pub(crate) issuer: &'a str,
}

/// Check `exp`, `nbf` and `iat` against `now`.
///
/// `exp` must be strictly after `now`; an absent `exp` decodes as zero and is
/// therefore expired. `nbf` and `iat` may equal `now`.
pub(crate) fn validate_time_claims(claims: &StandardClaims, now: i64) -> JwtResult<()> {
    if claims.exp <= now {
        debug!(jti = %claims.jti, exp = claims.exp, now, "rejecting expired token");
        return Err(JwtError::TokenExpired);
    }

    if claims.nbf > now {
        debug!(jti = %claims.jti, nbf = claims.nbf, now, "rejecting token before nbf");
        return Err(JwtError::TokenNotYetValid);
    }

    if claims.iat > now {
        debug!(jti = %claims.jti, iat = claims.iat, now, "rejecting token issued in the future");
        return Err(JwtError::TokenUsedBeforeIssued);
    }

    Ok(())
}

/// Check audience, then issuer. Mismatches carry the token's `jti`.
///
/// Both claims are required: an empty `aud` or `iss` is a mismatch even when
/// the expected value is empty too.
pub(crate) fn validate_parties(claims: &StandardClaims, expected: Expectation<'_>) -> JwtResult<()> {
    if claims.aud.is_empty() || claims.aud != expected.audience {
        info!(jti = %claims.jti, expected = expected.audience, "JWT audience mismatch");
        return Err(JwtError::AudienceMismatch {
            jti: claims.jti.clone(),
        });
    }

    if claims.iss.is_empty() || claims.iss != expected.issuer {
        info!(jti = %claims.jti, expected = expected.issuer, "JWT issuer mismatch");
        return Err(JwtError::IssuerMismatch {
            jti: claims.jti.clone(),
        });
    }

    Ok(())
}

/// Full registered claims validation
pub(crate) fn validate_standard_claims(
    claims: &StandardClaims,
    expected: Expectation<'_>,
    now: i64,
) -> JwtResult<()> {
    validate_time_claims(claims, now)?;
    validate_parties(claims, expected)
}
