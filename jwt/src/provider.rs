//! Token provider: issuance and verification of HS256 tokens.
//!
//! ```
//! use passport_jwt::{IssueRequest, ProviderConfig, TokenProvider, UserClaims};
//!
//! let config = ProviderConfig::new("buzkd&yshKl#Si", 3600)?;
//! let provider = TokenProvider::<UserClaims>::new(config);
//!
//! let user = UserClaims {
//!     uid: 7,
//!     uname: "brandon".to_string(),
//!     ..UserClaims::default()
//! };
//! let request = IssueRequest::new("gateway", "web", "user-7", "107");
//! let token = provider.issue(&request, &user)?;
//!
//! let verified = provider.verify(&token, "gateway", "web")?;
//! assert_eq!(verified.jti(), "107");
//! assert_eq!(verified.payload, user);
//! # Ok::<(), passport_jwt::JwtError>(())
//! ```

use crate::{
    claims::{Claims, DomainClaims, NoClaims, StandardClaims},
    clock::{Clock, SystemClock},
    config::ProviderConfig,
    crypto::hmac_sha256::{base64_url_decode, base64_url_encode, hs256_sign, hs256_verify},
    error::{JwtError, JwtResult},
    types::{JwtHeader, HS256},
    validation::{validate_standard_claims, Expectation},
};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Caller-supplied registered claims for one token.
///
/// `iat` and `exp` are not part of the request: the provider stamps them
/// from its clock and ttl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueRequest<'a> {
    /// Intended recipient (`aud`)
    pub audience: &'a str,
    /// Signing authority (`iss`)
    pub issuer: &'a str,
    /// Subject identifier (`sub`)
    pub subject: &'a str,
    /// Opaque token id (`jti`), carried as given
    pub jti: &'a str,
    /// Not-valid-before (`nbf`); `None` means valid from the issue instant
    pub not_before: Option<i64>,
}

impl<'a> IssueRequest<'a> {
    /// Request valid from the moment it is issued
    #[must_use]
    pub fn new(audience: &'a str, issuer: &'a str, subject: &'a str, jti: &'a str) -> Self {
        Self {
            audience,
            issuer,
            subject,
            jti,
            not_before: None,
        }
    }

    /// Set an explicit `nbf`, in the past or the future
    #[must_use]
    pub fn not_before(mut self, nbf: i64) -> Self {
        self.not_before = Some(nbf);
        self
    }
}

/// Claims recovered from a token that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<C> {
    /// Registered claims
    pub standard: StandardClaims,
    /// Domain payload
    pub payload: C,
}

impl<C> Verified<C> {
    /// Token id
    #[must_use]
    pub fn jti(&self) -> &str {
        &self.standard.jti
    }

    /// Subject
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.standard.sub
    }

    /// Split into `(jti, payload)`
    #[must_use]
    pub fn into_parts(self) -> (String, C) {
        (self.standard.jti, self.payload)
    }
}

/// Issues and verifies HS256 tokens carrying a `C` payload.
///
/// The provider owns an immutable [`ProviderConfig`] and a [`Clock`]; both
/// operations only read them, so a provider can be shared across threads
/// (e.g. behind an `Arc`) without locking.
pub struct TokenProvider<C = NoClaims, K = SystemClock> {
    config: ProviderConfig,
    clock: K,
    _payload: PhantomData<fn() -> C>,
}

impl<C: DomainClaims> TokenProvider<C, SystemClock> {
    /// Create a provider using the wall clock
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
            _payload: PhantomData,
        }
    }
}

impl<C: DomainClaims, K: Clock> TokenProvider<C, K> {
    /// Replace the time source
    #[must_use]
    pub fn with_clock<K2: Clock>(self, clock: K2) -> TokenProvider<C, K2> {
        TokenProvider {
            config: self.config,
            clock,
            _payload: PhantomData,
        }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Build the claim set for `request` at the current instant.
    ///
    /// `exp` is always `iat + ttl`.
    #[must_use]
    pub fn claims_for(&self, request: &IssueRequest<'_>, payload: &C) -> Claims<C> {
        let now = self.clock.now();
        Claims {
            payload: payload.clone(),
            standard: StandardClaims {
                aud: request.audience.to_string(),
                exp: now.saturating_add(self.config.ttl_seconds()),
                jti: request.jti.to_string(),
                iat: now,
                iss: request.issuer.to_string(),
                nbf: request.not_before.unwrap_or(now),
                sub: request.subject.to_string(),
            },
        }
    }

    /// Issue a signed token.
    ///
    /// Output is a pure function of the request, payload, secret and clock
    /// reading, so a frozen clock yields byte-identical tokens.
    ///
    /// # Errors
    /// Returns [`JwtError::Signing`] if the claims cannot be serialized or
    /// signed. The failure is also logged.
    pub fn issue(&self, request: &IssueRequest<'_>, payload: &C) -> JwtResult<String> {
        let claims = self.claims_for(request, payload);
        self.sign(&claims).inspect_err(|e| {
            warn!(jti = %request.jti, error = %e, "failed to sign token");
        })
    }

    fn sign(&self, claims: &Claims<C>) -> JwtResult<String> {
        let header = serde_json::to_vec(&JwtHeader::hs256())
            .map_err(|e| JwtError::signing(format!("header serialization failed: {e}")))?;
        let body = serde_json::to_vec(claims)
            .map_err(|e| JwtError::signing(format!("claims serialization failed: {e}")))?;

        let signing_input = format!("{}.{}", base64_url_encode(&header), base64_url_encode(&body));
        let signature = hs256_sign(&signing_input, self.config.secret())?;

        debug!(jti = %claims.standard.jti, exp = claims.standard.exp, "issued token");
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify `token` and return its claims.
    ///
    /// Checks run in order and stop at the first failure: structure and
    /// header, signature, claim decoding, `exp`, `nbf`, `iat`, audience,
    /// issuer. No claim is read before the signature has been verified.
    ///
    /// # Errors
    /// Returns the [`JwtError`] of the first failing check. Audience and
    /// issuer mismatches carry the token's `jti`.
    pub fn verify(&self, token: &str, audience: &str, issuer: &str) -> JwtResult<Verified<C>> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            debug!("rejecting token without three segments");
            return Err(JwtError::malformed("expected three dot-separated segments"));
        };

        let header = decode_header(header_b64)?;
        if header.alg != HS256 {
            debug!(alg = %header.alg, "rejecting token with unexpected algorithm");
            return Err(JwtError::UnsupportedAlgorithm(header.alg));
        }

        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        hs256_verify(signing_input, signature_b64, self.config.secret()).inspect_err(|e| {
            debug!(error = %e, "rejecting token with bad signature");
        })?;

        let claims: Claims<C> = decode_claims(claims_b64)?;
        validate_standard_claims(
            &claims.standard,
            Expectation { audience, issuer },
            self.clock.now(),
        )?;

        Ok(Verified {
            standard: claims.standard,
            payload: claims.payload,
        })
    }
}

impl<C, K: Clone> Clone for TokenProvider<C, K> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            clock: self.clock.clone(),
            _payload: PhantomData,
        }
    }
}

impl<C, K: std::fmt::Debug> std::fmt::Debug for TokenProvider<C, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish()
    }
}

fn decode_header(segment: &str) -> JwtResult<JwtHeader> {
    let bytes = base64_url_decode(segment)
        .map_err(|e| JwtError::malformed(format!("header segment: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| JwtError::malformed(format!("header json: {e}")))
}

fn decode_claims<C: DomainClaims>(segment: &str) -> JwtResult<Claims<C>> {
    let bytes = base64_url_decode(segment)
        .map_err(|e| JwtError::malformed(format!("claims segment: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::malformed(format!("claims json: {e}")))?;
    serde_json::from_value(value).map_err(|e| JwtError::ClaimsType(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{PassportClaims, UserClaims};
    use crate::clock::FixedClock;

    const NOW: i64 = 1_700_000_000;

    fn provider<C: DomainClaims>() -> TokenProvider<C, FixedClock> {
        let config = ProviderConfig::new("buzkd&yshKl#Si", 3600).unwrap();
        TokenProvider::new(config).with_clock(FixedClock(NOW))
    }

    fn request() -> IssueRequest<'static> {
        IssueRequest::new("gateway", "web", "o7hLH01PWOsQSja3_Nmmrm3UnKnQ", "107")
    }

    #[test]
    fn exp_is_iat_plus_ttl() {
        let claims = provider::<NoClaims>().claims_for(&request(), &NoClaims {});
        assert_eq!(claims.standard.iat, NOW);
        assert_eq!(claims.standard.exp, NOW + 3600);
        assert_eq!(claims.standard.nbf, NOW);
    }

    #[test]
    fn explicit_not_before_is_kept() {
        let claims =
            provider::<NoClaims>().claims_for(&request().not_before(NOW - 30), &NoClaims {});
        assert_eq!(claims.standard.nbf, NOW - 30);
    }

    #[test]
    fn round_trip_without_payload() {
        let provider = provider::<NoClaims>();
        let token = provider.issue(&request(), &NoClaims {}).unwrap();
        let verified = provider.verify(&token, "gateway", "web").unwrap();
        assert_eq!(verified.jti(), "107");
        assert_eq!(verified.subject(), "o7hLH01PWOsQSja3_Nmmrm3UnKnQ");
    }

    #[test]
    fn round_trip_with_user_payload() {
        let provider = provider::<UserClaims>();
        let user = UserClaims {
            uid: 9,
            uname: "u".to_string(),
            ulevel: 2,
            avatar: "a".to_string(),
            mobile: "m".to_string(),
        };
        let token = provider.issue(&request(), &user).unwrap();
        let (jti, payload) = provider.verify(&token, "gateway", "web").unwrap().into_parts();
        assert_eq!(jti, "107");
        assert_eq!(payload, user);
    }

    #[test]
    fn user_level_beyond_i32_round_trips() {
        let provider = provider::<UserClaims>();
        let user = UserClaims {
            uid: 1 << 40,
            ulevel: 1 << 33,
            ..UserClaims::default()
        };
        let token = provider.issue(&request(), &user).unwrap();
        let verified = provider.verify(&token, "gateway", "web").unwrap();
        assert_eq!(verified.payload.ulevel, 8_589_934_592);
        assert_eq!(verified.payload, user);
    }

    #[test]
    fn unflattenable_payload_is_a_signing_error() {
        let err = provider::<i64>().issue(&request(), &7).unwrap_err();
        assert!(matches!(err, JwtError::Signing(_)), "{err:?}");

        let mut by_id = std::collections::BTreeMap::new();
        by_id.insert(vec![1u8], "level".to_string());
        let err = provider::<std::collections::BTreeMap<Vec<u8>, String>>()
            .issue(&request(), &by_id)
            .unwrap_err();
        assert!(matches!(err, JwtError::Signing(_)), "{err:?}");
    }

    #[test]
    fn header_segment_is_canonical() {
        let token = provider::<NoClaims>().issue(&request(), &NoClaims {}).unwrap();
        assert!(token.starts_with("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9."));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let provider = provider::<NoClaims>();
        for token in ["", "a.b", "a.b.c.d"] {
            let err = provider.verify(token, "gateway", "web").unwrap_err();
            assert!(matches!(err, JwtError::Malformed(_)), "{token:?} gave {err:?}");
        }
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        let provider = provider::<NoClaims>();
        let token = provider.issue(&request(), &NoClaims {}).unwrap();
        let rest = token.split_once('.').map(|(_, rest)| rest).unwrap();
        let header = base64_url_encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{header}.{rest}");
        assert_eq!(
            provider.verify(&forged, "gateway", "web"),
            Err(JwtError::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn tampered_claims_fail_signature() {
        let provider = provider::<NoClaims>();
        let token = provider.issue(&request(), &NoClaims {}).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let body = base64_url_encode(br#"{"aud":"gateway","exp":9999999999,"jti":"1","iss":"web"}"#);
        let forged = format!("{}.{}.{}", parts[0], body, parts[2]);
        assert_eq!(
            provider.verify(&forged, "gateway", "web"),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn wrong_payload_type_is_claims_type_error() {
        let token = provider::<NoClaims>().issue(&request(), &NoClaims {}).unwrap();
        let err = provider::<PassportClaims>()
            .verify(&token, "gateway", "web")
            .unwrap_err();
        assert!(matches!(err, JwtError::ClaimsType(_)), "{err:?}");
    }

    #[test]
    fn verification_uses_provider_clock() {
        let issuer = provider::<NoClaims>();
        let token = issuer.issue(&request(), &NoClaims {}).unwrap();

        let later = issuer.clone().with_clock(FixedClock(NOW + 3600));
        assert_eq!(
            later.verify(&token, "gateway", "web"),
            Err(JwtError::TokenExpired)
        );

        let almost = issuer.with_clock(FixedClock(NOW + 3599));
        assert!(almost.verify(&token, "gateway", "web").is_ok());
    }
}
