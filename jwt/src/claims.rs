//! Registered claims, the flattened claim envelope, and the domain payloads.
//!
//! A token body is one flat JSON object: the domain payload fields come first,
//! followed by the registered claims `aud, exp, jti, iat, iss, nbf, sub`.
//! Empty registered claims are omitted on the wire and decode back to their
//! empty value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[inline]
fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Registered claims present on every token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Audience.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aud: String,
    /// Expiry (unix seconds).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub exp: i64,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
    /// Issued-at (unix seconds).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub iat: i64,
    /// Issuer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iss: String,
    /// Not before (unix seconds).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub nbf: i64,
    /// Subject.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub: String,
}

/// Application payload merged next to the registered claims.
///
/// Implemented for every serde type, so any struct with named fields can be
/// carried. Its field names must not collide with the registered claims.
pub trait DomainClaims: Serialize + DeserializeOwned + Clone + Debug + Send + Sync {}

impl<T> DomainClaims for T where T: Serialize + DeserializeOwned + Clone + Debug + Send + Sync {}

/// Complete token body: domain payload plus registered claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: DeserializeOwned"))]
pub struct Claims<C> {
    /// Domain payload.
    #[serde(flatten)]
    pub payload: C,
    /// Registered claims.
    #[serde(flatten)]
    pub standard: StandardClaims,
}

/// Payload for tokens that carry only the registered claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoClaims {}

/// Logged-in user identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id.
    #[serde(rename = "u_id")]
    pub uid: i64,
    /// User name.
    #[serde(rename = "u_name")]
    pub uname: String,
    /// User level.
    #[serde(rename = "u_level")]
    pub ulevel: i64,
    /// Avatar URL. The wire name keeps the historical `avater` spelling so
    /// existing verifiers keep working.
    #[serde(rename = "avater")]
    pub avatar: String,
    /// Mobile number.
    pub mobile: String,
}

/// Third-party passport (e.g. WeChat) identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportClaims {
    /// Visitor id.
    #[serde(rename = "id")]
    pub vid: i64,
    /// Open id assigned by the identity platform.
    #[serde(rename = "oid")]
    pub openid: String,
    /// Application id.
    #[serde(rename = "appid")]
    pub app_id: i64,
    /// Application name.
    pub app: String,
    /// Login scene.
    pub scene: String,
    /// Platform user id.
    pub puid: String,
    /// Opaque business string.
    pub bs: String,
}
