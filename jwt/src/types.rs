//! JWT header

use serde::{Deserialize, Serialize};

/// Algorithm name written into every header
pub const HS256: &str = "HS256";

/// JWT header structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signing algorithm
    pub alg: String,
    /// Token type, `JWT` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl JwtHeader {
    /// Header for an HS256 signed JWT
    #[must_use]
    pub fn hs256() -> Self {
        Self {
            alg: HS256.to_string(),
            typ: Some("JWT".to_string()),
        }
    }
}

impl Default for JwtHeader {
    fn default() -> Self {
        Self::hs256()
    }
}
