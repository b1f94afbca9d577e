//! HMAC-SHA256 operations for JWT signing and verification

use crate::error::{JwtError, JwtResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
#[inline]
pub(crate) fn base64_url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// Raw HMAC-SHA256 over `data`
pub(crate) fn hmac_sha256_sign(data: &[u8], secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| JwtError::signing(format!("invalid HMAC key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Sign `header_b64.claims_b64` and return the encoded signature segment
pub(crate) fn hs256_sign(signing_input: &str, secret: &[u8]) -> JwtResult<String> {
    let signature = hmac_sha256_sign(signing_input.as_bytes(), secret)?;
    Ok(base64_url_encode(&signature))
}

/// Check an encoded signature segment against `signing_input`.
///
/// The comparison runs in constant time over the decoded MAC.
pub(crate) fn hs256_verify(signing_input: &str, signature_b64: &str, secret: &[u8]) -> JwtResult<()> {
    let signature = base64_url_decode(signature_b64)
        .map_err(|e| JwtError::malformed(format!("signature segment: {e}")))?;
    let expected = hmac_sha256_sign(signing_input.as_bytes(), secret)?;

    if bool::from(expected.ct_eq(&signature)) {
        Ok(())
    } else {
        Err(JwtError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rfc4231_case_2() {
        let mac = hmac_sha256_sign(b"what do ya want for nothing?", b"Jefe").unwrap();
        assert_eq!(
            mac,
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
    }

    #[test]
    fn sign_then_verify() {
        let secret = b"buzkd&yshKl#Si";
        let signature = hs256_sign("a.b", secret).unwrap();
        assert!(hs256_verify("a.b", &signature, secret).is_ok());
        assert_eq!(
            hs256_verify("a.c", &signature, secret),
            Err(JwtError::InvalidSignature)
        );
        assert_eq!(
            hs256_verify("a.b", &signature, b"another-secret"),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let secret = b"buzkd&yshKl#Si";
        let signature = hs256_sign("a.b", secret).unwrap();
        assert_eq!(
            hs256_verify("a.b", &signature[..8], secret),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn undecodable_signature_is_malformed() {
        let err = hs256_verify("a.b", "!!!", b"buzkd&yshKl#Si").unwrap_err();
        assert!(matches!(err, JwtError::Malformed(_)));
    }

    #[test]
    fn encoding_has_no_padding() {
        assert_eq!(base64_url_encode(b"ab"), "YWI");
        assert_eq!(base64_url_decode("YWI").unwrap(), b"ab");
    }
}
