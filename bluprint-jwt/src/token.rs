// Token extraction and unverified decoding

use crate::error::{JwtError, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;

/// Decode the claims of a token without checking its signature or expiry.
///
/// Signature checks belong to the IAM sidecar; services only read the
/// claims of tokens that already passed through it. The header must be
/// well formed but its algorithm is not interpreted.
pub fn decode_unverified<T: DeserializeOwned>(token: &str) -> Result<T> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::InvalidToken(
            "expected header.payload.signature".to_string(),
        ));
    };

    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&decode_segment(header)?)
        .map_err(|e| JwtError::InvalidToken(format!("header: {}", e)))?;

    let claims: serde_json::Value = serde_json::from_slice(&decode_segment(payload)?)
        .map_err(|e| JwtError::InvalidToken(format!("payload: {}", e)))?;

    serde_json::from_value(claims).map_err(|e| JwtError::InvalidClaims(e.to_string()))
}

fn decode_segment(segment: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

/// Token of an `Authorization: Bearer <token>` header value.
///
/// ```
/// use bluprint_jwt::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc"), Some("abc"));
/// assert_eq!(bearer_token("Basic abc"), None);
/// ```
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
