//! Compact HMAC-signed bearer tokens for the admin session.
//!
//! Standard three-segment shape: `base64url(header).base64url(payload).
//! base64url(HMAC-SHA-256(header.payload))` with an `HS256` header. The
//! auth boundary sets the result as a cookie and calls [`verify`] on
//! every admin request.
//!
//! [`verify`] never fails loudly: malformed, tampered, or expired input
//! all come back as `None`, and the caller treats `None` as
//! "unauthenticated". Signature comparison goes through the `hmac`
//! crate's `verify_slice`, which compares in constant time.
//!
//! Both functions are pure apart from [`verify`] reading the current
//! time, so they are trivially safe under concurrent calls.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &[u8] = br#"{"alg":"HS256","typ":"JWT"}"#;

/// Sign a JSON claims object into a compact token.
///
/// The claims should carry a numeric `exp` (Unix seconds); [`verify`]
/// rejects tokens without one.
pub fn sign(claims: &Value, secret: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(HEADER);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{header}.{payload}.{signature}")
}

/// Verify a compact token and return its claims.
///
/// Returns `None` (never an error) when the token:
/// - is not exactly three dot-separated segments
/// - has a signature that doesn't match the recomputed HMAC
/// - decodes to anything but a JSON object
/// - lacks a numeric `exp`, or `exp` is at or before the current time
pub fn verify(token: &str, secret: &str) -> Option<Value> {
    verify_at(token, secret, Utc::now().timestamp())
}

fn verify_at(token: &str, secret: &str, now_secs: i64) -> Option<Value> {
    let mut segments = token.split('.');
    let header = segments.next()?;
    let payload = segments.next()?;
    let signature = segments.next()?;
    if segments.next().is_some() || header.is_empty() {
        return None;
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    let signature_bytes = URL_SAFE_NO_PAD.decode(signature).ok()?;
    mac.verify_slice(&signature_bytes).ok()?;

    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
    if !claims.is_object() {
        return None;
    }
    let exp = claims.get("exp")?.as_f64()?;
    if now_secs as f64 >= exp {
        return None;
    }
    Some(claims)
}
