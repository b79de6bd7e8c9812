use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed webhook payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub fn hmac_sha256_hex(secret: &[u8], payload: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=...]`) against
/// the raw request body. Any matching `v1` entry is accepted.
pub fn verify_stripe_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    now_unix: i64,
) -> bool {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => timestamp = value.parse().ok(),
            (Some("v1"), Some(value)) => signatures.push(value),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return false;
    };
    if now_unix.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS as u64 {
        return false;
    }

    let mut signed = format!("{}.", timestamp).into_bytes();
    signed.extend_from_slice(payload);
    let Some(expected) = hmac_sha256_hex(secret.as_bytes(), &signed) else {
        return false;
    };

    signatures
        .iter()
        .any(|sig| bool::from(sig.as_bytes().ct_eq(expected.as_bytes())))
}
