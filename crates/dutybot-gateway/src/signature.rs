//! Callback signature: lowercase hex of `sha256(body || signing_secret)`,
//! sent in the `Signature` header.

use sha2::{Digest, Sha256};

/// Header carrying the callback signature.
pub const SIGNATURE_HEADER: &str = "signature";

/// Compute the expected signature for `body`.
pub fn sign(body: &[u8], signing_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hasher.update(signing_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `provided` matches the signature of `body`.
pub fn verify(body: &[u8], signing_secret: &str, provided: &str) -> bool {
    let expected = sign(body, signing_secret);
    let provided = provided.trim().to_ascii_lowercase();
    // Constant-time comparison over equal-length hex strings.
    expected.len() == provided.len()
        && expected
            .bytes()
            .zip(provided.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_known_value() {
        // sha256("abc")
        assert_eq!(
            sign(b"a", "bc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify() {
        let body = br#"{"event_type":"event_verification"}"#;
        let sig = sign(body, "s3cret");
        assert!(verify(body, "s3cret", &sig));
        assert!(verify(body, "s3cret", &sig.to_uppercase()));
        assert!(!verify(body, "other", &sig));
        assert!(!verify(body, "s3cret", "deadbeef"));
    }
}
