//! Hub delivery signature verification.
//!
//! Deliveries carry an `x-hub-signature` header of the form
//! `sha256=<lowercase hex HMAC-SHA256 of the raw body>`, keyed by the
//! pre-shared hub secret.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Digest algorithms accepted in the signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha256,
}

impl SignatureAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the signature header value for `body`.
///
/// Returns `<algorithm>=<hex digest>`. An empty secret yields an empty
/// string, which `verify_signature` never accepts.
pub fn generate_signature(body: &[u8], secret: &[u8], algorithm: SignatureAlgorithm) -> String {
    if secret.is_empty() {
        return String::new();
    }

    let digest = match algorithm {
        SignatureAlgorithm::Sha256 => {
            // HMAC accepts keys of any length.
            let mut mac = match HmacSha256::new_from_slice(secret) {
                Ok(m) => m,
                Err(_) => return String::new(),
            };
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
    };

    format!("{}={}", algorithm, digest)
}

/// Verify a delivery signature against the raw request body.
///
/// # Arguments
///
/// * `body` - The exact bytes of the request body
/// * `secret` - The pre-shared hub secret
/// * `algorithm` - Digest algorithm the sender used
/// * `provided` - The `x-hub-signature` header value
///
/// # Returns
///
/// `true` only if the secret and provided signature are non-empty and the
/// provided value equals the expected one byte for byte.
pub fn verify_signature(
    body: &[u8],
    secret: &[u8],
    algorithm: SignatureAlgorithm,
    provided: &str,
) -> bool {
    if secret.is_empty() || provided.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !provided.is_empty(),
            "hub_signature_missing_fields"
        );
        return false;
    }

    let expected = generate_signature(body, secret, algorithm);
    let valid = constant_time_compare(expected.as_bytes(), provided.as_bytes());

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = provided.len(),
            "hub_signature_mismatch"
        );
    }

    valid
}

/// Constant-time comparison of two signatures.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    // Lengths are public: the expected length is fixed by the algorithm.
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}
