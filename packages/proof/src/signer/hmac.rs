//! Shared-secret signer (HS256, HS384, HS512)

use super::Signer;
use crate::algorithm::Algorithm;
use crate::error::{ProofError, ProofResult};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

const WIRE_NAMES: [&str; 3] = ["HS256", "HS384", "HS512"];

/// HMAC signer over a shared secret.
///
/// The secret is wiped from memory when the signer is dropped and is never
/// printed by `Debug`.
#[derive(Clone)]
pub struct HmacSigner {
    algorithm: Algorithm,
    key: Zeroizing<Vec<u8>>,
}

impl HmacSigner {
    /// Create a signer for `algorithm` keyed with `secret`.
    ///
    /// Secrets shorter than the digest output are accepted but logged.
    pub fn new(algorithm: Algorithm, secret: impl AsRef<[u8]>) -> Self {
        let key = secret.as_ref().to_vec();
        if key.len() < algorithm.digest_len() {
            tracing::warn!(
                algorithm = algorithm.hmac_name(),
                key_len = key.len(),
                recommended = algorithm.digest_len(),
                "HMAC secret is shorter than the digest output"
            );
        }
        Self {
            algorithm,
            key: Zeroizing::new(key),
        }
    }

    /// Create a signer from a declared strength name (`SHA256`, `SHA384` or
    /// `SHA512`).
    ///
    /// # Errors
    /// `SigningFailure` for any other name.
    pub fn from_name(algorithm: &str, secret: impl AsRef<[u8]>) -> ProofResult<Self> {
        Ok(Self::new(algorithm.parse()?, secret))
    }

    /// Declared hashing strength
    #[must_use]
    pub fn strength(&self) -> Algorithm {
        self.algorithm
    }

    fn mac(&self, message: &[u8]) -> ProofResult<Vec<u8>> {
        let invalid = |_| ProofError::signing_failure("Invalid HMAC key");
        let tag = match self.algorithm {
            Algorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(&self.key).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::Sha384 => {
                let mut mac = HmacSha384::new_from_slice(&self.key).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::Sha512 => {
                let mut mac = HmacSha512::new_from_slice(&self.key).map_err(invalid)?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(tag)
    }
}

impl Signer for HmacSigner {
    fn algorithm(&self) -> &'static str {
        self.algorithm.hmac_name()
    }

    fn supports(&self, algorithm: &str) -> bool {
        WIRE_NAMES.contains(&algorithm)
    }

    fn sign(&self, message: &[u8]) -> ProofResult<Vec<u8>> {
        self.mac(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProofResult<bool> {
        let expected = Zeroizing::new(self.mac(message)?);
        Ok(bool::from(expected.as_slice().ct_eq(signature)))
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_follows_strength() {
        for (alg, wire) in Algorithm::ALL.into_iter().zip(WIRE_NAMES) {
            assert_eq!(HmacSigner::new(alg, "supersecretkey").algorithm(), wire);
        }
    }

    #[test]
    fn from_name_rejects_unsupported_strength() {
        let err = HmacSigner::from_name("SHA128", "supersecretkey").unwrap_err();
        assert!(matches!(err, ProofError::SigningFailure(_)));
    }

    #[test]
    fn supports_all_hmac_names_only() {
        let signer = HmacSigner::new(Algorithm::Sha256, "supersecretkey");
        assert!(signer.supports("HS256"));
        assert!(signer.supports("HS384"));
        assert!(signer.supports("HS512"));
        assert!(!signer.supports("RS256"));
        assert!(!signer.supports("none"));
    }

    #[test]
    fn rfc4231_test_case_2() {
        // RFC 4231 §4.3: key "Jefe", data "what do ya want for nothing?"
        let signer = HmacSigner::new(Algorithm::Sha256, "Jefe");
        let mac = signer.sign(b"what do ya want for nothing?").unwrap();
        let expected = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(mac, expected);
    }

    #[test]
    fn signature_lengths() {
        for alg in Algorithm::ALL {
            let signer = HmacSigner::new(alg, "supersecretkey");
            assert_eq!(signer.sign(b"Message").unwrap().len(), alg.digest_len());
        }
    }

    #[test]
    fn verify_round_trip_and_tamper() {
        let signer = HmacSigner::new(Algorithm::Sha512, "supersecretkey");
        let signature = signer.sign(b"Message").unwrap();
        assert!(signer.verify(b"Message", &signature).unwrap());
        assert!(!signer.verify(b"Messagf", &signature).unwrap());
        assert!(!signer.verify(b"Message", &signature[..10]).unwrap());
        assert!(!signer.verify(b"Message", &[]).unwrap());
    }

    #[test]
    fn verify_with_other_secret_fails() {
        let signature = HmacSigner::new(Algorithm::Sha256, "secret-a").sign(b"Message").unwrap();
        let other = HmacSigner::new(Algorithm::Sha256, "secret-b");
        assert!(!other.verify(b"Message", &signature).unwrap());
    }

    #[test]
    fn debug_redacts_key() {
        let signer = HmacSigner::new(Algorithm::Sha256, "supersecretkey");
        let printed = format!("{signer:?}");
        assert!(!printed.contains("supersecretkey"));
        assert!(printed.contains("redacted"));
    }
}
