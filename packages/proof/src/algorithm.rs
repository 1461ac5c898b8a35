//! Declared hashing strengths and their wire algorithm names

use crate::error::{ProofError, ProofResult};
use std::fmt;
use std::str::FromStr;

/// Hashing strength a signer is declared with.
///
/// Each signer family maps the strength onto its own wire name, e.g.
/// `Sha256` becomes `HS256` for HMAC and `RS256` for RSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl Algorithm {
    /// All supported strengths, weakest first
    pub const ALL: [Algorithm; 3] = [Algorithm::Sha256, Algorithm::Sha384, Algorithm::Sha512];

    /// Declared name, as accepted by [`FromStr`]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha384 => "SHA384",
            Algorithm::Sha512 => "SHA512",
        }
    }

    /// Wire name used by HMAC signers
    #[must_use]
    pub fn hmac_name(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "HS256",
            Algorithm::Sha384 => "HS384",
            Algorithm::Sha512 => "HS512",
        }
    }

    /// Wire name used by RSA keypair signers
    #[must_use]
    pub fn rsa_name(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "RS256",
            Algorithm::Sha384 => "RS384",
            Algorithm::Sha512 => "RS512",
        }
    }

    /// Digest output length in bytes
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }
}

impl FromStr for Algorithm {
    type Err = ProofError;

    fn from_str(s: &str) -> ProofResult<Self> {
        match s {
            "SHA256" => Ok(Algorithm::Sha256),
            "SHA384" => Ok(Algorithm::Sha384),
            "SHA512" => Ok(Algorithm::Sha512),
            other => Err(ProofError::signing_failure(format!(
                "Unsupported algorithm \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declared_names() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.name().parse::<Algorithm>(), Ok(alg));
        }
    }

    #[test]
    fn rejects_unknown_strength() {
        let err = "SHA128".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, ProofError::SigningFailure(_)));
        // Wire names are not declared strengths.
        assert!("HS256".parse::<Algorithm>().is_err());
        assert!("sha256".parse::<Algorithm>().is_err());
    }

    #[test]
    fn wire_names() {
        assert_eq!(Algorithm::Sha384.hmac_name(), "HS384");
        assert_eq!(Algorithm::Sha512.rsa_name(), "RS512");
        assert_eq!(Algorithm::Sha256.to_string(), "SHA256");
    }
}
