//! RSA keypair signer (RS256, RS384, RS512)
//!
//! Signatures are RSASSA-PKCS1-v1_5 over the declared SHA strength. A signer
//! may hold only a public key (verify-only) or only a private key
//! (sign-only).

use super::Signer;
use crate::algorithm::Algorithm;
use crate::error::{ProofError, ProofResult};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;

const WIRE_NAMES: [&str; 3] = ["RS256", "RS384", "RS512"];

/// Private key bound to its digest, built once per signer
#[derive(Clone)]
enum RsaSigningKey {
    Sha256(SigningKey<Sha256>),
    Sha384(SigningKey<Sha384>),
    Sha512(SigningKey<Sha512>),
}

impl RsaSigningKey {
    fn new(algorithm: Algorithm, key: RsaPrivateKey) -> Self {
        match algorithm {
            Algorithm::Sha256 => Self::Sha256(SigningKey::new(key)),
            Algorithm::Sha384 => Self::Sha384(SigningKey::new(key)),
            Algorithm::Sha512 => Self::Sha512(SigningKey::new(key)),
        }
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, rsa::signature::Error> {
        let signature = match self {
            Self::Sha256(key) => key.try_sign(message)?,
            Self::Sha384(key) => key.try_sign(message)?,
            Self::Sha512(key) => key.try_sign(message)?,
        };
        Ok(signature.to_vec())
    }
}

/// Public key bound to its digest, built once per signer
#[derive(Clone)]
enum RsaVerifyingKey {
    Sha256(VerifyingKey<Sha256>),
    Sha384(VerifyingKey<Sha384>),
    Sha512(VerifyingKey<Sha512>),
}

impl RsaVerifyingKey {
    fn new(algorithm: Algorithm, key: RsaPublicKey) -> Self {
        match algorithm {
            Algorithm::Sha256 => Self::Sha256(VerifyingKey::new(key)),
            Algorithm::Sha384 => Self::Sha384(VerifyingKey::new(key)),
            Algorithm::Sha512 => Self::Sha512(VerifyingKey::new(key)),
        }
    }

    fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match self {
            Self::Sha256(key) => key.verify(message, signature).is_ok(),
            Self::Sha384(key) => key.verify(message, signature).is_ok(),
            Self::Sha512(key) => key.verify(message, signature).is_ok(),
        }
    }
}

/// RSA signer over an optional public and an optional private key
#[derive(Clone)]
pub struct KeypairSigner {
    algorithm: Algorithm,
    verifying_key: Option<RsaVerifyingKey>,
    signing_key: Option<RsaSigningKey>,
}

impl KeypairSigner {
    /// Create a signer from already parsed keys.
    ///
    /// # Errors
    /// `SigningFailure` when neither key is supplied.
    pub fn new(
        algorithm: Algorithm,
        public_key: Option<RsaPublicKey>,
        private_key: Option<RsaPrivateKey>,
    ) -> ProofResult<Self> {
        if public_key.is_none() && private_key.is_none() {
            return Err(ProofError::signing_failure(
                "A public key, a private key or both are required",
            ));
        }
        Ok(Self {
            algorithm,
            verifying_key: public_key.map(|key| RsaVerifyingKey::new(algorithm, key)),
            signing_key: private_key.map(|key| RsaSigningKey::new(algorithm, key)),
        })
    }

    /// Create a signer from PEM text.
    ///
    /// The public key must be SPKI (`BEGIN PUBLIC KEY`); the private key may
    /// be PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`).
    ///
    /// # Errors
    /// `SigningFailure` when a key does not parse or both are absent.
    pub fn from_pem(
        algorithm: Algorithm,
        public_pem: Option<&str>,
        private_pem: Option<&str>,
    ) -> ProofResult<Self> {
        let public_key = public_pem
            .map(|pem| RsaPublicKey::from_public_key_pem(pem).map_err(invalid_public_key))
            .transpose()?;
        let private_key = private_pem.map(parse_private_pem).transpose()?;
        Self::new(algorithm, public_key, private_key)
    }

    /// Create a signer from DER bytes (SPKI public key, PKCS#8 private key).
    ///
    /// # Errors
    /// `SigningFailure` when a key does not parse or both are absent.
    pub fn from_der(
        algorithm: Algorithm,
        public_der: Option<&[u8]>,
        private_der: Option<&[u8]>,
    ) -> ProofResult<Self> {
        let public_key = public_der
            .map(|der| RsaPublicKey::from_public_key_der(der).map_err(invalid_public_key))
            .transpose()?;
        let private_key = private_der
            .map(|der| RsaPrivateKey::from_pkcs8_der(der).map_err(invalid_private_key))
            .transpose()?;
        Self::new(algorithm, public_key, private_key)
    }

    /// Declared hashing strength
    #[must_use]
    pub fn strength(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether this signer can produce signatures
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Whether this signer can check signatures
    #[must_use]
    pub fn can_verify(&self) -> bool {
        self.verifying_key.is_some()
    }
}

fn invalid_public_key(err: impl fmt::Display) -> ProofError {
    ProofError::signing_failure(format!("Invalid RSA public key: {err}"))
}

fn invalid_private_key(err: impl fmt::Display) -> ProofError {
    ProofError::signing_failure(format!("Invalid RSA private key: {err}"))
}

fn parse_private_pem(pem: &str) -> ProofResult<RsaPrivateKey> {
    if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(invalid_private_key)
    } else {
        RsaPrivateKey::from_pkcs8_pem(pem).map_err(invalid_private_key)
    }
}

impl Signer for KeypairSigner {
    fn algorithm(&self) -> &'static str {
        self.algorithm.rsa_name()
    }

    fn supports(&self, algorithm: &str) -> bool {
        WIRE_NAMES.contains(&algorithm)
    }

    fn sign(&self, message: &[u8]) -> ProofResult<Vec<u8>> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| ProofError::signing_failure("No private key provided to sign with"))?;

        key.sign(message)
            .map_err(|e| ProofError::signing_failure(format!("Failed to sign the message: {e}")))
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProofResult<bool> {
        let key = self.verifying_key.as_ref().ok_or_else(|| {
            ProofError::signing_failure("No public key provided to verify with")
        })?;

        // Bytes that cannot even be a signature are a mismatch, not a fault.
        let Ok(signature) = Signature::try_from(signature) else {
            return Ok(false);
        };

        Ok(key.verify(message, &signature))
    }
}

impl fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.can_verify())
            .field("private_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
