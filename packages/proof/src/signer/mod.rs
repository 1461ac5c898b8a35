//! Signing capability and its HMAC and RSA implementations

mod hmac;
mod keypair;

pub use self::hmac::HmacSigner;
pub use self::keypair::KeypairSigner;

use crate::error::ProofResult;
use std::sync::Arc;

/// One cryptographic algorithm instance bound to its key material.
///
/// Implementations are immutable after construction and must be
/// thread-safe, so a single signer can back many concurrent decodes.
pub trait Signer: Send + Sync + 'static {
    /// Wire algorithm name written to the token header, e.g. `HS256`.
    fn algorithm(&self) -> &'static str;

    /// Whether `algorithm` is one of the wire names this signer family
    /// produces.
    fn supports(&self, algorithm: &str) -> bool;

    /// Sign `message`, returning raw signature bytes.
    ///
    /// # Errors
    /// `SigningFailure` when required key material is absent or the
    /// primitive fails.
    fn sign(&self, message: &[u8]) -> ProofResult<Vec<u8>>;

    /// Check `signature` over `message`.
    ///
    /// A mismatch is `Ok(false)`, never an error.
    ///
    /// # Errors
    /// `SigningFailure` on missing key material or a primitive-level error.
    fn verify(&self, message: &[u8], signature: &[u8]) -> ProofResult<bool>;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn algorithm(&self) -> &'static str {
        (**self).algorithm()
    }

    fn supports(&self, algorithm: &str) -> bool {
        (**self).supports(algorithm)
    }

    fn sign(&self, message: &[u8]) -> ProofResult<Vec<u8>> {
        (**self).sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProofResult<bool> {
        (**self).verify(message, signature)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn algorithm(&self) -> &'static str {
        (**self).algorithm()
    }

    fn supports(&self, algorithm: &str) -> bool {
        (**self).supports(algorithm)
    }

    fn sign(&self, message: &[u8]) -> ProofResult<Vec<u8>> {
        (**self).sign(message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> ProofResult<bool> {
        (**self).verify(message, signature)
    }
}
