//! Error types for token encoding, decoding and signing

use thiserror::Error;

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// Every way an encode, decode or signer operation can fail.
///
/// An expired token and a forged one surface as different variants, so a
/// caller can answer them differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Structural problem: segment count, base64, JSON, or a wrongly typed
    /// `exp`/`nbf` claim
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Computed signature does not match the one carried by the token
    #[error("Token signature mismatch")]
    SignatureMismatch,

    /// The `exp` claim lies in the past
    #[error("The token has expired")]
    TokenExpired,

    /// The `nbf` claim lies in the future
    #[error("The token is not ready to be accepted yet")]
    TokenNotReady,

    /// No signer is registered under the given key id
    #[error("No signer found for key id \"{0}\"")]
    SignerNotFound(String),

    /// Unsupported algorithm, missing key material or a primitive-level error
    #[error("Signing error: {0}")]
    SigningFailure(String),

    /// Claims could not be serialized to the wire format
    #[error("Failed to encode token: {0}")]
    TokenEncodingFailure(String),
}

impl ProofError {
    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    /// Create a signer not found error
    #[inline]
    #[must_use]
    pub fn signer_not_found(kid: impl Into<String>) -> Self {
        Self::SignerNotFound(kid.into())
    }

    /// Create a signing failure error
    #[inline]
    #[must_use]
    pub fn signing_failure(msg: impl Into<String>) -> Self {
        Self::SigningFailure(msg.into())
    }

    /// Create a token encoding failure error
    #[inline]
    #[must_use]
    pub fn encoding_failure(msg: impl Into<String>) -> Self {
        Self::TokenEncodingFailure(msg.into())
    }

    /// True for the failures produced while validating a received token:
    /// structural, signature and temporal rejections.
    #[must_use]
    pub fn is_decoding_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken(_)
                | Self::SignatureMismatch
                | Self::TokenExpired
                | Self::TokenNotReady
        )
    }

    /// True when the token was otherwise valid but outside its time window
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenNotReady)
    }

    /// Short stable name of the error kind, safe to put in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidToken(_) => "invalid_token",
            Self::SignatureMismatch => "signature_mismatch",
            Self::TokenExpired => "token_expired",
            Self::TokenNotReady => "token_not_ready",
            Self::SignerNotFound(_) => "signer_not_found",
            Self::SigningFailure(_) => "signing_failure",
            Self::TokenEncodingFailure(_) => "token_encoding_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_family_excludes_configuration_errors() {
        assert!(ProofError::invalid_token("x").is_decoding_error());
        assert!(ProofError::SignatureMismatch.is_decoding_error());
        assert!(ProofError::TokenExpired.is_decoding_error());
        assert!(ProofError::TokenNotReady.is_decoding_error());
        assert!(!ProofError::signer_not_found("k1").is_decoding_error());
        assert!(!ProofError::signing_failure("x").is_decoding_error());
        assert!(!ProofError::encoding_failure("x").is_decoding_error());
    }

    #[test]
    fn temporal_errors() {
        assert!(ProofError::TokenExpired.is_temporal());
        assert!(ProofError::TokenNotReady.is_temporal());
        assert!(!ProofError::SignatureMismatch.is_temporal());
    }

    #[test]
    fn display_includes_key_id() {
        let err = ProofError::signer_not_found("k9");
        assert_eq!(err.to_string(), "No signer found for key id \"k9\"");
        assert_eq!(err.kind(), "signer_not_found");
    }
}
