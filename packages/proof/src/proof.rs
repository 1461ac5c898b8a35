//! Token encoding and the decode validation pipeline

use crate::clock::{Clock, SystemClock};
use crate::encoding::{base64_url_decode, base64_url_encode, decode_object_segment, encode_segment};
use crate::error::{ProofError, ProofResult};
use crate::header::Header;
use crate::signer::Signer;
use crate::token::{CLAIM_EXPIRES_AT, CLAIM_NOT_BEFORE, Token, integer_timestamp};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Encodes claims into signed tokens and decodes tokens back into
/// validated claims.
///
/// Owns a default signer, an optional map of key id to signer, a leeway in
/// seconds for clock skew, and a clock. Immutable once built, so it can be
/// cloned cheaply and shared between threads.
#[derive(Clone)]
pub struct Proof {
    signer: Arc<dyn Signer>,
    keys: Arc<HashMap<String, Arc<dyn Signer>>>,
    leeway: i64,
    clock: Arc<dyn Clock>,
}

impl Proof {
    /// Proof with a default signer, no key map and zero leeway
    pub fn new(signer: impl Signer) -> Self {
        Self::builder(signer).build()
    }

    /// Start configuring a proof around its default signer
    pub fn builder(signer: impl Signer) -> ProofBuilder {
        ProofBuilder::new(signer)
    }

    /// Leeway in seconds applied to `exp`/`nbf` checks
    #[must_use]
    pub fn leeway(&self) -> i64 {
        self.leeway
    }

    /// Key ids registered in the key map
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Signer registered under `kid`, or the default signer for `None`.
    ///
    /// # Errors
    /// `SignerNotFound` when `kid` is not in the key map.
    pub fn signer(&self, kid: Option<&str>) -> ProofResult<&dyn Signer> {
        match kid {
            None => Ok(self.signer.as_ref()),
            Some(kid) => self
                .keys
                .get(kid)
                .map(|signer| signer.as_ref())
                .ok_or_else(|| ProofError::signer_not_found(kid)),
        }
    }

    /// Encode a token signed with the default signer.
    ///
    /// # Errors
    /// `TokenEncodingFailure` or `SigningFailure`.
    pub fn encode(&self, token: &Token) -> ProofResult<String> {
        self.encode_with(token, None)
    }

    /// Encode a token signed with the signer registered under `kid`, which
    /// is also written to the header.
    ///
    /// # Errors
    /// `SignerNotFound` for an unknown `kid`, otherwise as [`encode`](Self::encode).
    pub fn encode_with_key(&self, token: &Token, kid: &str) -> ProofResult<String> {
        self.encode_with(token, Some(kid))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(kid = ?kid))]
    fn encode_with(&self, token: &Token, kid: Option<&str>) -> ProofResult<String> {
        let signer = self.signer(kid)?;
        let header = Header::new(signer.algorithm(), kid);

        let mut jwt = encode_segment(&header)?;
        jwt.push('.');
        jwt.push_str(&encode_segment(token)?);

        let signature = signer.sign(jwt.as_bytes())?;
        jwt.push('.');
        jwt.push_str(&base64_url_encode(&signature));

        tracing::debug!(algorithm = signer.algorithm(), "token encoded");
        Ok(jwt)
    }

    /// Decode and validate a token.
    ///
    /// Steps run strictly in order and stop at the first failure: split,
    /// header, signer lookup, signature, payload, then `exp`/`nbf`. No claim
    /// is looked at before the signature has been verified.
    ///
    /// # Errors
    /// `InvalidToken`, `SignerNotFound`, `SignatureMismatch`,
    /// `TokenExpired`, `TokenNotReady`, or `SigningFailure` from the signer.
    #[tracing::instrument(level = "debug", skip_all, fields(kid = tracing::field::Empty))]
    pub fn decode(&self, jwt: &str) -> ProofResult<Token> {
        self.decode_inner(jwt).map_err(|err| {
            tracing::debug!(kind = err.kind(), "token rejected");
            err
        })
    }

    fn decode_inner(&self, jwt: &str) -> ProofResult<Token> {
        let (header_b64, payload_b64, signature_b64) = split(jwt)?;

        let header = Header::from_map(&decode_object_segment(header_b64, "header")?)?;
        if let Some(kid) = header.kid.as_deref() {
            tracing::Span::current().record("kid", kid);
        }

        let signer = self.signer(header.kid.as_deref())?;
        if !signer.supports(&header.algo) {
            tracing::debug!(
                header_algo = %header.algo,
                signer_algo = signer.algorithm(),
                "header algorithm is not one the signer produces"
            );
        }

        let signature = base64_url_decode(signature_b64)
            .map_err(|_| ProofError::invalid_token("The token signature is not valid base64url"))?;
        let message = &jwt[..header_b64.len() + 1 + payload_b64.len()];
        if !signer.verify(message.as_bytes(), &signature)? {
            return Err(ProofError::SignatureMismatch);
        }

        let claims = decode_object_segment(payload_b64, "payload")?;
        self.validate_time(&claims)?;

        Ok(Token::from_claims(claims))
    }

    fn validate_time(&self, claims: &Map<String, Value>) -> ProofResult<()> {
        let now = self.clock.now();

        if let Some(exp) = claims.get(CLAIM_EXPIRES_AT) {
            let exp = integer_timestamp(exp)
                .ok_or_else(|| ProofError::invalid_token("The exp claim must be an integer"))?;
            if exp < now.saturating_add(self.leeway) {
                return Err(ProofError::TokenExpired);
            }
        }

        if let Some(nbf) = claims.get(CLAIM_NOT_BEFORE) {
            let nbf = integer_timestamp(nbf)
                .ok_or_else(|| ProofError::invalid_token("The nbf claim must be an integer"))?;
            if nbf > now.saturating_sub(self.leeway) {
                return Err(ProofError::TokenNotReady);
            }
        }

        Ok(())
    }
}

/// Split into exactly three non-empty segments
fn split(jwt: &str) -> ProofResult<(&str, &str, &str)> {
    let mut parts = jwt.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(ProofError::invalid_token("wrong number of parts")),
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&str> = self.key_ids().collect();
        kids.sort_unstable();
        f.debug_struct("Proof")
            .field("algorithm", &self.signer.algorithm())
            .field("keys", &kids)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

/// Configuration for a [`Proof`]
pub struct ProofBuilder {
    signer: Arc<dyn Signer>,
    keys: HashMap<String, Arc<dyn Signer>>,
    leeway: i64,
    clock: Arc<dyn Clock>,
}

impl ProofBuilder {
    /// Builder around the default signer
    pub fn new(signer: impl Signer) -> Self {
        Self {
            signer: Arc::new(signer),
            keys: HashMap::new(),
            leeway: 0,
            clock: Arc::new(SystemClock),
        }
    }

    /// Seconds added to the current time for `exp` and subtracted for `nbf`.
    /// May be negative.
    #[must_use]
    pub fn leeway(mut self, seconds: i64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Register a signer under a key id, replacing any earlier one
    #[must_use]
    pub fn key(mut self, kid: impl Into<String>, signer: impl Signer) -> Self {
        self.keys.insert(kid.into(), Arc::new(signer));
        self
    }

    /// Register several signers sharing ownership with the caller
    #[must_use]
    pub fn keys<K, I>(mut self, keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Arc<dyn Signer>)>,
    {
        self.keys
            .extend(keys.into_iter().map(|(kid, signer)| (kid.into(), signer)));
        self
    }

    /// Time source for `exp`/`nbf` checks
    #[must_use]
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Finish configuration
    #[must_use]
    pub fn build(self) -> Proof {
        Proof {
            signer: self.signer,
            keys: Arc::new(self.keys),
            leeway: self.leeway,
            clock: self.clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::clock::FixedClock;
    use crate::signer::HmacSigner;

    const NOW: i64 = 1_700_000_000;

    fn proof() -> Proof {
        Proof::builder(HmacSigner::new(Algorithm::Sha256, "supersecret"))
            .clock(FixedClock(NOW))
            .build()
    }

    #[test]
    fn split_requires_exactly_three_non_empty_parts() {
        assert_eq!(split("a.b.c").unwrap(), ("a", "b", "c"));
        for bad in ["", "a", "a.b", "a.b.c.d", "a.b.c.", ".b.c", "a..c", "a.b."] {
            assert!(
                matches!(split(bad), Err(ProofError::InvalidToken(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn exp_boundary() {
        let p = proof();
        assert_eq!(
            p.validate_time(Token::new().with_claim("exp", NOW - 1).claims()),
            Err(ProofError::TokenExpired)
        );
        assert!(p.validate_time(Token::new().with_claim("exp", NOW).claims()).is_ok());
    }

    #[test]
    fn nbf_boundary() {
        let p = proof();
        assert_eq!(
            p.validate_time(Token::new().with_claim("nbf", NOW + 1).claims()),
            Err(ProofError::TokenNotReady)
        );
        assert!(p.validate_time(Token::new().with_claim("nbf", NOW).claims()).is_ok());
    }

    #[test]
    fn expired_wins_over_not_ready() {
        let claims = Token::new()
            .with_claim("exp", NOW - 10)
            .with_claim("nbf", NOW + 10);
        assert_eq!(proof().validate_time(claims.claims()), Err(ProofError::TokenExpired));
    }

    #[test]
    fn leeway_saturates() {
        let p = Proof::builder(HmacSigner::new(Algorithm::Sha256, "supersecret"))
            .clock(FixedClock(i64::MAX - 1))
            .leeway(i64::MAX)
            .build();
        let claims = Token::new().with_claim("exp", i64::MAX);
        assert!(p.validate_time(claims.claims()).is_ok());
    }

    #[test]
    fn debug_lists_key_ids_sorted() {
        let p = Proof::builder(HmacSigner::new(Algorithm::Sha256, "a"))
            .key("b", HmacSigner::new(Algorithm::Sha256, "b"))
            .key("a", HmacSigner::new(Algorithm::Sha256, "c"))
            .leeway(5)
            .build();
        let printed = format!("{p:?}");
        assert!(printed.contains(r#"keys: ["a", "b"]"#), "{printed}");
        assert!(printed.contains("leeway: 5"));
    }
}
