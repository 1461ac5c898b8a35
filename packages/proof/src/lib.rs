//! Compact signed tokens (JWT) for authenticating bearers without a round
//! trip to a central authority.
//!
//! A token is `base64url(header).base64url(claims).base64url(signature)`.
//! [`Proof`] encodes a [`Token`] with a [`Signer`] and decodes a token
//! string back into validated claims:
//!
//! - HS256/HS384/HS512 via [`HmacSigner`] (shared secret, constant-time
//!   verification)
//! - RS256/RS384/RS512 via [`KeypairSigner`] (RSA public/private key)
//! - multiple signers selected by the `kid` header
//! - `exp`/`nbf` checks with a configurable leeway
//!
//! ```
//! use proof::{Algorithm, HmacSigner, Proof, Token, json};
//!
//! let proof = Proof::new(HmacSigner::new(Algorithm::Sha256, "supersecret"));
//! let jwt = proof.encode(&Token::new().with_claim("sub", 1234))?;
//! let token = proof.decode(&jwt)?;
//! assert_eq!(token.claim("sub"), Some(&json!(1234)));
//! # Ok::<(), proof::ProofError>(())
//! ```

mod algorithm;
mod clock;
mod encoding;
mod error;
mod header;
mod proof;
pub mod signer;
mod token;

pub use algorithm::Algorithm;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ProofError, ProofResult};
pub use proof::{Proof, ProofBuilder};
pub use signer::{HmacSigner, KeypairSigner, Signer};
pub use token::{CLAIM_EXPIRES_AT, CLAIM_NOT_BEFORE, Token};

// Re-exported so callers can build keys without naming the crate themselves
pub use rsa::{RsaPrivateKey, RsaPublicKey};
pub use serde_json::{Map, Value, json};
