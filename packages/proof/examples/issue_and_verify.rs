//! Issue a token with a keyed RSA signer and verify it on the consumer side.
//!
//! Run with `RUST_LOG=proof=debug` to see signer resolution and rejections.

use proof::{Algorithm, HmacSigner, KeypairSigner, Proof, ProofError, Token, json};
use tracing_subscriber::EnvFilter;

const PUBLIC: &str = include_str!("../tests/keys/public.pem");
const PRIVATE: &str = include_str!("../tests/keys/private.pem");

fn main() -> Result<(), ProofError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let session_secret = HmacSigner::new(Algorithm::Sha256, "an-example-secret-of-32-bytes-min");

    // Issuer: signs with the private key registered as "2024-rsa"
    let issuer = Proof::builder(session_secret.clone())
        .key(
            "2024-rsa",
            KeypairSigner::from_pem(Algorithm::Sha256, None, Some(PRIVATE))?,
        )
        .build();

    let now = chrono::Utc::now().timestamp();
    let token = Token::new()
        .with_claim("sub", "816d83f0-2f71-4457-bd8b-bb674bda093d")
        .with_claim("scope", json!(["orders:read"]))
        .with_claim("nbf", now)
        .with_claim("exp", now + 900);
    let jwt = issuer.encode_with_key(&token, "2024-rsa")?;
    println!("issued: {jwt}");

    // Consumer: only holds the public key, tolerates 5s of clock skew
    let consumer = Proof::builder(session_secret)
        .key(
            "2024-rsa",
            KeypairSigner::from_pem(Algorithm::Sha256, Some(PUBLIC), None)?,
        )
        .leeway(-5)
        .build();

    let verified = consumer.decode(&jwt)?;
    println!("subject: {}", verified.claim("sub").unwrap_or(&json!(null)));

    match consumer.decode(&format!("{jwt}x")) {
        Err(err) if err.is_decoding_error() => println!("tampered token rejected: {err}"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}
