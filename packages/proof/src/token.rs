//! Claims container

use crate::error::{ProofError, ProofResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expiration claim name
pub const CLAIM_EXPIRES_AT: &str = "exp";
/// Not-before claim name
pub const CLAIM_NOT_BEFORE: &str = "nbf";

/// Mapping of claim name to JSON value.
///
/// Holds no cryptographic state; serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token {
    claims: Map<String, Value>,
}

impl Token {
    /// Empty token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token wrapping an existing claims map
    #[must_use]
    pub fn from_claims(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Whether the claim is present, even if its value is `null`
    #[must_use]
    pub fn has_claim(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Value of a claim
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Set a claim, replacing any previous value
    pub fn set_claim(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.claims.insert(name.into(), value.into());
    }

    /// Set a claim from any serializable value.
    ///
    /// # Errors
    /// `TokenEncodingFailure` when the value has no JSON representation,
    /// e.g. a map with non-string keys.
    pub fn try_set_claim<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> ProofResult<()> {
        let value =
            serde_json::to_value(value).map_err(|e| ProofError::encoding_failure(e.to_string()))?;
        self.claims.insert(name.into(), value);
        Ok(())
    }

    /// Builder-style [`set_claim`](Self::set_claim)
    #[must_use]
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_claim(name, value);
        self
    }

    /// Remove a claim, returning its value
    pub fn remove_claim(&mut self, name: &str) -> Option<Value> {
        self.claims.remove(name)
    }

    /// `exp` as a Unix timestamp, if present and an integer
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.claim(CLAIM_EXPIRES_AT).and_then(integer_timestamp)
    }

    /// `nbf` as a Unix timestamp, if present and an integer
    #[must_use]
    pub fn not_before(&self) -> Option<i64> {
        self.claim(CLAIM_NOT_BEFORE).and_then(integer_timestamp)
    }

    /// All claims
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Consume the token, returning its claims
    #[must_use]
    pub fn into_claims(self) -> Map<String, Value> {
        self.claims
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the token carries no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterate over claims
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.claims.iter()
    }
}

/// Integer timestamp held by a JSON value.
///
/// Floats and strings are not timestamps. Unsigned values beyond `i64`
/// saturate.
pub(crate) fn integer_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) if n.is_i64() => n.as_i64(),
        Value::Number(n) if n.is_u64() => Some(i64::MAX),
        _ => None,
    }
}

impl From<Map<String, Value>> for Token {
    fn from(claims: Map<String, Value>) -> Self {
        Self::from_claims(claims)
    }
}

impl From<Token> for Map<String, Value> {
    fn from(token: Token) -> Self {
        token.into_claims()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Token {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            claims: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Token {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}

impl<'a> IntoIterator for &'a Token {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_timestamps_only() {
        assert_eq!(integer_timestamp(&json!(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(integer_timestamp(&json!(-5)), Some(-5));
        assert_eq!(integer_timestamp(&json!(u64::MAX)), Some(i64::MAX));
        assert_eq!(integer_timestamp(&json!(1.5)), None);
        assert_eq!(integer_timestamp(&json!("2024-01-01T00:00:00Z")), None);
        assert_eq!(integer_timestamp(&Value::Null), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let token = Token::new().with_claim("sub", 1234);
        assert_eq!(serde_json::to_string(&token).unwrap(), r#"{"sub":1234}"#);
    }
}
