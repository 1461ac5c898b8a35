//! Token header segment

use crate::error::{ProofError, ProofResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Value of the `typ` header field
pub(crate) const TOKEN_TYPE: &str = "JWT";

/// Token header: `{"algo": .., "typ": "JWT"[, "kid": ..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Header {
    /// Wire algorithm name of the signer, e.g. `HS256`
    pub algo: String,
    /// Token type, always `JWT` when produced by this crate
    pub typ: String,
    /// Key id of the signer that produced the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Header {
    /// Header for a token signed with `algo`, optionally naming the key id
    pub(crate) fn new(algo: &str, kid: Option<&str>) -> Self {
        Self {
            algo: algo.to_string(),
            typ: TOKEN_TYPE.to_string(),
            kid: kid.map(str::to_string),
        }
    }

    /// Read a header from its decoded JSON object.
    ///
    /// Only `kid` is interpreted; a missing `algo`/`typ` is tolerated and
    /// left empty, but a present `kid` must be a string.
    pub(crate) fn from_map(map: &Map<String, Value>) -> ProofResult<Self> {
        let kid = match map.get("kid") {
            None => None,
            Some(Value::String(kid)) => Some(kid.clone()),
            Some(_) => return Err(ProofError::invalid_token("Header kid must be a string")),
        };
        let text = |field: &str| {
            map.get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Ok(Self {
            algo: text("algo"),
            typ: text("typ"),
            kid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kid_is_omitted_when_absent() {
        let json = serde_json::to_string(&Header::new("HS256", None)).unwrap();
        assert_eq!(json, r#"{"algo":"HS256","typ":"JWT"}"#);

        let json = serde_json::to_string(&Header::new("RS512", Some("k1"))).unwrap();
        assert_eq!(json, r#"{"algo":"RS512","typ":"JWT","kid":"k1"}"#);
    }

    #[test]
    fn from_map_reads_kid() {
        let map = json!({"algo": "HS256", "typ": "JWT", "kid": "1234"});
        let header = Header::from_map(map.as_object().unwrap()).unwrap();
        assert_eq!(header, Header::new("HS256", Some("1234")));
    }

    #[test]
    fn from_map_tolerates_missing_fields() {
        let header = Header::from_map(&Map::new()).unwrap();
        assert!(header.algo.is_empty());
        assert!(header.typ.is_empty());
        assert_eq!(header.kid, None);
    }

    #[test]
    fn from_map_rejects_non_string_kid() {
        let map = json!({"algo": "HS256", "kid": 7});
        let err = Header::from_map(map.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ProofError::InvalidToken(_)));
    }
}
