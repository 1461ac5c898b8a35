//! Base64url and JSON helpers for the three token segments

use crate::error::{ProofError, ProofResult};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Base64url encoding without padding
#[inline]
pub(crate) fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64url decoding.
///
/// Also accepts the standard alphabet and `=` padding, so segments produced
/// by plain base64 encoders still decode.
pub(crate) fn base64_url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = input
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    STANDARD_NO_PAD.decode(normalized)
}

/// Serialize a value to a base64url JSON segment
pub(crate) fn encode_segment<T: Serialize + ?Sized>(value: &T) -> ProofResult<String> {
    let json = serde_json::to_vec(value).map_err(|e| ProofError::encoding_failure(e.to_string()))?;
    Ok(base64_url_encode(&json))
}

/// Decode a base64url JSON segment that must hold an object
pub(crate) fn decode_object_segment(segment: &str, what: &str) -> ProofResult<Map<String, Value>> {
    let bytes = base64_url_decode(segment).map_err(|_| {
        ProofError::invalid_token(format!("The token {what} is not valid base64url"))
    })?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ProofError::invalid_token(format!(
            "The token {what} is not a JSON object"
        ))),
        Err(_) => Err(ProofError::invalid_token(format!(
            "The token {what} could not be JSON decoded"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn encode_is_url_safe_and_unpadded() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet
        assert_eq!(base64_url_encode(&[0xfb, 0xff]), "-_8");
        assert_eq!(base64_url_encode(b""), "");
    }

    #[test]
    fn decode_accepts_both_alphabets_and_padding() {
        let bytes = [0xfb, 0xff, 0x00, 0x10];
        assert_eq!(base64_url_decode(&base64_url_encode(&bytes)).unwrap(), bytes);
        assert_eq!(base64_url_decode(&STANDARD.encode(bytes)).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(base64_url_decode("not*base64").is_err());
    }

    #[test]
    fn object_segment_must_be_an_object() {
        let array = base64_url_encode(b"[1,2,3]");
        let err = decode_object_segment(&array, "payload").unwrap_err();
        assert!(matches!(err, ProofError::InvalidToken(_)));

        let text = base64_url_encode(b"InvalidJsonPayload");
        let err = decode_object_segment(&text, "payload").unwrap_err();
        assert!(matches!(err, ProofError::InvalidToken(_)));

        let ok = base64_url_encode(br#"{"sub":1234}"#);
        let map = decode_object_segment(&ok, "payload").unwrap();
        assert_eq!(map.get("sub"), Some(&Value::from(1234)));
    }
}
