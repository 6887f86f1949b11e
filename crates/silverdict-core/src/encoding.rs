//! URI component encoding the way the backend expects it in path segments.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed escape sequence at byte {0}")]
    MalformedEscape(usize),

    #[error("escaped bytes are not valid UTF-8")]
    InvalidUtf8,
}

pub fn encode_component(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Strict percent-decoding: every `%` must start a two-digit hex escape
pub fn decode_component(text: &str) -> Result<String, DecodeError> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(DecodeError::MalformedEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Canonical path segment for a term that may or may not be encoded already.
///
/// Falls back to encoding the raw text when it does not decode.
pub fn canonical_term(raw: &str) -> String {
    match decode_component(raw) {
        Ok(decoded) => encode_component(&decoded),
        Err(e) => {
            tracing::debug!("term {:?} does not decode ({e}), encoding as-is", raw);
            encode_component(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_encoded_term_is_not_double_encoded() {
        assert_eq!(canonical_term("caf%C3%A9"), "caf%C3%A9");
        assert_eq!(canonical_term("café"), "caf%C3%A9");
    }

    #[test]
    fn malformed_escape_falls_back_to_raw() {
        assert_eq!(
            decode_component("100%zz"),
            Err(DecodeError::MalformedEscape(3))
        );
        assert_eq!(canonical_term("100%"), "100%25");
    }

    #[test]
    fn invalid_utf8_falls_back_to_raw() {
        assert_eq!(decode_component("%FF"), Err(DecodeError::InvalidUtf8));
        assert_eq!(canonical_term("%FF"), "%25FF");
    }

    #[test]
    fn spaces_and_slashes_are_escaped() {
        assert_eq!(canonical_term("a b/c"), "a%20b%2Fc");
    }
}
