//! URL-safe encoding of user ids for emailed activation and reset links.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encodes a user id for embedding in a link path segment.
pub fn encode_uid(user_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(user_id.as_bytes())
}

/// Decodes a link path segment back into a user id. Returns `None` for
/// anything that is not valid base64url over UTF-8.
pub fn decode_uid(encoded: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let id = "0191e4b0-0000-7000-8000-000000000001";
        assert_eq!(decode_uid(&encode_uid(id)).as_deref(), Some(id));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode_uid("!!not-base64!!"), None);
        assert_eq!(decode_uid(&URL_SAFE_NO_PAD.encode([0xff, 0xfe])), None);
    }
}
