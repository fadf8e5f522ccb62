//! `data:` URIs for covers carried inline in records and snapshots.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Guess an image mime type from its leading bytes.
#[must_use]
pub fn sniff_mime(data: &[u8]) -> &'static str {
    match data {
        [0xff, 0xd8, 0xff, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => FALLBACK_MIME,
    }
}

/// Encode bytes as a base64 data URI.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(data), STANDARD.encode(data))
}

/// Decode a base64 data URI. Anything else (plain URLs, non-base64 data
/// URIs, bad padding) is `None`.
#[must_use]
pub fn decode(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sniffs_mime() {
        assert!(encode(&[0xff, 0xd8, 0xff, 0xe0]).starts_with("data:image/jpeg;base64,"));
        assert!(encode(b"\x89PNG\r\n").starts_with("data:image/png;base64,"));
        assert!(encode(b"hello").starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_decode_reverses_encode() {
        let data = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
        assert_eq!(decode(&encode(&data)), Some(data));
    }

    #[test]
    fn test_decode_tolerates_wrapped_payload() {
        assert_eq!(decode("data:image/png;base64,aGVs\nbG8="), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_decode_rejects_other_uris() {
        assert_eq!(decode("https://example.com/cover.jpg"), None);
        assert_eq!(decode("data:text/plain,hello"), None);
        assert_eq!(decode("data:image/png;base64,@@@"), None);
    }
}
