//! Base64 transcoding for the signature attachment.
//!
//! Standard alphabet (`A-Z a-z 0-9 + /`) with `=` padding. Output of
//! [`encode_base64`] is always `4 * ceil(n / 3)` characters long.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Input must be padded to a multiple of four characters. Nothing is
/// returned on failure, so a partially decoded buffer is never observed.
///
/// # Errors
///
/// Returns [`Error::InvalidBase64Length`] if the length is not a multiple
/// of four, or [`Error::Base64Decode`] if the input contains a character
/// outside the alphabet or misplaced padding.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    if data.len() % 4 != 0 {
        return Err(Error::InvalidBase64Length(data.len()));
    }
    STANDARD.decode(data).map_err(Into::into)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::unreadable_literal)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_known_vectors() {
        assert_eq!(encode_base64(b""), "");
        assert_eq!(encode_base64(b"f"), "Zg==");
        assert_eq!(encode_base64(b"fo"), "Zm8=");
        assert_eq!(encode_base64(b"foo"), "Zm9v");
        assert_eq!(encode_base64(b"foob"), "Zm9vYg==");
    }

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_base64_decode_padding() {
        assert_eq!(decode_base64("Zg==").unwrap(), b"f");
        assert_eq!(decode_base64("Zm8=").unwrap(), b"fo");
        assert_eq!(decode_base64("").unwrap(), b"");
    }

    #[test]
    fn test_base64_decode_bad_length() {
        let err = decode_base64("Zm9vY").unwrap_err();
        assert!(matches!(err, Error::InvalidBase64Length(5)));

        let err = decode_base64("Zg").unwrap_err();
        assert!(matches!(err, Error::InvalidBase64Length(2)));
    }

    #[test]
    fn test_base64_decode_bad_alphabet() {
        let err = decode_base64("Zm9*").unwrap_err();
        assert!(matches!(err, Error::Base64Decode(_)));

        let err = decode_base64("Zm 9").unwrap_err();
        assert!(matches!(err, Error::Base64Decode(_)));
    }

    #[test]
    fn test_base64_encoded_length() {
        for n in 0..32 {
            let data = vec![0xA5u8; n];
            assert_eq!(encode_base64(&data).len(), 4 * n.div_ceil(3));
        }
    }

    proptest! {
        #[test]
        fn base64_round_trip(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            let encoded = encode_base64(&data);
            prop_assert_eq!(decode_base64(&encoded).unwrap(), data);
        }
    }
}
