//! Payload encodings
//!
//! Text decoding for reads and payload decoding for writes. Binary content
//! crosses the call boundary as base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Text encoding requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Utf16,
}

impl Encoding {
    /// Parse an encoding tag. Unknown tags decode as UTF-8.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "ascii" => Encoding::Ascii,
            "utf16" | "utf-16" => Encoding::Utf16,
            _ => Encoding::Utf8,
        }
    }

    /// Decode raw bytes to text, replacing invalid sequences
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Encoding::Utf16 => decode_utf16(bytes),
        }
    }
}

/// UTF-16 with byte-order-mark detection, big-endian when no mark is present
fn decode_utf16(bytes: &[u8]) -> String {
    let (little_endian, body) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = body.chunks(2).map(|pair| match pair {
        [a, b] if little_endian => u16::from_le_bytes([*a, *b]),
        [a, b] => u16::from_be_bytes([*a, *b]),
        // dangling odd byte
        _ => 0xFFFD,
    });

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Bytes to write for a payload.
///
/// With an encoding the text is written as UTF-8. Without one the payload is
/// base64; if it does not decode, its literal bytes are written instead.
pub fn payload_bytes(data: &str, encoding: Option<Encoding>) -> Vec<u8> {
    match encoding {
        Some(_) => data.as_bytes().to_vec(),
        None => STANDARD
            .decode(data)
            .unwrap_or_else(|_| data.as_bytes().to_vec()),
    }
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_case_insensitive_with_utf8_fallback() {
        assert_eq!(Encoding::parse("UTF-16"), Encoding::Utf16);
        assert_eq!(Encoding::parse("ascii"), Encoding::Ascii);
        assert_eq!(Encoding::parse("latin1"), Encoding::Utf8);
    }

    #[test]
    fn utf16_honours_byte_order_mark() {
        assert_eq!(Encoding::Utf16.decode(&[0xFF, 0xFE, b'h', 0, b'i', 0]), "hi");
        assert_eq!(Encoding::Utf16.decode(&[0, b'h', 0, b'i']), "hi");
    }

    #[test]
    fn ascii_replaces_high_bytes() {
        assert_eq!(Encoding::Ascii.decode(&[b'o', b'k', 0xC3]), "ok\u{FFFD}");
    }

    #[test]
    fn invalid_base64_falls_back_to_literal_text() {
        assert_eq!(payload_bytes("aGVsbG8=", None), b"hello");
        assert_eq!(payload_bytes("not base64!", None), b"not base64!");
        assert_eq!(payload_bytes("aGVsbG8=", Some(Encoding::Utf8)), b"aGVsbG8=");
    }
}
