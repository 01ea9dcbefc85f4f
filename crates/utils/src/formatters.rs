// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Hex display for byte payloads that keeps logs readable for large ciphertexts
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(hex::encode(data)))
}

fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len() / 2, start, end)
    }
}

/// Decode hex text as found on the wire: surrounding whitespace and a `0x` prefix are allowed
pub fn decode_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Show<'a>(&'a [u8]);
    impl fmt::Display for Show<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            hexf(self.0, f)
        }
    }

    #[test]
    fn test_hexf_truncates_long_payloads() {
        assert_eq!(Show(&[0xde, 0xad]).to_string(), "0xdead");
        let long = vec![0xab; 200];
        let shown = Show(&long).to_string();
        assert!(shown.starts_with("<bytes(200):0xabab"));
    }

    #[test]
    fn test_decode_hex_accepts_prefix_and_whitespace() {
        assert_eq!(decode_hex(" 0xBEEF\n").unwrap(), vec![0xbe, 0xef]);
        assert_eq!(decode_hex("beef").unwrap(), vec![0xbe, 0xef]);
        assert!(decode_hex("xyz").is_err());
        assert!(decode_hex("abc").is_err());
    }
}
