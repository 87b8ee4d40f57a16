use arx_types::ArticleId;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Streaming 64-bit FNV-1a state.
///
/// Each input unit is XORed into the accumulator, which is then multiplied
/// by [`FNV_PRIME`] modulo 2^64. A unit is either a byte or, for text, the
/// Unicode scalar value of a character. Feeding text character by character
/// (rather than as UTF-8 bytes) is what makes digests of non-ASCII content
/// match existing catalogs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    /// A fresh state at the offset basis.
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    #[inline]
    fn mix(&mut self, unit: u64) {
        self.state ^= unit;
        self.state = self.state.wrapping_mul(FNV_PRIME);
    }

    /// Mix in raw bytes, one unit per byte.
    pub fn update_bytes(&mut self, data: &[u8]) -> &mut Self {
        for &byte in data {
            self.mix(u64::from(byte));
        }
        self
    }

    /// Mix in a single character as its code point.
    pub fn update_char(&mut self, c: char) -> &mut Self {
        self.mix(u64::from(u32::from(c)));
        self
    }

    /// Mix in text, one unit per character.
    pub fn update_str(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.update_char(c);
        }
        self
    }

    /// The current digest value.
    pub const fn finish(&self) -> u64 {
        self.state
    }

    /// The current digest as an article id.
    pub fn finish_id(&self) -> ArticleId {
        ArticleId::from_digest(self.state)
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes article identities from payload content.
pub struct ContentHasher;

impl ContentHasher {
    /// Digest of text, hashing each character's code point.
    pub fn hash_text(text: &str) -> ArticleId {
        Fnv1a64::new().update_str(text).finish_id()
    }

    /// Digest of raw bytes, hashing each byte.
    pub fn hash_bytes(data: &[u8]) -> ArticleId {
        Fnv1a64::new().update_bytes(data).finish_id()
    }

    /// Digest of payload content read from disk.
    ///
    /// UTF-8 content is hashed as text with line endings normalized: `\r\n`
    /// and a lone `\r` both hash as `\n`, as when the file is read in text
    /// mode. Anything else is hashed byte by byte, which equals hashing the
    /// content decoded as Latin-1.
    pub fn hash_content(content: &[u8]) -> ArticleId {
        match std::str::from_utf8(content) {
            Ok(text) => {
                let mut state = Fnv1a64::new();
                let mut chars = text.chars().peekable();
                while let Some(c) = chars.next() {
                    if c == '\r' {
                        if chars.peek() != Some(&'\n') {
                            state.update_char('\n');
                        }
                    } else {
                        state.update_char(c);
                    }
                }
                state.finish_id()
            }
            Err(_) => Self::hash_bytes(content),
        }
    }

    /// Verify that content produces the expected id.
    pub fn verify(content: &[u8], expected: &ArticleId) -> bool {
        Self::hash_content(content) == *expected
    }

    /// Raw digest value of text.
    pub fn raw_text(text: &str) -> u64 {
        Fnv1a64::new().update_str(text).finish()
    }

    /// Raw digest value of bytes.
    pub fn raw_bytes(data: &[u8]) -> u64 {
        Fnv1a64::new().update_bytes(data).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(ContentHasher::hash_text("").as_str(), "cbf29ce484222325");
        assert_eq!(ContentHasher::hash_bytes(b"").as_str(), "cbf29ce484222325");
    }

    #[test]
    fn known_vectors() {
        assert_eq!(ContentHasher::raw_text("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(ContentHasher::raw_text("foobar"), 0x8594_4171_f739_67e8);
        assert_eq!(ContentHasher::hash_text("foobar").as_str(), "85944171f73967e8");
    }

    #[test]
    fn hash_is_deterministic() {
        let id1 = ContentHasher::hash_text("hello world");
        let id2 = ContentHasher::hash_text("hello world");
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_content_produces_different_ids() {
        assert_ne!(ContentHasher::hash_text("aaa"), ContentHasher::hash_text("bbb"));
    }

    #[test]
    fn ascii_text_matches_bytes() {
        let text = "The quick brown fox";
        assert_eq!(ContentHasher::hash_text(text), ContentHasher::hash_bytes(text.as_bytes()));
    }

    #[test]
    fn text_hashes_code_points_not_utf8_bytes() {
        // U+00E9 is one unit of value 0xE9, not the two UTF-8 bytes C3 A9.
        assert_eq!(ContentHasher::hash_text("é"), ContentHasher::hash_bytes(&[0xe9]));
        assert_ne!(ContentHasher::hash_text("é"), ContentHasher::hash_bytes("é".as_bytes()));
    }

    #[test]
    fn wide_code_points_are_mixed_whole() {
        let expected = (FNV_OFFSET_BASIS ^ 0x20ac).wrapping_mul(FNV_PRIME);
        assert_eq!(ContentHasher::raw_text("€"), expected);
    }

    #[test]
    fn content_falls_back_to_bytes_for_invalid_utf8() {
        let latin1 = [b'c', b'a', b'f', 0xe9];
        assert_eq!(ContentHasher::hash_content(&latin1), ContentHasher::hash_text("café"));
    }

    #[test]
    fn content_uses_text_rule_for_utf8() {
        let text = "señor";
        assert_eq!(ContentHasher::hash_content(text.as_bytes()), ContentHasher::hash_text(text));
    }

    #[test]
    fn content_normalizes_line_endings() {
        let unix = ContentHasher::hash_text("a\nb");
        assert_eq!(unix.as_str(), "e5beb1190415e670");
        assert_eq!(ContentHasher::hash_content(b"a\r\nb"), unix);
        assert_eq!(ContentHasher::hash_content(b"a\rb"), unix);
        assert_eq!(ContentHasher::hash_content(b"a\nb"), unix);
        assert_eq!(
            ContentHasher::hash_content(b"x\r\r\n"),
            ContentHasher::hash_text("x\n\n")
        );
        // Raw text hashing keeps carriage returns.
        assert_ne!(ContentHasher::hash_text("a\r\nb"), unix);
    }

    #[test]
    fn verify_correct_and_tampered() {
        let id = ContentHasher::hash_content(b"original");
        assert!(ContentHasher::verify(b"original", &id));
        assert!(!ContentHasher::verify(b"tampered", &id));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut state = Fnv1a64::new();
        state.update_str("hello ").update_str("world");
        assert_eq!(state.finish_id(), ContentHasher::hash_text("hello world"));
    }

    #[test]
    fn ids_are_unpadded() {
        // Digest values with leading zero nibbles render shorter than 16.
        let id = ArticleId::from_digest(0x00ff);
        assert_eq!(id.as_str(), "ff");
    }

    proptest! {
        #[test]
        fn hash_text_is_deterministic(s in ".*") {
            prop_assert_eq!(ContentHasher::hash_text(&s), ContentHasher::hash_text(&s));
        }

        #[test]
        fn ids_are_well_formed_digests(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let id = ContentHasher::hash_content(&data);
            prop_assert!(id.is_digest());
            prop_assert!(id.as_str().len() <= 16);
        }
    }
}
