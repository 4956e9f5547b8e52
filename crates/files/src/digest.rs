use pagewatch_types::{Fingerprint, FINGERPRINT_BYTES};
use sha2::{Digest, Sha224};

/// Computes the fingerprint of a normalised document.
///
/// SHA-224 over the UTF-8 bytes of `normalized`, no salt. The same input always
/// produces the same [`Fingerprint`].
pub fn fingerprint(normalized: &str) -> Fingerprint {
    let mut hasher = Sha224::new();
    hasher.update(normalized.as_bytes());
    let hash_array: [u8; FINGERPRINT_BYTES] = hasher.finalize().into();
    Fingerprint::from_digest(&hash_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewatch_types::FINGERPRINT_HEX_LEN;

    #[test]
    fn test_fingerprint_known_vectors() {
        assert_eq!(
            fingerprint("").as_str(),
            "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );
        assert_eq!(
            fingerprint("abc").as_str(),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let page = "<html><body><p>Commencement schedule</p></body></html>";
        assert_eq!(fingerprint(page), fingerprint(page));
    }

    #[test]
    fn test_fingerprint_format() {
        for input in ["", "a", "<html></html>", "ünïcødé ✓", &"x".repeat(10_000)] {
            let fp = fingerprint(input);
            assert_eq!(fp.as_str().len(), FINGERPRINT_HEX_LEN);
            assert!(fp
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }
    }

    #[test]
    fn test_fingerprint_distinguishes_whitespace() {
        assert_ne!(fingerprint("<p>A</p>"), fingerprint("<p>A</p>\n"));
    }
}
