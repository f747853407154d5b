use super::strip_bom;

pub struct TextExtractor;

impl TextExtractor {
    /// Decode as UTF-8, replacing malformed sequences with U+FFFD.
    pub fn extract(bytes: &[u8]) -> String {
        String::from_utf8_lossy(strip_bom(bytes)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped() {
        let bytes = [0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(TextExtractor::extract(&bytes), "hi");
    }

    #[test]
    fn test_malformed_utf8_is_replaced() {
        let bytes = [b'c', b'a', b'f', 0xC3, b'!', 0xFF];
        assert_eq!(TextExtractor::extract(&bytes), "caf\u{FFFD}!\u{FFFD}");
    }
}
