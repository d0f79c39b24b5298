//! Adler-32 helpers shared by both directions.

use adler2::Adler32;

/// Returns the id a preset dictionary is announced with: its Adler-32.
pub(crate) fn dictionary_id(dictionary: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.write_slice(dictionary);
    adler.checksum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_adler32_values() {
        assert_eq!(dictionary_id(b""), 1);
        assert_eq!(dictionary_id(b"Wikipedia"), 0x11E6_0398);
    }
}
