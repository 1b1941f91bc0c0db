//! URL-safe base64 text form of the 16 raw bytes.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

use crate::Uuid;

/// Encodes without padding and accepts input with or without padding.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

impl Uuid {
    /// Returns the 22-character URL-safe base64 representation without padding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timeuuid::Uuid;
    ///
    /// let x = Uuid::try_parse("e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21").unwrap();
    /// assert_eq!(x.to_base64(), "5fYuwA0qEe-fgzWnu55qIQ");
    /// assert_eq!(Uuid::from_base64("5fYuwA0qEe-fgzWnu55qIQ"), Some(x));
    /// ```
    pub fn to_base64(&self) -> String {
        ENGINE.encode(self.as_bytes())
    }

    /// Creates an object from the URL-safe base64 representation, returning `None` if the input
    /// is not valid base64 or does not decode to exactly 16 bytes.
    pub fn from_base64(src: &str) -> Option<Self> {
        let bytes = ENGINE.decode(src).ok()?;
        <[u8; 16]>::try_from(bytes.as_slice()).ok().map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use crate::Uuid;

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [(&'static str, &'static str)] {
        &[
            ("00000000-0000-0000-0000-000000000000", "AAAAAAAAAAAAAAAAAAAAAA"),
            ("ffffffff-ffff-ffff-ffff-ffffffffffff", "_____________________w"),
            ("00000000-0000-1000-8000-000000000000", "AAAAAAAAEACAAAAAAAAAAA"),
            ("e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21", "5fYuwA0qEe-fgzWnu55qIQ"),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        let re = regex::Regex::new(r"^[A-Za-z0-9_-]{22}$").unwrap();
        for (text, compact) in prepare_cases() {
            let e = Uuid::try_parse(text).unwrap();
            assert_eq!(&e.to_base64(), compact);
            assert!(re.is_match(&e.to_base64()));
            assert_eq!(Uuid::from_base64(compact), Some(e));
            assert_eq!(Uuid::from_base64(&format!("{compact}==")), Some(e));
            assert_eq!(
                Uuid::from_base64(compact).map(|e| e.to_base64()),
                Some(e.to_base64())
            );
        }
    }

    /// Restores any 16-byte value from its compact form
    #[test]
    fn restores_any_16_byte_value_from_its_compact_form() {
        use rand::{rngs::StdRng, RngCore, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xba5e);
        for _ in 0..10_000 {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            let e = Uuid::from(bytes);
            let compact = e.to_base64();
            assert_eq!(compact.len(), 22);
            assert_eq!(Uuid::from_base64(&compact), Some(e));
        }
    }

    /// Returns None to wrong length or invalid input
    #[test]
    fn returns_none_to_wrong_length_or_invalid_input() {
        let cases = [
            "",
            "AAAAAAAAAAAAAAAAAAAA",
            "AAAAAAAAAAAAAAAAAAAAAAAA",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "5fYuwA0qEe+fgzWnu55qIQ",
            "5fYuwA0qEe-fgzWnu55q I",
            "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21",
        ];

        for e in cases {
            assert_eq!(Uuid::from_base64(e), None, "{e:?}");
        }
    }
}
