use fstr::FStr;
use std::{fmt, str};

use crate::codec;

/// Represents a Universally Unique IDentifier.
///
/// The value is an opaque 16-byte array in RFC 4122 field order. `Ord` compares values by their
/// logical time-based fields rather than by raw bytes; see [`crate::ordering`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// Length of the 8-4-4-4-12 canonical string representation.
const CANONICAL_LEN: usize = 36;

/// Positions of hyphens in the canonical string representation.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID byte array from UUIDv1 field values.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` exceeds 60 bits, `clock_seq` exceeds 14 bits, or `node` exceeds 48
    /// bits.
    pub const fn from_fields_v1(timestamp: u64, clock_seq: u16, node: u64) -> Self {
        if timestamp >= 1 << 60 || clock_seq >= 1 << 14 || node >= 1 << 48 {
            panic!("invalid field value");
        }

        Self([
            (timestamp >> 24) as u8,
            (timestamp >> 16) as u8,
            (timestamp >> 8) as u8,
            timestamp as u8,
            (timestamp >> 40) as u8,
            (timestamp >> 32) as u8,
            0x10 | (timestamp >> 56) as u8,
            (timestamp >> 48) as u8,
            0x80 | (clock_seq >> 8) as u8,
            clock_seq as u8,
            (node >> 40) as u8,
            (node >> 32) as u8,
            (node >> 24) as u8,
            (node >> 16) as u8,
            (node >> 8) as u8,
            node as u8,
        ])
    }

    /// Returns the 60-bit count of 100-nanosecond intervals since the UUID epoch
    /// (1582-10-15T00:00:00Z), recombined from the `time_low`, `time_mid`, and `time_hi` fields.
    ///
    /// The result is meaningful only for time-based UUIDs.
    pub const fn timestamp(&self) -> u64 {
        let b = &self.0;
        ((b[6] & 0x0f) as u64) << 56
            | (b[7] as u64) << 48
            | (b[4] as u64) << 40
            | (b[5] as u64) << 32
            | (b[0] as u64) << 24
            | (b[1] as u64) << 16
            | (b[2] as u64) << 8
            | b[3] as u64
    }

    /// Returns the 14-bit clock sequence.
    pub const fn clock_sequence(&self) -> u16 {
        ((self.0[8] & 0x3f) as u16) << 8 | self.0[9] as u16
    }

    /// Returns the 48-bit node identifier.
    pub const fn node(&self) -> u64 {
        let b = &self.0;
        (b[10] as u64) << 40
            | (b[11] as u64) << 32
            | (b[12] as u64) << 24
            | (b[13] as u64) << 16
            | (b[14] as u64) << 8
            | b[15] as u64
    }

    /// Returns the Unix timestamp in milliseconds encoded in a time-based UUID.
    pub const fn millis(&self) -> i64 {
        codec::unpack_millis(self)
    }

    /// Returns the Unix timestamp in microseconds encoded in a time-based UUID.
    pub const fn micros(&self) -> i64 {
        codec::unpack_micros(self)
    }

    /// Reports the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 4 {
            0x0..=0x7 => Variant::Var0,
            0x8..=0xb => Variant::Var10,
            0xc..=0xd => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the version field value of the UUID or `None` if the UUID does not have the
    /// variant field value of `10`.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timeuuid::Uuid;
    ///
    /// let x = "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21");
    /// assert_eq!(format!("{}", y), "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21");
    /// # Ok::<(), timeuuid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<CANONICAL_LEN> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; CANONICAL_LEN];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            let e = *e as usize;
            if let Some(slot) = buf_iter.next() {
                *slot = DIGITS[e >> 4];
            }
            if let Some(slot) = buf_iter.next() {
                *slot = DIGITS[e & 15];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(slot) = buf_iter.next() {
                    *slot = b'-';
                }
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: `buffer` only contains ASCII hex digits and hyphens.
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Parses the 8-4-4-4-12 hexadecimal string representation, returning `None` on malformed
    /// input.
    ///
    /// ```rust
    /// use timeuuid::Uuid;
    ///
    /// let x = Uuid::try_parse("00000000-0000-1000-8000-000000000000").unwrap();
    /// assert_eq!(x.version(), Some(1));
    /// assert!(Uuid::try_parse("000000000000-1000-8000-000000000000").is_none());
    /// ```
    pub fn try_parse(src: &str) -> Option<Self> {
        src.parse().ok()
    }

    /// Returns `true` if `src` is a valid canonical string representation.
    pub fn is_uuid(src: &str) -> bool {
        Self::try_parse(src).is_some()
    }

    /// Returns `true` if `src` begins with a valid canonical string representation.
    pub fn starts_with_uuid(src: &str) -> bool {
        Self::try_extract(src).is_some()
    }

    /// Parses the canonical string representation at the beginning of `src`, ignoring whatever
    /// follows it.
    pub fn try_extract(src: &str) -> Option<Self> {
        Self::try_extract_at(src, 0)
    }

    /// Parses the canonical string representation that starts at byte `offset` of `src`.
    ///
    /// Returns `None` if fewer than 36 bytes remain after `offset` or the slice is malformed.
    pub fn try_extract_at(src: &str, offset: usize) -> Option<Self> {
        let end = offset.checked_add(CANONICAL_LEN)?;
        src.get(offset..end).and_then(Self::try_parse)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    ///
    /// The length and hyphen positions are checked before any hex digit is decoded.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let src = src.as_bytes();
        if src.len() != CANONICAL_LEN || HYPHEN_POSITIONS.iter().any(|&i| src[i] != b'-') {
            return Err(ERR);
        }

        let mut dst = [0u8; 16];
        let mut iter = src
            .iter()
            .enumerate()
            .filter(|(i, _)| !HYPHEN_POSITIONS.contains(i))
            .map(|(_, &c)| (c as char).to_digit(16).ok_or(ERR));
        for e in dst.iter_mut() {
            let hi = iter.next().ok_or(ERR)?? as u8;
            let lo = iter.next().ok_or(ERR)?? as u8;
            *e = (hi << 4) | lo;
        }
        Ok(Self(dst))
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// UUID variants defined by RFC 4122.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0xx` (NCS backward compatibility)
    Var0,
    /// `10x` (RFC 4122)
    Var10,
    /// `110` (Microsoft backward compatibility)
    Var110,
    /// `111` (reserved for future definition)
    VarReserved,
}

/// Error parsing an invalid string representation of UUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid string representation")
    }
}

impl std::error::Error for ParseError {}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
