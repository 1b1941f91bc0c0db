//! Conversion between Unix milliseconds and the split RFC 4122 timestamp fields.
//!
//! A time-based UUID stores a 60-bit count of 100-nanosecond ticks since 1582-10-15T00:00:00Z.
//! [`pack`] converts a Unix timestamp in milliseconds plus a sub-millisecond tick offset into that
//! count and scatters it across the `time_low`, `time_mid`, and `time_hi_and_version` fields;
//! [`unpack_millis`] reverses the conversion at millisecond resolution.

use crate::Uuid;

/// Number of 100-nanosecond ticks between the UUID epoch (1582-10-15) and the Unix epoch.
pub const UUID_EPOCH_OFFSET_TICKS: i64 = 0x01b2_1dd2_1381_4000;

/// Number of 100-nanosecond ticks in a millisecond.
pub const TICKS_PER_MILLI: i64 = 10_000;

/// Number of 100-nanosecond ticks in a microsecond.
const TICKS_PER_MICRO: i64 = 10;

/// The greatest sub-tick offset that still falls within the same millisecond.
pub const MAX_SUB_TICK_OFFSET: u16 = (TICKS_PER_MILLI - 1) as u16;

const TIMESTAMP_MASK: u64 = (1 << 60) - 1;
const CLOCK_SEQ_MASK: u16 = (1 << 14) - 1;
const NODE_MASK: u64 = (1 << 48) - 1;

/// The least time-based UUID (00000000-0000-1000-8000-000000000000)
pub const MIN_TIME_UUID: Uuid = Uuid::from_fields_v1(0, 0, 0);

/// The greatest time-based UUID (ffffffff-ffff-1fff-bfff-ffffffffffff)
pub const MAX_TIME_UUID: Uuid = Uuid::from_fields_v1(TIMESTAMP_MASK, CLOCK_SEQ_MASK, NODE_MASK);

/// Converts a Unix timestamp in milliseconds and a sub-millisecond offset into the 60-bit UUID
/// timestamp.
const fn to_ticks(millis: i64, sub_tick_offset: u16) -> u64 {
    let ticks = millis
        .wrapping_mul(TICKS_PER_MILLI)
        .wrapping_add(UUID_EPOCH_OFFSET_TICKS)
        .wrapping_add(sub_tick_offset as i64);
    ticks as u64 & TIMESTAMP_MASK
}

/// Assembles a time-based UUID from a Unix timestamp in milliseconds, an offset in 100-nanosecond
/// ticks within that millisecond, a clock sequence, and a node identifier.
///
/// The version nibble is forced to `0001` and the variant bits to `10`. `clock_seq` and `node`
/// are truncated to 14 and 48 bits respectively. `sub_tick_offset` is not validated; offsets of
/// 10,000 or more simply carry into the following millisecond.
///
/// # Examples
///
/// ```rust
/// use timeuuid::codec;
///
/// let uuid = codec::pack(1_700_000_000_000, 0, 0, 0);
/// assert_eq!(uuid.to_string(), "04afc000-833b-11ee-8000-000000000000");
/// assert_eq!(codec::unpack_millis(&uuid), 1_700_000_000_000);
/// ```
pub const fn pack(millis: i64, sub_tick_offset: u16, clock_seq: u16, node: u64) -> Uuid {
    Uuid::from_fields_v1(
        to_ticks(millis, sub_tick_offset),
        clock_seq & CLOCK_SEQ_MASK,
        node & NODE_MASK,
    )
}

/// Returns the Unix timestamp in milliseconds encoded in a time-based UUID, discarding the
/// sub-millisecond ticks.
pub const fn unpack_millis(uuid: &Uuid) -> i64 {
    (uuid.timestamp() as i64 - UUID_EPOCH_OFFSET_TICKS) / TICKS_PER_MILLI
}

/// Returns the Unix timestamp in microseconds encoded in a time-based UUID.
pub const fn unpack_micros(uuid: &Uuid) -> i64 {
    (uuid.timestamp() as i64 - UUID_EPOCH_OFFSET_TICKS) / TICKS_PER_MICRO
}

/// Returns the least time-based UUID of the millisecond `millis`.
///
/// The sub-tick offset, clock sequence, and node identifier are all zero, so no UUID created
/// during `millis` sorts before it.
pub const fn min_boundary(millis: i64) -> Uuid {
    pack(millis, 0, 0, 0)
}

/// Returns the greatest time-based UUID of the millisecond `millis`.
///
/// The sub-tick offset is the last tick of the millisecond and the clock sequence and node
/// identifier are all ones, so no UUID created during `millis` sorts after it.
///
/// # Examples
///
/// ```rust
/// use timeuuid::{codec, ordering};
/// use std::cmp::Ordering;
///
/// let lower = codec::min_boundary(1_700_000_000_000);
/// let upper = codec::max_boundary(1_700_000_000_000);
/// assert_eq!(ordering::compare(&lower, &upper), Ordering::Less);
/// assert_eq!(upper.millis(), 1_700_000_000_000);
/// ```
pub const fn max_boundary(millis: i64) -> Uuid {
    pack(millis, MAX_SUB_TICK_OFFSET, CLOCK_SEQ_MASK, NODE_MASK)
}
