//! Chronological ordering of UUIDs.
//!
//! The 60-bit timestamp of a time-based UUID is split across three fields stored low-order first,
//! so comparing the raw bytes does not follow creation order. The functions in this module
//! compare the recombined timestamp instead, then the clock sequence and the node identifier.
//!
//! UUIDs of different versions are ordered by version. UUIDs that are not time-based are ordered
//! by their raw bytes.

use std::cmp::Ordering;

use crate::Uuid;

/// Compares two UUIDs in chronological order.
///
/// The result is a total order consistent with equality: it returns [`Ordering::Equal`] only if
/// both UUIDs are bit-identical.
///
/// # Examples
///
/// ```rust
/// use timeuuid::{codec, ordering};
/// use std::cmp::Ordering;
///
/// // `time_low` wraps around between these two ticks, so raw bytes sort the other way round
/// let a = codec::pack(1_700_000_421_634, 479, 0, 0);
/// let b = codec::pack(1_700_000_421_634, 480, 0, 0);
/// assert!(a.as_bytes() > b.as_bytes());
/// assert_eq!(ordering::compare(&a, &b), Ordering::Less);
/// ```
pub fn compare(a: &Uuid, b: &Uuid) -> Ordering {
    let (va, vb) = (a.version(), b.version());
    if va != vb {
        return va.cmp(&vb);
    }
    if va == Some(1) {
        a.timestamp()
            .cmp(&b.timestamp())
            .then_with(|| a.clock_sequence().cmp(&b.clock_sequence()))
            .then_with(|| a.node().cmp(&b.node()))
            .then_with(|| a.as_bytes().cmp(b.as_bytes()))
    } else {
        a.as_bytes().cmp(b.as_bytes())
    }
}

/// Sorts UUIDs in ascending chronological order.
///
/// The sort is stable.
pub fn sort(uuids: &mut [Uuid]) {
    uuids.sort_by(compare);
}

/// Sorts UUIDs in descending chronological order.
///
/// The sort is stable.
pub fn sort_reversed(uuids: &mut [Uuid]) {
    uuids.sort_by(|a, b| compare(b, a));
}

/// Returns the chronologically smaller of two optional UUIDs.
///
/// `None` is ignored if the other argument is present.
///
/// ```rust
/// use timeuuid::{codec, ordering};
///
/// let x = codec::min_boundary(1_000);
/// let y = codec::min_boundary(2_000);
/// assert_eq!(ordering::min(Some(x), Some(y)), Some(x));
/// assert_eq!(ordering::min(None, Some(y)), Some(y));
/// assert_eq!(ordering::min(None, None), None);
/// ```
pub fn min(a: Option<Uuid>, b: Option<Uuid>) -> Option<Uuid> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if compare(&a, &b) == Ordering::Greater { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Returns the chronologically greater of two optional UUIDs.
///
/// `None` is ignored if the other argument is present.
pub fn max(a: Option<Uuid>, b: Option<Uuid>) -> Option<Uuid> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if compare(&a, &b) == Ordering::Less { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Returns `true` if the UUID is time-based, i.e. has the version field value of `1`.
pub fn is_time_based(uuid: &Uuid) -> bool {
    uuid.version() == Some(1)
}

impl Ord for Uuid {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Uuid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
