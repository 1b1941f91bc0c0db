//! Chronologically sortable time-based UUIDs (RFC 4122 version 1)
//!
//! ```rust
//! use timeuuid::time_uuid;
//!
//! let uuid = time_uuid();
//! println!("{}", uuid); // e.g. "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21"
//! println!("{}", uuid.to_base64()); // e.g. "5fYuwA0qEe-fgzWnu55qIQ"
//! println!("{}", uuid.millis()); // Unix timestamp in milliseconds
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122#section-4.1.2).
//!
//! # Field and bit layout
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          time_low                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       time_mid                |  ver  |       time_hi         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|  clock_seq                |         node (0-1)            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         node (2-5)                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 60-bit timestamp counts 100-nanosecond intervals since 1582-10-15T00:00:00Z and is
//!   stored low-order first: bits 0-31 in `time_low`, bits 32-47 in `time_mid`, and bits 48-59
//!   in `time_hi`.
//! - The 4-bit `ver` field is set at `0001`.
//! - The 2-bit `var` field is set at `10`.
//! - The 14-bit `clock_seq` and the 48-bit `node` are filled with random numbers by the
//!   generator, and the multicast bit of `node` is set to mark it as not being a real hardware
//!   address.
//!
//! Because the timestamp is stored low-order first, comparing raw bytes does not reflect
//! creation order. [`Uuid`] implements [`Ord`] by comparing the recombined timestamp, then the
//! clock sequence and the node; [`ordering`] provides the same comparison as free functions along
//! with absent-aware [`ordering::min`] and [`ordering::max`].
//!
//! # Monotonicity
//!
//! The generator takes the timestamp from a [`clock::ClockArbiter`] that divides each millisecond
//! into 1,000 slots spaced ten ticks apart. Every UUID produced through one arbiter carries a
//! distinct timestamp that never decreases in call order. When all slots of a millisecond are
//! taken, the arbiter waits for the wall clock to move on, which limits throughput to 1,000 UUIDs
//! per millisecond per arbiter. The arbiter does not defend against the wall clock being set
//! back.
//!
//! # Range boundaries
//!
//! [`codec::min_boundary`] and [`codec::max_boundary`] construct the least and greatest time-based
//! UUIDs of a given millisecond, which bound every UUID created during that millisecond:
//!
//! ```rust
//! use timeuuid::{codec, time_uuid};
//!
//! let uuid = time_uuid();
//! assert!(codec::min_boundary(uuid.millis()) <= uuid);
//! assert!(uuid <= codec::max_boundary(uuid.millis()));
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide default generator and [`time_uuid`].
//! - `serde`: `Serialize` and `Deserialize` for [`Uuid`].
//! - `uuid`: conversions from and to `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ParseError, Uuid, Variant};

pub mod clock;
pub mod codec;
mod compact;
pub mod ordering;

pub mod generator;
pub use generator::Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{global_gen, time_uuid, time_uuid_at, GlobalGenRng};
