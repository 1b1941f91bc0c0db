//! Time-based UUID generator and related types.

use parking_lot::Mutex;

use crate::{
    clock::{ClockArbiter, ClockError, StdSystemTime, Tick, TimeSource},
    codec, Uuid,
};

pub mod with_rand08;

/// Bit marking a node identifier as a multicast address, i.e. not a real IEEE 802 address.
const MULTICAST_BIT: u64 = 1 << 40;

/// Range of the random sub-tick offset drawn by [`Generator::generate_at_millis`].
const RANDOM_OFFSET_MASK: u32 = 0x1fff;

/// A trait that defines the minimum random number generator interface for [`Generator`].
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;
}

/// Represents a time-based UUID generator that combines a [`ClockArbiter`] with a random number
/// generator for the clock sequence and node identifier.
///
/// All generation methods take `&self`, so a single instance can be shared across threads (e.g.,
/// behind an [`Arc`](std::sync::Arc)) and guarantees the monotonic order of the UUIDs it
/// produces in call order. The clock state and the random number generator sit behind separate
/// locks; only the former carries an ordering invariant.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use timeuuid::Generator;
///
/// let g = sync::Arc::new(Generator::with_rand08(OsRng));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// | Method                 | Timestamp                   | Sub-tick offset       |
/// | ---------------------- | --------------------------- | --------------------- |
/// | [`generate`]           | Now                         | Next free slot        |
/// | [`try_generate`]       | Now, or `Err` on clock fail | Next free slot        |
/// | [`generate_at`]        | Argument (`0` means now)    | Argument              |
/// | [`generate_at_millis`] | Argument (`0` means now)    | Random, `0..=0x1fff`  |
///
/// Only UUIDs whose timestamp comes from the arbiter are guaranteed to be unique and ordered.
///
/// [`generate`]: Generator::generate
/// [`try_generate`]: Generator::try_generate
/// [`generate_at`]: Generator::generate_at
/// [`generate_at_millis`]: Generator::generate_at_millis
#[derive(Debug)]
pub struct Generator<R, T = StdSystemTime> {
    clock: ClockArbiter<T>,
    rng: Mutex<R>,
}

impl<R: RandSource> Generator<R, StdSystemTime> {
    /// Creates a generator instance that reads the system clock.
    pub fn new(rng: R) -> Self {
        Self::with_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> Generator<R, T> {
    /// Creates a generator instance with a custom random number generator and wall clock.
    pub fn with_sources(rng: R, time_source: T) -> Self {
        Self {
            clock: ClockArbiter::with_time_source(time_source),
            rng: Mutex::new(rng),
        }
    }

    /// Returns a reference to the clock arbiter of the generator.
    pub fn clock(&self) -> &ClockArbiter<T> {
        &self.clock
    }

    /// Generates a new UUID from the next tick of the clock arbiter.
    pub fn generate(&self) -> Uuid {
        self.pack_random(self.clock.next_tick())
    }

    /// Generates a new UUID from the next tick of the clock arbiter, or returns an error if the
    /// wall clock cannot be read.
    pub fn try_generate(&self) -> Result<Uuid, ClockError> {
        Ok(self.pack_random(self.clock.try_next_tick()?))
    }

    /// Generates a new UUID from the `millis` and `sub_tick_offset` passed, with a random clock
    /// sequence and node identifier.
    ///
    /// If `millis` is zero, both arguments are ignored and the tick is taken from the clock
    /// arbiter, which makes the call equivalent to [`generate`](Self::generate).
    ///
    /// Callers that need several ordered UUIDs for a fixed millisecond should pass increasing
    /// offsets below 10,000.
    pub fn generate_at(&self, millis: i64, sub_tick_offset: u16) -> Uuid {
        if millis == 0 {
            return self.generate();
        }
        self.pack_random(Tick {
            millis,
            sub_tick_offset,
        })
    }

    /// Generates a new UUID from the `millis` passed with a random sub-tick offset.
    pub fn generate_at_millis(&self, millis: i64) -> Uuid {
        let sub_tick_offset = (self.rng.lock().next_u32() & RANDOM_OFFSET_MASK) as u16;
        self.generate_at(millis, sub_tick_offset)
    }

    fn pack_random(&self, tick: Tick) -> Uuid {
        let (clock_seq, node) = {
            let mut rng = self.rng.lock();
            (rng.next_u32() as u16, rng.next_u64() | MULTICAST_BIT)
        };
        codec::pack(tick.millis, tick.sub_tick_offset, clock_seq, node)
    }
}

/// Supports operations as an infinite iterator that produces a new UUID for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use timeuuid::Generator;
///
/// Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for Generator<R, T> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for Generator<R, T> {}
