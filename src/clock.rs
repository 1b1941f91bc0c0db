//! Allocation of strictly ordered `(millis, sub_tick_offset)` pairs.

use parking_lot::{Mutex, MutexGuard};
use std::{convert::Infallible, thread, time};

/// Number of distinct sub-millisecond slots handed out per millisecond.
pub const SLOTS_PER_MILLI: u16 = 1_000;

/// Width of a sub-millisecond slot in 100-nanosecond ticks.
pub const SLOT_WIDTH: u16 = 10;

/// Time to wait for the wall clock to advance once every slot of a millisecond is used.
const BACKOFF: time::Duration = time::Duration::from_millis(1);

/// A trait that defines the wall clock interface for [`ClockArbiter`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&self) -> Result<i64, ClockError>;
}

/// The default [`TimeSource`] that reads [`time::SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&self) -> Result<i64, ClockError> {
        let elapsed = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_err(|err| ClockError::BeforeUnixEpoch(err.duration()))?;
        Ok(elapsed.as_millis() as i64)
    }
}

/// Internal failure of the wall clock, distinct from malformed-input errors.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ClockError {
    #[error("system clock is {0:?} before the Unix epoch")]
    BeforeUnixEpoch(time::Duration),
}

/// A pair of a Unix timestamp in milliseconds and an offset in 100-nanosecond ticks within it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Tick {
    /// Unix timestamp in milliseconds.
    pub millis: i64,
    /// Offset within `millis` in 100-nanosecond ticks, a multiple of [`SLOT_WIDTH`].
    pub sub_tick_offset: u16,
}

#[derive(Debug)]
struct ClockState {
    last_observed_millis: i64,
    tick_counter: u16,
}

/// Hands out [`Tick`]s that never repeat and never decrease in call order, even when called from
/// multiple threads.
///
/// Each millisecond is divided into [`SLOTS_PER_MILLI`] slots spaced [`SLOT_WIDTH`] ticks apart.
/// Once every slot of the current millisecond is taken, callers wait until the wall clock moves
/// on, which caps throughput at 1,000 ticks per millisecond per arbiter.
///
/// The state lock is held for the whole check-reset-increment sequence, including the wait, and
/// is released with a fair unlock so that waiting threads acquire it in FIFO order.
///
/// # Limitations
///
/// The arbiter trusts the wall clock. If the clock is set back, returned ticks carry the earlier
/// millisecond and may sort before ticks handed out previously.
///
/// # Examples
///
/// ```rust
/// use timeuuid::clock::ClockArbiter;
///
/// let arbiter = ClockArbiter::new();
/// let a = arbiter.next_tick();
/// let b = arbiter.next_tick();
/// assert!(a < b);
/// ```
#[derive(Debug)]
pub struct ClockArbiter<T = StdSystemTime> {
    state: Mutex<ClockState>,
    time_source: T,
}

impl ClockArbiter<StdSystemTime> {
    /// Creates an arbiter that reads the system clock.
    pub fn new() -> Self {
        Self::with_time_source(StdSystemTime)
    }
}

impl Default for ClockArbiter<StdSystemTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> ClockArbiter<T> {
    /// Creates an arbiter with a custom wall clock, baselined at the clock's current reading.
    pub fn with_time_source(time_source: T) -> Self {
        let last_observed_millis = time_source.unix_ts_ms().unwrap_or_else(|err| {
            tracing::warn!(%err, "could not read clock; starting from zero");
            0
        });
        Self {
            state: Mutex::new(ClockState {
                last_observed_millis,
                tick_counter: 0,
            }),
            time_source,
        }
    }

    /// Returns a reference to the wall clock used by the arbiter.
    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    /// Allocates the next tick.
    ///
    /// This method never fails. If the wall clock cannot be read, the error is logged and the
    /// last observed millisecond is reused, or the one after it once all its slots are taken;
    /// use [`try_next_tick`](Self::try_next_tick) to observe such errors.
    pub fn next_tick(&self) -> Tick {
        let mut state = self.state.lock();
        let tick = self.allocate(&mut state, |state, err| {
            if state.tick_counter < SLOTS_PER_MILLI {
                tracing::warn!(%err, "could not read clock; reusing last observed millisecond");
                Ok::<_, Infallible>(state.last_observed_millis)
            } else {
                tracing::warn!(%err, "could not read clock; advancing past exhausted millisecond");
                Ok(state.last_observed_millis + 1)
            }
        });
        MutexGuard::unlock_fair(state);
        match tick {
            Ok(tick) => tick,
            Err(never) => match never {},
        }
    }

    /// Allocates the next tick, or returns an error if the wall clock cannot be read.
    ///
    /// No slot is consumed when an error is returned.
    pub fn try_next_tick(&self) -> Result<Tick, ClockError> {
        let mut state = self.state.lock();
        let tick = self.allocate(&mut state, |_, err| Err(err));
        MutexGuard::unlock_fair(state);
        tick
    }

    /// Runs the check-reset-increment sequence on the locked state. `on_error` decides what
    /// millisecond to use when the wall clock fails.
    fn allocate<E>(
        &self,
        state: &mut ClockState,
        mut on_error: impl FnMut(&ClockState, ClockError) -> Result<i64, E>,
    ) -> Result<Tick, E> {
        loop {
            let now = match self.time_source.unix_ts_ms() {
                Ok(now) => now,
                Err(err) => on_error(state, err)?,
            };

            if now > state.last_observed_millis {
                state.last_observed_millis = now;
                state.tick_counter = 0;
            }

            if state.tick_counter < SLOTS_PER_MILLI {
                let counter = state.tick_counter;
                state.tick_counter += 1;
                return Ok(Tick {
                    millis: now,
                    sub_tick_offset: counter * SLOT_WIDTH,
                });
            }

            tracing::trace!(
                millis = state.last_observed_millis,
                "all sub-millisecond slots taken; waiting for clock"
            );
            thread::sleep(BACKOFF);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClockArbiter, ClockError, Tick, TimeSource, SLOTS_PER_MILLI};
    use std::{
        collections::{HashMap, HashSet},
        sync::{
            atomic::{AtomicI64, AtomicU64, Ordering},
            mpsc, Arc,
        },
        thread, time,
    };

    /// A clock that moves one millisecond forward on every `step`-th reading.
    #[derive(Debug)]
    struct SteppingClock {
        start: i64,
        step: u64,
        reads: AtomicU64,
    }

    impl TimeSource for SteppingClock {
        fn unix_ts_ms(&self) -> Result<i64, ClockError> {
            let n = self.reads.fetch_add(1, Ordering::Relaxed);
            Ok(self.start + (n / self.step) as i64)
        }
    }

    /// A clock that can be set by the test and reports an error while negative.
    #[derive(Debug)]
    struct ManualClock(AtomicI64);

    impl TimeSource for ManualClock {
        fn unix_ts_ms(&self) -> Result<i64, ClockError> {
            match self.0.load(Ordering::Relaxed) {
                ms if ms < 0 => Err(ClockError::BeforeUnixEpoch(time::Duration::from_millis(
                    ms.unsigned_abs(),
                ))),
                ms => Ok(ms),
            }
        }
    }

    /// Hands out offsets in steps of ten within a millisecond
    #[test]
    fn hands_out_offsets_in_steps_of_ten_within_a_millisecond() {
        let arbiter = ClockArbiter::with_time_source(ManualClock(AtomicI64::new(1_000)));
        for i in 0..SLOTS_PER_MILLI {
            assert_eq!(
                arbiter.next_tick(),
                Tick {
                    millis: 1_000,
                    sub_tick_offset: i * 10
                }
            );
        }

        arbiter.time_source().0.store(1_001, Ordering::Relaxed);
        assert_eq!(
            arbiter.next_tick(),
            Tick {
                millis: 1_001,
                sub_tick_offset: 0
            }
        );
    }

    /// Waits for the next millisecond once all slots are taken
    #[test]
    fn waits_for_the_next_millisecond_once_all_slots_are_taken() {
        let arbiter = ClockArbiter::with_time_source(SteppingClock {
            start: 0x0123_4567_89ab,
            step: 1_100,
            reads: AtomicU64::new(0),
        });

        let mut per_millis: HashMap<i64, usize> = HashMap::new();
        let mut prev = arbiter.next_tick();
        *per_millis.entry(prev.millis).or_default() += 1;
        for _ in 1..2_500 {
            let curr = arbiter.next_tick();
            assert!(prev < curr);
            *per_millis.entry(curr.millis).or_default() += 1;
            prev = curr;
        }

        assert!(per_millis.values().all(|&n| n <= SLOTS_PER_MILLI as usize));
        assert!(per_millis.len() >= 3);
    }

    /// Caps ticks sharing a wall clock millisecond at one thousand
    #[test]
    fn caps_ticks_sharing_a_wall_clock_millisecond_at_one_thousand() {
        let arbiter = ClockArbiter::new();
        let ticks: Vec<Tick> = (0..2_500).map(|_| arbiter.next_tick()).collect();

        let mut per_millis: HashMap<i64, usize> = HashMap::new();
        for e in &ticks {
            *per_millis.entry(e.millis).or_default() += 1;
        }
        assert!(per_millis.values().all(|&n| n <= SLOTS_PER_MILLI as usize));
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }

    /// Reports clock errors without consuming a slot
    #[test]
    fn reports_clock_errors_without_consuming_a_slot() {
        let arbiter = ClockArbiter::with_time_source(ManualClock(AtomicI64::new(5_000)));
        assert_eq!(arbiter.try_next_tick().map(|t| t.sub_tick_offset), Ok(0));

        arbiter.time_source().0.store(-3, Ordering::Relaxed);
        assert_eq!(
            arbiter.try_next_tick(),
            Err(ClockError::BeforeUnixEpoch(time::Duration::from_millis(3)))
        );

        // next_tick() falls back to the last observed millisecond
        assert_eq!(
            arbiter.next_tick(),
            Tick {
                millis: 5_000,
                sub_tick_offset: 10
            }
        );

        arbiter.time_source().0.store(5_000, Ordering::Relaxed);
        assert_eq!(arbiter.try_next_tick().map(|t| t.sub_tick_offset), Ok(20));
    }

    /// A clock that never produces a reading.
    #[derive(Debug)]
    struct BrokenClock;

    impl TimeSource for BrokenClock {
        fn unix_ts_ms(&self) -> Result<i64, ClockError> {
            Err(ClockError::BeforeUnixEpoch(time::Duration::from_millis(1)))
        }
    }

    /// Keeps returning ticks while the clock is unreadable
    #[test]
    fn keeps_returning_ticks_while_the_clock_is_unreadable(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .spawn(move || {
                let arbiter = ClockArbiter::with_time_source(BrokenClock);
                let ticks: Vec<Tick> = (0..2_500).map(|_| arbiter.next_tick()).collect();
                tx.send(ticks).unwrap();
            })
            .map_err(|err| format!("failed to spawn thread: {:?}", err))?;

        let ticks = rx.recv_timeout(time::Duration::from_secs(5))?;
        assert_eq!(ticks.len(), 2_500);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            ticks[SLOTS_PER_MILLI as usize],
            Tick {
                millis: 1,
                sub_tick_offset: 0
            }
        );
        assert_eq!(
            ticks[2_499],
            Tick {
                millis: 2,
                sub_tick_offset: 499 * 10
            }
        );
        Ok(())
    }

    /// Allocates no duplicate ticks under multithreading
    #[test]
    fn allocates_no_duplicate_ticks_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let arbiter = Arc::new(ClockArbiter::new());
        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            let arbiter = Arc::clone(&arbiter);
            thread::Builder::new()
                .spawn(move || {
                    let mut prev = arbiter.next_tick();
                    tx.send(prev).unwrap();
                    for _ in 1..5_000 {
                        let curr = arbiter.next_tick();
                        assert!(prev < curr);
                        tx.send(curr).unwrap();
                        prev = curr;
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            assert!(s.insert(e), "duplicate tick {:?}", e);
        }
        assert_eq!(s.len(), 4 * 5_000);
        Ok(())
    }
}
