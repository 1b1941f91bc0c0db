//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Generator, Uuid};
pub use inner::GlobalGenRng;

/// Returns the process-wide default generator, creating one if none exists.
pub fn global_gen() -> &'static Generator<GlobalGenRng> {
    static G: sync::OnceLock<Generator<GlobalGenRng>> = sync::OnceLock::new();
    G.get_or_init(|| {
        tracing::debug!("initializing default time-based UUID generator");
        Generator::new(GlobalGenRng::new())
    })
}

/// Generates a time-based UUID.
///
/// This function employs the process-wide default generator and guarantees the process-wide
/// monotonic order of the UUIDs it returns, at up to 1,000 UUIDs per millisecond.
///
/// # Examples
///
/// ```rust
/// let uuid = timeuuid::time_uuid();
/// println!("{}", uuid); // e.g., "e5f62ec0-0d2a-11ef-9f83-35a7bb9e6a21"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte array in RFC 4122 field order
///
/// let uuid_string: String = timeuuid::time_uuid().to_string();
/// ```
pub fn time_uuid() -> Uuid {
    global_gen().generate()
}

/// Generates a time-based UUID from the `millis` and `sub_tick_offset` passed, or from the next
/// tick of the default generator if `millis` is zero.
///
/// See [`Generator::generate_at`].
pub fn time_uuid_at(millis: i64, sub_tick_offset: u16) -> Uuid {
    global_gen().generate_at(millis, sub_tick_offset)
}

mod inner {
    use rand::{
        rngs::{adapter::ReseedingRng, OsRng},
        RngCore, SeedableRng,
    };
    use rand_chacha::ChaCha12Core;

    use crate::generator::RandSource;

    /// The random number generator of the default generator.
    ///
    /// It employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to emulate the strategy used by
    /// [`rand::rngs::ThreadRng`], and reseeds itself when the process ID changes (i.e., upon Unix
    /// forks) so that forked processes do not share clock sequences and node identifiers.
    #[derive(Debug)]
    pub struct GlobalGenRng {
        #[cfg(unix)]
        pid: u32,
        rng: ReseedingRng<ChaCha12Core, OsRng>,
    }

    impl GlobalGenRng {
        pub(crate) fn new() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                rng: ReseedingRng::new(ChaCha12Core::from_entropy(), 1024 * 64, OsRng),
            }
        }

        fn reseed_upon_pid_change(&mut self) {
            #[cfg(unix)]
            {
                let pid = std::process::id();
                if self.pid != pid {
                    self.pid = pid;
                    match self.rng.reseed() {
                        Ok(()) => tracing::debug!(pid, "reseeded default generator after fork"),
                        Err(err) => tracing::warn!(%err, pid, "could not reseed after fork"),
                    }
                }
            }
        }
    }

    impl RandSource for GlobalGenRng {
        fn next_u32(&mut self) -> u32 {
            self.reseed_upon_pid_change();
            self.rng.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.reseed_upon_pid_change();
            self.rng.next_u64()
        }
    }
}
