use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::rand::{RandSource, ThreadRandom};
use crate::time::{MonotonicClock, TimeSource};
use crate::ulid::Ulid;

/// The outcome of one generation attempt.
///
/// [`MonoUlidGenerator::next_id`] never blocks; when the 80-bit randomness
/// field for the current millisecond is exhausted it returns
/// [`IdGenStatus::Pending`] and the caller decides how to wait. The
/// high-level entry points ([`generate`], [`generate_async`]) sleep and retry
/// internally, so `Pending` never reaches their callers.
///
/// [`generate`]: MonoUlidGenerator::generate
/// [`generate_async`]: MonoUlidGenerator::generate_async
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A new ID was produced.
    Ready {
        /// The generated ULID.
        id: Ulid,
    },
    /// The randomness field is exhausted for this millisecond.
    Pending {
        /// Milliseconds to wait before retrying.
        yield_for: u64,
    },
}

/// A monotonic ULID generator.
///
/// Owns the last emitted ULID behind a [`parking_lot::Mutex`]; every call
/// performs exactly one read-modify-write of that state, so IDs taken in
/// lock-acquisition order form a strictly increasing sequence. Within one
/// millisecond the randomness field is incremented instead of drawing fresh
/// entropy; if the clock reports an earlier millisecond than the stored
/// state, the generator keeps counting from the stored value so the sequence
/// never regresses.
///
/// Cloning the generator shares the state: clones emit from the same
/// sequence. Independent instances are fully independent and give no
/// cross-instance ordering guarantee.
///
/// # Example
///
/// ```
/// use monoulid::MonoUlidGenerator;
///
/// let generator = MonoUlidGenerator::default();
/// let a = generator.generate();
/// let b = generator.generate();
/// assert!(a < b);
/// ```
pub struct MonoUlidGenerator<T = MonotonicClock, R = ThreadRandom>
where
    T: TimeSource,
    R: RandSource,
{
    state: Arc<Mutex<Ulid>>,
    time: T,
    rng: R,
}

impl Default for MonoUlidGenerator<MonotonicClock, ThreadRandom> {
    /// A generator over the process clock and the thread-local CSPRNG.
    fn default() -> Self {
        Self::new(MonotonicClock::new(), ThreadRandom)
    }
}

impl<T, R> Clone for MonoUlidGenerator<T, R>
where
    T: TimeSource + Clone,
    R: RandSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<T, R> MonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a generator with the given time and entropy sources, starting
    /// from the all-zero state.
    pub fn new(time: T, rng: R) -> Self {
        Self::from_state(Ulid::NIL, time, rng)
    }

    /// Creates a generator preloaded with an explicit last-emitted value.
    ///
    /// Useful in tests to place the state right at a carry or overflow
    /// boundary. Prefer [`Self::new`] otherwise.
    pub fn from_state(last: Ulid, time: T, rng: R) -> Self {
        Self {
            state: Arc::new(Mutex::new(last)),
            time,
            rng,
        }
    }

    /// Attempts to generate the next ULID without blocking.
    ///
    /// - If the clock advanced past the stored millisecond, draws fresh
    ///   randomness and returns [`IdGenStatus::Ready`].
    /// - If the clock is at (or behind) the stored millisecond, increments
    ///   the 80-bit randomness field and returns `Ready`; the timestamp field
    ///   never moves backward even when the time source does.
    /// - If that field is exhausted, returns [`IdGenStatus::Pending`] without
    ///   mutating state; the caller should wait `yield_for` milliseconds and
    ///   retry, re-reading the clock.
    ///
    /// # Panics
    ///
    /// Panics if the time source reports a value beyond the 48-bit
    /// millisecond range (year ~10889). No valid ULID can be formed past that
    /// point, so this is an unrecoverable environment failure rather than a
    /// data error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip(self))
    )]
    pub fn next_id(&self) -> IdGenStatus {
        let now = self.time.current_millis();
        assert!(
            now <= Ulid::MAX_TIMESTAMP,
            "system time {now}ms exceeds the 48-bit ULID range"
        );

        let mut last = self.state.lock();
        if now > last.timestamp() {
            let (rand_hi, rand_low) = self.rng.rand80();
            *last = Ulid::from_parts_unchecked(now, rand_hi, rand_low);
            IdGenStatus::Ready { id: *last }
        } else {
            // Same millisecond, or the clock stepped back: keep counting from
            // the stored value.
            match last.increment_random() {
                Some(next) => {
                    *last = next;
                    IdGenStatus::Ready { id: next }
                }
                None => Self::cold_exhausted(last.timestamp(), now),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_exhausted(last_ts: u64, now: u64) -> IdGenStatus {
        // The clock must move strictly past the stored millisecond before a
        // fresh randomness draw is possible.
        IdGenStatus::Pending {
            yield_for: (last_ts - now) + 1,
        }
    }

    /// Generates the next ULID, sleeping through randomness exhaustion.
    ///
    /// The sleep happens with the state lock released; the retry re-reads the
    /// clock. In practice a single generator cannot exhaust 2^80 values in
    /// one millisecond, so the wait path is essentially unreachable outside
    /// of tests with mocked entropy.
    ///
    /// # Panics
    ///
    /// See [`Self::next_id`].
    #[must_use]
    pub fn generate(&self) -> Ulid {
        loop {
            match self.next_id() {
                IdGenStatus::Ready { id } => return id,
                IdGenStatus::Pending { yield_for } => {
                    std::thread::sleep(Duration::from_millis(yield_for));
                }
            }
        }
    }

    /// Generates the next ULID and returns its canonical 26-character string.
    ///
    /// # Panics
    ///
    /// See [`Self::next_id`].
    #[must_use]
    pub fn generate_string(&self) -> String {
        self.generate().to_string()
    }
}
