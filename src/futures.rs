use core::future::Future;
use core::time::Duration;

use crate::generator::{IdGenStatus, MonoUlidGenerator};
use crate::rand::RandSource;
use crate::time::TimeSource;
use crate::ulid::Ulid;

/// Abstracts how to wait for a [`Duration`] in async contexts.
///
/// The generator only needs this on the rare retry path when the randomness
/// field for the current millisecond is exhausted; the provider decides
/// whether that wait is a timer sleep or a bare yield to the scheduler.
pub trait SleepProvider {
    /// `Send` so the generation future can move across runtime threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}

/// A [`SleepProvider`] using Tokio's timer.
///
/// The default choice for applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// A [`SleepProvider`] that yields to the Tokio scheduler instead of arming a
/// timer.
///
/// Lower latency when the clock is about to tick over anyway, at the cost of
/// tighter polling under sustained exhaustion.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: Duration) {
        tokio::task::yield_now().await;
    }
}

impl<T, R> MonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Generates the next ULID, awaiting through randomness exhaustion.
    ///
    /// Identical state machine to [`generate`]: the same mutex guards the
    /// same state, and the lock is never held across an `.await`, so blocking
    /// and async callers may be freely interleaved on one instance without
    /// breaking the ordering guarantee. Cancelling the future between
    /// attempts leaves the state untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use monoulid::{MonoUlidGenerator, TokioSleep};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let generator = MonoUlidGenerator::default();
    /// let a = generator.generate_async::<TokioSleep>().await;
    /// let b = generator.generate_async::<TokioSleep>().await;
    /// assert!(a < b);
    /// # });
    /// ```
    ///
    /// # Panics
    ///
    /// See [`next_id`].
    ///
    /// [`generate`]: MonoUlidGenerator::generate
    /// [`next_id`]: MonoUlidGenerator::next_id
    pub async fn generate_async<S: SleepProvider>(&self) -> Ulid {
        loop {
            match self.next_id() {
                IdGenStatus::Ready { id } => return id,
                IdGenStatus::Pending { yield_for } => {
                    S::sleep_for(Duration::from_millis(yield_for)).await;
                }
            }
        }
    }

    /// Async counterpart of [`generate_string`].
    ///
    /// [`generate_string`]: MonoUlidGenerator::generate_string
    pub async fn generate_string_async<S: SleepProvider>(&self) -> String {
        self.generate_async::<S>().await.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use futures::future::join_all;

    use super::*;
    use crate::{MonotonicClock, ThreadRandom};

    #[tokio::test]
    async fn generates_increasing_ids() {
        let generator = MonoUlidGenerator::default();
        let a = generator.generate_async::<TokioSleep>().await;
        let b = generator.generate_async::<TokioYield>().await;
        assert!(a < b);

        let s = generator.generate_string_async::<TokioSleep>().await;
        assert!(Ulid::is_valid(&s));
    }

    #[tokio::test]
    async fn awaits_through_exhaustion() {
        let clock = MonotonicClock::new();
        let base = clock.current_millis();
        let generator = MonoUlidGenerator::from_state(
            Ulid::from_parts(base, u16::MAX, u64::MAX).unwrap(),
            clock,
            ThreadRandom,
        );
        let id = generator.generate_async::<TokioSleep>().await;
        assert!(id.timestamp() > base);
    }

    #[tokio::test]
    async fn blocking_and_async_calls_interleave_in_order() {
        let generator = MonoUlidGenerator::default();
        let mut ids = Vec::with_capacity(400);
        for _ in 0..100 {
            ids.push(generator.generate());
            ids.push(generator.generate_async::<TokioSleep>().await);
            ids.push(generator.generate_async::<TokioYield>().await);
            ids.push(generator.generate());
        }
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tasks_share_one_sequence() {
        const TASKS: usize = 8;
        const IDS_PER_TASK: usize = 1024;

        let generator = Arc::new(MonoUlidGenerator::default());
        let handles = (0..TASKS).map(|_| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move {
                let mut ids = Vec::with_capacity(IDS_PER_TASK);
                for _ in 0..IDS_PER_TASK {
                    ids.push(generator.generate_async::<TokioYield>().await);
                }
                ids
            })
        });

        let mut seen = HashSet::with_capacity(TASKS * IDS_PER_TASK);
        for task_ids in join_all(handles).await {
            for id in task_ids.unwrap() {
                assert!(seen.insert(id), "duplicate id emitted: {id}");
            }
        }
        assert_eq!(seen.len(), TASKS * IDS_PER_TASK);
    }
}
