/// A source of 80-bit random values for the randomness field of a ULID.
///
/// The value is split as the field is laid out: a 16-bit high part and a
/// 64-bit low part. Implement this with a fixed sequence in tests to exercise
/// the generator's carry and overflow arithmetic deterministically.
///
/// # Example
///
/// ```
/// use monoulid::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand80(&self) -> (u16, u64) {
///         (0xBEEF, 1234)
///     }
/// }
///
/// assert_eq!(FixedRand.rand80(), (0xBEEF, 1234));
/// ```
pub trait RandSource {
    /// Returns a fresh 80-bit random value as `(high 16 bits, low 64 bits)`.
    fn rand80(&self) -> (u16, u64);
}

/// A [`RandSource`] backed by the thread-local RNG (`rand::rng()`).
///
/// The underlying generator is cryptographically secure (ChaCha-based) and
/// reseeded periodically. Each OS thread has its own instance, so calls from
/// multiple threads are contention-free; this type is a zero-sized handle and
/// may be freely shared across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand80(&self) -> (u16, u64) {
        use rand::Rng;
        let mut rng = rand::rng();
        (rng.random(), rng.random())
    }
}
