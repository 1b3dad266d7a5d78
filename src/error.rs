use core::fmt;

/// A result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All validation failures a [`Ulid`] entry point can report.
///
/// Every variant is a recoverable, caller-visible value returned at the point
/// of construction or parsing. Generation itself is infallible; the only
/// non-recoverable condition in the crate is the system clock exceeding the
/// 48-bit millisecond range, which panics (see
/// [`MonoUlidGenerator::next_id`]).
///
/// [`Ulid`]: crate::Ulid
/// [`MonoUlidGenerator::next_id`]: crate::MonoUlidGenerator::next_id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input string is not exactly 26 characters (or 10 for the
    /// timestamp-only form).
    IncorrectStringLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// A character outside the Crockford Base32 decode table.
    NonBase32Char {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },
    /// A timestamp outside `[0, 2^48 - 1]` milliseconds.
    TimeOutOfBounds {
        /// The rejected millisecond value.
        millis: u64,
    },
    /// Fewer than 16 bytes were available from the requested offset.
    BytesOutOfBounds {
        /// Length of the supplied slice.
        len: usize,
        /// Offset the read started at.
        offset: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectStringLength { len } => {
                write!(f, "incorrect string length: {len}")
            }
            Self::NonBase32Char { byte, index } => {
                write!(f, "invalid base32 byte {byte:#04x} at index {index}")
            }
            Self::TimeOutOfBounds { millis } => {
                write!(f, "timestamp out of 48-bit range: {millis}")
            }
            Self::BytesOutOfBounds { len, offset } => {
                write!(f, "need 16 bytes at offset {offset}, slice has {len}")
            }
        }
    }
}

impl core::error::Error for Error {}
