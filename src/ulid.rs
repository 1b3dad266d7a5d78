use core::fmt;
use core::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::base32;
use crate::error::{Error, Result};
use crate::rand::{RandSource, ThreadRandom};

/// A 128-bit ULID held as two big-endian u64 halves.
///
/// ```text
///  Bit Index:  127            80 79           0
///              +----------------+-------------+
///  Field:      | timestamp (48) | random (80) |
///              +----------------+-------------+
///              |<-- MSB -- 128 bits -- LSB -->|
/// ```
///
/// The derived ordering compares `(hi, low)` and is therefore the unsigned
/// 128-bit numeric order, which is identical to the lexicographic order of
/// the 26-character Crockford base32 encoding.
///
/// A `Ulid` is only constructed through validated entry points
/// ([`parse`](Self::parse), [`from_parts`](Self::from_parts),
/// [`from_bytes`](Self::from_bytes), ...) or by a generator.
///
/// # Example
///
/// ```
/// use monoulid::Ulid;
///
/// let id = Ulid::parse("01ARZ3NDEKTSV4RRFFQ69G5FAV")?;
/// assert_eq!(id.timestamp(), 1469922850259);
/// assert_eq!(id.to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
/// # Ok::<(), monoulid::Error>(())
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ulid {
    hi: u64,
    low: u64,
}

impl Ulid {
    /// Smallest valid timestamp, in milliseconds since the Unix epoch.
    pub const MIN_TIMESTAMP: u64 = 0;
    /// Largest timestamp that fits the 48-bit field (year ~10889).
    pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;
    /// The all-ones ULID, `7ZZZZZZZZZZZZZZZZZZZZZZZZZ`.
    pub const MAX: Self = Self {
        hi: u64::MAX,
        low: u64::MAX,
    };
    /// The all-zero ULID, `00000000000000000000000000`.
    pub const NIL: Self = Self { hi: 0, low: 0 };

    const RAND_HI_MASK: u64 = 0xFFFF;

    pub(crate) const fn from_parts_unchecked(millis: u64, rand_hi: u16, rand_low: u64) -> Self {
        Self {
            hi: (millis << 16) | rand_hi as u64,
            low: rand_low,
        }
    }

    /// Parses a 26-character Crockford base32 string.
    ///
    /// Decoding is case-insensitive and tolerates the ambiguous symbols `O`
    /// (as `0`) and `I`/`L` (as `1`); see [`decode_u128`] for details. The
    /// [`Display`] form is always canonical uppercase, so a string containing
    /// aliases does not round-trip byte-for-byte.
    ///
    /// # Errors
    ///
    /// - [`Error::IncorrectStringLength`] if `s` is not 26 characters.
    /// - [`Error::NonBase32Char`] if any character is outside the decode
    ///   table.
    ///
    /// [`decode_u128`]: crate::decode_u128
    /// [`Display`]: core::fmt::Display
    pub fn parse(s: &str) -> Result<Self> {
        let (hi, low) = base32::decode_u128(s)?;
        Ok(Self { hi, low })
    }

    /// Builds a ULID from a 48-bit timestamp and an 80-bit random value split
    /// into a 16-bit high part and a 64-bit low part.
    ///
    /// # Errors
    ///
    /// [`Error::TimeOutOfBounds`] if `millis` exceeds
    /// [`MAX_TIMESTAMP`](Self::MAX_TIMESTAMP).
    ///
    /// # Example
    ///
    /// ```
    /// use monoulid::Ulid;
    ///
    /// let id = Ulid::from_parts(1, 0, 0)?;
    /// assert_eq!(id.to_string(), "00000000010000000000000000");
    /// # Ok::<(), monoulid::Error>(())
    /// ```
    pub fn from_parts(millis: u64, rand_hi: u16, rand_low: u64) -> Result<Self> {
        if millis > Self::MAX_TIMESTAMP {
            return Err(Error::TimeOutOfBounds { millis });
        }
        Ok(Self::from_parts_unchecked(millis, rand_hi, rand_low))
    }

    /// Reads a ULID from the first 16 bytes of `bytes`, big-endian.
    ///
    /// # Errors
    ///
    /// [`Error::BytesOutOfBounds`] if `bytes` is shorter than 16.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_at(bytes, 0)
    }

    /// Reads a ULID from 16 bytes starting at `offset`, big-endian.
    ///
    /// # Errors
    ///
    /// [`Error::BytesOutOfBounds`] if fewer than 16 bytes are available from
    /// `offset`.
    pub fn from_bytes_at(bytes: &[u8], offset: usize) -> Result<Self> {
        let len = bytes.len();
        if offset > len || len - offset < 16 {
            return Err(Error::BytesOutOfBounds { len, offset });
        }
        let mut hi = 0_u64;
        for &b in &bytes[offset..offset + 8] {
            hi = (hi << 8) | u64::from(b);
        }
        let mut low = 0_u64;
        for &b in &bytes[offset + 8..offset + 16] {
            low = (low << 8) | u64::from(b);
        }
        Ok(Self { hi, low })
    }

    /// Reinterprets a raw 128-bit value as a ULID.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self {
            hi: (value >> 64) as u64,
            low: value as u64,
        }
    }

    /// Returns the raw 128-bit value.
    #[must_use]
    pub const fn to_u128(&self) -> u128 {
        ((self.hi as u128) << 64) | self.low as u128
    }

    /// Generates a one-off, non-monotonic ULID from the current system time
    /// and the built-in [`ThreadRandom`] generator.
    ///
    /// This performs a wall-clock read on every call and gives no ordering
    /// guarantee for IDs created within the same millisecond. Prefer
    /// [`MonoUlidGenerator`] for bursty or order-sensitive workloads.
    ///
    /// [`MonoUlidGenerator`]: crate::MonoUlidGenerator
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime_and_rand(SystemTime::now(), &ThreadRandom)
    }

    /// Generates a ULID from the given `SystemTime` using [`ThreadRandom`].
    ///
    /// # Errors
    ///
    /// [`Error::TimeOutOfBounds`] if `datetime` is past the 48-bit range.
    pub fn from_datetime(datetime: SystemTime) -> Result<Self> {
        let millis = millis_since_epoch(datetime);
        let (rand_hi, rand_low) = ThreadRandom.rand80();
        Self::from_parts(millis, rand_hi, rand_low)
    }

    /// Generates a ULID from the given `SystemTime` and a custom entropy
    /// source. The 48-bit timestamp field wraps silently here; use
    /// [`from_datetime`](Self::from_datetime) for a checked variant.
    #[must_use]
    pub fn from_datetime_and_rand<R: RandSource>(datetime: SystemTime, rng: &R) -> Self {
        let millis = millis_since_epoch(datetime) & Self::MAX_TIMESTAMP;
        let (rand_hi, rand_low) = rng.rand80();
        Self::from_parts_unchecked(millis, rand_hi, rand_low)
    }

    /// Returns `true` iff `s` is a well-formed ULID string (26 valid
    /// Crockford base32 characters, aliases included).
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() == base32::ENCODED_LEN && base32::is_valid_base32(s)
    }

    /// The millisecond timestamp stored in the top 48 bits.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.hi >> 16
    }

    /// The 80-bit randomness field, split into its 16-bit high part and
    /// 64-bit low part.
    #[must_use]
    pub const fn randomness(&self) -> (u16, u64) {
        ((self.hi & Self::RAND_HI_MASK) as u16, self.low)
    }

    /// This ULID's timestamp as a [`SystemTime`], at millisecond precision.
    #[must_use]
    pub fn datetime(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp())
    }

    /// The 16-byte big-endian representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0_u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.low.to_be_bytes());
        out
    }

    /// The next ULID within the same millisecond, or `None` when the 80-bit
    /// randomness field is exhausted.
    ///
    /// The increment never carries into the timestamp field; exhaustion is
    /// resolved by the generator waiting for the clock to advance.
    #[must_use]
    pub fn increment_random(&self) -> Option<Self> {
        if self.low != u64::MAX {
            Some(Self {
                hi: self.hi,
                low: self.low + 1,
            })
        } else if self.hi & Self::RAND_HI_MASK != Self::RAND_HI_MASK {
            Some(Self {
                hi: self.hi + 1,
                low: 0,
            })
        } else {
            None
        }
    }
}

fn millis_since_epoch(datetime: SystemTime) -> u64 {
    datetime
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0_u8; base32::ENCODED_LEN];
        base32::encode_u128(self.hi, self.low, &mut buf);
        // SAFETY: Crockford base32 output is always valid ASCII
        let s = unsafe { core::str::from_utf8_unchecked(&buf) };
        f.write_str(s)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rand_hi, rand_low) = self.randomness();
        f.debug_struct("Ulid")
            .field("encoded", &format_args!("{self}"))
            .field("timestamp", &self.timestamp())
            .field(
                "randomness",
                &format_args!("0x{rand_hi:04x}_{rand_low:016x}"),
            )
            .finish()
    }
}

impl FromStr for Ulid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Ulid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Ulid> for u128 {
    fn from(id: Ulid) -> Self {
        id.to_u128()
    }
}

impl From<u128> for Ulid {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

#[cfg(feature = "uuid")]
impl Ulid {
    /// Reinterprets a UUID's 128 bits as a ULID.
    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self::from_u128(uuid.as_u128())
    }

    /// Reinterprets this ULID's 128 bits as a UUID.
    #[must_use]
    pub fn to_uuid(&self) -> uuid::Uuid {
        uuid::Uuid::from_u128(self.to_u128())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Ulid {
    fn from(uuid: uuid::Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

#[cfg(feature = "uuid")]
impl From<Ulid> for uuid::Uuid {
    fn from(id: Ulid) -> Self {
        id.to_uuid()
    }
}
