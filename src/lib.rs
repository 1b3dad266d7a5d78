//! Monotonic ULID generation and parsing.
//!
//! A [ULID](https://github.com/ulid/spec) is a 128-bit identifier:
//!
//! ```text
//!  Bit Index:  127            80 79           0
//!              +----------------+-------------+
//!  Field:      | timestamp (48) | random (80) |
//!              +----------------+-------------+
//!              |<-- MSB -- 128 bits -- LSB -->|
//! ```
//!
//! rendered as 26 Crockford base32 characters that sort lexicographically in
//! timestamp order. This crate provides:
//!
//! - [`Ulid`]: the immutable value type with validated parsing, byte/UUID
//!   conversions and timestamp extraction;
//! - [`MonoUlidGenerator`]: a generator whose IDs are strictly increasing per
//!   instance, incrementing the randomness field within a millisecond instead
//!   of drawing fresh entropy, with blocking and async (`async-tokio`
//!   feature) entry points;
//! - the shift-based codec itself ([`encode_u128`], [`decode_u128`],
//!   [`encode_u48`], [`decode_u48`]) for callers that work on raw halves.
//!
//! The clock and entropy source are injectable via [`TimeSource`] and
//! [`RandSource`].
//!
//! # Example
//!
//! ```
//! use monoulid::{MonoUlidGenerator, Ulid};
//!
//! let generator = MonoUlidGenerator::default();
//! let id = generator.generate();
//! let parsed = Ulid::parse(&id.to_string())?;
//! assert_eq!(parsed, id);
//! assert!(parsed <= Ulid::MAX);
//! # Ok::<(), monoulid::Error>(())
//! ```

mod base32;
mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod ulid;

pub use crate::base32::*;
pub use crate::error::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::rand::*;
pub use crate::time::*;
pub use crate::ulid::*;
