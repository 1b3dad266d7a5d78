use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ulid::Ulid;

impl Serialize for Ulid {
    /// Serializes as the canonical 26-character Crockford base32 string.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ulid {
    /// Deserializes from a base32 string, with the same tolerance for
    /// lowercase and `O`/`I`/`L` aliases as [`Ulid::parse`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Base32Visitor;

        impl Visitor<'_> for Base32Visitor {
            type Value = Ulid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 26-character Crockford base32 string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ulid::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Base32Visitor)
    }
}
