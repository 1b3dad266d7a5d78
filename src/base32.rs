use crate::error::{Error, Result};

/// Length of a fully encoded 128-bit value.
pub const ENCODED_LEN: usize = 26;
/// Length of an encoded 48-bit timestamp (the first 10 characters of a ULID).
pub const TIMESTAMP_LEN: usize = 10;

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;

/// Lookup table for Crockford base32 decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i; // lowercase letter
        }
        i += 1;
    }
    // Crockford-specific aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Encodes a 128-bit value, given as two big-endian u64 halves, into 26
/// Crockford base32 symbols.
///
/// Emits the least significant 5-bit group into the last slot and walks left,
/// shifting the 128-bit value right by 5 each step and carrying the low bits
/// of `hi` into `low`. 26 symbols cover 130 bits, so the first symbol encodes
/// only the top 3 bits of the value and is always in `0..=7`.
pub fn encode_u128(hi: u64, low: u64, out: &mut [u8; ENCODED_LEN]) {
    let (mut h, mut l) = (hi, low);
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(l & 0x1F) as usize];
        l = (l >> BITS_PER_CHAR) | (h << (64 - BITS_PER_CHAR));
        h >>= BITS_PER_CHAR;
    }
}

/// Decodes a 26-character Crockford base32 string into two big-endian u64
/// halves.
///
/// Decoding is case-insensitive and maps the ambiguous symbols `O -> 0` and
/// `I`/`L -> 1`. The first symbol contributes only 3 bits; any higher bits a
/// symbol above `7` would add fall off the top of the 128-bit value.
///
/// # Errors
///
/// - [`Error::IncorrectStringLength`] if `s` is not 26 characters.
/// - [`Error::NonBase32Char`] if any character is outside the decode table.
pub fn decode_u128(s: &str) -> Result<(u64, u64)> {
    if s.len() != ENCODED_LEN {
        return Err(Error::IncorrectStringLength { len: s.len() });
    }
    let mut hi = 0_u64;
    let mut low = 0_u64;
    for (i, b) in s.bytes().enumerate() {
        let val = LOOKUP[b as usize];
        if val == NO_VALUE {
            return Err(Error::NonBase32Char { byte: b, index: i });
        }
        let carry = low >> (64 - BITS_PER_CHAR);
        hi = (hi << BITS_PER_CHAR) | carry;
        low = (low << BITS_PER_CHAR) | u64::from(val);
    }
    Ok((hi, low))
}

/// Encodes the low 48 bits of `millis` into 10 Crockford base32 symbols, the
/// timestamp prefix of a ULID.
pub fn encode_u48(millis: u64, out: &mut [u8; TIMESTAMP_LEN]) {
    let mut t = millis;
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(t & 0x1F) as usize];
        t >>= BITS_PER_CHAR;
    }
}

/// Decodes a 10-character Crockford base32 string into a 48-bit millisecond
/// timestamp.
///
/// This is the fast path for extracting a timestamp from the first 10
/// characters of a ULID without decoding all 128 bits.
///
/// # Errors
///
/// - [`Error::IncorrectStringLength`] if `s` is not 10 characters.
/// - [`Error::NonBase32Char`] if any character is outside the decode table.
pub fn decode_u48(s: &str) -> Result<u64> {
    if s.len() != TIMESTAMP_LEN {
        return Err(Error::IncorrectStringLength { len: s.len() });
    }
    let mut t = 0_u64;
    for (i, b) in s.bytes().enumerate() {
        let val = LOOKUP[b as usize];
        if val == NO_VALUE {
            return Err(Error::NonBase32Char { byte: b, index: i });
        }
        t = (t << BITS_PER_CHAR) | u64::from(val);
    }
    Ok(t)
}

/// Returns `true` iff every character of `s` maps to a valid Crockford base32
/// symbol (aliases included). Does not check length.
#[must_use]
pub fn is_valid_base32(s: &str) -> bool {
    s.bytes().all(|b| LOOKUP[b as usize] != NO_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(hi: u64, low: u64) {
        let mut buf = [0_u8; ENCODED_LEN];
        encode_u128(hi, low, &mut buf);
        let s = core::str::from_utf8(&buf).unwrap();
        let decoded = decode_u128(s).unwrap();
        assert_eq!((hi, low), decoded, "roundtrip failed for b32={s}");
    }

    #[test]
    fn encode_decode_preserves_u128_values() {
        for &(hi, low) in &[
            (0, 0),
            (0, 1),
            (1, 0),
            (u64::MAX, u64::MAX),
            (0, u64::MAX),
            (u64::MAX, 0),
            (0x0123_4567_89AB_CDEF, 0xFED_CBA9_8765_4321),
            (42, 42),
        ] {
            roundtrip(hi, low);
        }
    }

    #[test]
    fn known_vectors() {
        // 01ARZ3NDEKTSV4RRFFQ69G5FAV from the original ULID spec:
        // timestamp 1469922850259, randomness 1012768647078601740696923
        let value = ((1469922850259_u128) << 80) | 1012768647078601740696923_u128;
        let mut buf = [0_u8; ENCODED_LEN];
        encode_u128((value >> 64) as u64, value as u64, &mut buf);
        assert_eq!(&buf, b"01ARZ3NDEKTSV4RRFFQ69G5FAV");

        let (hi, low) = decode_u128("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap();
        assert_eq!(hi, (value >> 64) as u64);
        assert_eq!(low, value as u64);
    }

    #[test]
    fn zero_and_max() {
        let mut buf = [0_u8; ENCODED_LEN];
        encode_u128(0, 0, &mut buf);
        assert_eq!(&buf, b"00000000000000000000000000");

        encode_u128(u64::MAX, u64::MAX, &mut buf);
        assert_eq!(&buf, b"7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
    }

    #[test]
    fn top_symbol_bits_above_127_are_discarded() {
        // 26 symbols hold 130 bits; the top 2 bits of the first symbol have
        // nowhere to go. An all-Z string therefore decodes to all ones.
        let (hi, low) = decode_u128("ZZZZZZZZZZZZZZZZZZZZZZZZZZ").unwrap();
        assert_eq!((hi, low), (u64::MAX, u64::MAX));
    }

    #[test]
    fn decode_accepts_lowercase_and_mixed_case() {
        let upper = decode_u128("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap();
        let lower = decode_u128("01arz3ndektsv4rrffq69g5fav").unwrap();
        let mixed = decode_u128("01aRz3NdEkTsV4rRfFq69g5FaV").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn decode_treats_crockford_aliases_as_canonical_values() {
        for (alias, canonical) in [
            ("0000000000000000000000000O", "00000000000000000000000000"),
            ("0000000000000000000000000o", "00000000000000000000000000"),
            ("0000000000000000000000000I", "00000000000000000000000001"),
            ("0000000000000000000000000L", "00000000000000000000000001"),
            ("0000000000000000000000000l", "00000000000000000000000001"),
        ] {
            assert_eq!(
                decode_u128(alias).unwrap(),
                decode_u128(canonical).unwrap(),
                "{alias} should decode like {canonical}"
            );
        }
    }

    #[test]
    fn decode_rejects_invalid_character_with_position() {
        // 'U' is excluded from the Crockford alphabet
        let s = "0000000000000000000000000U";
        assert_eq!(
            decode_u128(s),
            Err(Error::NonBase32Char { byte: b'U', index: 25 })
        );

        let s = "!0000000000000000000000000";
        assert_eq!(
            decode_u128(s),
            Err(Error::NonBase32Char { byte: b'!', index: 0 })
        );
    }

    #[test]
    fn decode_rejects_incorrect_length() {
        assert_eq!(
            decode_u128("deadbeef"),
            Err(Error::IncorrectStringLength { len: 8 })
        );
        assert_eq!(
            decode_u48("deadbeef"),
            Err(Error::IncorrectStringLength { len: 8 })
        );
    }

    #[test]
    fn timestamp_roundtrip() {
        let max_ts = (1_u64 << 48) - 1;
        for &ts in &[0, 1, 42, 1469922850259, max_ts] {
            let mut buf = [0_u8; TIMESTAMP_LEN];
            encode_u48(ts, &mut buf);
            let s = core::str::from_utf8(&buf).unwrap();
            assert_eq!(decode_u48(s).unwrap(), ts, "timestamp roundtrip: {s}");
        }
    }

    #[test]
    fn timestamp_prefix_matches_full_encoding() {
        let ts = 1469922850259_u64;
        let mut full = [0_u8; ENCODED_LEN];
        encode_u128(ts << 16 | 0xFFFF, u64::MAX, &mut full);

        let mut prefix = [0_u8; TIMESTAMP_LEN];
        encode_u48(ts, &mut prefix);
        assert_eq!(&full[..TIMESTAMP_LEN], &prefix);
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_base32("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(is_valid_base32("oilOIL")); // aliases are valid input
        assert!(!is_valid_base32("U"));
        assert!(!is_valid_base32("hello world"));
        assert!(is_valid_base32(""));
    }
}
