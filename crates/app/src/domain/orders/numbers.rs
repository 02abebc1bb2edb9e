//! Order numbers
//!
//! Numbers look like `ORD-20261018-K7PQ2MZX`: the UTC date of checkout followed by eight
//! characters drawn from an alphabet without look-alike symbols (`0/O`, `1/I`). With
//! 32⁸ combinations per day, collisions are rare; the service retries on the ones that
//! do happen.

use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use rand::seq::SliceRandom;

pub const ORDER_NUMBER_PREFIX: &str = "ORD";

pub const ORDER_NUMBER_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const ORDER_NUMBER_SUFFIX_LEN: usize = 8;

#[automock]
pub trait OrderNumberGenerator: Send + Sync {
    /// Produce a candidate order number for an order placed at `now`.
    fn generate(&self, now: Timestamp) -> String;
}

/// Draws suffixes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumberGenerator for RandomOrderNumbers {
    fn generate(&self, now: Timestamp) -> String {
        let mut rng = rand::thread_rng();

        let suffix: String = (0..ORDER_NUMBER_SUFFIX_LEN)
            .filter_map(|_| ORDER_NUMBER_ALPHABET.choose(&mut rng))
            .map(|&byte| char::from(byte))
            .collect();

        format_order_number(now, &suffix)
    }
}

#[must_use]
pub fn format_order_number(now: Timestamp, suffix: &str) -> String {
    let date = now.to_zoned(TimeZone::UTC).date();

    format!(
        "{ORDER_NUMBER_PREFIX}-{:04}{:02}{:02}-{suffix}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Whether `value` is shaped like a generated order number.
#[must_use]
pub fn is_order_number(value: &str) -> bool {
    let mut parts = value.split('-');

    let (Some(prefix), Some(date), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == ORDER_NUMBER_PREFIX
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == ORDER_NUMBER_SUFFIX_LEN
        && suffix.bytes().all(|b| ORDER_NUMBER_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn alphabet_has_no_repeated_symbols() {
        let distinct: FxHashSet<u8> = ORDER_NUMBER_ALPHABET.iter().copied().collect();

        assert_eq!(distinct.len(), ORDER_NUMBER_ALPHABET.len());
        assert!(!distinct.contains(&b'0'));
        assert!(!distinct.contains(&b'O'));
        assert!(!distinct.contains(&b'1'));
        assert!(!distinct.contains(&b'I'));
    }

    #[test]
    fn numbers_carry_the_utc_date() -> Result<(), jiff::Error> {
        let now: Timestamp = "2026-10-18T23:30:00-05:00".parse()?;

        assert_eq!(format_order_number(now, "ABCDEFGH"), "ORD-20261019-ABCDEFGH");

        Ok(())
    }

    #[test]
    fn generated_numbers_are_well_formed() {
        let number = RandomOrderNumbers.generate(Timestamp::now());

        assert!(is_order_number(&number), "malformed order number {number}");
    }

    #[test]
    fn ten_thousand_numbers_are_pairwise_distinct() {
        let now = Timestamp::now();

        let numbers: FxHashSet<String> = (0..10_000)
            .map(|_| RandomOrderNumbers.generate(now))
            .collect();

        assert_eq!(numbers.len(), 10_000);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(!is_order_number("ORD-2026101-ABCDEFGH"));
        assert!(!is_order_number("ORD-20261018-ABCDEFG0"));
        assert!(!is_order_number("INV-20261018-ABCDEFGH"));
        assert!(!is_order_number("ORD-20261018-ABCDEFGH-X"));
    }
}
