//! Luhn checksum validation for order numbers.

/// Returns `true` if `number` is all digits, at least 3 characters long, and
/// its last digit is a valid Luhn check digit for the preceding digits.
pub fn is_valid(number: &str) -> bool {
    if number.len() < 3 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = number.chars().map(|c| c.to_digit(10).unwrap()).collect();
    let (check, prefix) = digits.split_last().unwrap();

    *check == checksum(prefix)
}

/// Computes the Luhn check digit for a prefix of digits, scanning from the
/// least-significant end: even-indexed positions (0-based) are doubled with
/// casting-out-nines.
pub fn checksum(prefix: &[u32]) -> u32 {
    let sum: u32 = prefix
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    (10 - (sum % 10)) % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_good_number() {
        assert!(is_valid("12345678903"));
    }

    #[test]
    fn rejects_bad_checksum() {
        assert!(!is_valid("12345678900"));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(!is_valid("123abc903"));
    }

    #[test]
    fn rejects_too_short() {
        assert!(!is_valid("12"));
    }

    #[test]
    fn checksum_round_trips_for_every_prefix_length() {
        let source = "49927398716";
        let digits: Vec<u32> = source.chars().map(|c| c.to_digit(10).unwrap()).collect();

        for len in 2..digits.len() {
            let prefix = &digits[..len];
            let check = checksum(prefix);
            let candidate: String = prefix
                .iter()
                .map(|d| std::char::from_digit(*d, 10).unwrap())
                .chain(std::iter::once(std::char::from_digit(check, 10).unwrap()))
                .collect();
            assert!(is_valid(&candidate), "failed for prefix {prefix:?}");
        }
    }
}
