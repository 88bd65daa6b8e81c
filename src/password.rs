//! Random password generation for the `pwgen` tool.

use rand::Rng;

/// Length used when the requested length is missing or not a positive integer.
pub const DEFAULT_LENGTH: usize = 10;

/// Printable ASCII range passwords are drawn from (`!` through `~`).
const CHARSET: std::ops::RangeInclusive<u8> = 33..=126;

/// Reads a requested length, falling back to [`DEFAULT_LENGTH`].
///
/// Only plain decimal digits are accepted; surrounding whitespace (such as the line
/// ending of a prompt answer) is ignored.
pub fn parse_length(input: &str) -> usize {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_LENGTH;
    }
    match input.parse::<usize>() {
        Ok(length) if length > 0 => length,
        _ => DEFAULT_LENGTH,
    }
}

/// Draws `length` characters uniformly from printable ASCII.
pub fn generate_password<R: Rng>(length: usize, rng: &mut R) -> String {
    (0..length)
        .map(|_| char::from(rng.gen_range(CHARSET)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("16"), 16);
        assert_eq!(parse_length("16\n"), 16);
        assert_eq!(parse_length(""), DEFAULT_LENGTH);
        assert_eq!(parse_length("0"), DEFAULT_LENGTH);
        assert_eq!(parse_length("-3"), DEFAULT_LENGTH);
        assert_eq!(parse_length("+3"), DEFAULT_LENGTH);
        assert_eq!(parse_length("twelve"), DEFAULT_LENGTH);
        assert_eq!(parse_length("99999999999999999999999"), DEFAULT_LENGTH);
    }

    #[test]
    fn test_password_length_and_charset() {
        let mut rng = StdRng::seed_from_u64(7);
        for length in [1, 10, 64] {
            let password = generate_password(length, &mut rng);
            assert_eq!(password.chars().count(), length);
            assert!(password.bytes().all(|b| (33..=126).contains(&b)));
        }
    }

    #[test]
    fn test_same_seed_same_password() {
        let a = generate_password(20, &mut StdRng::seed_from_u64(42));
        let b = generate_password(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
