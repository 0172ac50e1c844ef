//! Version ordering used for "latest" selection and result ranking.
//!
//! Versions are split on `.` and `-`. Each token is left-padded with `0` to a
//! width of 10 and compared bytewise; a side that runs out of tokens is
//! compared as `0000000000`. So `0.1` equals `0.1.0` and `0.10` is greater than
//! `0.9`.
//!
//! Tokens longer than 10 characters are not truncated, so numbers with more
//! than 10 digits compare as plain strings past the padding width.

use std::cmp::Ordering;

const TOKEN_WIDTH: usize = 10;
const ZERO_TOKEN: &str = "0000000000";

fn tokens(version: &str) -> impl Iterator<Item = &str> {
    version.split(|c: char| c == '.' || c == '-')
}

fn pad(token: &str) -> String {
    format!("{token:0>width$}", width = TOKEN_WIDTH)
}

/// Compares two version strings.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use zrpm_index::version::compare;
///
/// assert_eq!(compare("0.1", "0.1.0"), Ordering::Equal);
/// assert_eq!(compare("0.10.0", "0.9.9"), Ordering::Greater);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = tokens(a);
    let mut right = tokens(b);

    loop {
        let (l, r) = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                (
                    l.map_or_else(|| ZERO_TOKEN.to_string(), pad),
                    r.map_or_else(|| ZERO_TOKEN.to_string(), pad),
                )
            }
        };

        match l.as_bytes().cmp(r.as_bytes()) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        let cases = [
            ("", "", Ordering::Equal),
            ("", "0", Ordering::Equal),
            ("", "1", Ordering::Less),
            ("2", "", Ordering::Greater),
            ("0.1", "0.1.0", Ordering::Equal),
            ("0.1", "0.1.1", Ordering::Less),
            ("0.2", "0.1.1", Ordering::Greater),
            ("0.10.0", "0.9.9", Ordering::Greater),
            ("0.10.0", "0.009.9", Ordering::Greater),
            ("0.1.1", "0.1.9", Ordering::Less),
            ("git.0.2", "git.0.1.1", Ordering::Greater),
            ("0.7.1-1", "0.6.0-1", Ordering::Greater),
        ];

        for (a, b, expected) in cases {
            assert_eq!(compare(a, b), expected, "compare({a:?}, {b:?})");
        }
    }

    #[test]
    fn test_dash_and_dot_are_equivalent() {
        assert_eq!(compare("1.2-3", "1-2.3"), Ordering::Equal);
    }

    #[test]
    fn test_antisymmetric_and_reflexive() {
        let versions = ["", "0", "1", "0.1", "0.1.0", "1.10", "1.9", "2.0-rc1", "git.0.2"];

        for a in versions {
            assert_eq!(compare(a, a), Ordering::Equal);
            for b in versions {
                assert_eq!(compare(a, b), compare(b, a).reverse(), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_long_tokens_compare_as_strings() {
        assert_eq!(compare("99999999999", "100000000000"), Ordering::Greater);
    }
}
