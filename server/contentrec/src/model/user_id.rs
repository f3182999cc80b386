//! User identifiers of unbounded width

use crate::error::{RecError, RecResult};
use serde_json::Value;
use std::fmt;
use std::num::NonZeroUsize;

/// Integer user identifier, kept as exact decimal digits
///
/// Clients may send integers wider than any machine type; only the residue
/// modulo the user count is ever needed, so the digits are never narrowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId {
    negative: bool,
    /// ASCII digits without leading zeros, `"0"` for zero
    digits: String,
}

impl UserId {
    /// Parse an optionally signed decimal integer
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = match unsigned.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        Some(Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        })
    }

    /// Coerce a JSON value into a user id.
    ///
    /// Accepts integers of any width, integer strings (surrounding whitespace
    /// ignored) and finite floats, which are truncated toward zero. Only `null`
    /// and the empty string count as missing: falsy values such as `0` and
    /// `false` are not, so `0` is a valid id and `false` is rejected as a
    /// non-integer.
    pub fn from_json(value: &Value) -> RecResult<Self> {
        let invalid = || RecError::InvalidField {
            field: "user_id",
            expected: "an integer",
        };

        match value {
            Value::Null => Err(RecError::MissingField("user_id")),
            Value::Number(n) => {
                // With arbitrary precision the number keeps its source text
                if let Some(id) = Self::parse_decimal(&n.to_string()) {
                    return Ok(id);
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() => {
                        Self::parse_decimal(&format!("{:.0}", f.trunc())).ok_or_else(invalid)
                    }
                    _ => Err(invalid()),
                }
            }
            Value::String(s) => {
                if s.is_empty() {
                    return Err(RecError::MissingField("user_id"));
                }
                Self::parse_decimal(s.trim()).ok_or_else(invalid)
            }
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(invalid()),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Mathematical modulo, always in `0..modulus`
    pub fn rem_euclid(&self, modulus: NonZeroUsize) -> usize {
        let m = modulus.get() as u128;
        let rem = self
            .digits
            .bytes()
            .fold(0u128, |acc, b| (acc * 10 + u128::from(b - b'0')) % m);
        let rem = if self.negative && rem != 0 { m - rem } else { rem };
        rem as usize
    }
}

impl From<i128> for UserId {
    fn from(value: i128) -> Self {
        Self {
            negative: value < 0,
            digits: value.unsigned_abs().to_string(),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::from(i128::from(value))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BIG: &str = "100000000000000000000007";

    fn modulus(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(UserId::from_json(&json!(3)).unwrap(), UserId::from(3i64));
        assert_eq!(UserId::from_json(&json!(0)).unwrap(), UserId::from(0i64));
        assert_eq!(UserId::from_json(&json!(-12)).unwrap(), UserId::from(-12i64));
        assert_eq!(
            UserId::from_json(&json!(u64::MAX)).unwrap(),
            UserId::from(u64::MAX as i128)
        );
    }

    #[test]
    fn test_parse_integers_wider_than_u64() {
        let value: Value = serde_json::from_str(BIG).unwrap();
        let id = UserId::from_json(&value).unwrap();
        assert_eq!(id.to_string(), BIG);
        assert_eq!(id, UserId::from_json(&json!(BIG)).unwrap());
        assert_eq!(id.rem_euclid(modulus(10)), 7);

        let value: Value = serde_json::from_str(&format!("-{BIG}")).unwrap();
        let id = UserId::from_json(&value).unwrap();
        assert!(id.is_negative());
        assert_eq!(id.rem_euclid(modulus(10)), 3);

        // Wider than i128 as well
        let huge = format!("{}1", "9".repeat(60));
        let value: Value = serde_json::from_str(&huge).unwrap();
        let id = UserId::from_json(&value).unwrap();
        assert_eq!(id.to_string(), huge);
        assert_eq!(id.rem_euclid(modulus(10)), 1);
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(UserId::from_json(&json!("42")).unwrap(), UserId::from(42i64));
        assert_eq!(UserId::from_json(&json!(" 7 ")).unwrap(), UserId::from(7i64));
        assert_eq!(UserId::from_json(&json!("-3")).unwrap(), UserId::from(-3i64));
        assert_eq!(UserId::from_json(&json!("+5")).unwrap(), UserId::from(5i64));
        assert_eq!(UserId::from_json(&json!("007")).unwrap(), UserId::from(7i64));
        assert_eq!(UserId::from_json(&json!("-0")).unwrap(), UserId::from(0i64));
    }

    #[test]
    fn test_parse_floats_truncate() {
        assert_eq!(UserId::from_json(&json!(3.9)).unwrap(), UserId::from(3i64));
        assert_eq!(UserId::from_json(&json!(-3.9)).unwrap(), UserId::from(-3i64));
        assert_eq!(UserId::from_json(&json!(-0.5)).unwrap(), UserId::from(0i64));

        let value: Value = serde_json::from_str("1e3").unwrap();
        assert_eq!(UserId::from_json(&value).unwrap(), UserId::from(1000i64));
    }

    #[test]
    fn test_missing_values() {
        assert!(matches!(
            UserId::from_json(&Value::Null),
            Err(RecError::MissingField("user_id"))
        ));
        assert!(matches!(
            UserId::from_json(&json!("")),
            Err(RecError::MissingField("user_id"))
        ));
    }

    #[test]
    fn test_falsy_values_are_not_missing() {
        assert_eq!(UserId::from_json(&json!(0)).unwrap(), UserId::from(0i64));
        assert!(matches!(
            UserId::from_json(&json!(false)),
            Err(RecError::InvalidField { field: "user_id", .. })
        ));
    }

    #[test]
    fn test_rejects_non_integers() {
        for value in [
            json!("abc"),
            json!("3.5"),
            json!("   "),
            json!("-"),
            json!("1 2"),
            json!(true),
            json!([1]),
            json!({"id": 1}),
        ] {
            assert!(
                matches!(
                    UserId::from_json(&value),
                    Err(RecError::InvalidField { field: "user_id", .. })
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_rem_euclid_matches_i128() {
        for value in [-101i128, -11, -10, -1, 0, 1, 9, 10, 123_456_789, i128::MIN, i128::MAX] {
            for m in [1usize, 3, 10, 97] {
                assert_eq!(
                    UserId::from(value).rem_euclid(modulus(m)),
                    value.rem_euclid(m as i128) as usize,
                    "{value} mod {m}"
                );
            }
        }
    }
}
