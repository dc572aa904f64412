use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed rational as reported by the tag backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_integer(self) -> bool {
        self.denominator == 1
            || self.numerator.checked_rem(self.denominator) == Some(0)
            || (self.denominator == 0 && self.numerator == 0)
    }

    /// Reduces by the greatest common divisor. Zero denominators are left untouched.
    pub fn simplified(self) -> Self {
        let divisor = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs());
        if divisor <= 1 {
            return self;
        }
        let Ok(divisor) = i64::try_from(divisor) else {
            return self;
        };
        Self::new(self.numerator / divisor, self.denominator / divisor)
    }

    /// Shortest readable form: an integer, `1/n`, a short decimal when
    /// `allow_decimal` is set, or the reduced fraction.
    pub fn to_simple_string(self, allow_decimal: bool) -> String {
        if self.denominator == 0 && self.numerator != 0 {
            return self.to_string();
        }
        if self.is_integer() {
            return self.numerator.checked_div(self.denominator).unwrap_or(0).to_string();
        }
        if self.numerator != 1 && self.denominator.checked_rem(self.numerator) == Some(0) {
            if let Some(reciprocal) = self.denominator.checked_div(self.numerator) {
                return Self::new(1, reciprocal).to_simple_string(allow_decimal);
            }
        }
        let simplified = self.simplified();
        if allow_decimal {
            let decimal = simplified.to_f64().to_string();
            if decimal.len() < 5 {
                return decimal;
            }
        }
        simplified.to_string()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_string_prefers_integers_and_unit_fractions() {
        assert_eq!(Rational::new(4000, 1000).to_simple_string(true), "4");
        assert_eq!(Rational::new(2, 200).to_simple_string(false), "1/100");
        assert_eq!(Rational::new(2, 200).to_simple_string(true), "0.01");
        assert_eq!(Rational::new(5, 2).to_simple_string(true), "2.5");
        assert_eq!(Rational::new(4, 3).to_simple_string(true), "4/3");
        assert_eq!(Rational::new(4, 6).to_simple_string(false), "2/3");
    }

    #[test]
    fn zero_denominator_is_left_as_is() {
        assert_eq!(Rational::new(3, 0).to_simple_string(true), "3/0");
        assert_eq!(Rational::new(0, 0).to_simple_string(true), "0");
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let min = Rational::new(i64::MIN, -1);
        assert!(!min.is_integer());
        assert_eq!(min.to_simple_string(false), "-9223372036854775808/-1");
        assert_eq!(Rational::new(-1, i64::MIN).to_simple_string(false), "-1/-9223372036854775808");
        assert_eq!(Rational::new(i64::MIN, i64::MIN).to_simple_string(false), "1");
    }
}
