//! Fixed-point money with two fractional digits.
//!
//! Amounts are held as integer cents. On the wire they travel as decimal
//! strings (`"2.16"`), which is also how totals are submitted by clients.
//! Item prices are accepted as JSON numbers too, since drafted line items
//! carry them that way.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest whole-unit part accepted when parsing (precision 10, scale 2).
const MAX_WHOLE_DIGITS: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a decimal number: {0}")]
    Invalid(String),
    #[error("amount has more than two fractional digits: {0}")]
    TooPrecise(String),
    #[error("amount exceeds eight integer digits: {0}")]
    TooLarge(String),
}

/// An amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest amount that fits eight integer digits.
    pub const MAX: Money = Money(9_999_999_999);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply by a line quantity. `None` past [`Money::MAX`].
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Self)
            .filter(|m| m.within_limit())
    }

    /// `None` past [`Money::MAX`].
    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .filter(|m| m.within_limit())
    }

    /// Sum of `amounts`, or `None` once the running total leaves the range.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Percentage of this amount given in basis points (800 = 8%), rounded
    /// half away from zero to the nearest cent.
    pub fn percent_bps(self, bps: i64) -> Option<Self> {
        let scaled = i128::from(self.0) * i128::from(bps);
        let rounded = if scaled >= 0 {
            (scaled + 5_000) / 10_000
        } else {
            -((-scaled + 5_000) / 10_000)
        };
        i64::try_from(rounded)
            .ok()
            .map(Self)
            .filter(|m| m.within_limit())
    }

    #[inline]
    fn within_limit(self) -> bool {
        self.0.unsigned_abs() <= Money::MAX.0.unsigned_abs()
    }

    fn from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::Invalid(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= 10f64.powi((MAX_WHOLE_DIGITS + 2) as i32) {
            return Err(MoneyError::TooLarge(value.to_string()));
        }
        Ok(Self(cents as i64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyError::Invalid(trimmed.to_string()));
        }
        if digits.ends_with('.') {
            return Err(MoneyError::Invalid(trimmed.to_string()));
        }
        if frac.len() > 2 {
            return Err(MoneyError::TooPrecise(trimmed.to_string()));
        }
        let whole_significant = whole.trim_start_matches('0');
        if whole_significant.len() > MAX_WHOLE_DIGITS {
            return Err(MoneyError::TooLarge(trimmed.to_string()));
        }

        let whole_value: i64 = if whole_significant.is_empty() {
            0
        } else {
            whole_significant
                .parse()
                .map_err(|_| MoneyError::Invalid(trimmed.to_string()))?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac
                .parse()
                .map_err(|_| MoneyError::Invalid(trimmed.to_string()))?,
        };
        let cents = whole_value * 100 + frac_value;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .filter(|m| m.within_limit())
            .ok_or_else(|| E::custom(MoneyError::TooLarge(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyError::TooLarge(v.to_string())))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
