use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SCALE: u32 = 2;

/// Currency amount, always carried at two decimal places.
///
/// Serialized as a decimal string (`"7999.99"`), the shape the catalog
/// clients already feed into `parseFloat`. Storage keeps integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    pub fn cents(self) -> i64 {
        let mut d = self.0;
        d.rescale(SCALE);
        i64::try_from(d.mantissa()).unwrap_or(i64::MAX)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Round half away from zero to the cent. Negative input clamps to zero.
    pub fn from_decimal_rounded(value: Decimal) -> Self {
        if value.is_sign_negative() {
            return Self::ZERO;
        }
        let mut d = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        d.rescale(SCALE);
        Self(d)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = self.0;
        d.rescale(SCALE);
        write!(f, "{d}")
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriceError(String);

impl fmt::Display for ParsePriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid price `{}`", self.0)
    }
}

impl std::error::Error for ParsePriceError {}

impl FromStr for Price {
    type Err = ParsePriceError;

    /// Accepts `7999`, `7999.9`, `7999.99` and the comma variant `7999,99`.
    /// A separator must be followed by one or two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePriceError(s.to_string());
        let raw = s.trim();
        let (whole, frac) = match raw.split_once(['.', ',']) {
            Some((_, "")) => return Err(err()),
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let canonical = if frac.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{frac}")
        };
        let mut d = Decimal::from_str(&canonical).map_err(|_| err())?;
        d.rescale(SCALE);
        if i64::try_from(d.mantissa()).is_err() {
            return Err(err());
        }
        Ok(Self(d))
    }
}
