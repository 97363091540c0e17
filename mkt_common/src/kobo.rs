use std::{
    fmt::Display,
    iter::Sum,
    ops::Add,
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const NAIRA_CURRENCY_CODE: &str = "NGN";

//--------------------------------------        Kobo         ---------------------------------------------------------
/// An amount of Naira, held in kobo (1/100 Naira). Paystack quotes every amount in kobo, so this is the only money
/// unit used in the marketplace.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Kobo(i64);

op!(binary Kobo, Add, add);
op!(binary Kobo, Sub, sub);
op!(inplace Kobo, SubAssign, sub_assign);
op!(unary Kobo, Neg, neg);

impl Sum for Kobo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in kobo: {0}")]
pub struct KoboConversionError(String);

impl From<i64> for Kobo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Kobo {
    type Error = KoboConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value).map(Self).map_err(|_| KoboConversionError(format!("{value} is too large")))
    }
}

impl FromStr for Kobo {
    type Err = KoboConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| KoboConversionError(format!("{s}: {e}")))
    }
}

impl Display for Kobo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let naira = (abs / 100).to_string();
        let mut grouped = String::with_capacity(naira.len() + naira.len() / 3);
        for (i, c) in naira.chars().enumerate() {
            if i > 0 && (naira.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{sign}₦{grouped}.{:02}", abs % 100)
    }
}

impl Kobo {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// `None` if the amount does not fit in kobo.
    pub fn from_naira(naira: i64) -> Option<Self> {
        naira.checked_mul(100).map(Self)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// This amount times `rhs`, or `None` on overflow.
    pub fn checked_mul(&self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    /// `percent`% of this amount, rounded towards zero, or `None` if the result does not fit.
    pub fn checked_percent(&self, percent: i64) -> Option<Self> {
        let share = i128::from(self.0) * i128::from(percent) / 100;
        i64::try_from(share).ok().map(Self)
    }

    /// `percent`% of this amount, rounded towards zero. `percent` is clamped to `0..=100`, so the share is never
    /// larger than the amount and cannot overflow.
    pub fn percent(&self, percent: u8) -> Self {
        let percent = i128::from(percent.min(100));
        // |share| <= |self.0|, so the narrowing is lossless
        Self((i128::from(self.0) * percent / 100) as i64)
    }
}

impl<'de> Deserialize<'de> for Kobo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Int(i64),
            Float(f64),
            Text(String),
        }
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Int(v) => Ok(Self(v)),
            RawAmount::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(Self(v as i64)),
            RawAmount::Float(v) => Err(de::Error::custom(format!("{v} is not a whole number of kobo"))),
            RawAmount::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
