use crate::core::error::{LedgerError, LedgerResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A signed amount of money in the group's single currency.
///
/// Stored as a whole number of cents so that splitting and aggregation
/// never accumulate rounding error. Decimal values are only produced at the
/// boundary, when an amount is displayed or serialized.
///
/// Conversions from decimal, string or float input round half away from
/// zero to two places, and reject anything beyond [`Money::MAX`] in
/// magnitude. The bound leaves room to total tens of thousands of maximal
/// amounts without leaving `i64`.
///
/// # Examples
///
/// ```
/// use split_ledger::core::money::Money;
/// use rust_decimal_macros::dec;
///
/// let amount = Money::from_decimal(dec!(75.50)).unwrap();
/// assert_eq!(amount.cents(), 7550);
/// assert_eq!(amount.to_string(), "75.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// The smallest representable amount, 0.01.
    pub const CENT: Money = Money(1);
    /// Largest accepted magnitude, one trillion units.
    pub const MAX: Money = Money(100_000_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rounding to the nearest cent.
    pub fn from_decimal(value: Decimal) -> LedgerResult<Self> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .filter(|money| money.abs() <= Self::MAX)
            .ok_or_else(|| LedgerError::InvalidAmount(value.to_string()))
    }

    /// Convert a float amount, rejecting NaN and infinities.
    pub fn from_f64(value: f64) -> LedgerResult<Self> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidAmount(value.to_string()));
        }
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| LedgerError::InvalidAmount(value.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Parse a user-entered amount such as `"75.50"`.
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let trimmed = input.trim();
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| LedgerError::InvalidAmount(input.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Returns `self` if it is strictly positive and at most [`Money::MAX`],
    /// `InvalidAmount` otherwise.
    pub fn ensure_positive(self) -> LedgerResult<Self> {
        if self.is_positive() && self <= Self::MAX {
            Ok(self)
        } else {
            Err(LedgerError::InvalidAmount(self.to_string()))
        }
    }

    /// `None` on `i64` overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
