//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{mask, Percent};

/// Non-negative amount of Brazilian Reais.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] if the provided `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Maximum number of significant digits (cents included) of a
    /// [`Money`] parsed from user input.
    ///
    /// Matches the `NUMERIC(28, 2)` storage precision.
    pub const MAX_DIGITS: usize = 28;

    /// Parses masked user input (like `R$ 1.234,56` or `123456`) as an amount
    /// of cents.
    ///
    /// [`None`] is returned if the input contains no digits, or more than
    /// [`Money::MAX_DIGITS`] significant ones.
    #[must_use]
    pub fn from_input(raw: &str) -> Option<Self> {
        let digits = mask::digits(raw);
        if digits.is_empty()
            || digits.trim_start_matches('0').len() > Self::MAX_DIGITS
        {
            None
        } else {
            Some(Self(mask::parse_currency(&digits)))
        }
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns the provided [`Percent`] share of this [`Money`], rounded to
    /// whole cents.
    #[must_use]
    pub fn share(self, percent: Percent) -> Self {
        Self(
            (self.0 * percent.value() / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(
                    2,
                    RoundingStrategy::MidpointAwayFromZero,
                ),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask::brl(self.0))
    }
}

impl FromStr for Money {
    type Err = &'static str;

    /// Parses a plain decimal amount, like `1234.56`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map_err(|_| "invalid amount")
            .and_then(|d| Self::new(d).ok_or("negative amount"))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            let mut amount = self.0;
            amount.rescale(2);
            s.serialize_str(&amount.to_string())
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = String::deserialize(d)?;
            Self::from_str(&s).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use crate::Percent;

    use super::Money;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(money("123.45").amount(), Decimal::new(12345, 2));
        assert_eq!(money("0").amount(), Decimal::ZERO);
        assert!(Money::from_str("-1").is_err());
        assert!(Money::from_str("12,5").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn from_input() {
        assert_eq!(Money::from_input("R$ 100,00"), Some(money("100")));
        assert_eq!(Money::from_input("10000"), Some(money("100")));
        assert_eq!(Money::from_input("0"), Some(Money::ZERO));
        assert_eq!(Money::from_input(""), None);
        assert_eq!(Money::from_input("R$"), None);

        let max = "9".repeat(Money::MAX_DIGITS);
        let largest = money(&format!("{}.99", "9".repeat(Money::MAX_DIGITS - 2)));
        assert_eq!(Money::from_input(&max), Some(largest));
        assert_eq!(Money::from_input(&format!("000{max}")), Some(largest));
        assert_eq!(Money::from_input(&format!("1{max}")), None);
    }

    #[test]
    fn to_string() {
        assert_eq!(money("100").to_string(), "R$\u{a0}100,00");
        assert_eq!(money("1234.5").to_string(), "R$\u{a0}1.234,50");
        assert_eq!(Money::ZERO.to_string(), "R$\u{a0}0,00");
    }

    #[test]
    fn share() {
        let quarter = Percent::new(Decimal::from(25)).unwrap();
        assert_eq!(money("100").share(quarter), money("25"));
        assert_eq!(money("0.10").share(quarter), money("0.03"));
        assert_eq!(money("0.02").share(quarter), money("0.01"));
        assert_eq!(Money::ZERO.share(quarter), Money::ZERO);
    }
}
