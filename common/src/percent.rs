//! [`Percent`]-related definitions.

use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::mask;

/// Percentage in the `0..=100` range.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided value is between
    /// `0` and `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Creates a new [`Percent`] out of a whole number of percents.
    ///
    /// [`None`] is returned if `n` exceeds `100`.
    #[must_use]
    pub const fn whole(n: u8) -> Option<Self> {
        if n > 100 {
            return None;
        }
        #[expect(clippy::cast_lossless, reason = "`From` is not `const`")]
        let lo = n as u32;
        Some(Self(Decimal::from_parts(lo, 0, 0, false, 0)))
    }

    /// Parses masked user input (like `2,00%` or `200`) as hundredths of a
    /// percent.
    ///
    /// [`None`] is returned if the input contains no digits or exceeds
    /// `100%`.
    #[must_use]
    pub fn from_input(raw: &str) -> Option<Self> {
        if mask::digits(raw).is_empty() {
            return None;
        }
        Self::new(mask::parse_percent(raw))
    }

    /// Returns the value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask::percentage(self.0))
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::Percent;

    impl Serialize for Percent {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            let mut value = self.0;
            value.rescale(2);
            s.serialize_str(&value.to_string())
        }
    }

    impl<'de> Deserialize<'de> for Percent {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = String::deserialize(d)?;
            Self::from_str(&s).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    #[test]
    fn bounds() {
        assert!(Percent::new(Decimal::ZERO).is_some());
        assert!(Percent::new(Decimal::ONE_HUNDRED).is_some());
        assert!(Percent::new(Decimal::new(-1, 2)).is_none());
        assert!(Percent::new(Decimal::new(10001, 2)).is_none());

        assert_eq!(Percent::whole(25).map(Percent::value), Some(25.into()));
        assert!(Percent::whole(101).is_none());
    }

    #[test]
    fn from_input() {
        assert_eq!(
            Percent::from_input("2,00%").map(Percent::value),
            Some(Decimal::TWO),
        );
        assert_eq!(
            Percent::from_input("150").map(Percent::value),
            Some(Decimal::new(15, 1)),
        );
        assert_eq!(Percent::from_input("%"), None);
        assert_eq!(Percent::from_input("10001"), None);
    }

    #[test]
    fn to_string() {
        assert_eq!(Percent::new(Decimal::TWO).unwrap().to_string(), "2,00%");
        assert_eq!(
            Percent::new(Decimal::new(125, 1)).unwrap().to_string(),
            "12,50%",
        );
    }
}
