//! Payment [`Terms`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::num::NonZeroU32;

use common::{define_kind, Date, Money, Percent};
use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::Contract;

/// Payment terms of a [`Contract`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terms {
    /// Total value of the [`Contract`].
    pub total_value: Money,

    /// Amount paid upfront, if any.
    pub down_payment: Option<Money>,

    /// [`Date`] when the down payment is paid.
    pub down_payment_date: Option<Date>,

    /// [`Method`] of the payments.
    pub method: Method,

    /// Number of [`Installments`] the remaining balance is paid in.
    pub installments: Installments,

    /// [`Date`] when the first installment is due.
    pub first_due_date: Option<Date>,

    /// [`DueDay`] of every installment.
    pub due_day: DueDay,

    /// Penalty charged on a late installment.
    pub late_penalty: Percent,

    /// Interest charged monthly on a late installment.
    pub monthly_interest: Percent,
}

impl Terms {
    /// Share of the total value suggested as a down payment.
    pub const SUGGESTED_DOWN_PAYMENT: Percent = match Percent::whole(25) {
        Some(p) => p,
        None => unreachable!(),
    };

    /// Returns the down payment suggested for the provided `total_value`.
    #[must_use]
    pub fn suggested_down_payment(total_value: Money) -> Money {
        total_value.share(Self::SUGGESTED_DOWN_PAYMENT)
    }

    /// Returns the amount of a single installment.
    ///
    /// [`None`] is returned if the total value is zero. The result is negative
    /// when the down payment exceeds the total value.
    #[must_use]
    pub fn installment_amount(&self) -> Option<Decimal> {
        installment_amount(
            self.total_value.amount(),
            self.down_payment.map_or(Decimal::ZERO, Money::amount),
            self.installments.get(),
        )
    }
}

/// Divides the balance left after the `down_payment` into `installments`.
///
/// [`None`] is returned if `total` is not positive. Zero `installments` are
/// treated as a single one.
#[must_use]
pub fn installment_amount(
    total: Decimal,
    down_payment: Decimal,
    installments: u32,
) -> Option<Decimal> {
    (total > Decimal::ZERO)
        .then(|| (total - down_payment) / Decimal::from(installments.max(1)))
}

define_kind! {
    #[doc = "Payment method of a [`Contract`]."]
    enum Method {
        #[doc = "Instant payment (PIX)."]
        #[label = "PIX"]
        Pix = 1,

        #[doc = "Bank slip (boleto)."]
        #[label = "BOLETO"]
        Boleto = 2,

        #[doc = "Bank transfer."]
        #[label = "TRANSFERÊNCIA"]
        Transfer = 3,

        #[doc = "Card payment."]
        #[label = "CARTÃO"]
        Card = 4,

        #[doc = "Cash payment."]
        #[label = "DINHEIRO"]
        Cash = 5,
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::Pix
    }
}

/// Number of installments, in the `1..=`[`Installments::MAX`] range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Installments(NonZeroU32);

impl Installments {
    /// Maximum number of [`Installments`]: monthly ones over 100 years.
    pub const MAX: u32 = 1200;

    /// Creates new [`Installments`] if `n` is positive and doesn't exceed
    /// [`Installments::MAX`].
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).filter(|n| n.get() <= Self::MAX).map(Self)
    }

    /// Returns the number of these [`Installments`].
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Installments {
    fn default() -> Self {
        Self(NonZeroU32::MIN)
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Installments {
    accepts!(INT4);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let n = u32::try_from(i32::from_sql(ty, raw)?)?;
        Self::new(n).ok_or_else(|| "out of range `Installments`".into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Installments {
    accepts!(INT4);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i32::try_from(self.get())?.to_sql(ty, w)
    }
}

/// Day of a month an installment is due, in the `1..=31` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct DueDay(u8);

impl DueDay {
    /// Creates a new [`DueDay`] if `day` is in the `1..=31` range.
    #[must_use]
    pub fn new(day: u8) -> Option<Self> {
        (1..=31).contains(&day).then_some(Self(day))
    }

    /// Returns the day of this [`DueDay`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for DueDay {
    fn default() -> Self {
        Self(10)
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for DueDay {
    accepts!(INT2);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let day = u8::try_from(i16::from_sql(ty, raw)?)?;
        Self::new(day).ok_or_else(|| format!("invalid `DueDay`: {day}").into())
    }
}

#[cfg(feature = "postgres")]
impl ToSql for DueDay {
    accepts!(INT2);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i16::from(self.0).to_sql(ty, w)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;
    use rust_decimal::Decimal;

    use super::{installment_amount, DueDay, Installments, Method, Terms};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn suggests_a_quarter_of_the_total() {
        assert_eq!(Terms::suggested_down_payment(money("100")), money("25"));
        assert_eq!(
            Terms::suggested_down_payment(money("1234.56")),
            money("308.64"),
        );
        assert_eq!(Terms::suggested_down_payment(Money::ZERO), Money::ZERO);
    }

    #[test]
    fn divides_the_remaining_balance() {
        let d = |s: &str| Decimal::from_str(s).unwrap();

        assert_eq!(installment_amount(d("100"), d("20"), 4), Some(d("20")));
        assert_eq!(installment_amount(d("100"), d("0"), 0), Some(d("100")));
        assert_eq!(installment_amount(d("10"), d("20"), 2), Some(d("-5")));
        assert_eq!(installment_amount(d("0"), d("0"), 1), None);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn decodes_from_sql() {
        use postgres_types::{private::BytesMut, FromSql as _, ToSql as _, Type};

        let mut raw = BytesMut::new();
        _ = Method::Boleto.to_sql(&Type::INT2, &mut raw).unwrap();
        assert_eq!(Method::from_sql(&Type::INT2, &raw).unwrap(), Method::Boleto);

        let mut raw = BytesMut::new();
        _ = 9_i16.to_sql(&Type::INT2, &mut raw).unwrap();
        assert!(Method::from_sql(&Type::INT2, &raw).is_err());

        let mut raw = BytesMut::new();
        _ = 5000_i32.to_sql(&Type::INT4, &mut raw).unwrap();
        assert!(Installments::from_sql(&Type::INT4, &raw).is_err());
    }

    #[test]
    fn installments_and_due_days_are_bounded() {
        assert!(Installments::new(0).is_none());
        assert_eq!(Installments::new(1200).map(Installments::get), Some(1200));
        assert!(Installments::new(1201).is_none());
        assert!(Installments::new(3_000_000_000).is_none());
        assert_eq!(Installments::default().get(), 1);
        assert!(DueDay::new(0).is_none());
        assert!(DueDay::new(32).is_none());
        assert_eq!(DueDay::new(31).map(DueDay::get), Some(31));
        assert_eq!(DueDay::default().get(), 10);
    }

    #[test]
    fn methods_have_labels() {
        assert_eq!(Method::default(), Method::Pix);
        assert_eq!(Method::Transfer.to_string(), "TRANSFER");
        assert_eq!(Method::Transfer.label(), "TRANSFERÊNCIA");
    }
}
