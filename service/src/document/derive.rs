//! Derivation of the dependent [`Form`] fields.

use common::{mask, Money};
use rust_decimal::Decimal;

use crate::domain::contract::{payment, Terms};

use super::Form;

/// Returns the masked down payment suggested for the masked `total_value`.
///
/// Returns an empty string if `total_value` is not a valid [`Money`] input.
#[must_use]
pub fn suggested_down_payment(total_value: &str) -> String {
    Money::from_input(total_value)
        .map(|total| Terms::suggested_down_payment(total).to_string())
        .unwrap_or_default()
}

/// Pass run after the total value of the provided [`Form`] changes.
///
/// Fills an empty down payment with the suggested one if the total value is
/// positive. A non-empty down payment is never overwritten.
pub fn on_total_value_change(form: &mut Form) {
    if mask::digits(&form.down_payment).is_empty()
        && mask::parse_currency(&form.total_value) > Decimal::ZERO
    {
        form.down_payment = suggested_down_payment(&form.total_value);
    }
}

/// Returns the masked amount of a single installment of the provided
/// [`Form`].
///
/// [`None`] is returned if the total value is not positive. Missing or zero
/// installments count as one.
#[must_use]
pub fn installment_amount(form: &Form) -> Option<String> {
    let digits = mask::digits(&form.installments);
    // Overflowing counts saturate.
    let installments = if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(u32::MAX)
    };
    payment::installment_amount(
        mask::parse_currency(&form.total_value),
        mask::parse_currency(&form.down_payment),
        installments,
    )
    .map(mask::brl)
}

#[cfg(test)]
mod spec {
    use super::{installment_amount, on_total_value_change, suggested_down_payment, Form};

    fn form(total: &str, down: &str, installments: &str) -> Form {
        Form {
            total_value: total.to_owned(),
            down_payment: down.to_owned(),
            installments: installments.to_owned(),
            ..Form::default()
        }
    }

    #[test]
    fn fills_empty_down_payment_on_total_change() {
        let mut f = form("R$\u{a0}100,00", "", "1");
        on_total_value_change(&mut f);
        assert_eq!(f.down_payment, "R$\u{a0}25,00");
    }

    #[test]
    fn never_overwrites_down_payment_on_total_change() {
        let mut f = form("R$\u{a0}100,00", "R$\u{a0}10,00", "1");
        on_total_value_change(&mut f);
        assert_eq!(f.down_payment, "R$\u{a0}10,00");

        let mut f = form("", "", "1");
        on_total_value_change(&mut f);
        assert_eq!(f.down_payment, "");

        let mut f = form("R$\u{a0}0,00", "", "1");
        on_total_value_change(&mut f);
        assert_eq!(f.down_payment, "");
    }

    #[test]
    fn suggests_a_quarter_of_masked_total() {
        assert_eq!(suggested_down_payment("R$\u{a0}1.234,56"), "R$\u{a0}308,64");
        assert_eq!(suggested_down_payment(""), "");
    }

    #[test]
    fn computes_installment_amount() {
        assert_eq!(
            installment_amount(&form("R$\u{a0}100,00", "R$\u{a0}20,00", "4")),
            Some("R$\u{a0}20,00".to_owned()),
        );
        assert_eq!(
            installment_amount(&form("R$\u{a0}100,00", "", "")),
            Some("R$\u{a0}100,00".to_owned()),
        );
        assert_eq!(
            installment_amount(&form("R$\u{a0}100,00", "", "0")),
            Some("R$\u{a0}100,00".to_owned()),
        );
        assert_eq!(
            installment_amount(&form("R$\u{a0}10,00", "R$\u{a0}20,00", "2")),
            Some("-R$\u{a0}5,00".to_owned()),
        );
    }

    #[test]
    fn no_installment_amount_without_total() {
        assert_eq!(installment_amount(&form("", "", "3")), None);
        assert_eq!(installment_amount(&form("R$\u{a0}0,00", "", "3")), None);
    }
}
