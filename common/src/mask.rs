//! Input masks turning raw user input into pt-BR display strings and back.
//!
//! Every mask only looks at the ASCII digits of its input, so applying a mask
//! to its own output is a no-op.

use rust_decimal::{Decimal, RoundingStrategy};

/// Prefix of a Brazilian Real amount: the `R$` symbol followed by a
/// non-breaking space.
pub const CURRENCY_PREFIX: &str = "R$\u{a0}";

/// Returns only the ASCII digits of the provided `raw` input.
#[must_use]
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Formats the digits of `raw` as an amount of cents in pt-BR currency
/// notation (`R$ 1.234,56`).
///
/// Returns an empty string if `raw` contains no digits.
#[must_use]
pub fn currency(raw: &str) -> String {
    hundredths(raw).map(brl).unwrap_or_default()
}

/// Formats the digits of `raw` as hundredths of a percent (`2,00%`).
///
/// Returns an empty string if `raw` contains no digits.
#[must_use]
pub fn percent(raw: &str) -> String {
    hundredths(raw).map(percentage).unwrap_or_default()
}

/// Parses the digits of `raw` as an amount of cents.
///
/// Never fails: [`Decimal::ZERO`] is returned for input without digits.
#[must_use]
pub fn parse_currency(raw: &str) -> Decimal {
    hundredths(raw).unwrap_or(Decimal::ZERO)
}

/// Parses the digits of `raw` as hundredths of a percent.
///
/// Never fails: [`Decimal::ZERO`] is returned for input without digits.
#[must_use]
pub fn parse_percent(raw: &str) -> Decimal {
    hundredths(raw).unwrap_or(Decimal::ZERO)
}

/// Formats the provided `amount` of Brazilian Reais in pt-BR notation,
/// rounding it to cents.
#[must_use]
pub fn brl(amount: Decimal) -> String {
    let (negative, int, frac) = split(amount);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{CURRENCY_PREFIX}{},{frac:02}", group_thousands(int))
}

/// Formats the provided percentage `value` in pt-BR notation with two
/// decimal places.
#[must_use]
pub fn percentage(value: Decimal) -> String {
    let (negative, int, frac) = split(value);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{int},{frac:02}%")
}

/// Interprets the digits of `raw` as an integer number of hundredths.
///
/// Digit sequences not fitting into a [`Decimal`] saturate to zero.
fn hundredths(raw: &str) -> Option<Decimal> {
    let digits = digits(raw);
    if digits.is_empty() {
        return None;
    }
    Some(
        digits
            .parse::<i128>()
            .ok()
            .and_then(|n| Decimal::try_from_i128_with_scale(n, 2).ok())
            .unwrap_or(Decimal::ZERO),
    )
}

/// Splits the `value` rounded to two decimal places into its sign, integer
/// part and hundredths.
fn split(value: Decimal) -> (bool, i128, i128) {
    let mut rounded =
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);
    let cents = rounded.mantissa();
    (negative, cents / 100, cents % 100)
}

/// Renders the provided non-negative integer with `.` thousands separators.
fn group_thousands(n: i128) -> String {
    let plain = n.to_string();
    let mut out = String::with_capacity(plain.len() + plain.len() / 3);
    for (i, c) in plain.chars().enumerate() {
        if i > 0 && (plain.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{
        brl, currency, digits, parse_currency, parse_percent, percent,
    };

    #[test]
    fn strips_everything_but_digits() {
        assert_eq!(digits("R$\u{a0}1.234,56"), "123456");
        assert_eq!(digits("a1b2c3"), "123");
        assert_eq!(digits("no digits"), "");
    }

    #[test]
    fn formats_currency() {
        assert_eq!(currency("10000"), "R$\u{a0}100,00");
        assert_eq!(currency("7"), "R$\u{a0}0,07");
        assert_eq!(currency("007"), "R$\u{a0}0,07");
        assert_eq!(currency("0"), "R$\u{a0}0,00");
        assert_eq!(currency("123456789"), "R$\u{a0}1.234.567,89");
        assert_eq!(currency("100000"), "R$\u{a0}1.000,00");
        assert_eq!(currency("R$ 12,3"), "R$\u{a0}1,23");
    }

    #[test]
    fn formats_percent() {
        assert_eq!(percent("200"), "2,00%");
        assert_eq!(percent("1,00%"), "1,00%");
        assert_eq!(percent("2%"), "0,02%");
        assert_eq!(percent("123456"), "1234,56%");
    }

    #[test]
    fn empty_or_garbage_input_is_empty() {
        for raw in ["", "   ", "abc", "R$ ,", "%", "-.-"] {
            assert_eq!(currency(raw), "", "currency({raw:?})");
            assert_eq!(percent(raw), "", "percent({raw:?})");
            assert_eq!(parse_currency(raw), Decimal::ZERO, "parse({raw:?})");
            assert_eq!(parse_percent(raw), Decimal::ZERO, "parse({raw:?})");
        }
    }

    #[test]
    fn overlong_digits_saturate_to_zero() {
        let raw = "9".repeat(60);
        assert_eq!(parse_currency(&raw), Decimal::ZERO);
        assert_eq!(currency(&raw), "R$\u{a0}0,00");
    }

    #[test]
    fn parsing_formatted_cents_restores_amount() {
        for cents in [0_i64, 1, 9, 10, 99, 100, 2500, 12_345, 100_000_000] {
            let formatted = currency(&cents.to_string());
            assert_eq!(
                parse_currency(&formatted),
                Decimal::new(cents, 2),
                "{formatted}",
            );
        }
    }

    #[test]
    fn masks_are_idempotent() {
        for raw in ["1", "10000", "R$ 1.234,56", "abc123", "99999999999"] {
            let once = currency(raw);
            assert_eq!(currency(&once), once);

            let once = percent(raw);
            assert_eq!(percent(&once), once);
        }
    }

    #[test]
    fn formats_decimal_amounts() {
        assert_eq!(brl("20".parse().unwrap()), "R$\u{a0}20,00");
        assert_eq!(brl("33.335".parse().unwrap()), "R$\u{a0}33,34");
        assert_eq!(brl("-10".parse().unwrap()), "-R$\u{a0}10,00");
        assert_eq!(brl("-0.001".parse().unwrap()), "R$\u{a0}0,00");
        assert_eq!(brl("1234567".parse().unwrap()), "R$\u{a0}1.234.567,00");
    }
}
