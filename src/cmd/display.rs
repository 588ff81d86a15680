//! Amount formatting shared by the commands

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to satang, halves away from zero
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234567.891` → `"1,234,567.89"`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round2(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

pub fn format_thb(amount: Decimal) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-\u{0E3F}{}", rest),
        None => format!("\u{0E3F}{}", formatted),
    }
}

/// Plain two-decimal string for CSV and JSON
pub fn format_plain(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(999)), "999.00");
        assert_eq!(format_amount(dec!(1000)), "1,000.00");
        assert_eq!(format_amount(dec!(56000)), "56,000.00");
        assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(0.135)), "0.14");
        assert_eq!(format_amount(dec!(32199.99999999)), "32,200.00");
        assert_eq!(format_plain(dec!(2.675)), "2.68");
    }

    #[test]
    fn currency_prefix() {
        assert_eq!(format_thb(dec!(99000)), "\u{0E3F}99,000.00");
        assert_eq!(format_thb(dec!(-1500)), "-\u{0E3F}1,500.00");
    }
}
