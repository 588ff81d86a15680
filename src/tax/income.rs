use super::rates::{IncomeBracket, RateTable};
use rust_decimal::Decimal;

/// Estimated personal income tax withheld on the transfer.
///
/// The deemed income (`base` times the holding deduction multiplier) is spread
/// evenly over the holding years, taxed through the progressive brackets as a
/// single year's income, and the yearly tax is multiplied back out.
///
/// A zero holding period has no deduction entry and yields zero.
pub fn income_tax(base: Decimal, holding_years: u32, rates: &RateTable) -> Decimal {
    if holding_years == 0 {
        log::debug!("income tax skipped: holding period under one year");
        return Decimal::ZERO;
    }

    let years = Decimal::from(holding_years);
    let multiplier = rates.holding_multiplier(holding_years);
    let taxable_income = base * multiplier;
    let annual_income = taxable_income / years;
    let tax_per_year = bracket_tax(annual_income, &rates.income_brackets);

    log::debug!(
        "income tax: base={}, years={}, multiplier={}, annual={}, per year={}",
        base,
        holding_years,
        multiplier,
        annual_income,
        tax_per_year
    );

    tax_per_year * years
}

/// Marginal tax on `income`: each bracket taxes only the slice between the
/// previous cumulative limit and its own.
pub fn bracket_tax(income: Decimal, brackets: &[IncomeBracket]) -> Decimal {
    let mut remaining = income;
    let mut previous_limit = Decimal::ZERO;
    let mut tax = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let slice = match bracket.limit {
            Some(limit) => remaining.min(limit - previous_limit),
            None => remaining,
        };
        tax += slice * bracket.rate;
        remaining -= slice;
        if let Some(limit) = bracket.limit {
            previous_limit = limit;
        }
    }

    tax
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn brackets() -> Vec<IncomeBracket> {
        RateTable::default().income_brackets
    }

    #[test]
    fn bracket_tax_first_bracket_only() {
        assert_eq!(bracket_tax(dec!(200000), &brackets()), dec!(10000));
        assert_eq!(bracket_tax(dec!(300000), &brackets()), dec!(15000));
    }

    #[test]
    fn bracket_tax_spans_brackets() {
        // 300000 * 5% + 200000 * 10% + 100000 * 15%
        assert_eq!(bracket_tax(dec!(600000), &brackets()), dec!(50000));
    }

    #[test]
    fn bracket_tax_top_bracket() {
        // 15000 + 20000 + 37500 + 50000 + 250000 + 900000 + 1000000 * 35%
        assert_eq!(bracket_tax(dec!(6000000), &brackets()), dec!(1622500));
    }

    #[test]
    fn bracket_tax_zero_and_negative_income() {
        assert_eq!(bracket_tax(Decimal::ZERO, &brackets()), Decimal::ZERO);
        assert_eq!(bracket_tax(dec!(-100), &brackets()), Decimal::ZERO);
    }

    #[test]
    fn income_tax_one_year() {
        // 2,000,000 * 0.08 = 160,000 in the 5% bracket
        let tax = income_tax(dec!(2000000), 1, &RateTable::default());
        assert_eq!(tax, dec!(8000));
    }

    #[test]
    fn income_tax_spread_over_years() {
        // 2,800,000 * 0.23 / 3 = 214,666.67 per year, all at 5%, times 3
        let tax = income_tax(dec!(2800000), 3, &RateTable::default());
        assert_eq!(tax.round_dp(2), dec!(32200));
    }

    #[test]
    fn income_tax_long_holding_clamps_multiplier() {
        // 10,000,000 * 0.5 / 10 = 500,000 per year: 15,000 + 20,000, times 10
        let tax = income_tax(dec!(10000000), 10, &RateTable::default());
        assert_eq!(tax, dec!(350000));
        // 8 years: 5,000,000 / 8 = 625,000 per year: 15,000 + 20,000 + 18,750
        let tax = income_tax(dec!(10000000), 8, &RateTable::default());
        assert_eq!(tax, dec!(430000));
    }

    #[test]
    fn income_tax_zero_years_is_zero() {
        assert_eq!(income_tax(dec!(5000000), 0, &RateTable::default()), Decimal::ZERO);
    }

    #[test]
    fn income_tax_non_decreasing_in_base() {
        let rates = RateTable::default();
        for years in 1..=9 {
            let mut previous = Decimal::ZERO;
            let mut base = Decimal::ZERO;
            while base <= dec!(120000000) {
                let tax = income_tax(base, years, &rates);
                assert!(tax >= previous, "years={years} base={base}");
                previous = tax;
                base += dec!(750000);
            }
        }
    }
}
