use super::income::income_tax;
use super::period::holding_years;
use super::rates::RateTable;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Who is selling the unit. Carried through to the result for display;
/// the fee formulas are the same for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SellerType {
    #[default]
    Individual,
    Corporate,
}

impl SellerType {
    pub fn display(&self) -> &'static str {
        match self {
            SellerType::Individual => "individual",
            SellerType::Corporate => "corporate",
        }
    }
}

impl std::fmt::Display for SellerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Validated input for one transfer calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxInput {
    /// Agreed sale price (THB)
    #[schemars(with = "f64")]
    pub sale_price: Decimal,
    /// Land Department assessed price (THB)
    #[schemars(with = "f64")]
    pub assessed_price: Decimal,
    /// Mortgage loan registered with the transfer (THB), zero if none
    #[schemars(with = "f64")]
    pub loan_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    /// Seller's name is on the unit's house registration
    #[serde(default)]
    pub is_registered_resident: bool,
    /// ...and has been for more than one year
    #[serde(default)]
    pub is_registered_over_one_year: bool,
    /// Date the seller registered as resident, if known
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    /// Fraction of the assessed price, e.g. 0.02
    #[schemars(with = "f64")]
    pub transfer_fee_rate: Decimal,
    /// Fraction of the loan amount, e.g. 0.01
    #[schemars(with = "f64")]
    pub mortgage_fee_rate: Decimal,
    #[serde(default)]
    pub seller_type: SellerType,
}

impl TaxInput {
    pub fn holding_period(&self) -> u32 {
        holding_years(self.purchase_date, self.sale_date)
    }
}

/// Fees and taxes due at the Land Office for one transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxResult {
    #[schemars(with = "f64")]
    pub transfer_fee: Decimal,
    #[schemars(with = "f64")]
    pub specific_business_tax: Decimal,
    #[schemars(with = "f64")]
    pub stamp_duty: Decimal,
    #[schemars(with = "f64")]
    pub total_income_tax: Decimal,
    /// Same amount as `total_income_tax`, shown as the withholding line
    #[schemars(with = "f64")]
    pub withholding_tax: Decimal,
    #[schemars(with = "f64")]
    pub mortgage_fee: Decimal,
    #[schemars(with = "f64")]
    pub total: Decimal,
    pub is_exempt_from_business_tax: bool,
    pub holding_period: u32,
    pub registration_period: Option<u32>,
    pub seller_type: SellerType,
}

/// Compute every fee line for a validated input.
pub fn calculate(input: &TaxInput, rates: &RateTable) -> TaxResult {
    let holding_period = input.holding_period();
    let registration_period = input
        .registration_date
        .map(|registered| holding_years(registered, input.sale_date));

    let base_for_specific_tax = input.sale_price.max(input.assessed_price);
    let transfer_fee = input.assessed_price * input.transfer_fee_rate;
    let mortgage_fee = input.loan_amount * input.mortgage_fee_rate;

    let is_exempt_from_business_tax = holding_period > rates.business_tax_exempt_after_years
        || (input.is_registered_resident && input.is_registered_over_one_year);

    let specific_business_tax = if is_exempt_from_business_tax {
        Decimal::ZERO
    } else {
        base_for_specific_tax * rates.specific_business_tax_rate
    };

    // stamp duty is only charged when specific business tax is not
    let stamp_duty = if specific_business_tax.is_zero() {
        input.sale_price * rates.stamp_duty_rate
    } else {
        Decimal::ZERO
    };

    let total_income_tax = income_tax(input.assessed_price, holding_period, rates);

    let total =
        transfer_fee + specific_business_tax + stamp_duty + total_income_tax + mortgage_fee;

    log::debug!(
        "calculated: holding={}y exempt={} sbt={} stamp={} income={} total={}",
        holding_period,
        is_exempt_from_business_tax,
        specific_business_tax,
        stamp_duty,
        total_income_tax,
        total
    );

    TaxResult {
        transfer_fee,
        specific_business_tax,
        stamp_duty,
        total_income_tax,
        withholding_tax: total_income_tax,
        mortgage_fee,
        total,
        is_exempt_from_business_tax,
        holding_period,
        registration_period,
        seller_type: input.seller_type,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Input held for `years` whole years, sold on 2024-06-01
    pub(crate) fn input(sale: Decimal, assessed: Decimal, loan: Decimal, years: i32) -> TaxInput {
        TaxInput {
            sale_price: sale,
            assessed_price: assessed,
            loan_amount: loan,
            purchase_date: NaiveDate::from_ymd_opt(2024 - years, 6, 1).unwrap(),
            sale_date: date("2024-06-01"),
            is_registered_resident: false,
            is_registered_over_one_year: false,
            registration_date: None,
            transfer_fee_rate: dec!(0.02),
            mortgage_fee_rate: dec!(0.01),
            seller_type: SellerType::Individual,
        }
    }

    #[test]
    fn three_year_unregistered_sale() {
        let input = input(dec!(3000000), dec!(2800000), dec!(1000000), 3);
        let result = calculate(&input, &RateTable::default());

        assert_eq!(result.holding_period, 3);
        assert_eq!(result.transfer_fee, dec!(56000));
        assert_eq!(result.specific_business_tax, dec!(99000));
        assert_eq!(result.stamp_duty, Decimal::ZERO);
        assert_eq!(result.mortgage_fee, dec!(10000));
        assert!(!result.is_exempt_from_business_tax);
        assert_eq!(result.total_income_tax.round_dp(2), dec!(32200));
        assert_eq!(result.withholding_tax, result.total_income_tax);
    }

    #[test]
    fn registered_six_years_is_exempt() {
        let mut input = input(dec!(3000000), dec!(2800000), dec!(1000000), 6);
        input.is_registered_resident = true;
        input.is_registered_over_one_year = true;
        let result = calculate(&input, &RateTable::default());

        assert!(result.is_exempt_from_business_tax);
        assert_eq!(result.specific_business_tax, Decimal::ZERO);
        assert_eq!(result.stamp_duty, dec!(15000));
    }

    #[test]
    fn holding_over_five_years_exempt_without_registration() {
        let input = input(dec!(3000000), dec!(2800000), Decimal::ZERO, 6);
        let result = calculate(&input, &RateTable::default());
        assert!(result.is_exempt_from_business_tax);
        assert_eq!(result.stamp_duty, dec!(15000));
    }

    #[test]
    fn five_years_is_not_enough() {
        let input = input(dec!(3000000), dec!(2800000), Decimal::ZERO, 5);
        let result = calculate(&input, &RateTable::default());
        assert!(!result.is_exempt_from_business_tax);
        assert_eq!(result.specific_business_tax, dec!(99000));
    }

    #[test]
    fn registration_exempts_regardless_of_holding() {
        for years in 1..=5 {
            let mut input = input(dec!(2000000), dec!(1500000), Decimal::ZERO, years);
            input.is_registered_resident = true;
            input.is_registered_over_one_year = true;
            let result = calculate(&input, &RateTable::default());
            assert!(result.is_exempt_from_business_tax, "years = {years}");
            assert_eq!(result.specific_business_tax, Decimal::ZERO);
            assert_eq!(result.stamp_duty, dec!(10000));
        }
    }

    #[test]
    fn registration_under_one_year_does_not_exempt() {
        let mut input = input(dec!(2000000), dec!(1500000), Decimal::ZERO, 2);
        input.is_registered_resident = true;
        let result = calculate(&input, &RateTable::default());
        assert!(!result.is_exempt_from_business_tax);
        assert_eq!(result.specific_business_tax, dec!(66000));
        assert_eq!(result.stamp_duty, Decimal::ZERO);
    }

    #[test]
    fn business_tax_uses_greater_of_sale_and_assessed() {
        let input = input(dec!(1000000), dec!(1200000), Decimal::ZERO, 2);
        let result = calculate(&input, &RateTable::default());
        assert_eq!(result.specific_business_tax, dec!(39600));
    }

    #[test]
    fn stamp_duty_and_business_tax_never_both_charged() {
        let rates = RateTable::default();
        for years in 1..=9 {
            for registered in [false, true] {
                let mut input = input(dec!(4500000), dec!(3900000), dec!(2000000), years);
                input.is_registered_resident = registered;
                input.is_registered_over_one_year = registered;
                let result = calculate(&input, &rates);
                if result.specific_business_tax > Decimal::ZERO {
                    assert_eq!(result.stamp_duty, Decimal::ZERO);
                } else {
                    assert_eq!(result.stamp_duty, input.sale_price * dec!(0.005));
                }
            }
        }
    }

    #[test]
    fn zero_sale_price_charges_nothing_for_stamp_duty() {
        let input = input(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, 2);
        let result = calculate(&input, &RateTable::default());
        assert_eq!(result.specific_business_tax, Decimal::ZERO);
        assert_eq!(result.stamp_duty, Decimal::ZERO);
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn total_is_sum_of_lines() {
        let input = input(dec!(3250000), dec!(2975000), dec!(2100000), 4);
        let r = calculate(&input, &RateTable::default());
        assert_eq!(
            r.total,
            r.transfer_fee + r.specific_business_tax + r.stamp_duty + r.total_income_tax + r.mortgage_fee
        );
        assert!(r.total >= Decimal::ZERO);
    }

    #[test]
    fn custom_rates_apply() {
        let mut input = input(dec!(3000000), dec!(2800000), dec!(1000000), 3);
        input.transfer_fee_rate = dec!(0.0001);
        input.mortgage_fee_rate = dec!(0.0001);
        let result = calculate(&input, &RateTable::default());
        assert_eq!(result.transfer_fee, dec!(280));
        assert_eq!(result.mortgage_fee, dec!(100));
    }

    #[test]
    fn registration_period_from_registration_date() {
        let mut input = input(dec!(3000000), dec!(2800000), Decimal::ZERO, 3);
        assert_eq!(calculate(&input, &RateTable::default()).registration_period, None);
        input.registration_date = Some(date("2022-07-01"));
        assert_eq!(calculate(&input, &RateTable::default()).registration_period, Some(1));
    }

    #[test]
    fn seller_type_does_not_change_fees() {
        let individual = input(dec!(3000000), dec!(2800000), dec!(1000000), 3);
        let mut corporate = individual.clone();
        corporate.seller_type = SellerType::Corporate;

        let a = calculate(&individual, &RateTable::default());
        let b = calculate(&corporate, &RateTable::default());
        assert_eq!(a.total, b.total);
        assert_eq!(b.seller_type, SellerType::Corporate);
    }

    #[test]
    fn repeated_calculation_is_identical() {
        let input = input(dec!(3333333.33), dec!(2777777.77), dec!(1111111.11), 7);
        let rates = RateTable::default();
        assert_eq!(calculate(&input, &rates), calculate(&input, &rates));
    }
}
