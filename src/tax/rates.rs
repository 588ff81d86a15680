use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One slice of the progressive personal income tax schedule.
///
/// `limit` is the cumulative upper bound of the bracket; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeBracket {
    #[schemars(with = "Option<f64>")]
    pub limit: Option<Decimal>,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

/// Share of the assessed price deemed income for a given number of holding years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HoldingDeduction {
    pub years: u32,
    #[schemars(with = "f64")]
    pub multiplier: Decimal,
}

/// Every rate the calculation uses, kept as data so it can be replaced
/// without touching the formulas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RateTable {
    /// Ascending by `years`; the last entry applies to every longer holding.
    pub holding_deductions: Vec<HoldingDeduction>,
    /// Ascending by `limit`; the last bracket should be unbounded.
    pub income_brackets: Vec<IncomeBracket>,
    #[schemars(with = "f64")]
    pub transfer_fee_rate: Decimal,
    #[schemars(with = "f64")]
    pub mortgage_fee_rate: Decimal,
    #[schemars(with = "f64")]
    pub specific_business_tax_rate: Decimal,
    #[schemars(with = "f64")]
    pub stamp_duty_rate: Decimal,
    /// Holding for strictly more years than this waives specific business tax.
    pub business_tax_exempt_after_years: u32,
}

impl Default for RateTable {
    fn default() -> Self {
        let deduction = |years, multiplier| HoldingDeduction { years, multiplier };
        let bracket = |limit, rate| IncomeBracket { limit, rate };
        RateTable {
            holding_deductions: vec![
                deduction(1, dec!(0.08)),
                deduction(2, dec!(0.16)),
                deduction(3, dec!(0.23)),
                deduction(4, dec!(0.29)),
                deduction(5, dec!(0.35)),
                deduction(6, dec!(0.40)),
                deduction(7, dec!(0.45)),
                deduction(8, dec!(0.50)),
            ],
            income_brackets: vec![
                bracket(Some(dec!(300000)), dec!(0.05)),
                bracket(Some(dec!(500000)), dec!(0.10)),
                bracket(Some(dec!(750000)), dec!(0.15)),
                bracket(Some(dec!(1000000)), dec!(0.20)),
                bracket(Some(dec!(2000000)), dec!(0.25)),
                bracket(Some(dec!(5000000)), dec!(0.30)),
                bracket(None, dec!(0.35)),
            ],
            transfer_fee_rate: dec!(0.02),
            mortgage_fee_rate: dec!(0.01),
            specific_business_tax_rate: dec!(0.033),
            stamp_duty_rate: dec!(0.005),
            business_tax_exempt_after_years: 5,
        }
    }
}

impl RateTable {
    /// Read a rate table from JSON. Missing keys fall back to the defaults.
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut table: RateTable = serde_json::from_reader(reader)?;
        table.holding_deductions.sort_by_key(|d| d.years);
        table
            .income_brackets
            .sort_by_key(|b| b.limit.unwrap_or(Decimal::MAX));
        table.check_rates()?;
        Ok(table)
    }

    /// Every rate and multiplier must be a fraction between 0 and 1.
    fn check_rates(&self) -> anyhow::Result<()> {
        let named = [
            ("transfer_fee_rate", self.transfer_fee_rate),
            ("mortgage_fee_rate", self.mortgage_fee_rate),
            ("specific_business_tax_rate", self.specific_business_tax_rate),
            ("stamp_duty_rate", self.stamp_duty_rate),
        ];
        let deductions = self
            .holding_deductions
            .iter()
            .map(|d| ("holding_deductions.multiplier", d.multiplier));
        let brackets = self
            .income_brackets
            .iter()
            .map(|b| ("income_brackets.rate", b.rate));

        for (name, rate) in named.into_iter().chain(deductions).chain(brackets) {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                anyhow::bail!("{} must be between 0 and 1, got {}", name, rate);
            }
        }
        Ok(())
    }

    /// Deduction multiplier for the holding period.
    ///
    /// Periods past the last table entry use the last entry (8+ years → 0.50).
    /// Periods with no entry below that map to zero.
    pub fn holding_multiplier(&self, years: u32) -> Decimal {
        let Some(last) = self.holding_deductions.last() else {
            return Decimal::ZERO;
        };
        if years >= last.years {
            return last.multiplier;
        }
        self.holding_deductions
            .iter()
            .find(|d| d.years == years)
            .map_or(Decimal::ZERO, |d| d.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holding_multiplier_table_values() {
        let rates = RateTable::default();
        assert_eq!(rates.holding_multiplier(1), dec!(0.08));
        assert_eq!(rates.holding_multiplier(2), dec!(0.16));
        assert_eq!(rates.holding_multiplier(3), dec!(0.23));
        assert_eq!(rates.holding_multiplier(4), dec!(0.29));
        assert_eq!(rates.holding_multiplier(5), dec!(0.35));
        assert_eq!(rates.holding_multiplier(6), dec!(0.40));
        assert_eq!(rates.holding_multiplier(7), dec!(0.45));
    }

    #[test]
    fn holding_multiplier_clamped_from_eight_years() {
        let rates = RateTable::default();
        for years in [8, 9, 12, 30, 100, u32::MAX] {
            assert_eq!(rates.holding_multiplier(years), dec!(0.50), "years = {years}");
        }
    }

    #[test]
    fn holding_multiplier_zero_years() {
        assert_eq!(RateTable::default().holding_multiplier(0), Decimal::ZERO);
    }

    #[test]
    fn default_fee_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.transfer_fee_rate, dec!(0.02));
        assert_eq!(rates.mortgage_fee_rate, dec!(0.01));
        assert_eq!(rates.specific_business_tax_rate, dec!(0.033));
        assert_eq!(rates.stamp_duty_rate, dec!(0.005));
        assert_eq!(rates.business_tax_exempt_after_years, 5);
    }

    #[test]
    fn default_brackets_end_unbounded() {
        let rates = RateTable::default();
        assert_eq!(rates.income_brackets.len(), 7);
        assert_eq!(rates.income_brackets[0].limit, Some(dec!(300000)));
        assert_eq!(rates.income_brackets[0].rate, dec!(0.05));
        let last = rates.income_brackets.last().unwrap();
        assert_eq!(last.limit, None);
        assert_eq!(last.rate, dec!(0.35));
    }

    #[test]
    fn read_json_overrides_only_given_keys() {
        let json = r#"{ "transfer_fee_rate": "0.0001", "mortgage_fee_rate": "0.0001" }"#;
        let rates = RateTable::read_json(json.as_bytes()).unwrap();
        assert_eq!(rates.transfer_fee_rate, dec!(0.0001));
        assert_eq!(rates.mortgage_fee_rate, dec!(0.0001));
        assert_eq!(rates.stamp_duty_rate, dec!(0.005));
        assert_eq!(rates.holding_deductions, RateTable::default().holding_deductions);
    }

    #[test]
    fn read_json_sorts_tables() {
        let json = r#"{
            "holding_deductions": [
                { "years": 2, "multiplier": "0.2" },
                { "years": 1, "multiplier": "0.1" }
            ],
            "income_brackets": [
                { "limit": null, "rate": "0.3" },
                { "limit": "100", "rate": "0.1" }
            ]
        }"#;
        let rates = RateTable::read_json(json.as_bytes()).unwrap();
        assert_eq!(rates.holding_deductions[0].years, 1);
        assert_eq!(rates.holding_multiplier(5), dec!(0.2));
        assert_eq!(rates.income_brackets[0].limit, Some(dec!(100)));
        assert_eq!(rates.income_brackets[1].limit, None);
    }

    #[test]
    fn read_json_rejects_rate_above_one() {
        let json = r#"{ "transfer_fee_rate": "5" }"#;
        let err = RateTable::read_json(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("transfer_fee_rate"));

        let json = r#"{ "income_brackets": [ { "limit": null, "rate": "-0.1" } ] }"#;
        assert!(RateTable::read_json(json.as_bytes()).is_err());
    }
}
