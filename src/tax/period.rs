use chrono::{Datelike, Duration, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole years held, counted anniversary to anniversary.
///
/// A year is complete once the sale date reaches the purchase month/day, so
/// 2018-06-01 → 2019-06-01 is one year and 2018-06-01 → 2019-05-31 is none.
/// `sale` must not be before `purchase`; the result saturates at zero if it is.
pub fn holding_years(purchase: NaiveDate, sale: NaiveDate) -> u32 {
    let mut years = sale.year() - purchase.year();
    if (sale.month(), sale.day()) < (purchase.month(), purchase.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Holding period split into calendar years, months and days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DetailedPeriod {
    pub years: i32,
    pub months: u32,
    pub days: u32,
}

impl DetailedPeriod {
    /// Decompose the span between two dates with month and day borrowing.
    ///
    /// When the sale day is before the purchase day a month is borrowed, using
    /// the length of the month preceding the sale month. A purchase day past
    /// the end of that month contributes no extra days.
    pub fn between(purchase: NaiveDate, sale: NaiveDate) -> Self {
        let mut years = sale.year() - purchase.year();
        let mut months = if sale.month() >= purchase.month() {
            sale.month() - purchase.month()
        } else {
            years -= 1;
            12 + sale.month() - purchase.month()
        };

        let days = if sale.day() >= purchase.day() {
            sale.day() - purchase.day()
        } else {
            if months == 0 {
                years -= 1;
                months = 11;
            } else {
                months -= 1;
            }
            days_in_previous_month(sale).saturating_sub(purchase.day()) + sale.day()
        };

        DetailedPeriod {
            years,
            months,
            days,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

/// Day count of the month before `date`'s month (the day before the 1st).
fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .map(|first| (first - Duration::days(1)).day())
        .unwrap_or(31)
}

impl fmt::Display for DetailedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0 days");
        }
        let mut parts = Vec::new();
        if self.years > 0 {
            parts.push(plural(self.years.unsigned_abs(), "year"));
        }
        if self.months > 0 {
            parts.push(plural(self.months, "month"));
        }
        if self.days > 0 {
            parts.push(plural(self.days, "day"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn anniversary_day_completes_the_year() {
        assert_eq!(holding_years(date("2018-06-01"), date("2019-06-01")), 1);
    }

    #[test]
    fn day_after_anniversary_is_still_one_year() {
        assert_eq!(holding_years(date("2018-06-01"), date("2019-06-02")), 1);
    }

    #[test]
    fn day_before_anniversary_rounds_down() {
        assert_eq!(holding_years(date("2018-06-01"), date("2019-05-31")), 0);
        assert_eq!(holding_years(date("2015-06-01"), date("2021-05-31")), 5);
    }

    #[test]
    fn same_day_is_zero_years() {
        assert_eq!(holding_years(date("2020-03-15"), date("2020-03-15")), 0);
    }

    #[test]
    fn later_month_in_sale_year_counts() {
        assert_eq!(holding_years(date("2016-02-10"), date("2022-11-01")), 6);
    }

    #[test]
    fn leap_day_purchase() {
        assert_eq!(holding_years(date("2020-02-29"), date("2021-02-28")), 0);
        assert_eq!(holding_years(date("2020-02-29"), date("2021-03-01")), 1);
        assert_eq!(holding_years(date("2020-02-29"), date("2024-02-29")), 4);
    }

    #[test]
    fn sale_before_purchase_saturates() {
        assert_eq!(holding_years(date("2020-01-01"), date("2019-01-01")), 0);
    }

    #[test]
    fn detailed_without_borrow() {
        let p = DetailedPeriod::between(date("2018-03-10"), date("2021-07-25"));
        assert_eq!(p, DetailedPeriod { years: 3, months: 4, days: 15 });
    }

    #[test]
    fn detailed_borrows_year_for_months() {
        let p = DetailedPeriod::between(date("2018-10-05"), date("2021-03-05"));
        assert_eq!(p, DetailedPeriod { years: 2, months: 5, days: 0 });
    }

    #[test]
    fn detailed_borrows_month_for_days() {
        // February 2021 has 28 days: 28 - 15 + 10
        let p = DetailedPeriod::between(date("2021-01-15"), date("2021-03-10"));
        assert_eq!(p, DetailedPeriod { years: 0, months: 1, days: 23 });
    }

    #[test]
    fn detailed_purchase_day_past_short_month() {
        let p = DetailedPeriod::between(date("2020-01-31"), date("2020-03-01"));
        assert_eq!(p, DetailedPeriod { years: 0, months: 1, days: 1 });

        let p = DetailedPeriod::between(date("2021-01-30"), date("2021-03-01"));
        assert_eq!(p, DetailedPeriod { years: 0, months: 1, days: 1 });
    }

    #[test]
    fn detailed_borrows_year_when_months_zero() {
        let p = DetailedPeriod::between(date("2018-06-20"), date("2019-06-10"));
        // May 2019 has 31 days: 31 - 20 + 10
        assert_eq!(p, DetailedPeriod { years: 0, months: 11, days: 21 });
    }

    #[test]
    fn display_omits_zero_parts() {
        let p = DetailedPeriod { years: 2, months: 0, days: 1 };
        assert_eq!(p.to_string(), "2 years 1 day");
        let p = DetailedPeriod { years: 1, months: 3, days: 0 };
        assert_eq!(p.to_string(), "1 year 3 months");
        assert_eq!(DetailedPeriod::default().to_string(), "0 days");
    }
}
