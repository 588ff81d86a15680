//! Period command - holding period between two dates

use crate::tax::{holding_years, DetailedPeriod};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct PeriodCommand {
    /// Purchase date (YYYY-MM-DD)
    #[arg(short, long)]
    purchase_date: NaiveDate,

    /// Sale date (YYYY-MM-DD)
    #[arg(short = 'd', long)]
    sale_date: NaiveDate,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PeriodOutput {
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
    holding_years: u32,
    detailed: DetailedPeriod,
}

impl PeriodCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.sale_date < self.purchase_date {
            anyhow::bail!(
                "sale date {} is before purchase date {}",
                self.sale_date,
                self.purchase_date
            );
        }

        let output = PeriodOutput {
            purchase_date: self.purchase_date,
            sale_date: self.sale_date,
            holding_years: holding_years(self.purchase_date, self.sale_date),
            detailed: DetailedPeriod::between(self.purchase_date, self.sale_date),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Holding period: {} year(s)", output.holding_years);
            println!("Elapsed: {}", output.detailed);
        }
        Ok(())
    }
}
