//! Condos command - look up assessed values in a valuation export

use super::display::format_thb;
use super::open_input;
use crate::tax::{Condo, ValuationBook, DEFAULT_CONDO_LIMIT};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CondosCommand {
    /// JSON file with valuation records, or "-" for stdin
    #[arg(short, long)]
    file: PathBuf,

    /// Only records whose condo name contains this text (case-insensitive)
    #[arg(short, long)]
    name: Option<String>,

    /// Show the record with this ID_LIST
    #[arg(long, conflicts_with_all = ["name", "options", "names"])]
    id: Option<String>,

    /// List floor level / usage options and prices for an exact condo name
    #[arg(long, conflicts_with_all = ["name", "names"])]
    options: Option<String>,

    /// List distinct condo names
    #[arg(long)]
    names: bool,

    /// Unit area in square meters; adds the assessed price
    #[arg(long)]
    area: Option<Decimal>,

    /// Maximum number of records listed
    #[arg(long, default_value_t = DEFAULT_CONDO_LIMIT)]
    limit: usize,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct CondoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Condo")]
    name: String,
    #[tabled(rename = "Building")]
    building: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Province")]
    province: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Use")]
    usage: String,
    #[tabled(rename = "Value/m\u{00B2}")]
    value_per_sqm: String,
    #[tabled(rename = "Assessed")]
    assessed_price: String,
}

impl CondoRow {
    fn new(condo: &Condo, area: Option<Decimal>) -> Self {
        CondoRow {
            id: condo.id.clone(),
            name: condo.name().to_string(),
            building: condo.building.clone(),
            district: condo.district.clone(),
            province: condo.province.clone(),
            level: condo.level.clone(),
            usage: condo.usage.clone(),
            value_per_sqm: format_thb(condo.value_per_sqm),
            assessed_price: area.map_or(String::new(), |a| format_thb(condo.assessed_price(a))),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct OptionRow {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Use")]
    usage: String,
    #[tabled(rename = "Value/m\u{00B2}")]
    value_per_sqm: String,
    #[tabled(rename = "Assessed")]
    assessed_price: String,
}

impl CondosCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let book = ValuationBook::read_json(open_input(&self.file)?)?;

        if let Some(ref id) = self.id {
            let condo = book
                .find(id)
                .ok_or_else(|| anyhow::anyhow!("No valuation record with ID_LIST {}", id))?;
            let rows = vec![CondoRow::new(condo, self.area)];
            return self.print(&rows, 7);
        }

        if let Some(ref name) = self.options {
            let rows: Vec<OptionRow> = book
                .options(name)
                .into_iter()
                .map(|option| {
                    let price = book.price_per_sqm(name, &option.level, &option.usage);
                    OptionRow {
                        value_per_sqm: price.map_or(String::new(), format_thb),
                        assessed_price: price
                            .zip(self.area)
                            .map_or(String::new(), |(p, a)| format_thb(p * a)),
                        level: option.level,
                        usage: option.usage,
                    }
                })
                .collect();
            if rows.is_empty() {
                anyhow::bail!("No valuation records for condo '{}'", name);
            }
            return self.print(&rows, 2);
        }

        if self.names {
            let names = book.names();
            if self.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names.iter().take(self.limit) {
                    println!("{}", name);
                }
            }
            return Ok(());
        }

        let records: Vec<&Condo> = match self.name {
            Some(ref name) => book.search(name),
            None => book.all(self.limit).iter().collect(),
        };
        let rows: Vec<CondoRow> = records
            .into_iter()
            .take(self.limit)
            .map(|c| CondoRow::new(c, self.area))
            .collect();
        self.print(&rows, 7)
    }

    /// Columns from `amounts_from` onwards hold amounts and are right-aligned
    fn print<T: Tabled + Serialize>(&self, rows: &[T], amounts_from: usize) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rows)?);
            return Ok(());
        }
        if rows.is_empty() {
            println!("No valuation records found matching filters");
            return Ok(());
        }
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(amounts_from..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
