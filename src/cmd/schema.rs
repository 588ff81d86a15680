//! Schema command - print expected input formats

use super::batch::ScenarioRecord;
use crate::tax::{Condo, RateTable, TaxInput};
use clap::Args;
use schemars::schema_for;

/// One column of a CSV input, as generated by `#[derive(FieldSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDoc {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "input")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a calculation input
    Input,
    /// JSON Schema for a rate table file
    Rates,
    /// JSON Schema for a valuation record
    Condo,
    /// CSV header row for batch input
    CsvHeader,
    /// Batch CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::Input => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(TaxInput))?)
            }
            SchemaFormat::Rates => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(RateTable))?)
            }
            SchemaFormat::Condo => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(Condo))?)
            }
            SchemaFormat::CsvHeader => println!("{}", ScenarioRecord::column_names().join(",")),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("Batch CSV Input Format");
    println!("======================");
    println!();
    for field in ScenarioRecord::field_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:26} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Amounts are THB; custom fees are percentages; dates are YYYY-MM-DD");
}
