pub mod batch;
pub mod calc;
pub mod condos;
pub mod display;
pub mod period;
pub mod schema;

use crate::tax::RateTable;
use anyhow::Context;
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Payer choice as given on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ShareArg {
    #[default]
    #[value(name = "50-50")]
    Even,
    Buyer,
    Seller,
}

impl From<ShareArg> for crate::tax::ShareMode {
    fn from(arg: ShareArg) -> Self {
        match arg {
            ShareArg::Even => crate::tax::ShareMode::Even,
            ShareArg::Buyer => crate::tax::ShareMode::Buyer,
            ShareArg::Seller => crate::tax::ShareMode::Seller,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SellerArg {
    #[default]
    Individual,
    Corporate,
}

impl From<SellerArg> for crate::tax::SellerType {
    fn from(arg: SellerArg) -> Self {
        match arg {
            SellerArg::Individual => crate::tax::SellerType::Individual,
            SellerArg::Corporate => crate::tax::SellerType::Corporate,
        }
    }
}

/// Default rates, or the rate table in the given JSON file
pub fn load_rates(path: Option<&Path>) -> anyhow::Result<RateTable> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening rate table {}", path.display()))?;
            let rates = RateTable::read_json(BufReader::new(file))
                .with_context(|| format!("reading rate table {}", path.display()))?;
            log::info!("Using rate table from {}", path.display());
            Ok(rates)
        }
        None => Ok(RateTable::default()),
    }
}

/// Open a file for reading, or stdin with "-"
pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(Box::new(io::Cursor::new(buffer)))
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Rate table fraction as the percent text custom fee fields take
pub fn rate_percent(rate: rust_decimal::Decimal) -> String {
    (rate * rust_decimal::Decimal::ONE_HUNDRED)
        .normalize()
        .to_string()
}

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
