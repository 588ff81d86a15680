//! Batch command - calculate many transfers from a CSV file

use super::display::format_plain;
use super::schema::FieldDoc;
use super::{load_rates, open_input, rate_percent, today};
use crate::tax::form::validate_dates;
use crate::tax::{
    calculate, AmountField, DateField, FeeLine, FormAction, FormState, InputError, PaymentShares,
    RateTable, SellerType, ShareBreakdown, ShareMode,
};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use condotax_derive::FieldSchema;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file of scenarios, or "-" for stdin
    #[arg(short, long)]
    file: PathBuf,

    /// JSON rate table replacing the built-in rates
    #[arg(long)]
    rates: Option<PathBuf>,
}

/// One scenario row of the batch CSV
#[derive(Debug, Clone, Deserialize, FieldSchema)]
pub struct ScenarioRecord {
    /// Identifier echoed in the output row
    pub id: String,
    /// Sale price in THB
    pub sale_price: String,
    /// Assessed price in THB
    pub assessed_price: String,
    /// Mortgage loan in THB (blank for none)
    pub loan_amount: Option<String>,
    /// Purchase date (YYYY-MM-DD)
    pub purchase_date: NaiveDate,
    /// Sale date (YYYY-MM-DD)
    pub sale_date: NaiveDate,
    /// House registration date of the seller
    pub registration_date: Option<NaiveDate>,
    /// Seller is in the house registration (true/false)
    pub registered: Option<bool>,
    /// ...for more than one year (true/false)
    pub registered_over_one_year: Option<bool>,
    /// individual or corporate
    pub seller_type: Option<SellerType>,
    /// Custom transfer fee in percent
    #[serde(rename = "transfer_fee_pct")]
    pub transfer_fee: Option<String>,
    /// Custom mortgage fee in percent
    #[serde(rename = "mortgage_fee_pct")]
    pub mortgage_fee: Option<String>,
    /// Payer of every fee line: buyer, seller or 50-50
    pub share: Option<String>,
}

impl ScenarioRecord {
    fn actions(&self, rates: &RateTable) -> Vec<FormAction> {
        let mut actions = vec![
            FormAction::SetAmount(AmountField::SalePrice, self.sale_price.clone()),
            FormAction::SetAmount(AmountField::AssessedPrice, self.assessed_price.clone()),
            FormAction::SetAmount(
                AmountField::LoanAmount,
                self.loan_amount.clone().unwrap_or_else(|| "0".to_string()),
            ),
            FormAction::SetDate(DateField::Purchase, self.purchase_date),
            FormAction::SetDate(DateField::Sale, self.sale_date),
            FormAction::SetRegistered(self.registered.unwrap_or(false)),
            FormAction::SetRegisteredOverOneYear(self.registered_over_one_year.unwrap_or(false)),
            FormAction::SetSellerType(self.seller_type.unwrap_or_default()),
        ];
        if let Some(date) = self.registration_date {
            actions.push(FormAction::SetDate(DateField::Registration, date));
        }
        if self.transfer_fee.is_some() || self.mortgage_fee.is_some() {
            actions.push(FormAction::UseCustomFees(true));
            actions.push(FormAction::SetCustomTransferFee(
                self.transfer_fee
                    .clone()
                    .unwrap_or_else(|| rate_percent(rates.transfer_fee_rate)),
            ));
            actions.push(FormAction::SetCustomMortgageFee(
                self.mortgage_fee
                    .clone()
                    .unwrap_or_else(|| rate_percent(rates.mortgage_fee_rate)),
            ));
        }
        let mode = self.share.as_deref().map(ShareMode::from).unwrap_or_default();
        let shares = PaymentShares::all(mode);
        for line in FeeLine::ALL {
            actions.push(FormAction::SetShare(line, shares.mode(line)));
        }
        actions
    }
}

/// One calculated row of the batch output
#[derive(Debug, Serialize)]
struct ResultRecord {
    id: String,
    holding_period: u32,
    registration_period: Option<u32>,
    exempt_from_business_tax: bool,
    transfer_fee: String,
    specific_business_tax: String,
    stamp_duty: String,
    withholding_tax: String,
    mortgage_fee: String,
    total: String,
    buyer_total: String,
    seller_total: String,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = load_rates(self.rates.as_deref())?;
        let reader = open_input(&self.file)?;
        let (written, skipped) = run(reader, io::stdout(), &rates, today())?;
        log::info!("{} scenarios calculated, {} skipped", written, skipped);
        Ok(())
    }
}

/// Calculate every scenario in `input` and write one result row per valid
/// scenario to `output`. Returns the number of rows written and skipped.
fn run<R: Read, W: Write>(
    input: R,
    output: W,
    rates: &RateTable,
    today: NaiveDate,
) -> anyhow::Result<(usize, usize)> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut wtr = csv::Writer::from_writer(output);

    let mut written = 0usize;
    let mut skipped = 0usize;
    for (index, row) in rdr.deserialize::<ScenarioRecord>().enumerate() {
        let scenario = match row {
            Ok(scenario) => scenario,
            Err(err) => {
                // header is line 1
                log::warn!("Skipping CSV line {}: {}", index + 2, err);
                skipped += 1;
                continue;
            }
        };
        match calculate_row(&scenario, rates, today) {
            Ok(record) => {
                wtr.serialize(record)
                    .with_context(|| format!("writing result for scenario {}", scenario.id))?;
                written += 1;
            }
            Err(err) => {
                log::warn!("Skipping scenario {}: {}", scenario.id, err);
                skipped += 1;
            }
        }
    }
    wtr.flush()?;
    Ok((written, skipped))
}

fn calculate_row(
    scenario: &ScenarioRecord,
    rates: &RateTable,
    today: NaiveDate,
) -> Result<ResultRecord, InputError> {
    validate_dates(
        scenario.purchase_date,
        scenario.sale_date,
        scenario.registration_date,
        today,
    )?;
    let form = scenario
        .actions(rates)
        .into_iter()
        .fold(FormState::default(), |state, action| state.update(action, today));
    let input = form.submit(rates)?;
    let result = calculate(&input, rates);
    let shares = ShareBreakdown::new(&result, &form.shares);

    Ok(ResultRecord {
        id: scenario.id.clone(),
        holding_period: result.holding_period,
        registration_period: result.registration_period,
        exempt_from_business_tax: result.is_exempt_from_business_tax,
        transfer_fee: format_plain(result.transfer_fee),
        specific_business_tax: format_plain(result.specific_business_tax),
        stamp_duty: format_plain(result.stamp_duty),
        withholding_tax: format_plain(result.withholding_tax),
        mortgage_fee: format_plain(result.mortgage_fee),
        total: format_plain(result.total),
        buyer_total: format_plain(shares.totals.buyer),
        seller_total: format_plain(shares.totals.seller),
    })
}
