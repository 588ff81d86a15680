//! Calc command - fees and taxes for a single condo transfer

use super::display::{format_plain, format_thb};
use super::{load_rates, rate_percent, today, SellerArg, ShareArg};
use crate::tax::form::validate_dates;
use crate::tax::{
    calculate, AmountField, DateField, DetailedPeriod, FeeLine, FormAction, FormState,
    ShareBreakdown, TaxInput, TaxResult,
};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Sale price in THB (thousands separators allowed)
    #[arg(short, long)]
    sale_price: String,

    /// Assessed price in THB
    #[arg(short, long)]
    assessed_price: String,

    /// Mortgage loan registered with the transfer, in THB
    #[arg(short, long, default_value = "0")]
    loan_amount: String,

    /// Date the seller acquired the unit (YYYY-MM-DD)
    #[arg(short, long)]
    purchase_date: NaiveDate,

    /// Date of the transfer (YYYY-MM-DD)
    #[arg(short = 'd', long)]
    sale_date: NaiveDate,

    /// Date the seller's name was entered in the house registration
    #[arg(long)]
    registration_date: Option<NaiveDate>,

    /// Seller's name is in the unit's house registration
    #[arg(long)]
    registered: bool,

    /// ...for more than one year
    #[arg(long)]
    registered_over_one_year: bool,

    #[arg(long, value_enum, default_value_t = SellerArg::Individual)]
    seller: SellerArg,

    /// Custom transfer fee in percent (e.g. 0.01 during a fee reduction)
    #[arg(long)]
    transfer_fee: Option<String>,

    /// Custom mortgage fee in percent
    #[arg(long)]
    mortgage_fee: Option<String>,

    /// JSON rate table replacing the built-in rates
    #[arg(long)]
    rates: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ShareArg::Even)]
    transfer_fee_share: ShareArg,

    #[arg(long, value_enum, default_value_t = ShareArg::Even)]
    business_tax_share: ShareArg,

    #[arg(long, value_enum, default_value_t = ShareArg::Even)]
    stamp_duty_share: ShareArg,

    #[arg(long, value_enum, default_value_t = ShareArg::Even)]
    withholding_share: ShareArg,

    #[arg(long, value_enum, default_value_t = ShareArg::Even)]
    mortgage_share: ShareArg,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    input: &'a TaxInput,
    result: &'a TaxResult,
    detailed_period: DetailedPeriod,
    shares: &'a ShareBreakdown,
}

#[derive(Debug, Clone, Tabled)]
struct FeeRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid by")]
    mode: String,
    #[tabled(rename = "Buyer")]
    buyer: String,
    #[tabled(rename = "Seller")]
    seller: String,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = load_rates(self.rates.as_deref())?;
        let today = today();
        // the form silently drops rejected dates, surface them here instead
        validate_dates(
            self.purchase_date,
            self.sale_date,
            self.registration_date,
            today,
        )?;

        let form = self
            .actions(&rates)
            .into_iter()
            .fold(FormState::default(), |state, action| state.update(action, today));

        let input = form.submit(&rates)?;
        let result = calculate(&input, &rates);
        let shares = ShareBreakdown::new(&result, &form.shares);
        let detailed = DetailedPeriod::between(input.purchase_date, input.sale_date);

        if self.json {
            let output = CalcOutput {
                input: &input,
                result: &result,
                detailed_period: detailed,
                shares: &shares,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_report(&input, &result, detailed, &shares);
        }
        Ok(())
    }

    /// The form edits equivalent to the given flags
    fn actions(&self, rates: &crate::tax::RateTable) -> Vec<FormAction> {
        let mut actions = vec![
            FormAction::SetAmount(AmountField::SalePrice, self.sale_price.clone()),
            FormAction::SetAmount(AmountField::AssessedPrice, self.assessed_price.clone()),
            FormAction::SetAmount(AmountField::LoanAmount, self.loan_amount.clone()),
            FormAction::SetDate(DateField::Purchase, self.purchase_date),
            FormAction::SetDate(DateField::Sale, self.sale_date),
            FormAction::SetRegistered(self.registered),
            FormAction::SetRegisteredOverOneYear(self.registered_over_one_year),
            FormAction::SetSellerType(self.seller.into()),
            FormAction::SetShare(FeeLine::TransferFee, self.transfer_fee_share.into()),
            FormAction::SetShare(FeeLine::SpecificBusinessTax, self.business_tax_share.into()),
            FormAction::SetShare(FeeLine::StampDuty, self.stamp_duty_share.into()),
            FormAction::SetShare(FeeLine::WithholdingTax, self.withholding_share.into()),
            FormAction::SetShare(FeeLine::MortgageFee, self.mortgage_share.into()),
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
        actions
    }
}

fn print_report(input: &TaxInput, result: &TaxResult, detailed: DetailedPeriod, shares: &ShareBreakdown) {
    println!();
    println!("CONDO TRANSFER COSTS ({} seller)", result.seller_type);
    println!();
    println!(
        "  Sale price: {} | Assessed price: {} | Loan: {}",
        format_thb(input.sale_price),
        format_thb(input.assessed_price),
        format_thb(input.loan_amount)
    );
    println!(
        "  Holding period: {} year(s) ({})",
        result.holding_period, detailed
    );
    if let Some(years) = result.registration_period {
        println!("  Registered for: {} year(s)", years);
    }
    if result.is_exempt_from_business_tax {
        println!("  \u{2713} Exempt from specific business tax");
    }
    println!();

    let mut rows: Vec<FeeRow> = shares
        .lines
        .iter()
        .map(|l| FeeRow {
            item: l.line.display().to_string(),
            amount: format_thb(l.amount),
            mode: l.mode.display().to_string(),
            buyer: format_thb(l.share.buyer),
            seller: format_thb(l.share.seller),
        })
        .collect();
    rows.push(FeeRow {
        item: "Total".to_string(),
        amount: format_thb(result.total),
        mode: String::new(),
        buyer: format_thb(shares.totals.buyer),
        seller: format_thb(shares.totals.seller),
    });

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
    println!(
        "\u{26A0} Estimate only. Total {} (buyer {}, seller {})",
        format_plain(result.total),
        format_plain(shares.totals.buyer),
        format_plain(shares.totals.seller)
    );
}
