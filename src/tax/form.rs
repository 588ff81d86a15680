//! Calculator form state, updated by a pure reducer and validated into a
//! [`TaxInput`] on submit.

use super::fees::{SellerType, TaxInput};
use super::period::holding_years;
use super::rates::RateTable;
use super::shares::{FeeLine, PaymentShares, ShareMode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Largest amount accepted for a price or loan, in THB
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Largest custom fee, in percent
const MAX_PERCENT: Decimal = dec!(100);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    MissingField(Field),
    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: Field, value: String },
    #[error("{0} must not be negative")]
    Negative(Field),
    #[error("{field} must not exceed {max}")]
    OutOfRange { field: Field, max: Decimal },
    #[error("sale date {sale} is before purchase date {purchase}")]
    SaleBeforePurchase { purchase: NaiveDate, sale: NaiveDate },
    #[error("{field} {date} rejected: {reason}")]
    DateRejected {
        field: Field,
        date: NaiveDate,
        reason: &'static str,
    },
    #[error("holding period must be at least one year ({purchase} to {sale})")]
    HoldingPeriodTooShort { purchase: NaiveDate, sale: NaiveDate },
}

/// Form fields that can be touched and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    SalePrice,
    AssessedPrice,
    LoanAmount,
    PurchaseDate,
    SaleDate,
    RegistrationDate,
    CustomTransferFee,
    CustomMortgageFee,
}

impl Field {
    pub fn display(&self) -> &'static str {
        match self {
            Field::SalePrice => "sale price",
            Field::AssessedPrice => "assessed price",
            Field::LoanAmount => "loan amount",
            Field::PurchaseDate => "purchase date",
            Field::SaleDate => "sale date",
            Field::RegistrationDate => "registration date",
            Field::CustomTransferFee => "transfer fee rate",
            Field::CustomMortgageFee => "mortgage fee rate",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Which date a [`FormAction::SetDate`] edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Purchase,
    Sale,
    Registration,
}

impl From<DateField> for Field {
    fn from(d: DateField) -> Self {
        match d {
            DateField::Purchase => Field::PurchaseDate,
            DateField::Sale => Field::SaleDate,
            DateField::Registration => Field::RegistrationDate,
        }
    }
}

/// Which amount a [`FormAction::SetAmount`] edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    SalePrice,
    AssessedPrice,
    LoanAmount,
}

impl From<AmountField> for Field {
    fn from(a: AmountField) -> Self {
        match a {
            AmountField::SalePrice => Field::SalePrice,
            AmountField::AssessedPrice => Field::AssessedPrice,
            AmountField::LoanAmount => Field::LoanAmount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Raw amount text as typed, may contain thousands separators
    SetAmount(AmountField, String),
    SetDate(DateField, NaiveDate),
    SetRegistered(bool),
    SetRegisteredOverOneYear(bool),
    SetSellerType(SellerType),
    UseCustomFees(bool),
    /// Custom transfer fee, in percent
    SetCustomTransferFee(String),
    /// Custom mortgage fee, in percent
    SetCustomMortgageFee(String),
    SetShare(FeeLine, ShareMode),
    Blur(Field),
}

/// Everything the user has entered so far
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub sale_price: String,
    pub assessed_price: String,
    pub loan_amount: String,
    pub purchase_date: Option<NaiveDate>,
    pub sale_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
    pub is_registered: bool,
    pub is_registered_over_one_year: bool,
    pub seller_type: SellerType,
    pub use_custom_fees: bool,
    pub custom_transfer_fee: String,
    pub custom_mortgage_fee: String,
    pub shares: PaymentShares,
    pub touched: BTreeSet<Field>,
}

impl FormState {
    /// Apply one edit. Date edits that fail [`validate_date`] leave the
    /// state unchanged apart from marking the field touched.
    pub fn update(mut self, action: FormAction, today: NaiveDate) -> FormState {
        match action {
            FormAction::SetAmount(field, text) => {
                let text = unformat_amount(&text);
                match field {
                    AmountField::SalePrice => self.sale_price = text,
                    AmountField::AssessedPrice => self.assessed_price = text,
                    AmountField::LoanAmount => self.loan_amount = text,
                }
            }
            FormAction::SetDate(field, date) => {
                self.touched.insert(field.into());
                match validate_date(field, date, self.purchase_date, self.sale_date, today) {
                    Ok(()) => match field {
                        DateField::Purchase => self.purchase_date = Some(date),
                        DateField::Sale => self.sale_date = Some(date),
                        DateField::Registration => self.registration_date = Some(date),
                    },
                    Err(err) => log::warn!("{}", err),
                }
            }
            FormAction::SetRegistered(value) => self.is_registered = value,
            FormAction::SetRegisteredOverOneYear(value) => self.is_registered_over_one_year = value,
            FormAction::SetSellerType(seller_type) => self.seller_type = seller_type,
            FormAction::UseCustomFees(value) => self.use_custom_fees = value,
            FormAction::SetCustomTransferFee(text) => self.custom_transfer_fee = text.trim().to_string(),
            FormAction::SetCustomMortgageFee(text) => self.custom_mortgage_fee = text.trim().to_string(),
            FormAction::SetShare(line, mode) => self.shares.set(line, mode),
            FormAction::Blur(field) => {
                self.touched.insert(field);
            }
        }
        self
    }

    /// Whether a touched field currently holds an unusable value
    pub fn is_field_invalid(&self, field: Field) -> bool {
        if !self.touched.contains(&field) {
            return false;
        }
        match field {
            Field::SalePrice | Field::AssessedPrice => {
                let text = if field == Field::SalePrice {
                    &self.sale_price
                } else {
                    &self.assessed_price
                };
                Decimal::from_str(text).map_or(true, |v| v <= Decimal::ZERO)
            }
            Field::LoanAmount => Decimal::from_str(&self.loan_amount).is_err(),
            Field::PurchaseDate => self.purchase_date.is_none(),
            Field::SaleDate => self.sale_date.is_none(),
            Field::RegistrationDate | Field::CustomTransferFee | Field::CustomMortgageFee => false,
        }
    }

    /// Validate every field and build the calculator input
    pub fn submit(&self, rates: &RateTable) -> Result<TaxInput, InputError> {
        let sale_price = parse_amount(Field::SalePrice, &self.sale_price)?;
        let assessed_price = parse_amount(Field::AssessedPrice, &self.assessed_price)?;
        let loan_amount = parse_amount(Field::LoanAmount, &self.loan_amount)?;

        let purchase_date = self
            .purchase_date
            .ok_or(InputError::MissingField(Field::PurchaseDate))?;
        let sale_date = self.sale_date.ok_or(InputError::MissingField(Field::SaleDate))?;
        if sale_date < purchase_date {
            return Err(InputError::SaleBeforePurchase {
                purchase: purchase_date,
                sale: sale_date,
            });
        }
        if holding_years(purchase_date, sale_date) < 1 {
            return Err(InputError::HoldingPeriodTooShort {
                purchase: purchase_date,
                sale: sale_date,
            });
        }

        let (transfer_fee_rate, mortgage_fee_rate) = if self.use_custom_fees {
            (
                parse_percent(Field::CustomTransferFee, &self.custom_transfer_fee)?,
                parse_percent(Field::CustomMortgageFee, &self.custom_mortgage_fee)?,
            )
        } else {
            (rates.transfer_fee_rate, rates.mortgage_fee_rate)
        };

        Ok(TaxInput {
            sale_price,
            assessed_price,
            loan_amount,
            purchase_date,
            sale_date,
            is_registered_resident: self.is_registered,
            is_registered_over_one_year: self.is_registered_over_one_year,
            registration_date: self.registration_date,
            transfer_fee_rate,
            mortgage_fee_rate,
            seller_type: self.seller_type,
        })
    }
}

/// Check a date edit against the other dates already entered.
///
/// Purchase and registration dates cannot be in the future or after the
/// sale date; a sale date cannot precede the purchase date.
pub fn validate_date(
    field: DateField,
    date: NaiveDate,
    purchase: Option<NaiveDate>,
    sale: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), InputError> {
    let reject = |reason| {
        Err(InputError::DateRejected {
            field: field.into(),
            date,
            reason,
        })
    };
    match field {
        DateField::Purchase | DateField::Registration => {
            if date > today {
                return reject("in the future");
            }
            if sale.is_some_and(|s| date > s) {
                return reject("after the sale date");
            }
        }
        DateField::Sale => {
            if purchase.is_some_and(|p| date < p) {
                return reject("before the purchase date");
            }
        }
    }
    Ok(())
}

/// Check a complete set of dates up front, so a rejected date is reported
/// instead of being dropped by [`FormState::update`].
pub fn validate_dates(
    purchase: NaiveDate,
    sale: NaiveDate,
    registration: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), InputError> {
    validate_date(DateField::Purchase, purchase, None, Some(sale), today)?;
    validate_date(DateField::Sale, sale, Some(purchase), None, today)?;
    if let Some(date) = registration {
        validate_date(DateField::Registration, date, Some(purchase), Some(sale), today)?;
    }
    Ok(())
}

/// Strip thousands separators and whitespace from typed amount text
pub fn unformat_amount(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

fn parse_amount(field: Field, text: &str) -> Result<Decimal, InputError> {
    let text = unformat_amount(text);
    if text.is_empty() {
        return Err(InputError::MissingField(field));
    }
    let value = Decimal::from_str(&text).map_err(|_| InputError::NotANumber {
        field,
        value: text.clone(),
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputError::Negative(field));
    }
    if value > MAX_AMOUNT {
        return Err(InputError::OutOfRange {
            field,
            max: MAX_AMOUNT,
        });
    }
    Ok(value)
}

/// Percentage text to a fraction; blank means 0%
fn parse_percent(field: Field, text: &str) -> Result<Decimal, InputError> {
    if text.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    let percent = parse_amount(field, text)?;
    if percent > MAX_PERCENT {
        return Err(InputError::OutOfRange {
            field,
            max: MAX_PERCENT,
        });
    }
    Ok(percent / Decimal::ONE_HUNDRED)
}
