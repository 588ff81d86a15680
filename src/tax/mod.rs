pub mod condo;
pub mod fees;
pub mod form;
pub mod income;
pub mod period;
pub mod rates;
pub mod shares;

// Flat public surface for domain types and functions.
pub use condo::{Condo, ValuationBook, ValuationOption, DEFAULT_CONDO_LIMIT};
pub use fees::{calculate, SellerType, TaxInput, TaxResult};
pub use form::{AmountField, DateField, Field, FormAction, FormState, InputError};
pub use income::{bracket_tax, income_tax};
pub use period::{holding_years, DetailedPeriod};
pub use rates::{HoldingDeduction, IncomeBracket, RateTable};
pub use shares::{split, FeeLine, PaymentShare, PaymentShares, ShareBreakdown, ShareLine, ShareMode};
