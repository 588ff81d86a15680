use super::fees::TaxResult;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Who pays a fee line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ShareMode {
    /// Split evenly between buyer and seller
    #[default]
    #[serde(rename = "50-50")]
    Even,
    #[serde(rename = "buyer")]
    Buyer,
    #[serde(rename = "seller")]
    Seller,
}

impl ShareMode {
    pub fn display(&self) -> &'static str {
        match self {
            ShareMode::Even => "50-50",
            ShareMode::Buyer => "buyer",
            ShareMode::Seller => "seller",
        }
    }
}

/// Exactly `"buyer"` or `"seller"` selects a single payer; anything else,
/// including other capitalisations, splits evenly.
impl From<&str> for ShareMode {
    fn from(s: &str) -> Self {
        match s {
            "buyer" => ShareMode::Buyer,
            "seller" => ShareMode::Seller,
            _ => ShareMode::Even,
        }
    }
}

impl std::fmt::Display for ShareMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Buyer and seller portions of one fee line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PaymentShare {
    #[schemars(with = "f64")]
    pub buyer: Decimal,
    #[schemars(with = "f64")]
    pub seller: Decimal,
}

/// Split `amount` according to `mode`. The two portions always add back up
/// to `amount` exactly.
pub fn split(amount: Decimal, mode: ShareMode) -> PaymentShare {
    match mode {
        ShareMode::Buyer => PaymentShare {
            buyer: amount,
            seller: Decimal::ZERO,
        },
        ShareMode::Seller => PaymentShare {
            buyer: Decimal::ZERO,
            seller: amount,
        },
        ShareMode::Even => {
            let buyer = amount / Decimal::TWO;
            PaymentShare {
                buyer,
                seller: amount - buyer,
            }
        }
    }
}

/// The five fee lines that can be shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeeLine {
    TransferFee,
    SpecificBusinessTax,
    StampDuty,
    WithholdingTax,
    MortgageFee,
}

impl FeeLine {
    pub const ALL: [FeeLine; 5] = [
        FeeLine::TransferFee,
        FeeLine::SpecificBusinessTax,
        FeeLine::StampDuty,
        FeeLine::WithholdingTax,
        FeeLine::MortgageFee,
    ];

    pub fn display(&self) -> &'static str {
        match self {
            FeeLine::TransferFee => "Transfer fee",
            FeeLine::SpecificBusinessTax => "Specific business tax",
            FeeLine::StampDuty => "Stamp duty",
            FeeLine::WithholdingTax => "Withholding income tax",
            FeeLine::MortgageFee => "Mortgage registration fee",
        }
    }

    pub fn amount(&self, result: &TaxResult) -> Decimal {
        match self {
            FeeLine::TransferFee => result.transfer_fee,
            FeeLine::SpecificBusinessTax => result.specific_business_tax,
            FeeLine::StampDuty => result.stamp_duty,
            FeeLine::WithholdingTax => result.withholding_tax,
            FeeLine::MortgageFee => result.mortgage_fee,
        }
    }
}

/// Payer selection for each fee line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PaymentShares {
    pub transfer_fee: ShareMode,
    pub specific_business_tax: ShareMode,
    pub stamp_duty: ShareMode,
    pub withholding_tax: ShareMode,
    pub mortgage_fee: ShareMode,
}

impl PaymentShares {
    pub fn mode(&self, line: FeeLine) -> ShareMode {
        match line {
            FeeLine::TransferFee => self.transfer_fee,
            FeeLine::SpecificBusinessTax => self.specific_business_tax,
            FeeLine::StampDuty => self.stamp_duty,
            FeeLine::WithholdingTax => self.withholding_tax,
            FeeLine::MortgageFee => self.mortgage_fee,
        }
    }

    pub fn set(&mut self, line: FeeLine, mode: ShareMode) {
        let slot = match line {
            FeeLine::TransferFee => &mut self.transfer_fee,
            FeeLine::SpecificBusinessTax => &mut self.specific_business_tax,
            FeeLine::StampDuty => &mut self.stamp_duty,
            FeeLine::WithholdingTax => &mut self.withholding_tax,
            FeeLine::MortgageFee => &mut self.mortgage_fee,
        };
        *slot = mode;
    }

    /// Same payer for every line
    pub fn all(mode: ShareMode) -> Self {
        PaymentShares {
            transfer_fee: mode,
            specific_business_tax: mode,
            stamp_duty: mode,
            withholding_tax: mode,
            mortgage_fee: mode,
        }
    }
}

/// One split fee line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShareLine {
    pub line: FeeLine,
    pub mode: ShareMode,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(flatten)]
    pub share: PaymentShare,
}

/// Every fee line split by payer, with the per-party totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShareBreakdown {
    pub lines: Vec<ShareLine>,
    pub totals: PaymentShare,
}

impl ShareBreakdown {
    pub fn new(result: &TaxResult, shares: &PaymentShares) -> Self {
        let lines: Vec<ShareLine> = FeeLine::ALL
            .iter()
            .map(|&line| {
                let amount = line.amount(result);
                let mode = shares.mode(line);
                ShareLine {
                    line,
                    mode,
                    amount,
                    share: split(amount, mode),
                }
            })
            .collect();

        let totals = lines.iter().fold(PaymentShare::default(), |acc, l| PaymentShare {
            buyer: acc.buyer + l.share.buyer,
            seller: acc.seller + l.share.seller,
        });

        ShareBreakdown { lines, totals }
    }
}
