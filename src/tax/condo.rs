use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;

/// Number of records returned when listing without an explicit limit
pub const DEFAULT_CONDO_LIMIT: usize = 500;

/// Treasury Department assessed value for one condo floor/usage combination.
/// Field names follow the published valuation export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condo {
    #[serde(rename = "ID_LIST")]
    pub id: String,
    #[serde(rename = "CONDO_ID", default)]
    pub condo_id: String,
    #[serde(rename = "CONDO_NAME", default)]
    pub name: Option<String>,
    #[serde(rename = "BUILD_NAME", default)]
    pub building: String,
    #[serde(rename = "CHANGWAT_CODE", default)]
    pub province_code: u32,
    #[serde(rename = "CHANGWAT_NAME", default)]
    pub province: String,
    #[serde(rename = "AMPHUR_CODE", default)]
    pub district_code: u32,
    #[serde(rename = "AMPHUR_NAME", default)]
    pub district: String,
    #[serde(rename = "TUMBON_CODE", default)]
    pub subdistrict_code: u32,
    #[serde(rename = "TUMBON_NAME", default)]
    pub subdistrict: String,
    #[serde(rename = "BRANCH_CODE", default)]
    pub branch_code: u32,
    #[serde(rename = "BRANCH_NAME", default)]
    pub branch: String,
    /// Floor level, e.g. "2-8"
    #[serde(rename = "OFLEVEL", default)]
    pub level: String,
    /// Usage category, e.g. "residential"
    #[serde(rename = "USE_CATG", default)]
    pub usage: String,
    /// Assessed value per square meter (THB)
    #[serde(rename = "VAL_AMT_P_MET")]
    #[schemars(with = "f64")]
    pub value_per_sqm: Decimal,
    #[serde(rename = "importedAt", default)]
    pub imported_at: Option<DateTime<Utc>>,
    #[serde(rename = "firstImported", default)]
    pub first_imported: Option<DateTime<Utc>>,
}

impl Condo {
    /// Assessed price of a unit with the given floor area in square meters
    pub fn assessed_price(&self, area_sqm: Decimal) -> Decimal {
        self.value_per_sqm * area_sqm
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// A floor level and usage category offered for one condo
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ValuationOption {
    pub level: String,
    pub usage: String,
}

/// Read-only lookup over a set of valuation records
#[derive(Debug, Clone, Default)]
pub struct ValuationBook {
    records: Vec<Condo>,
}

impl ValuationBook {
    pub fn new(records: Vec<Condo>) -> Self {
        ValuationBook { records }
    }

    /// Read a JSON array of valuation records
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let records: Vec<Condo> = serde_json::from_reader(reader)?;
        log::info!("Read {} valuation records", records.len());
        Ok(ValuationBook::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `limit` records in file order
    pub fn all(&self, limit: usize) -> &[Condo] {
        &self.records[..limit.min(self.records.len())]
    }

    /// Record by its `ID_LIST` key
    pub fn find(&self, id: &str) -> Option<&Condo> {
        self.records.iter().find(|c| c.id == id)
    }

    /// Records whose condo name contains `name`, ignoring case
    pub fn search(&self, name: &str) -> Vec<&Condo> {
        let needle = name.to_lowercase();
        self.records
            .iter()
            .filter(|c| c.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Distinct condo names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct floor level / usage pairs recorded for a condo, sorted by level
    pub fn options(&self, name: &str) -> Vec<ValuationOption> {
        self.records
            .iter()
            .filter(|c| c.name() == name)
            .map(|c| ValuationOption {
                level: c.level.clone(),
                usage: c.usage.clone(),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Assessed value per square meter for an exact condo, level and usage
    pub fn price_per_sqm(&self, name: &str, level: &str, usage: &str) -> Option<Decimal> {
        self.records
            .iter()
            .find(|c| c.name() == name && c.level == level && c.usage == usage)
            .map(|c| c.value_per_sqm)
    }
}
