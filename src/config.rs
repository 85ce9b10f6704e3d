// ⚙️ Configuration - Countries, banks and rules as one JSON document
//
// {
//   "countries": [{ "country_type": "DE", "name": "Germany", "format": "^DE\\d{20}$",
//                   "bank_ident_length": 8, "account_number_length": 10 }],
//   "banks":     [{ "bank_ident": "37040044", "name": "Commerzbank", "rule": "000000", "bic": "COBADEFFXXX" }],
//   "rules":     [{ "id": "000200", "elements": [ ... ] }],
//   "rule_countries": ["DE"]
// }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entities::{Bank, Country, CountryCode, Rule};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IbanConfig {
    #[serde(default)]
    pub countries: Vec<Country>,

    #[serde(default)]
    pub banks: Vec<Bank>,

    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Countries served by the rule engine; every other country uses the default manager
    #[serde(default)]
    pub rule_countries: Vec<CountryCode>,
}

impl IbanConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read IBAN configuration: {:?}", path.as_ref()))?;

        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse IBAN configuration JSON")
    }
}

// ============================================================================
// TESTS
// ============================================================================
