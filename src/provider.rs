// 📚 Data Provider - Country, Bank and Rule lookups
//
// The engine re-fetches its records from a provider on every operation.
// StaticDataProvider keeps everything in memory, filled from configuration.

use std::collections::HashMap;

use crate::config::IbanConfig;
use crate::entities::{Bank, Country, CountryCode, Rule};
use crate::error::{IbanError, IbanErrorKind, Result};

// ============================================================================
// PROVIDER TRAIT
// ============================================================================

/// DataProvider - source of the read-only records the engine works on
///
/// Every lookup may fail with `DataLoadFailure`. Implementations must be safe
/// to share between threads; the engine never mutates what it loads.
pub trait DataProvider: Send + Sync {
    fn load_country(&self, country_code: CountryCode) -> Result<Country>;

    /// Load a bank by its national bank ident
    fn load_bank(&self, bank_ident: &str) -> Result<Bank>;

    fn load_rule(&self, rule_id: &str) -> Result<Rule>;
}

fn not_found(what: &str, key: &str) -> IbanError {
    IbanError::with_cause(
        IbanErrorKind::DataLoadFailure,
        format!("{} not found: {}", what, key),
    )
}

// ============================================================================
// IN-MEMORY PROVIDER
// ============================================================================

/// StaticDataProvider - immutable in-memory records
#[derive(Debug, Clone)]
pub struct StaticDataProvider {
    countries: HashMap<CountryCode, Country>,
    banks: HashMap<String, Bank>,
    rules: HashMap<String, Rule>,
}

impl StaticDataProvider {
    /// Create a provider that only knows the two sentinel rules
    pub fn new() -> Self {
        let mut provider = StaticDataProvider {
            countries: HashMap::new(),
            banks: HashMap::new(),
            rules: HashMap::new(),
        };

        provider.register_sentinel_rules();
        provider
    }

    /// Build a provider from a configuration document
    pub fn from_config(config: &IbanConfig) -> Self {
        let mut provider = Self::new();

        for country in &config.countries {
            provider.register_country(country.clone());
        }
        for bank in &config.banks {
            provider.register_bank(bank.clone());
        }
        for rule in &config.rules {
            provider.register_rule(rule.clone());
        }

        provider
    }

    /// "000000" and "000100" resolve without explicit configuration
    fn register_sentinel_rules(&mut self) {
        self.register_rule(Rule::identity());
        self.register_rule(Rule::forbidden());
    }

    /// Register a country (replaces an earlier record with the same code)
    pub fn register_country(&mut self, country: Country) {
        self.countries.insert(country.country_type, country);
    }

    pub fn register_bank(&mut self, bank: Bank) {
        self.banks.insert(bank.bank_ident.clone(), bank);
    }

    pub fn register_rule(&mut self, rule: Rule) {
        self.rules.insert(rule.id.clone(), rule);
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// Number of rules, sentinels included
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for StaticDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for StaticDataProvider {
    fn load_country(&self, country_code: CountryCode) -> Result<Country> {
        self.countries
            .get(&country_code)
            .cloned()
            .ok_or_else(|| not_found("country", country_code.as_str()))
    }

    fn load_bank(&self, bank_ident: &str) -> Result<Bank> {
        self.banks
            .get(bank_ident)
            .cloned()
            .ok_or_else(|| not_found("bank", bank_ident))
    }

    fn load_rule(&self, rule_id: &str) -> Result<Rule> {
        self.rules
            .get(rule_id)
            .cloned()
            .ok_or_else(|| not_found("rule", rule_id))
    }
}

// ============================================================================
// TESTS
// ============================================================================
