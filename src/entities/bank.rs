// 🏦 Bank Entity - National bank ident, rule reference and BIC
//
// A bank record is looked up by its bank ident (e.g. the German BLZ).
// The rule id points into the rule set; the BIC is what get_bic() returns.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rule::IDENTITY_RULE_ID;

// ============================================================================
// BANK IDENTIFIER CODE
// ============================================================================

/// BankIdentifierCode - SWIFT code of a bank (e.g. "COBADEFFXXX")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankIdentifierCode {
    pub bic: String,
}

impl BankIdentifierCode {
    pub fn new(bic: impl Into<String>) -> Self {
        BankIdentifierCode { bic: bic.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.bic
    }
}

impl fmt::Display for BankIdentifierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bic)
    }
}

// ============================================================================
// BANK ENTITY
// ============================================================================

/// Bank - read-only record, re-fetched from the data provider per operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// National bank ident (BLZ in Germany)
    pub bank_ident: String,

    #[serde(default)]
    pub name: String,

    /// Id of the rule that applies to accounts of this bank
    #[serde(default = "default_rule")]
    pub rule: String,

    #[serde(default)]
    pub bic: Option<BankIdentifierCode>,
}

fn default_rule() -> String {
    IDENTITY_RULE_ID.to_string()
}

impl Bank {
    pub fn new(bank_ident: String, name: String, rule: String) -> Self {
        Bank {
            bank_ident,
            name,
            rule,
            bic: None,
        }
    }

    /// Bare record carrying only the bank ident
    ///
    /// Used for parsed IBANs and by countries without bank data.
    pub fn with_ident(bank_ident: impl Into<String>) -> Self {
        Bank::new(bank_ident.into(), String::new(), default_rule())
    }

    /// Builder pattern: add the BIC
    pub fn with_bic(mut self, bic: impl Into<String>) -> Self {
        self.bic = Some(BankIdentifierCode::new(bic));
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
