// IBAN Rules - Core Library
// Generates and validates IBANs and derives BICs, applying country specific
// rule cascades (bank mergers, renumbered accounts, excluded ranges) first.

pub mod error;
pub mod pattern;
pub mod checksum;
pub mod entities;
pub mod config;
pub mod provider;
pub mod rules;
pub mod manager;
pub mod registry;

#[cfg(feature = "async")]
pub mod asynchronous;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use error::{IbanError, IbanErrorKind, Result};
pub use checksum::{
    assemble_iban, bban, check_account_number, check_bank_ident, compute_check_digit,
    modulo97, IbanBuilder,
};
pub use entities::{
    Bank, BankIdentifierCode, Country, CountryCode, Iban, IbanBic,
    Rule, RuleContent, RuleElement, RuleType, FORBIDDEN_RULE_ID, IDENTITY_RULE_ID, MAX_RULE_DEPTH,
};
pub use config::IbanConfig;
pub use provider::{DataProvider, StaticDataProvider};
pub use rules::{Resolution, RuleResolver};
pub use manager::{parse_iban, DefaultManager, IbanManager, RuleManager};
pub use registry::ManagerRegistry;

#[cfg(feature = "async")]
pub use asynchronous::{generate_iban_async, get_bic_async, validate_iban_async};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
