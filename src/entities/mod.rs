// Entity Models
// Read-only records handed out by the data provider (Country, Bank, Rule)
// and the results built once per call (Iban, IbanBic)

pub mod bank;
pub mod country;
pub mod iban;
pub mod rule;

pub use bank::{Bank, BankIdentifierCode};
pub use country::{Country, CountryCode, UnknownCountryCode};
pub use iban::{Iban, IbanBic};
pub use rule::{Rule, RuleContent, RuleElement, RuleType, FORBIDDEN_RULE_ID, IDENTITY_RULE_ID, MAX_RULE_DEPTH};
