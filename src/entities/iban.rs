// 💳 IBAN Entity - Assembled account identifier
// IBAN = CountryCode + CheckDigit + BBAN, BBAN = BankIdent + AccountNumber

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bank::{Bank, BankIdentifierCode};
use super::country::Country;

/// Iban - fully populated result, built once per call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iban {
    pub country: Country,
    pub bank: Bank,

    /// Account number after rule resolution and padding
    pub account_number: String,

    pub bban: String,

    /// Two digits, zero padded
    pub check_digit: String,

    /// Electronic format, no spaces
    pub iban: String,
}

impl Iban {
    pub fn bank_ident(&self) -> &str {
        &self.bank.bank_ident
    }

    /// Paper format: blocks of four characters separated by a space
    ///
    /// Example: "DE89 3704 0044 0532 0130 00"
    pub fn paper_format(&self) -> String {
        self.iban
            .chars()
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iban)
    }
}

/// IbanBic - resolved IBAN plus BIC (absent where the country derives none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbanBic {
    pub iban: Iban,
    pub bic: Option<BankIdentifierCode>,
}
