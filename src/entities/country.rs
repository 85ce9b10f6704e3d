// 🌍 Country Entity - IBAN layout per country
// Fixed field widths plus the whole-string format pattern an IBAN must match

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COUNTRY CODE
// ============================================================================

/// CountryCode - the SEPA countries an IBAN can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    AT,
    BE,
    BG,
    HR,
    CY,
    CZ,
    DK,
    EE,
    FI,
    FR,
    DE,
    GR,
    HU,
    IS,
    IE,
    IT,
    LV,
    LI,
    LT,
    LU,
    MT,
    MC,
    NL,
    NO,
    PL,
    PT,
    RO,
    SK,
    SI,
    ES,
    SE,
    CH,
    GB,
}

impl CountryCode {
    pub const ALL: [CountryCode; 33] = [
        CountryCode::AT,
        CountryCode::BE,
        CountryCode::BG,
        CountryCode::HR,
        CountryCode::CY,
        CountryCode::CZ,
        CountryCode::DK,
        CountryCode::EE,
        CountryCode::FI,
        CountryCode::FR,
        CountryCode::DE,
        CountryCode::GR,
        CountryCode::HU,
        CountryCode::IS,
        CountryCode::IE,
        CountryCode::IT,
        CountryCode::LV,
        CountryCode::LI,
        CountryCode::LT,
        CountryCode::LU,
        CountryCode::MT,
        CountryCode::MC,
        CountryCode::NL,
        CountryCode::NO,
        CountryCode::PL,
        CountryCode::PT,
        CountryCode::RO,
        CountryCode::SK,
        CountryCode::SI,
        CountryCode::ES,
        CountryCode::SE,
        CountryCode::CH,
        CountryCode::GB,
    ];

    /// Two letter ISO 3166-1 code, upper case
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::AT => "AT",
            CountryCode::BE => "BE",
            CountryCode::BG => "BG",
            CountryCode::HR => "HR",
            CountryCode::CY => "CY",
            CountryCode::CZ => "CZ",
            CountryCode::DK => "DK",
            CountryCode::EE => "EE",
            CountryCode::FI => "FI",
            CountryCode::FR => "FR",
            CountryCode::DE => "DE",
            CountryCode::GR => "GR",
            CountryCode::HU => "HU",
            CountryCode::IS => "IS",
            CountryCode::IE => "IE",
            CountryCode::IT => "IT",
            CountryCode::LV => "LV",
            CountryCode::LI => "LI",
            CountryCode::LT => "LT",
            CountryCode::LU => "LU",
            CountryCode::MT => "MT",
            CountryCode::MC => "MC",
            CountryCode::NL => "NL",
            CountryCode::NO => "NO",
            CountryCode::PL => "PL",
            CountryCode::PT => "PT",
            CountryCode::RO => "RO",
            CountryCode::SK => "SK",
            CountryCode::SI => "SI",
            CountryCode::ES => "ES",
            CountryCode::SE => "SE",
            CountryCode::CH => "CH",
            CountryCode::GB => "GB",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCountryCode(pub String);

impl fmt::Display for UnknownCountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown country code: {}", self.0)
    }
}

impl std::error::Error for UnknownCountryCode {}

impl FromStr for CountryCode {
    type Err = UnknownCountryCode;

    /// Case-insensitive: "de" and "DE" both parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        CountryCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| UnknownCountryCode(s.to_string()))
    }
}

// ============================================================================
// COUNTRY ENTITY
// ============================================================================

/// Country - immutable IBAN layout, loaded by country code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub country_type: CountryCode,

    pub name: String,

    /// Pattern the complete IBAN string has to match (e.g. `^DE\d{20}$`)
    pub format: String,

    /// Exact length of the national bank ident
    pub bank_ident_length: usize,

    /// Length the account number is left-padded to
    pub account_number_length: usize,
}

impl Country {
    pub fn new(
        country_type: CountryCode,
        name: String,
        format: String,
        bank_ident_length: usize,
        account_number_length: usize,
    ) -> Self {
        Country {
            country_type,
            name,
            format,
            bank_ident_length,
            account_number_length,
        }
    }

    pub fn code(&self) -> &'static str {
        self.country_type.as_str()
    }

    /// Total IBAN length: country code + check digit + bank ident + account number
    pub fn iban_length(&self) -> usize {
        4 + self.bank_ident_length + self.account_number_length
    }
}

// ============================================================================
// TESTS
// ============================================================================
