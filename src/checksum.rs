// 🧮 Checksum Engine - ISO 7064 MOD 97-10
// Account number padding, BBAN/IBAN assembly and check digit calculation

use crate::entities::{Bank, Country, Iban};
use crate::error::{IbanError, IbanErrorKind, Result};
use crate::pattern;

/// Placeholder check digit used while calculating the real one
const CHECK_DIGIT_PLACEHOLDER: &str = "00";

/// The streaming reduction keeps the buffer at most this large
const MAX_BUFFER: u64 = 999_999_999;

// ============================================================================
// FIELD CHECKS
// ============================================================================

/// Bank ident must have exactly the country's length
pub fn check_bank_ident(country: &Country, bank_ident: &str) -> bool {
    bank_ident.chars().count() == country.bank_ident_length
}

/// Fails `BankIdentNotValid` unless the bank ident has the country's length
pub fn ensure_bank_ident(country: &Country, bank_ident: &str) -> Result<()> {
    if check_bank_ident(country, bank_ident) {
        Ok(())
    } else {
        Err(IbanError::new(IbanErrorKind::BankIdentNotValid))
    }
}

/// Left-pad the account number with '0' up to the country's length
///
/// Longer account numbers are returned unchanged.
pub fn check_account_number(country: &Country, account_number: &str) -> String {
    format!(
        "{:0>width$}",
        account_number,
        width = country.account_number_length
    )
}

/// BBAN = bank ident + account number
pub fn bban(bank_ident: &str, account_number: &str) -> Result<String> {
    if bank_ident.trim().is_empty() || account_number.trim().is_empty() {
        return Err(IbanError::new(IbanErrorKind::BBANError));
    }

    Ok(format!("{}{}", bank_ident, account_number))
}

/// Whole-string format check of an IBAN against the country's pattern
pub fn check_iban_format(country: &Country, iban: &str) -> std::result::Result<bool, regex::Error> {
    pattern::matches(&country.format, iban)
}

// ============================================================================
// MOD 97-10
// ============================================================================

/// Digits pass through, any other character becomes `code point - 55` ("A" → "10")
pub fn numeric_projection(value: &str) -> Result<String> {
    let mut projected = String::with_capacity(value.len() * 2);

    for c in value.chars() {
        if c.is_ascii_digit() {
            projected.push(c);
            continue;
        }

        let code = u32::from(c);
        if code < 55 {
            return Err(IbanError::with_cause(
                IbanErrorKind::IbanGeneratingCheckDigit,
                format!("character {:?} has no numeric projection", c),
            ));
        }
        projected.push_str(&(code - 55).to_string());
    }

    Ok(projected)
}

/// MOD 97 over numeric(BBAN) || numeric(country code) || check digit
///
/// A missing or blank check digit is replaced by "00". The digit string is
/// reduced while streaming so the buffer never exceeds nine digits plus one.
pub fn modulo97(bban: &str, country_code: &str, check_digit: Option<&str>) -> Result<u32> {
    let check_digit = check_digit
        .filter(|digits| !digits.trim().is_empty())
        .unwrap_or(CHECK_DIGIT_PLACEHOLDER);

    let input = format!(
        "{}{}{}",
        numeric_projection(bban)?,
        numeric_projection(country_code)?,
        check_digit
    );

    let mut buffer: u64 = 0;
    for c in input.chars() {
        let digit = c.to_digit(10).ok_or_else(|| {
            IbanError::with_cause(
                IbanErrorKind::IbanGeneratingCheckDigit,
                format!("unexpected character {:?} in check digit input", c),
            )
        })?;

        buffer = buffer * 10 + u64::from(digit);
        if buffer > MAX_BUFFER {
            buffer %= 97;
        }
    }

    // buffer % 97 < 97
    Ok((buffer % 97) as u32)
}

/// Two digit check digit: 98 minus the MOD 97 remainder over the placeholder
pub fn compute_check_digit(bban: &str, country_code: &str) -> Result<String> {
    let remainder = modulo97(bban, country_code, None)?;
    Ok(format!("{:02}", 98 - remainder))
}

// ============================================================================
// IBAN ASSEMBLY
// ============================================================================

/// IbanBuilder - collects the IBAN components, `build()` assembles and checks them
#[derive(Debug, Clone, Default)]
pub struct IbanBuilder {
    country: Option<Country>,
    bank: Option<Bank>,
    account_number: Option<String>,
    bban: Option<String>,
    check_digit: Option<String>,
}

impl IbanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    pub fn with_bank(mut self, bank: Bank) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    pub fn with_bban(mut self, bban: impl Into<String>) -> Self {
        self.bban = Some(bban.into());
        self
    }

    pub fn with_check_digit(mut self, check_digit: impl Into<String>) -> Self {
        self.check_digit = Some(check_digit.into());
        self
    }

    /// Assemble CountryCode + CheckDigit + BBAN and check the country format
    ///
    /// # Errors
    /// * `IbanGeneratingNotAllParameters` - a component is missing or blank
    /// * `IbanGeneratingFormatting` - the result fails the country's format
    pub fn build(self) -> Result<Iban> {
        let (country, bank, account_number, bban, check_digit) = match (
            self.country,
            self.bank,
            non_blank(self.account_number),
            non_blank(self.bban),
            non_blank(self.check_digit),
        ) {
            (Some(country), Some(bank), Some(account), Some(bban), Some(check_digit))
                if !bank.bank_ident.trim().is_empty() =>
            {
                (country, bank, account, bban, check_digit)
            }
            _ => return Err(IbanError::new(IbanErrorKind::IbanGeneratingNotAllParameters)),
        };

        let iban = format!("{}{}{}", country.code(), check_digit, bban);

        match check_iban_format(&country, &iban) {
            Ok(true) => {}
            Ok(false) => return Err(IbanError::new(IbanErrorKind::IbanGeneratingFormatting)),
            Err(e) => return Err(IbanError::with_cause(IbanErrorKind::IbanGeneratingFormatting, e)),
        }

        Ok(Iban {
            country,
            bank,
            account_number,
            bban,
            check_digit,
            iban,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pad the account number, build the BBAN, compute the check digit and assemble
///
/// The bank ident of `bank` is used as-is; callers resolve rules beforehand.
pub fn assemble_iban(country: &Country, bank: Bank, account_number: &str) -> Result<Iban> {
    let account_number = check_account_number(country, account_number);
    let bban = bban(&bank.bank_ident, &account_number)?;
    let check_digit = compute_check_digit(&bban, country.code())?;

    IbanBuilder::new()
        .with_country(country.clone())
        .with_bank(bank)
        .with_account_number(account_number)
        .with_bban(bban)
        .with_check_digit(check_digit)
        .build()
}

// ============================================================================
// TESTS
// ============================================================================
