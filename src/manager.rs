// 🧭 IBAN Managers - Default vs rule driven countries
//
// DefaultManager: plain BBAN from bank ident + account number, MOD 97 validation.
// RuleManager: runs the rule cascade first, validates by regenerating the IBAN.

use std::sync::Arc;
use tracing::debug;

use crate::checksum;
use crate::entities::{Bank, BankIdentifierCode, CountryCode, Iban, IbanBic};
use crate::error::{IbanError, IbanErrorKind, Result};
use crate::provider::DataProvider;
use crate::rules::RuleResolver;

// ============================================================================
// MANAGER TRAIT
// ============================================================================

/// IbanManager - generate, validate and derive BICs for one family of countries
pub trait IbanManager: Send + Sync {
    /// Build the IBAN (and BIC where the country derives one)
    fn generate_iban(
        &self,
        country_code: CountryCode,
        bank_ident: &str,
        account_number: &str,
    ) -> Result<IbanBic>;

    /// Check an IBAN string in electronic format
    fn validate_iban(&self, iban: &str) -> Result<bool>;

    /// BIC of the bank owning the IBAN
    fn get_bic(&self, iban: &str) -> Result<BankIdentifierCode>;

    /// Manager name (for logging)
    fn name(&self) -> &str;
}

// ============================================================================
// PARSING
// ============================================================================

/// Slice an IBAN string by the country's fixed field widths
///
/// Country code = chars 0..2, check digit = chars 2..4, then the bank ident and
/// the account number. The result must pass the country's format check.
pub fn parse_iban(provider: &dyn DataProvider, iban: &str) -> Result<Iban> {
    let code = iban.get(0..2).ok_or_else(formatting_error)?;
    let country_code: CountryCode = code
        .parse()
        .map_err(|e| IbanError::with_cause(IbanErrorKind::IbanValidatingFormatting, e))?;

    let country = provider.load_country(country_code)?;

    let check_digit = iban.get(2..4).ok_or_else(formatting_error)?;
    let bank_end = 4 + country.bank_ident_length;
    let bank_ident = iban.get(4..bank_end).ok_or_else(formatting_error)?;
    let account_number = iban
        .get(bank_end..bank_end + country.account_number_length)
        .ok_or_else(formatting_error)?;

    match checksum::check_iban_format(&country, iban) {
        Ok(true) => {}
        Ok(false) => return Err(formatting_error()),
        Err(e) => return Err(IbanError::with_cause(IbanErrorKind::IbanValidatingFormatting, e)),
    }

    let bban = checksum::bban(bank_ident, account_number)?;

    Ok(Iban {
        country,
        bank: Bank::with_ident(bank_ident),
        account_number: account_number.to_string(),
        bban,
        check_digit: check_digit.to_string(),
        iban: iban.to_string(),
    })
}

fn formatting_error() -> IbanError {
    IbanError::new(IbanErrorKind::IbanValidatingFormatting)
}

// ============================================================================
// DEFAULT MANAGER
// ============================================================================

/// DefaultManager - countries without bank data or rules
pub struct DefaultManager {
    provider: Arc<dyn DataProvider>,
}

impl DefaultManager {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        DefaultManager { provider }
    }
}

impl IbanManager for DefaultManager {
    fn generate_iban(
        &self,
        country_code: CountryCode,
        bank_ident: &str,
        account_number: &str,
    ) -> Result<IbanBic> {
        let country = self.provider.load_country(country_code)?;
        checksum::ensure_bank_ident(&country, bank_ident)?;

        let iban = checksum::assemble_iban(&country, Bank::with_ident(bank_ident), account_number)?;

        Ok(IbanBic { iban, bic: None })
    }

    /// Valid iff MOD 97 over BBAN, country code and the real check digit is 1
    fn validate_iban(&self, iban: &str) -> Result<bool> {
        let parsed = parse_iban(self.provider.as_ref(), iban)?;
        let remainder = checksum::modulo97(
            &parsed.bban,
            parsed.country.code(),
            Some(&parsed.check_digit),
        )?;

        Ok(remainder == 1)
    }

    fn get_bic(&self, _iban: &str) -> Result<BankIdentifierCode> {
        Err(IbanError::new(IbanErrorKind::GetBicNoAllowedForCountry))
    }

    fn name(&self) -> &str {
        "default"
    }
}

// ============================================================================
// RULE MANAGER
// ============================================================================

/// RuleManager - countries whose banks carry rules (Germany)
pub struct RuleManager {
    provider: Arc<dyn DataProvider>,
}

impl RuleManager {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        RuleManager { provider }
    }

    fn regenerate(&self, iban: &str) -> Result<(Iban, IbanBic)> {
        let parsed = parse_iban(self.provider.as_ref(), iban)?;
        let generated = self.generate_iban(
            parsed.country.country_type,
            parsed.bank_ident(),
            &parsed.account_number,
        )?;

        Ok((parsed, generated))
    }
}

impl IbanManager for RuleManager {
    fn generate_iban(
        &self,
        country_code: CountryCode,
        bank_ident: &str,
        account_number: &str,
    ) -> Result<IbanBic> {
        let country = self.provider.load_country(country_code)?;

        // Checked before any rule is consulted
        checksum::ensure_bank_ident(&country, bank_ident)?;

        let bank = self.provider.load_bank(bank_ident)?;
        let rule = self.provider.load_rule(&bank.rule)?;

        let resolution =
            RuleResolver::new(self.provider.as_ref()).resolve(&bank, &rule, &country, account_number)?;

        let iban = checksum::assemble_iban(&country, resolution.bank, &resolution.account_number)?;

        Ok(IbanBic {
            iban,
            bic: resolution.bic,
        })
    }

    /// Valid iff regenerating from the parsed fields yields the same string
    fn validate_iban(&self, iban: &str) -> Result<bool> {
        let (parsed, generated) = self.regenerate(iban)?;
        let valid = generated.iban.iban == parsed.iban;

        if !valid {
            debug!(candidate = %parsed.iban, expected = %generated.iban.iban, "IBAN differs from regenerated one");
        }
        Ok(valid)
    }

    /// BIC of the resolved bank (after rule overrides)
    ///
    /// A resolved bank without BIC also fails `GetBicNoAllowedForCountry`,
    /// although the country itself supports BIC derivation.
    fn get_bic(&self, iban: &str) -> Result<BankIdentifierCode> {
        let (_, generated) = self.regenerate(iban)?;
        generated
            .bic
            .ok_or_else(|| IbanError::new(IbanErrorKind::GetBicNoAllowedForCountry))
    }

    fn name(&self) -> &str {
        "rules"
    }
}

// ============================================================================
// TESTS
// ============================================================================
