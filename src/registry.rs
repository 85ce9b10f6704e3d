// 🗂️ Manager Registry - Country code → manager, built once at startup
//
// Entry points for callers: generate_iban, validate_iban, get_bic.
// Countries without a registered manager fall back to the default manager.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::IbanConfig;
use crate::entities::{BankIdentifierCode, CountryCode, IbanBic};
use crate::error::{IbanError, IbanErrorKind, Result};
use crate::manager::{DefaultManager, IbanManager, RuleManager};
use crate::provider::{DataProvider, StaticDataProvider};

pub struct ManagerRegistry {
    default: Arc<dyn IbanManager>,
    managers: HashMap<CountryCode, Arc<dyn IbanManager>>,
}

impl ManagerRegistry {
    /// Create a registry that serves every country with `default`
    pub fn new(default: Arc<dyn IbanManager>) -> Self {
        ManagerRegistry {
            default,
            managers: HashMap::new(),
        }
    }

    /// Build managers for a configuration document
    ///
    /// All managers share one in-memory provider. Countries listed in
    /// `rule_countries` get a RuleManager, all others the DefaultManager.
    pub fn from_config(config: &IbanConfig) -> Self {
        let provider: Arc<dyn DataProvider> = Arc::new(StaticDataProvider::from_config(config));
        let rule_manager: Arc<dyn IbanManager> = Arc::new(RuleManager::new(Arc::clone(&provider)));

        let mut registry = Self::new(Arc::new(DefaultManager::new(provider)));
        for country_code in &config.rule_countries {
            registry.register(*country_code, Arc::clone(&rule_manager));
        }

        registry
    }

    pub fn register(&mut self, country_code: CountryCode, manager: Arc<dyn IbanManager>) {
        self.managers.insert(country_code, manager);
    }

    /// Manager registered for the country, or the default one
    pub fn manager_for(&self, country_code: CountryCode) -> &dyn IbanManager {
        self.managers
            .get(&country_code)
            .unwrap_or(&self.default)
            .as_ref()
    }

    /// Dispatch on the first two characters of an IBAN string
    fn manager_for_iban(&self, iban: &str) -> &dyn IbanManager {
        let manager = match iban.get(0..2).and_then(|code| code.parse::<CountryCode>().ok()) {
            Some(country_code) => self.manager_for(country_code),
            None => self.default.as_ref(),
        };

        debug!(manager = manager.name(), "Dispatching IBAN");
        manager
    }

    // ========================================================================
    // ENTRY POINTS
    // ========================================================================

    pub fn generate_iban(
        &self,
        country_code: CountryCode,
        bank_ident: &str,
        account_number: &str,
    ) -> Result<IbanBic> {
        self.manager_for(country_code)
            .generate_iban(country_code, bank_ident, account_number)
    }

    /// # Errors
    /// * `IbanValidationIbanNeeded` - `iban` is empty or blank
    /// * `IbanValidatingFormatting` - `iban` does not fit the country's layout
    pub fn validate_iban(&self, iban: &str) -> Result<bool> {
        ensure_iban_given(iban)?;
        self.manager_for_iban(iban).validate_iban(iban)
    }

    pub fn get_bic(&self, iban: &str) -> Result<BankIdentifierCode> {
        ensure_iban_given(iban)?;
        self.manager_for_iban(iban).get_bic(iban)
    }
}

fn ensure_iban_given(iban: &str) -> Result<()> {
    if iban.trim().is_empty() {
        return Err(IbanError::new(IbanErrorKind::IbanValidationIbanNeeded));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn registry() -> ManagerRegistry {
        ManagerRegistry::from_config(&fixtures::config())
    }

    #[test]
    fn test_dispatch_by_country() {
        let registry = registry();

        assert_eq!(registry.manager_for(CountryCode::DE).name(), "rules");
        assert_eq!(registry.manager_for(CountryCode::AT).name(), "default");
        assert_eq!(registry.manager_for(CountryCode::FR).name(), "default");
    }

    #[test]
    fn test_generate_dispatches() {
        let registry = registry();

        let german = registry.generate_iban(CountryCode::DE, "37040044", "532013000").unwrap();
        assert_eq!(german.iban.iban, "DE89370400440532013000");
        assert!(german.bic.is_some());

        let austrian = registry.generate_iban(CountryCode::AT, "19043", "234573201").unwrap();
        assert_eq!(austrian.iban.iban, "AT611904300234573201");
        assert!(austrian.bic.is_none());
    }

    #[test]
    fn test_empty_input_needs_iban() {
        let registry = registry();

        for candidate in ["", "   "] {
            assert_eq!(
                registry.validate_iban(candidate).unwrap_err().kind(),
                IbanErrorKind::IbanValidationIbanNeeded
            );
            assert_eq!(
                registry.get_bic(candidate).unwrap_err().kind(),
                IbanErrorKind::IbanValidationIbanNeeded
            );
        }
    }

    #[test]
    fn test_validate_dispatches_by_prefix() {
        let registry = registry();

        assert!(registry.validate_iban("DE89370400440532013000").unwrap());
        assert!(!registry.validate_iban("DE24170200000000012345").unwrap());
        assert!(registry.validate_iban("AT611904300234573201").unwrap());
    }

    #[test]
    fn test_unknown_prefix_fails_formatting() {
        let registry = registry();

        let err = registry.validate_iban("ZZ89370400440532013000").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::IbanValidatingFormatting);

        let err = registry.validate_iban("D").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::IbanValidatingFormatting);
    }

    #[test]
    fn test_get_bic() {
        let registry = registry();

        assert_eq!(
            registry.get_bic("DE42100500000005555555").unwrap().as_str(),
            "BELADEBEXXX"
        );
        assert_eq!(
            registry.get_bic("AT611904300234573201").unwrap_err().kind(),
            IbanErrorKind::GetBicNoAllowedForCountry
        );
    }

    #[test]
    fn test_register_overrides_default() {
        let mut registry = registry();
        let provider: Arc<dyn DataProvider> = Arc::new(fixtures::provider());
        registry.register(CountryCode::AT, Arc::new(RuleManager::new(provider)));

        assert_eq!(registry.manager_for(CountryCode::AT).name(), "rules");
    }
}
