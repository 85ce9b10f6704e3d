// 🏷️ Rule Resolution - Ordered cascade of bank/account rewrites
//
// Before a checksum is computed, a bank's rule may forbid the calculation,
// map legacy account numbers, move accounts to a merged bank or override the BIC.
// Stages run in a fixed order; every stage is tried and sees earlier rewrites.

use tracing::{debug, warn};

use crate::entities::{Bank, BankIdentifierCode, Country, Rule, RuleElement, RuleType};
use crate::error::{IbanError, IbanErrorKind, Result};
use crate::pattern;
use crate::provider::DataProvider;

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Outcome of the cascade: the bank to build the BBAN from, the rewritten
/// account number (not yet padded) and the BIC to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub bank: Bank,
    pub account_number: String,
    pub bic: Option<BankIdentifierCode>,
}

/// A matching mapping: the section it belongs to and the child's leaf payload
#[derive(Debug, Clone, Copy)]
struct Hit<'r> {
    section: &'r RuleElement,
    payload: &'r str,
}

// ============================================================================
// RULE RESOLVER
// ============================================================================

/// RuleResolver - stateless, borrows the provider for bank reloads
pub struct RuleResolver<'a> {
    provider: &'a dyn DataProvider,
}

impl<'a> RuleResolver<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        RuleResolver { provider }
    }

    /// Apply `rule` to the bank ident and account number
    ///
    /// # Errors
    /// * `NoCalculation` - the rule forbids an IBAN for this account
    /// * `IbanGeneratingError` - a pattern in the rule does not compile
    /// * `DataLoadFailure` - a mapped bank ident is unknown to the provider
    pub fn resolve(
        &self,
        bank: &Bank,
        rule: &Rule,
        country: &Country,
        account_number: &str,
    ) -> Result<Resolution> {
        let original_ident = bank.bank_ident.as_str();

        // 1. Identity: inputs pass through untouched
        if rule.is_identity() {
            return Ok(Resolution {
                bank: bank.clone(),
                account_number: account_number.to_string(),
                bic: bank.bic.clone(),
            });
        }

        // 2. Forbidden for the whole bank
        if rule.is_forbidden() {
            debug!(rule = %rule.id, bank = original_ident, "Rule forbids IBAN calculation");
            return Err(IbanError::new(IbanErrorKind::NoCalculation));
        }

        let mut bank_ident = original_ident.to_string();
        let mut account = account_number.trim_start_matches('0').to_string();
        let mut bic = bank.bic.clone();

        // 4. No-calculation ranges
        let excluded = find_first(
            rule,
            RuleType::NoCalculation,
            RuleType::KtoNumberRange,
            |_| Ok(true),
            |range| {
                Ok(attribute_matches(range, "blz", &bank_ident)?
                    && data_matches(range, &account)?)
            },
        )?;
        if excluded.is_some() {
            debug!(rule = %rule.id, bank = %bank_ident, account = %account, "Account is in a no-calculation range");
            return Err(IbanError::new(IbanErrorKind::NoCalculation));
        }

        // 5. Account mapping, optionally moving to a new bank ident
        let kto_mapping = find_first(
            rule,
            RuleType::MappingsKto,
            RuleType::Mapping,
            |section| attribute_matches(section, "blz", original_ident),
            |mapping| attribute_matches(mapping, "from", &account),
        )?;
        if let Some(hit) = kto_mapping {
            debug!(rule = %rule.id, from = %account, to = hit.payload, "Account number mapped");
            account = hit.payload.to_string();

            if let Some(blz_new) = hit.section.attribute("blz_new") {
                bank_ident = blz_new.to_string();
                bic = self.reload_bic(&bank_ident)?;
            }
        }

        // 6. Bank ident chosen by the first three account digits
        let prefix = account.get(..3).map(str::to_string);
        let ktokr_mapping = match prefix {
            Some(prefix) => find_first(
                rule,
                RuleType::MappingsKtoKr,
                RuleType::Mapping,
                |section| attribute_matches(section, "kto", &account),
                |mapping| Ok(mapping.attribute("from") == Some(prefix.as_str())),
            )?,
            None => None,
        };
        if let Some(hit) = ktokr_mapping {
            debug!(rule = %rule.id, from = %bank_ident, to = hit.payload, "Bank ident mapped by account prefix");
            bank_ident = hit.payload.to_string();
            bic = self.reload_bic(&bank_ident)?;
        }

        // 7. Bank ident mapping
        let blz_mapping = find_first(
            rule,
            RuleType::MappingsBlz,
            RuleType::Mapping,
            |_| Ok(true),
            |mapping| attribute_matches(mapping, "from", &bank_ident),
        )?;
        if let Some(hit) = blz_mapping {
            debug!(rule = %rule.id, from = %bank_ident, to = hit.payload, "Bank ident mapped");
            bank_ident = hit.payload.to_string();
            bic = self.reload_bic(&bank_ident)?;
        }

        // 8. Account number modification via pattern;template
        let modification = find_first(
            rule,
            RuleType::ModificationKto,
            RuleType::Modification,
            |_| Ok(true),
            |modification| {
                Ok(attribute_matches(modification, "blz", &bank_ident)?
                    && data_matches(modification, &account)?)
            },
        )?;
        if let Some(hit) = modification {
            let modified = pattern::match_and_substitute(hit.payload, &account)
                .map_err(|e| IbanError::with_cause(IbanErrorKind::IbanGeneratingError, e))?
                .unwrap_or_default();
            debug!(rule = %rule.id, from = %account, to = %modified, "Account number modified");
            account = modified;
        }

        // 9. BIC override, keyed by the bank ident before any mapping
        let bic_mapping = find_first(
            rule,
            RuleType::MappingsBic,
            RuleType::Mapping,
            |_| Ok(true),
            |mapping| attribute_matches(mapping, "blz", original_ident),
        )?;
        if let Some(hit) = bic_mapping {
            debug!(rule = %rule.id, bank = original_ident, bic = hit.payload, "BIC overridden");
            bic = Some(BankIdentifierCode::new(hit.payload));
        }

        // 10. Canonical record of the final bank
        let bank = if bank_ident != original_ident {
            debug!(from = original_ident, to = %bank_ident, "Reloading mapped bank");
            self.provider.load_bank(&bank_ident)?
        } else {
            bank.clone()
        };

        debug!(
            rule = %rule.id,
            country = country.code(),
            bank = %bank.bank_ident,
            account = %account,
            "Rule resolved"
        );

        Ok(Resolution {
            bank,
            account_number: account,
            bic,
        })
    }

    fn reload_bic(&self, bank_ident: &str) -> Result<Option<BankIdentifierCode>> {
        Ok(self.provider.load_bank(bank_ident)?.bic)
    }
}

// ============================================================================
// MATCHING HELPERS
// ============================================================================

/// First (section, child) pair in document order satisfying both predicates
///
/// Only leaf children of `child_type` are considered. More than one candidate
/// is a configuration ambiguity: it is logged and the first one wins.
fn find_first<'r, S, C>(
    rule: &'r Rule,
    section_type: RuleType,
    child_type: RuleType,
    section_matches: S,
    child_matches: C,
) -> Result<Option<Hit<'r>>>
where
    S: Fn(&RuleElement) -> Result<bool>,
    C: Fn(&RuleElement) -> Result<bool>,
{
    let mut first: Option<Hit<'r>> = None;
    let mut candidates = 0usize;

    for section in rule.sections(section_type) {
        if !section_matches(section)? {
            continue;
        }

        for child in section.children().iter().filter(|c| c.rule_type == child_type) {
            let Some(payload) = child.data() else {
                warn!(rule = %rule.id, section = %section_type, "Skipping {} without leaf data", child_type);
                continue;
            };

            if child_matches(child)? {
                candidates += 1;
                if first.is_none() {
                    first = Some(Hit { section, payload });
                }
            }
        }
    }

    if candidates > 1 {
        warn!(
            rule = %rule.id,
            section = %section_type,
            candidates,
            "Ambiguous rule configuration, taking the first match"
        );
    }

    Ok(first)
}

/// Whole-value match of `value` against the pattern stored under `key`
///
/// An element without that attribute never matches.
fn attribute_matches(element: &RuleElement, key: &str, value: &str) -> Result<bool> {
    match element.attribute(key) {
        Some(pattern) => whole_match(pattern, value),
        None => {
            warn!(element = %element.rule_type, attribute = key, "Rule element lacks attribute");
            Ok(false)
        }
    }
}

fn data_matches(element: &RuleElement, value: &str) -> Result<bool> {
    match element.data() {
        Some(pattern) => whole_match(pattern, value),
        None => Ok(false),
    }
}

fn whole_match(pattern: &str, value: &str) -> Result<bool> {
    pattern::matches(pattern, value)
        .map_err(|e| IbanError::with_cause(IbanErrorKind::IbanGeneratingError, e))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::provider::StaticDataProvider;

    fn resolve(provider: &StaticDataProvider, bank_ident: &str, account: &str) -> Result<Resolution> {
        let bank = provider.load_bank(bank_ident)?;
        let rule = provider.load_rule(&bank.rule)?;
        RuleResolver::new(provider).resolve(&bank, &rule, &fixtures::germany(), account)
    }

    fn bic(resolution: &Resolution) -> Option<&str> {
        resolution.bic.as_ref().map(|b| b.as_str())
    }

    #[test]
    fn test_identity_rule_passes_inputs_through() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "37040044", "0532013000").unwrap();

        // Leading zeros are only stripped once rules apply
        assert_eq!(resolution.account_number, "0532013000");
        assert_eq!(resolution.bank.bank_ident, "37040044");
        assert_eq!(bic(&resolution), Some("COBADEFFXXX"));
    }

    #[test]
    fn test_forbidden_rule() {
        let provider = fixtures::provider();
        let err = resolve(&provider, "50010517", "1234567890").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::NoCalculation);
    }

    #[test]
    fn test_no_calculation_range() {
        let provider = fixtures::provider();

        let err = resolve(&provider, "37050198", "0009123456").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::NoCalculation);

        let resolution = resolve(&provider, "37050198", "1234567").unwrap();
        assert_eq!(resolution.account_number, "1234567");
        assert_eq!(bic(&resolution), Some("COLSDE33XXX"));
    }

    #[test]
    fn test_account_mapping() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "17020000", "00012345").unwrap();

        assert_eq!(resolution.account_number, "67890");
        assert_eq!(resolution.bank.bank_ident, "17020000");
        assert_eq!(bic(&resolution), Some("TESTDE81XXX"));
    }

    #[test]
    fn test_account_mapping_without_match_strips_zeros() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "17020000", "0000054321").unwrap();
        assert_eq!(resolution.account_number, "54321");
    }

    #[test]
    fn test_account_mapping_with_new_bank_ident() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "10020000", "9999").unwrap();

        assert_eq!(resolution.account_number, "5555555");
        assert_eq!(resolution.bank.bank_ident, "10050000");
        assert_eq!(resolution.bank.name, "Landesbank Berlin");
        assert_eq!(bic(&resolution), Some("BELADEBEXXX"));
    }

    #[test]
    fn test_account_mapping_to_unknown_bank() {
        let provider = fixtures::provider();
        let err = resolve(&provider, "60050101", "1").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::DataLoadFailure);
    }

    #[test]
    fn test_prefix_mapping() {
        let provider = fixtures::provider();

        let resolution = resolve(&provider, "12030000", "1234567").unwrap();
        assert_eq!(resolution.bank.bank_ident, "12070000");
        assert_eq!(resolution.account_number, "1234567");
        assert_eq!(bic(&resolution), Some("TESTDEBBXXX"));

        let unmapped = resolve(&provider, "12030000", "4564567").unwrap();
        assert_eq!(unmapped.bank.bank_ident, "12030000");
        assert_eq!(bic(&unmapped), Some("TESTDEB1XXX"));
    }

    #[test]
    fn test_prefix_mapping_short_account() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "12030000", "12").unwrap();
        assert_eq!(resolution.bank.bank_ident, "12030000");
    }

    #[test]
    fn test_bank_ident_mapping_and_bic_override() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "20010020", "1234567890").unwrap();

        assert_eq!(resolution.bank.bank_ident, "20030000");
        // The override is keyed by the pre-mapping ident and beats the reloaded BIC
        assert_eq!(bic(&resolution), Some("TESTDEHH200"));
        assert_eq!(
            resolution.bank.bic.as_ref().map(|b| b.as_str()),
            Some("HYVEDEMM300")
        );
    }

    #[test]
    fn test_account_modification() {
        let provider = fixtures::provider();

        let resolution = resolve(&provider, "30010000", "0000123456").unwrap();
        assert_eq!(resolution.account_number, "12345600");

        let untouched = resolve(&provider, "30010000", "1234567").unwrap();
        assert_eq!(untouched.account_number, "1234567");
    }

    #[test]
    fn test_ambiguous_sections_take_first() {
        let provider = fixtures::provider();
        let resolution = resolve(&provider, "70020270", "1234567890").unwrap();

        assert_eq!(resolution.bank.bank_ident, "20030000");
        assert_eq!(bic(&resolution), Some("HYVEDEMM300"));
    }

    #[test]
    fn test_broken_pattern_fails_generation() {
        let provider = fixtures::provider();
        let err = resolve(&provider, "81000000", "1234567890").unwrap_err();
        assert_eq!(err.kind(), IbanErrorKind::IbanGeneratingError);
    }

    #[test]
    fn test_stages_chain_in_order() {
        // Account mapping feeds the prefix mapping, whose bank feeds the modification
        let mut provider = fixtures::provider();
        provider.register_bank(Bank::new(
            "40010000".to_string(),
            "Chain Bank".to_string(),
            "000950".to_string(),
        ).with_bic("CHAINDEXXXX"));
        provider.register_bank(Bank::with_ident("40020000").with_bic("CHAINDE2XXX"));
        provider.register_rule(Rule::new(
            "000950",
            vec![
                RuleElement::section(
                    RuleType::MappingsKto,
                    vec![RuleElement::leaf(RuleType::Mapping, "7771234").with_attribute("from", "^42$")],
                )
                .with_attribute("blz", "^40010000$"),
                RuleElement::section(
                    RuleType::MappingsKtoKr,
                    vec![RuleElement::leaf(RuleType::Mapping, "40020000").with_attribute("from", "777")],
                )
                .with_attribute("kto", r"^\d{7}$"),
                RuleElement::section(
                    RuleType::ModificationKto,
                    vec![RuleElement::leaf(RuleType::Modification, r"^777(\d{4})$;$19")
                        .with_attribute("blz", "^40020000$")],
                ),
            ],
        ));

        let resolution = resolve(&provider, "40010000", "42").unwrap();
        assert_eq!(resolution.bank.bank_ident, "40020000");
        assert_eq!(resolution.account_number, "12349");
        assert_eq!(bic(&resolution), Some("CHAINDE2XXX"));
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let mut provider = StaticDataProvider::new();
        provider.register_bank(Bank::new(
            "40030000".to_string(),
            "No Attr Bank".to_string(),
            "000960".to_string(),
        ));
        provider.register_rule(Rule::new(
            "000960",
            vec![RuleElement::section(
                RuleType::MappingsKto,
                vec![RuleElement::leaf(RuleType::Mapping, "1")],
            )],
        ));

        let resolution = resolve(&provider, "40030000", "42").unwrap();
        assert_eq!(resolution.account_number, "42");
        assert_eq!(resolution.bank.bank_ident, "40030000");
    }

    fn register_bank_on_rule(provider: &mut StaticDataProvider, bank_ident: &str, rule_id: &str) {
        provider.register_bank(Bank::new(
            bank_ident.to_string(),
            format!("Bank {}", bank_ident),
            rule_id.to_string(),
        ));
    }

    #[test]
    fn test_no_calculation_range_is_bank_specific() {
        let mut provider = fixtures::provider();
        register_bank_on_rule(&mut provider, "37050299", "000700");

        let resolution = resolve(&provider, "37050299", "9123456").unwrap();
        assert_eq!(resolution.account_number, "9123456");
        assert_eq!(resolution.bank.bank_ident, "37050299");
    }

    #[test]
    fn test_account_mapping_requires_section_bank_ident() {
        let mut provider = fixtures::provider();
        register_bank_on_rule(&mut provider, "17020099", "000200");

        let resolution = resolve(&provider, "17020099", "12345").unwrap();
        assert_eq!(resolution.account_number, "12345");
        assert_eq!(resolution.bank.bank_ident, "17020099");
    }

    #[test]
    fn test_prefix_mapping_requires_account_pattern() {
        let provider = fixtures::provider();

        // Prefix "123" fits the mapping, but eight digits fail the section's kto
        let resolution = resolve(&provider, "12030000", "12345678").unwrap();
        assert_eq!(resolution.bank.bank_ident, "12030000");
        assert_eq!(bic(&resolution), Some("TESTDEB1XXX"));
    }

    #[test]
    fn test_account_modification_requires_bank_ident() {
        let mut provider = fixtures::provider();
        register_bank_on_rule(&mut provider, "30010099", "000600");

        let resolution = resolve(&provider, "30010099", "123456").unwrap();
        assert_eq!(resolution.account_number, "123456");
    }

    #[test]
    fn test_bic_override_beats_account_mapping_reload() {
        let mut provider = fixtures::provider();
        register_bank_on_rule(&mut provider, "40040000", "000970");
        provider.register_rule(Rule::new(
            "000970",
            vec![
                RuleElement::section(
                    RuleType::MappingsKto,
                    vec![RuleElement::leaf(RuleType::Mapping, "7777777").with_attribute("from", "^77$")],
                )
                .with_attribute("blz", "^40040000$")
                .with_attribute("blz_new", "10050000"),
                RuleElement::section(
                    RuleType::MappingsBic,
                    vec![RuleElement::leaf(RuleType::Mapping, "OVERDEB1XXX").with_attribute("blz", "^40040000$")],
                ),
            ],
        ));

        let resolution = resolve(&provider, "40040000", "77").unwrap();
        assert_eq!(resolution.bank.bank_ident, "10050000");
        assert_eq!(resolution.account_number, "7777777");
        assert_eq!(bic(&resolution), Some("OVERDEB1XXX"));
        assert_eq!(
            resolution.bank.bic.as_ref().map(|b| b.as_str()),
            Some("BELADEBEXXX")
        );
    }

    #[test]
    fn test_bic_override_beats_prefix_mapping_reload() {
        let mut provider = fixtures::provider();
        register_bank_on_rule(&mut provider, "40050000", "000980");
        provider.register_rule(Rule::new(
            "000980",
            vec![
                RuleElement::section(
                    RuleType::MappingsKtoKr,
                    vec![RuleElement::leaf(RuleType::Mapping, "12070000").with_attribute("from", "555")],
                )
                .with_attribute("kto", r"^\d{7}$"),
                RuleElement::section(
                    RuleType::MappingsBic,
                    vec![RuleElement::leaf(RuleType::Mapping, "OVERDEB2XXX").with_attribute("blz", "^40050000$")],
                ),
            ],
        ));

        let resolution = resolve(&provider, "40050000", "5551234").unwrap();
        assert_eq!(resolution.bank.bank_ident, "12070000");
        assert_eq!(bic(&resolution), Some("OVERDEB2XXX"));
        assert_eq!(
            resolution.bank.bic.as_ref().map(|b| b.as_str()),
            Some("TESTDEBBXXX")
        );
    }
}
