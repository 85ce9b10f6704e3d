// 🔍 Pattern Matcher - Whole-value regex checks and REGEX;TEMPLATE substitution
//
// Patterns come straight from configuration. A pattern may carry a substitution
// template after ';' - e.g. "^(\d{6})$;$100" appends "00" to a six digit value.

use regex::{Captures, Regex};
use std::sync::OnceLock;

const WORD_BOUNDARY: &str = r"\b";
const END_OF_TEXT: &str = r"\z";
const END_OF_TEXT_LEGACY: &str = r"\Z";

// ============================================================================
// PATTERN
// ============================================================================

/// A configuration pattern split into its regex and optional template
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern<'a> {
    regex: &'a str,
    template: Option<String>,
}

impl<'a> Pattern<'a> {
    fn parse(pattern: &'a str) -> Self {
        let mut parts = pattern.split(';');
        let regex = parts.next().unwrap_or_default();
        let template = parts.next().map(bound_group_references);

        Pattern { regex, template }
    }

    /// Regex anchored so that it has to cover the whole value
    fn anchored(&self) -> String {
        let mut anchored = String::with_capacity(self.regex.len() + 4);

        if !self.regex.starts_with(WORD_BOUNDARY) {
            anchored.push_str(WORD_BOUNDARY);
        }

        if let Some(stripped) = self.regex.strip_suffix(END_OF_TEXT_LEGACY) {
            anchored.push_str(stripped);
            anchored.push_str(END_OF_TEXT);
        } else {
            anchored.push_str(self.regex);
            if !self.regex.ends_with(END_OF_TEXT) {
                anchored.push_str(END_OF_TEXT);
            }
        }

        anchored
    }
}

/// Rewrite `$N` to `${N}` so "$100" means group 1 followed by "00", not group 100
fn bound_group_references(template: &str) -> String {
    static GROUP_REF: OnceLock<Regex> = OnceLock::new();
    let group_ref = GROUP_REF.get_or_init(|| Regex::new(r"\$(\d)").expect("static regex"));

    group_ref
        .replace_all(template, |caps: &Captures| format!("${{{}}}", &caps[1]))
        .into_owned()
}

// ============================================================================
// MATCHING
// ============================================================================

/// Check whether `value` as a whole matches `pattern`
///
/// The regex part is anchored with a leading `\b` and a trailing end-of-text
/// anchor unless it already carries them. A template after ';' is ignored.
pub fn matches(pattern: &str, value: &str) -> Result<bool, regex::Error> {
    let regex = Regex::new(&Pattern::parse(pattern).anchored())?;
    Ok(regex.is_match(value))
}

/// Match `value` against `pattern` and apply its template to every match
///
/// Returns `None` when the pattern does not match. The regex is used as written,
/// without anchoring. A pattern without template yields an empty replacement.
pub fn match_and_substitute(pattern: &str, value: &str) -> Result<Option<String>, regex::Error> {
    let pattern = Pattern::parse(pattern);
    let regex = Regex::new(pattern.regex)?;

    if !regex.is_match(value) {
        return Ok(None);
    }

    let replacement = match pattern.template.as_deref() {
        Some(template) if !template.trim().is_empty() => {
            regex.replace_all(value, template).into_owned()
        }
        _ => String::new(),
    };

    Ok(Some(replacement))
}

// ============================================================================
// TESTS
// ============================================================================
