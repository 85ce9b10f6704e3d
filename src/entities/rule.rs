// 🌳 Rule Tree - Country specific exceptions as data
//
// A rule owns top-level sections (no_calculation, mappings_kto, ...). Sections
// carry condition attributes and own mapping/modification children, which carry
// a pattern attribute and a leaf payload. Every node is a leaf XOR has children.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule id meaning "no special rule": inputs pass through unchanged
pub const IDENTITY_RULE_ID: &str = "000000";

/// Rule id meaning "IBAN calculation is forbidden for this bank"
pub const FORBIDDEN_RULE_ID: &str = "000100";

/// Rule, section, child: deeper trees are rejected when deserializing
pub const MAX_RULE_DEPTH: usize = 3;

// ============================================================================
// RULE TYPE
// ============================================================================

/// RuleType - tag of a rule tree node, named as in the configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Section: accounts for which no IBAN may be calculated
    NoCalculation,

    /// Child of NoCalculation: bank ident + account number range
    KtoNumberRange,

    /// Section: account number mapping, optionally moving to a new bank ident
    MappingsKto,

    /// Child: "from" pattern and replacement payload
    Mapping,

    /// Section: account number rewrites
    ModificationKto,

    /// Child of ModificationKto: bank ident condition and pattern;template payload
    Modification,

    /// Section: bank ident mapping
    MappingsBlz,

    /// Section: bank ident chosen by the first three account digits
    #[serde(rename = "mappings_ktokr")]
    MappingsKtoKr,

    /// Section: BIC overrides
    MappingsBic,
}

impl RuleType {
    pub fn tag(&self) -> &'static str {
        match self {
            RuleType::NoCalculation => "no_calculation",
            RuleType::KtoNumberRange => "kto_number_range",
            RuleType::MappingsKto => "mappings_kto",
            RuleType::Mapping => "mapping",
            RuleType::ModificationKto => "modification_kto",
            RuleType::Modification => "modification",
            RuleType::MappingsBlz => "mappings_blz",
            RuleType::MappingsKtoKr => "mappings_ktokr",
            RuleType::MappingsBic => "mappings_bic",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// RULE ELEMENT
// ============================================================================

/// Payload of a node: leaf data or ordered children, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleContent {
    Leaf(String),
    Children(Vec<RuleElement>),
}

/// RuleElement - one node of the rule tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRuleElement", into = "RawRuleElement")]
pub struct RuleElement {
    pub rule_type: RuleType,

    /// Ordered (key, value) attributes, as written in the configuration
    pub attributes: Vec<(String, String)>,

    pub content: RuleContent,
}

impl RuleElement {
    pub fn leaf(rule_type: RuleType, data: impl Into<String>) -> Self {
        RuleElement {
            rule_type,
            attributes: Vec::new(),
            content: RuleContent::Leaf(data.into()),
        }
    }

    pub fn section(rule_type: RuleType, children: Vec<RuleElement>) -> Self {
        RuleElement {
            rule_type,
            attributes: Vec::new(),
            content: RuleContent::Children(children),
        }
    }

    /// Builder pattern: append an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// First attribute value stored under `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Leaf payload, `None` for nodes with children
    pub fn data(&self) -> Option<&str> {
        match &self.content {
            RuleContent::Leaf(data) => Some(data),
            RuleContent::Children(_) => None,
        }
    }

    /// Children, empty for leaves
    pub fn children(&self) -> &[RuleElement] {
        match &self.content {
            RuleContent::Leaf(_) => &[],
            RuleContent::Children(children) => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, RuleContent::Leaf(_))
    }

    /// Tree depth, counting this node as 1
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(RuleElement::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Serialized shape: exactly one of `data` and `children` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRuleElement {
    #[serde(rename = "type")]
    rule_type: RuleType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<(String, String)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<RuleElement>>,
}

impl TryFrom<RawRuleElement> for RuleElement {
    type Error = String;

    fn try_from(raw: RawRuleElement) -> Result<Self, Self::Error> {
        let content = match (raw.data, raw.children) {
            (Some(data), None) => RuleContent::Leaf(data),
            (None, Some(children)) => RuleContent::Children(children),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "rule element '{}' has both data and children",
                    raw.rule_type
                ))
            }
            (None, None) => {
                return Err(format!(
                    "rule element '{}' has neither data nor children",
                    raw.rule_type
                ))
            }
        };

        let element = RuleElement {
            rule_type: raw.rule_type,
            attributes: raw.attributes,
            content,
        };

        // The rule itself is the top level, so an element may span one level less
        if element.depth() >= MAX_RULE_DEPTH {
            return Err(format!(
                "rule element '{}' nests deeper than {} levels",
                element.rule_type, MAX_RULE_DEPTH
            ));
        }

        Ok(element)
    }
}

impl From<RuleElement> for RawRuleElement {
    fn from(element: RuleElement) -> Self {
        let (data, children) = match element.content {
            RuleContent::Leaf(data) => (Some(data), None),
            RuleContent::Children(children) => (None, Some(children)),
        };

        RawRuleElement {
            rule_type: element.rule_type,
            attributes: element.attributes,
            data,
            children,
        }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// Rule - id plus ordered top-level sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,

    #[serde(default)]
    pub elements: Vec<RuleElement>,
}

impl Rule {
    pub fn new(id: impl Into<String>, elements: Vec<RuleElement>) -> Self {
        Rule {
            id: id.into(),
            elements,
        }
    }

    pub fn identity() -> Self {
        Rule::new(IDENTITY_RULE_ID, Vec::new())
    }

    pub fn forbidden() -> Self {
        Rule::new(FORBIDDEN_RULE_ID, Vec::new())
    }

    pub fn is_identity(&self) -> bool {
        self.id == IDENTITY_RULE_ID
    }

    pub fn is_forbidden(&self) -> bool {
        self.id == FORBIDDEN_RULE_ID
    }

    /// Top-level sections of the given type, in document order
    pub fn sections(&self, rule_type: RuleType) -> impl Iterator<Item = &RuleElement> {
        self.elements
            .iter()
            .filter(move |element| element.rule_type == rule_type)
    }
}

// ============================================================================
// TESTS
// ============================================================================
