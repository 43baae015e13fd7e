//! Rule base configuration by domain.
//!
//! Rules are grouped under domain tags. Selecting a domain builds a fresh
//! [`RuleBase`] that the caller swaps into its knowledge base; the engine
//! never knows which domain it is running.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rule::Rule;
use crate::rule_base::RuleBase;

/// Tag of the respiratory rule group.
pub const RESPIRATORY: &str = "respiratory";
/// Tag of the cardiac rule group.
pub const CARDIAC: &str = "cardiac";

/// Domain selection for the bundled medical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Flu, COVID and cold rules.
    Respiratory,
    /// Heart attack rules.
    Cardiac,
    /// Respiratory rules followed by cardiac rules.
    #[default]
    Both,
}

impl Domain {
    /// Every selectable domain.
    pub const ALL: [Domain; 3] = [Domain::Respiratory, Domain::Cardiac, Domain::Both];

    /// Catalog tags this domain activates, in rule-base order.
    #[must_use]
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Respiratory => &[RESPIRATORY],
            Self::Cardiac => &[CARDIAC],
            Self::Both => &[RESPIRATORY, CARDIAC],
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Respiratory => "respiratory",
            Self::Cardiac => "cardiac",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownDomain {
                name: wanted.to_string(),
                expected: Self::ALL.map(Domain::name).join(", "),
            })
    }
}

/// Rule groups keyed by domain tag, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DomainCatalog {
    groups: IndexMap<String, Vec<Rule>>,
}

impl DomainCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends rules to the group `tag`, creating it if needed.
    pub fn register(&mut self, tag: impl Into<String>, rules: impl IntoIterator<Item = Rule>) {
        self.groups.entry(tag.into()).or_default().extend(rules);
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().map(String::as_str)
    }

    /// Builds a rule base from the selected groups.
    ///
    /// Groups appear in the order given by `tags`; a tag listed twice is only
    /// included once.
    pub fn select<S: AsRef<str>>(&self, tags: &[S]) -> Result<RuleBase, ValidationError> {
        let mut seen: Vec<&str> = Vec::with_capacity(tags.len());
        let mut rules = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            if seen.contains(&tag) {
                continue;
            }
            let group = self.groups.get(tag).ok_or_else(|| ValidationError::UnknownDomain {
                name: tag.to_string(),
                expected: self.tags().collect::<Vec<_>>().join(", "),
            })?;
            seen.push(tag);
            rules.extend(group.iter().cloned());
        }
        Ok(RuleBase::new(rules))
    }

    /// Builds the rule base for a [`Domain`].
    pub fn for_domain(&self, domain: Domain) -> Result<RuleBase, ValidationError> {
        self.select(domain.tags())
    }
}

/// The bundled medical diagnosis rules.
pub fn medical_catalog() -> Result<DomainCatalog, ValidationError> {
    let mut catalog = DomainCatalog::new();
    catalog.register(
        RESPIRATORY,
        [
            Rule::new(["fever", "cough"], "possible_flu")?,
            Rule::new(["body_aches", "possible_flu"], "diagnose_flu")?,
            Rule::new(["fever", "loss_of_taste"], "possible_covid")?,
            Rule::new(["cough", "loss_of_taste"], "possible_covid")?,
            Rule::new(["sore_throat", "runny_nose"], "possible_cold")?,
            Rule::new(["possible_covid", "loss_of_taste"], "diagnose_covid")?,
            Rule::new(["possible_cold", "mild_fever"], "diagnose_cold")?,
        ],
    );
    catalog.register(
        CARDIAC,
        [
            Rule::new(
                ["chest_pain", "shortness_of_breath", "diaphoresis"],
                "possible_heart_attack",
            )?,
            Rule::new(["possible_heart_attack", "nausea"], "diagnose_heart_attack")?,
        ],
    );
    Ok(catalog)
}

/// Rule base of the bundled medical rules for `domain`.
pub fn medical_rules(domain: Domain) -> Result<RuleBase, ValidationError> {
    medical_catalog()?.for_domain(domain)
}
