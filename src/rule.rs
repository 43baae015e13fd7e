//! Condition → conclusion rules.
//!
//! A rule pairs a set of required facts with exactly one produced fact. Rules
//! are immutable once built; changing the active rules means building a new
//! [`RuleBase`](crate::RuleBase).

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fact::Fact;
use crate::store::FactStore;

/// An immutable inference rule.
///
/// Conditions are a set: duplicates are dropped on construction (first
/// occurrence wins) while the order of first occurrence is kept for display.
/// A rule with no conditions is vacuously applicable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct Rule {
    conditions: Vec<Fact>,
    conclusion: Fact,
}

#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    conditions: Vec<String>,
    conclusion: String,
}

impl TryFrom<RawRule> for Rule {
    type Error = ValidationError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        Rule::new(raw.conditions, raw.conclusion)
    }
}

impl Rule {
    /// Builds a rule from raw identifiers, validating each one as a [`Fact`].
    pub fn new<I, S>(conditions: I, conclusion: impl Into<String>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let conditions = conditions
            .into_iter()
            .map(Fact::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_facts(conditions, Fact::new(conclusion)?))
    }

    /// Builds a rule from already validated facts.
    #[must_use]
    pub fn from_facts(conditions: impl IntoIterator<Item = Fact>, conclusion: Fact) -> Self {
        let deduped: IndexSet<Fact> = conditions.into_iter().collect();
        Self {
            conditions: deduped.into_iter().collect(),
            conclusion,
        }
    }

    /// Starts a [`RuleBuilder`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::new()
    }

    /// The distinct condition facts, in first-occurrence order.
    #[must_use]
    pub fn conditions(&self) -> &[Fact] {
        &self.conditions
    }

    /// The fact this rule produces.
    #[must_use]
    pub fn conclusion(&self) -> &Fact {
        &self.conclusion
    }

    /// Returns true iff every condition is present in `facts`.
    #[must_use]
    pub fn is_applicable(&self, facts: &FactStore) -> bool {
        self.is_applicable_in(|fact| facts.contains(fact))
    }

    /// Returns true iff `holds` accepts every condition.
    #[must_use]
    pub fn is_applicable_in(&self, holds: impl Fn(&str) -> bool) -> bool {
        self.conditions.iter().all(|c| holds(c.as_str()))
    }
}

/// Renders as `IF ['fever', 'cough'] THEN possible_flu`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IF ")?;
        write_condition_list(f, &self.conditions)?;
        write!(f, " THEN {}", self.conclusion)
    }
}

pub(crate) fn write_condition_list(f: &mut fmt::Formatter<'_>, conditions: &[Fact]) -> fmt::Result {
    f.write_str("[")?;
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "'{condition}'")?;
    }
    f.write_str("]")
}

/// Builder for [`Rule`].
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    conditions: Vec<String>,
    conclusion: Option<String>,
}

impl RuleBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required fact.
    #[must_use]
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set all required facts.
    #[must_use]
    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the produced fact.
    #[must_use]
    pub fn then(mut self, conclusion: impl Into<String>) -> Self {
        self.conclusion = Some(conclusion.into());
        self
    }

    /// Validate and build the rule.
    pub fn build(self) -> Result<Rule, ValidationError> {
        let conclusion = self.conclusion.ok_or_else(|| ValidationError::MissingField {
            field: "conclusion".to_string(),
        })?;
        Rule::new(self.conditions, conclusion)
    }
}
