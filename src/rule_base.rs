//! Ordered rule base.
//!
//! Rule order only decides the scan order within a pass (and therefore the
//! order of firing events), never the final fixed point. A rule base is an
//! immutable value: callers switching domains build a new one and swap it in.

use std::fmt;
use std::sync::Arc;

use blake3::Hasher;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fact::Fact;
use crate::rule::Rule;

/// 1-based position of a rule within its rule base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RuleId(usize);

impl RuleId {
    /// Creates an id from a 1-based position. Returns `None` for zero.
    #[must_use]
    pub const fn new(position: usize) -> Option<Self> {
        if position == 0 {
            None
        } else {
            Some(Self(position))
        }
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// The 1-based position.
    #[must_use]
    pub const fn position(self) -> usize {
        self.0
    }

    /// Node name used by graph exports (`Rule_1`, `Rule_2`, ...).
    #[must_use]
    pub fn node_name(self) -> String {
        format!("Rule_{}", self.0)
    }
}

impl TryFrom<usize> for RuleId {
    type Error = ValidationError;

    fn try_from(position: usize) -> Result<Self, Self::Error> {
        Self::new(position).ok_or(ValidationError::InvalidRuleId { position })
    }
}

impl From<RuleId> for usize {
    fn from(id: RuleId) -> Self {
        id.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a rule base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleBaseFingerprint([u8; 32]);

impl RuleBaseFingerprint {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RuleBaseFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Immutable, cheaply clonable sequence of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBase {
    rules: Arc<[Rule]>,
}

impl Default for RuleBase {
    fn default() -> Self {
        Self::empty()
    }
}

impl RuleBase {
    /// Creates a rule base preserving the given order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: rules.into(),
        }
    }

    /// A rule base with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by its 1-based id.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        id.0.checked_sub(1).and_then(|i| self.rules.get(i))
    }

    /// Iterates rules in scan order together with their ids.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (RuleId, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_index(i), rule))
    }

    /// The rules as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    /// Appends `other` after `self`, keeping both orders.
    #[must_use]
    pub fn concat(&self, other: &RuleBase) -> Self {
        let mut rules = Vec::with_capacity(self.len() + other.len());
        rules.extend_from_slice(&self.rules);
        rules.extend_from_slice(&other.rules);
        Self::new(rules)
    }

    /// Distinct conclusion facts, in rule order.
    ///
    /// Its size bounds the number of firings in any single run.
    #[must_use]
    pub fn conclusions(&self) -> IndexSet<Fact> {
        self.rules.iter().map(|r| r.conclusion().clone()).collect()
    }

    /// Stable content hash over rule order, conditions and conclusions.
    #[must_use]
    pub fn fingerprint(&self) -> RuleBaseFingerprint {
        let mut h = Hasher::new();
        h.update(&(self.rules.len() as u64).to_le_bytes());
        for rule in self.rules.iter() {
            h.update(&(rule.conditions().len() as u64).to_le_bytes());
            for condition in rule.conditions() {
                hash_str(&mut h, condition.as_str());
            }
            hash_str(&mut h, rule.conclusion().as_str());
        }
        RuleBaseFingerprint(*h.finalize().as_bytes())
    }
}

fn hash_str(h: &mut Hasher, s: &str) {
    h.update(&(s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

impl From<Vec<Rule>> for RuleBase {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<Rule> for RuleBase {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for RuleBase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleBase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Rule>::deserialize(deserializer).map(Self::new)
    }
}
