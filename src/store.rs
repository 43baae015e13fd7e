//! Fact store.
//!
//! An insertion-ordered, duplicate-free set of facts. The store is populated
//! by the caller before a run, grows monotonically while the engine runs and
//! is only ever cleared wholesale.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::fact::Fact;

/// Independent, insertion-ordered copy of a fact set.
pub type FactSet = IndexSet<Fact>;

/// Returns the facts in `current` that are absent from `initial`, in the
/// order they were added.
#[must_use]
pub fn newly_derived(initial: &FactSet, current: &FactSet) -> FactSet {
    current
        .iter()
        .filter(|fact| !initial.contains(*fact))
        .cloned()
        .collect()
}

/// The working memory the engine derives into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactStore {
    facts: FactSet,
}

impl FactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fact. Returns `false` if it was already present.
    pub fn add(&mut self, fact: Fact) -> bool {
        self.facts.insert(fact)
    }

    /// Returns true if the fact is present.
    #[must_use]
    pub fn contains(&self, fact: &str) -> bool {
        self.facts.contains(fact)
    }

    /// Removes every fact.
    pub fn reset(&mut self) {
        self.facts.clear();
    }

    /// Returns an independent copy of the current facts.
    #[must_use]
    pub fn snapshot(&self) -> FactSet {
        self.facts.clone()
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the store holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.facts.iter()
    }
}

impl Extend<Fact> for FactStore {
    fn extend<I: IntoIterator<Item = Fact>>(&mut self, iter: I) {
        self.facts.extend(iter);
    }
}

impl FromIterator<Fact> for FactStore {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

impl From<FactSet> for FactStore {
    fn from(facts: FactSet) -> Self {
        Self { facts }
    }
}

impl<'a> IntoIterator for &'a FactStore {
    type Item = &'a Fact;
    type IntoIter = indexmap::set::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}
