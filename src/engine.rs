//! Forward-chaining inference engine.
//!
//! The engine makes full passes over the rule base, in rule order, until a
//! pass fires nothing. A rule fires when all its conditions hold and its
//! conclusion is absent; the conclusion is inserted immediately, so rules
//! later in the same pass already see it.
//!
//! Every firing adds a fact that was not there before, and facts are never
//! removed during a run. A run therefore fires each rule at most once and
//! needs at most `rules.len() + 1` passes.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::fact::Fact;
use crate::observer::{FiringEvent, FiringObserver, NoopObserver};
use crate::rule_base::RuleBase;
use crate::store::{FactSet, FactStore};

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Optional hard cap on passes per run.
    ///
    /// `None` runs to the fixed point, which always terminates. When the cap
    /// is hit the report is marked `truncated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
}

/// Facts plus the active rule base.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    facts: FactStore,
    rules: RuleBase,
}

impl KnowledgeBase {
    /// Empty facts, empty rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty facts with the given rules.
    #[must_use]
    pub fn with_rules(rules: RuleBase) -> Self {
        Self {
            facts: FactStore::new(),
            rules,
        }
    }

    /// Asserts a fact. Returns `false` if it was already known.
    pub fn add_fact(&mut self, fact: Fact) -> bool {
        self.facts.add(fact)
    }

    /// Asserts several facts.
    pub fn add_facts(&mut self, facts: impl IntoIterator<Item = Fact>) {
        self.facts.extend(facts);
    }

    /// Forgets every fact. Rules are kept.
    pub fn reset_facts(&mut self) {
        self.facts.reset();
    }

    /// Replaces the rule base wholesale.
    pub fn set_rules(&mut self, rules: RuleBase) {
        self.rules = rules;
    }

    /// Current facts.
    #[must_use]
    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    /// Active rules.
    #[must_use]
    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }
}

/// Outcome of one forward-chaining run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Passes executed, including the final pass that fired nothing.
    pub passes: usize,
    /// Firings in the order they happened.
    pub firings: Vec<FiringEvent>,
    /// Facts added by this run, in derivation order.
    pub derived: FactSet,
    /// True if `max_passes` stopped the run before the fixed point.
    #[serde(default)]
    pub truncated: bool,
}

impl InferenceReport {
    /// Number of rules that fired.
    #[must_use]
    pub fn fired(&self) -> usize {
        self.firings.len()
    }

    /// True if the run ended at a fixed point.
    #[must_use]
    pub const fn reached_fixed_point(&self) -> bool {
        !self.truncated
    }
}

/// Stateless forward-chaining engine.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: EngineConfig,
}

impl InferenceEngine {
    /// Engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the knowledge base to its fixed point.
    ///
    /// `observer` is called once per firing, before the next rule is checked.
    /// The rule base is read-only for the duration of the run.
    pub fn forward_chain<O>(&self, kb: &mut KnowledgeBase, observer: &mut O) -> InferenceReport
    where
        O: FiringObserver + ?Sized,
    {
        let rules = kb.rules.clone();
        let facts = &mut kb.facts;
        let initial_len = facts.len();

        let mut report = InferenceReport::default();
        loop {
            if let Some(max) = self.config.max_passes {
                if report.passes >= max {
                    report.truncated = true;
                    warn!(max_passes = max, "inference stopped before reaching a fixed point");
                    break;
                }
            }
            report.passes += 1;

            let fired = run_pass(&rules, facts, report.passes, observer, &mut report.firings);
            trace!(pass = report.passes, fired, "pass complete");
            if fired == 0 {
                break;
            }
        }

        // Facts are append-only during a run; everything past the initial
        // length was derived here.
        report.derived = facts.iter().skip(initial_len).cloned().collect();

        info!(
            rules = rules.len(),
            passes = report.passes,
            fired = report.fired(),
            facts = facts.len(),
            "forward chaining finished"
        );
        report
    }
}

fn run_pass<O>(
    rules: &RuleBase,
    facts: &mut FactStore,
    pass: usize,
    observer: &mut O,
    firings: &mut Vec<FiringEvent>,
) -> usize
where
    O: FiringObserver + ?Sized,
{
    let mut fired = 0;
    for (rule_id, rule) in rules.iter() {
        // Membership check first: a known conclusion means the rule already
        // fired (or was asserted) and must never fire again.
        if facts.contains(rule.conclusion().as_str()) {
            continue;
        }
        if !rule.is_applicable(facts) {
            continue;
        }

        let event = FiringEvent {
            rule_id,
            pass,
            conditions: rule.conditions().to_vec(),
            conclusion: rule.conclusion().clone(),
        };
        debug!(rule = %rule_id, pass, conclusion = %event.conclusion, "rule fired");
        observer.on_fire(&event);
        facts.add(event.conclusion.clone());
        firings.push(event);
        fired += 1;
    }
    fired
}

/// Runs `rules` against `initial_facts` and returns the final fact set.
///
/// Newly derived facts are `final − initial`; see
/// [`newly_derived`](crate::store::newly_derived).
pub fn run<O>(
    rules: &RuleBase,
    initial_facts: impl IntoIterator<Item = Fact>,
    on_fire: &mut O,
) -> FactSet
where
    O: FiringObserver + ?Sized,
{
    let mut kb = KnowledgeBase::with_rules(rules.clone());
    kb.add_facts(initial_facts);
    InferenceEngine::new().forward_chain(&mut kb, on_fire);
    kb.facts.snapshot()
}

/// [`run`] without an observer.
pub fn closure(rules: &RuleBase, initial_facts: impl IntoIterator<Item = Fact>) -> FactSet {
    run(rules, initial_facts, &mut NoopObserver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn facts(ids: &[&str]) -> Vec<Fact> {
        ids.iter().map(|id| Fact::new(*id).unwrap()).collect()
    }

    fn chain(order: &[(&str, &str)]) -> RuleBase {
        order
            .iter()
            .map(|(cond, concl)| Rule::new([*cond], *concl).unwrap())
            .collect()
    }

    #[test]
    fn same_pass_chaining_needs_one_productive_pass() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("a", "b"), ("b", "c")]));
        kb.add_facts(facts(&["a"]));

        let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
        assert_eq!(report.passes, 2);
        assert!(report.firings.iter().all(|e| e.pass == 1));
        assert_eq!(report.derived, facts(&["b", "c"]).into_iter().collect::<FactSet>());
    }

    #[test]
    fn reversed_chain_needs_extra_passes() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("c", "d"), ("b", "c"), ("a", "b")]));
        kb.add_facts(facts(&["a"]));

        let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
        let passes: Vec<usize> = report.firings.iter().map(|e| e.pass).collect();
        assert_eq!(passes, vec![1, 2, 3]);
        assert_eq!(report.passes, 4);
        assert!(report.reached_fixed_point());
    }

    #[test]
    fn asserted_conclusion_suppresses_firing() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("a", "b")]));
        kb.add_facts(facts(&["a", "b"]));

        let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
        assert_eq!(report.fired(), 0);
        assert_eq!(report.passes, 1);
        assert!(report.derived.is_empty());
    }

    #[test]
    fn self_referential_rule_never_fires() {
        let rules = RuleBase::new(vec![Rule::new(["a", "b"], "a").unwrap()]);
        let mut kb = KnowledgeBase::with_rules(rules);
        kb.add_facts(facts(&["a", "b"]));
        assert_eq!(InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver).fired(), 0);
    }

    #[test]
    fn cycles_terminate() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("a", "b"), ("b", "a")]));
        kb.add_facts(facts(&["b"]));
        let report = InferenceEngine::new().forward_chain(&mut kb, &mut NoopObserver);
        assert_eq!(report.fired(), 1);
        assert_eq!(kb.facts().len(), 2);
    }

    #[test]
    fn max_passes_truncates() {
        let engine = InferenceEngine::with_config(EngineConfig { max_passes: Some(1) });
        let mut kb = KnowledgeBase::with_rules(chain(&[("b", "c"), ("a", "b")]));
        kb.add_facts(facts(&["a"]));

        let report = engine.forward_chain(&mut kb, &mut NoopObserver);
        assert!(report.truncated);
        assert_eq!(report.passes, 1);
        assert!(kb.facts().contains("b"));
        assert!(!kb.facts().contains("c"));
    }

    #[test]
    fn observer_sees_fact_before_next_rule() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("a", "b"), ("b", "c")]));
        kb.add_facts(facts(&["a"]));

        let mut seen = Vec::new();
        let mut record =
            |e: &FiringEvent| seen.push((e.rule_id.position(), e.conclusion.to_string()));
        InferenceEngine::new().forward_chain(&mut kb, &mut record);
        assert_eq!(seen, vec![(1, "b".to_string()), (2, "c".to_string())]);
    }

    #[test]
    fn run_returns_final_set() {
        let rules = chain(&[("a", "b")]);
        let out = closure(&rules, facts(&["a"]));
        let ids: Vec<&str> = out.iter().map(Fact::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn reset_keeps_rules() {
        let mut kb = KnowledgeBase::with_rules(chain(&[("a", "b")]));
        kb.add_fact(Fact::new("a").unwrap());
        kb.reset_facts();
        assert!(kb.facts().is_empty());
        assert_eq!(kb.rules().len(), 1);
    }
}
