//! Interactive session state.
//!
//! A `Session` is what a front end drives: facts are entered one at a time,
//! a domain is selected, and `submit` runs inference from scratch over the
//! entered facts. The session owns the knowledge base and a bounded event log
//! of notes and firings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{medical_catalog, Domain, DomainCatalog};
use crate::engine::{EngineConfig, InferenceEngine, InferenceReport, KnowledgeBase};
use crate::error::ValidationError;
use crate::fact::Fact;
use crate::graph::KnowledgeGraph;
use crate::observer::EventLog;
use crate::store::FactSet;

/// Session configuration.
///
/// Missing fields take their [`Default`] values, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Newest log entries to keep; `None` keeps everything.
    pub log_limit: Option<usize>,
    /// Engine settings used by `submit`.
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_limit: Some(10),
            engine: EngineConfig::default(),
        }
    }
}

/// Front-end facing controller around a [`KnowledgeBase`].
#[derive(Debug, Clone)]
pub struct Session {
    catalog: DomainCatalog,
    domain: Domain,
    kb: KnowledgeBase,
    engine: InferenceEngine,
    entered: Vec<Fact>,
    inferred: FactSet,
    log: EventLog,
}

impl Session {
    /// Session over the bundled medical rules, with `Domain::Both` selected.
    pub fn medical(config: SessionConfig) -> Result<Self, ValidationError> {
        Self::new(medical_catalog()?, Domain::default(), config)
    }

    /// Session over a custom catalog.
    pub fn new(
        catalog: DomainCatalog,
        domain: Domain,
        config: SessionConfig,
    ) -> Result<Self, ValidationError> {
        let rules = catalog.for_domain(domain)?;
        let log = match config.log_limit {
            Some(limit) => EventLog::with_limit(limit),
            None => EventLog::new(),
        };
        Ok(Self {
            catalog,
            domain,
            kb: KnowledgeBase::with_rules(rules),
            engine: InferenceEngine::with_config(config.engine),
            entered: Vec::new(),
            inferred: FactSet::default(),
            log,
        })
    }

    /// Records an entered fact, trimmed of surrounding whitespace. Blank input
    /// is ignored and returns `Ok(false)`.
    pub fn enter_fact(&mut self, input: &str) -> Result<bool, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(false);
        }
        let fact = Fact::new(input)?;
        self.log.note(format!("Added fact: {fact}"));
        self.entered.push(fact);
        Ok(true)
    }

    /// Switches domain and swaps in the matching rule base.
    pub fn select_domain(&mut self, domain: Domain) -> Result<(), ValidationError> {
        let rules = self.catalog.for_domain(domain)?;
        debug!(%domain, rules = rules.len(), "rule base swapped");
        self.kb.set_rules(rules);
        self.domain = domain;
        Ok(())
    }

    /// Runs inference over the entered facts, starting from an empty store.
    ///
    /// Returns the inferred facts, i.e. final facts minus entered facts.
    pub fn submit(&mut self) -> InferenceReport {
        self.kb.reset_facts();
        self.log.clear();
        self.kb.add_facts(self.entered.iter().cloned());

        let report = self.engine.forward_chain(&mut self.kb, &mut self.log);
        self.inferred = report.derived.clone();
        report
    }

    /// Clears entered facts, results, log and fact store. The domain is kept.
    pub fn reset(&mut self) {
        self.entered.clear();
        self.inferred.clear();
        self.log.clear();
        self.kb.reset_facts();
    }

    /// Selected domain.
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// Facts in the order they were entered.
    #[must_use]
    pub fn entered_facts(&self) -> &[Fact] {
        &self.entered
    }

    /// Facts inferred by the last `submit`.
    #[must_use]
    pub fn inferred_facts(&self) -> &FactSet {
        &self.inferred
    }

    /// Event log.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Underlying knowledge base.
    #[must_use]
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Graph of the current facts and rules.
    #[must_use]
    pub fn graph(&self) -> KnowledgeGraph {
        KnowledgeGraph::build(self.kb.facts(), self.kb.rules())
    }
}
