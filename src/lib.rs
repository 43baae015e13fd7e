//! # KyroRule - Forward-Chaining Rule Engine
//!
//! KyroRule derives implied facts from asserted facts by applying
//! condition → conclusion rules until nothing new can be produced.
//!
//! ## Core Concepts
//!
//! - **Fact**: An opaque, case-sensitive proposition identifier
//! - **Rule**: A set of required facts producing exactly one fact
//! - **RuleBase**: An immutable, ordered rule sequence, swapped wholesale
//! - **InferenceEngine**: Runs passes over the rule base to a fixed point
//! - **FiringObserver**: Receives one event per rule firing, in firing order
//!
//! ## Usage
//!
//! ```rust
//! use kyrorule::{Fact, EventLog, Rule, RuleBase};
//!
//! let rules = RuleBase::new(vec![
//!     Rule::new(["fever", "cough"], "possible_flu")?,
//!     Rule::new(["body_aches", "possible_flu"], "diagnose_flu")?,
//! ]);
//! let initial = ["fever", "cough", "body_aches"]
//!     .into_iter()
//!     .map(Fact::new)
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let mut log = EventLog::new();
//! let facts = kyrorule::run(&rules, initial, &mut log);
//!
//! assert!(facts.contains("diagnose_flu"));
//! assert_eq!(log.len(), 2);
//! # Ok::<(), kyrorule::ValidationError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Knowledge representation
pub mod error;
pub mod fact;
pub mod rule;
pub mod rule_base;
pub mod store;

// Inference
pub mod engine;
pub mod observer;

// Configuration and consumers
pub mod domain;
pub mod graph;
pub mod session;

// Re-export primary types at crate root for convenience
pub use domain::{medical_catalog, medical_rules, Domain, DomainCatalog};
pub use engine::{closure, run, EngineConfig, InferenceEngine, InferenceReport, KnowledgeBase};
pub use error::{KyroError, KyroResult, ValidationError};
pub use fact::Fact;
pub use graph::KnowledgeGraph;
pub use observer::{
    ChannelObserver, EventLog, Fanout, FiringEvent, FiringObserver, LogEntry, NoopObserver,
};
pub use rule::{Rule, RuleBuilder};
pub use rule_base::{RuleBase, RuleBaseFingerprint, RuleId};
pub use session::{Session, SessionConfig};
pub use store::{newly_derived, FactSet, FactStore};
