//! Firing events and observer sinks.
//!
//! The engine notifies an observer once per rule firing, synchronously and
//! before it considers the next rule. Observers receive the event by shared
//! reference and hold no handle to the engine, so they cannot re-enter a run.

use std::collections::VecDeque;
use std::fmt;

use crossbeam_channel::{Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::fact::Fact;
use crate::rule::write_condition_list;
use crate::rule_base::RuleId;

/// Record of one rule activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringEvent {
    /// Position of the fired rule in the rule base.
    pub rule_id: RuleId,
    /// 1-based pass in which the rule fired.
    pub pass: usize,
    /// Conditions of the fired rule.
    pub conditions: Vec<Fact>,
    /// Fact added by the firing.
    pub conclusion: Fact,
}

impl FiringEvent {
    /// Human-readable description, e.g. `Rule fired: IF ['a'] THEN b`.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FiringEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule fired: IF ")?;
        write_condition_list(f, &self.conditions)?;
        write!(f, " THEN {}", self.conclusion)
    }
}

/// Sink for firing events.
pub trait FiringObserver {
    /// Called once per firing, before the engine moves on.
    fn on_fire(&mut self, event: &FiringEvent);
}

impl<F> FiringObserver for F
where
    F: FnMut(&FiringEvent),
{
    fn on_fire(&mut self, event: &FiringEvent) {
        self(event);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FiringObserver for NoopObserver {
    fn on_fire(&mut self, _event: &FiringEvent) {}
}

/// Notifies two observers in order.
#[derive(Debug, Clone, Default)]
pub struct Fanout<A, B>(pub A, pub B);

impl<A: FiringObserver, B: FiringObserver> FiringObserver for Fanout<A, B> {
    fn on_fire(&mut self, event: &FiringEvent) {
        self.0.on_fire(event);
        self.1.on_fire(event);
    }
}

/// A line in an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// A rule fired.
    Firing {
        /// The firing.
        event: FiringEvent,
    },
    /// A caller-supplied note such as `Added fact: fever`.
    Note {
        /// Note text.
        message: String,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Firing { event } => fmt::Display::fmt(event, f),
            Self::Note { message } => f.write_str(message),
        }
    }
}

/// Ordered, optionally bounded log of firings and notes.
///
/// When bounded, the oldest entries are dropped first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    limit: Option<usize>,
}

impl EventLog {
    /// Unbounded log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that keeps at most `limit` newest entries.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(1024)),
            limit: Some(limit),
        }
    }

    /// Appends a caller note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.push(LogEntry::Note {
            message: message.into(),
        });
    }

    fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Retained firing events, oldest first.
    pub fn firings(&self) -> impl Iterator<Item = &FiringEvent> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            LogEntry::Firing { event } => Some(event),
            LogEntry::Note { .. } => None,
        })
    }

    /// Retained entries rendered as text.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl FiringObserver for EventLog {
    fn on_fire(&mut self, event: &FiringEvent) {
        self.push(LogEntry::Firing {
            event: event.clone(),
        });
    }
}

/// Forwards events to a channel without ever blocking the engine.
///
/// Sends that fail because the channel is full or disconnected are counted
/// and otherwise ignored; a slow consumer cannot stall or abort a run.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<FiringEvent>,
    dropped: u64,
}

impl ChannelObserver {
    /// Wraps a sender.
    #[must_use]
    pub fn new(tx: Sender<FiringEvent>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Number of events that could not be delivered.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl FiringObserver for ChannelObserver {
    fn on_fire(&mut self, event: &FiringEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
            }
        }
    }
}
