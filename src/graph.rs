//! Read-only graph export of a knowledge base.
//!
//! Facts become ellipse nodes, rules become box nodes named `Rule_<i>`, and
//! edges run condition → rule → conclusion. The export only reads the fact
//! store and rule base; rendering the DOT text into an image is left to the
//! consumer.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use crate::fact::Fact;
use crate::rule::Rule;
use crate::rule_base::{RuleBase, RuleId};
use crate::store::FactStore;

/// A fact node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactNode {
    /// The fact.
    pub fact: Fact,
    /// True if the fact is in the store; false if only a rule mentions it.
    pub known: bool,
}

/// A rule node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleNode {
    /// Rule position.
    pub id: RuleId,
    /// Node name, `Rule_<i>`.
    pub name: String,
    /// Multi-line label: `IF`, conditions joined by `AND`, `THEN`, conclusion.
    pub label: String,
}

/// A directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edge {
    /// Condition fact → rule.
    Condition {
        /// Source fact.
        fact: Fact,
        /// Target rule.
        rule: RuleId,
    },
    /// Rule → conclusion fact.
    Conclusion {
        /// Source rule.
        rule: RuleId,
        /// Target fact.
        fact: Fact,
    },
}

/// Node/edge view of facts and rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeGraph {
    /// Fact nodes: store facts first (insertion order), then facts only rules mention.
    pub facts: Vec<FactNode>,
    /// Rule nodes in rule-base order.
    pub rules: Vec<RuleNode>,
    /// Edges in rule-base order.
    pub edges: Vec<Edge>,
}

/// `IF\nfever\nAND\ncough\nTHEN\npossible_flu`.
#[must_use]
pub fn rule_label(rule: &Rule) -> String {
    let conditions: Vec<&str> = rule.conditions().iter().map(Fact::as_str).collect();
    format!("IF\n{}\nTHEN\n{}", conditions.join("\nAND\n"), rule.conclusion())
}

impl KnowledgeGraph {
    /// Builds the graph for the given facts and rules.
    #[must_use]
    pub fn build(facts: &FactStore, rules: &RuleBase) -> Self {
        let mut fact_nodes: IndexMap<Fact, bool> =
            facts.iter().map(|f| (f.clone(), true)).collect();
        let mut rule_nodes = Vec::with_capacity(rules.len());
        let mut edges = Vec::new();

        for (id, rule) in rules.iter() {
            rule_nodes.push(RuleNode {
                id,
                name: id.node_name(),
                label: rule_label(rule),
            });
            for condition in rule.conditions() {
                fact_nodes.entry(condition.clone()).or_insert(false);
                edges.push(Edge::Condition {
                    fact: condition.clone(),
                    rule: id,
                });
            }
            fact_nodes.entry(rule.conclusion().clone()).or_insert(false);
            edges.push(Edge::Conclusion {
                rule: id,
                fact: rule.conclusion().clone(),
            });
        }

        Self {
            facts: fact_nodes
                .into_iter()
                .map(|(fact, known)| FactNode { fact, known })
                .collect(),
            rules: rule_nodes,
            edges,
        }
    }

    /// Renders Graphviz DOT.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n    // Expert System Knowledge Base\n");
        // Writing into a String cannot fail.
        for node in &self.facts {
            let style = if node.known {
                "shape=ellipse style=filled fillcolor=lightblue"
            } else {
                "shape=ellipse"
            };
            let id = quote(node.fact.as_str());
            let _ = writeln!(out, "    {id} [label={id} {style}]");
        }
        for node in &self.rules {
            let _ = writeln!(
                out,
                "    {} [label={} shape=box style=filled fillcolor=lightgrey]",
                quote(&node.name),
                quote(&node.label)
            );
        }
        for edge in &self.edges {
            let (from, to) = match edge {
                Edge::Condition { fact, rule } => (quote(fact.as_str()), quote(&rule.node_name())),
                Edge::Conclusion { rule, fact } => (quote(&rule.node_name()), quote(fact.as_str())),
            };
            let _ = writeln!(out, "    {from} -> {to}");
        }
        out.push_str("}\n");
        out
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
