//! Plan selection between the pre-aggregate fast path and a raw fact scan.
//!
//! The decision table is deliberately small: a single-row-axis query with no
//! predicates and no level rewriting can be answered straight from the
//! per-level pre-aggregates; everything else streams the facts. The planner
//! is a pure function with no side effects; identical inputs always plan
//! identically.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::NormalizedQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStrategy {
    PreAggregate,
    RawScan,
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStrategy::PreAggregate => write!(f, "pre-aggregate"),
            PlanStrategy::RawScan => write!(f, "raw-scan"),
        }
    }
}

/// The chosen strategy plus a human-readable justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDecision {
    pub strategy: PlanStrategy,
    pub reason: String,
}

/// Choose a strategy for a normalized query.
pub fn plan(query: &NormalizedQuery) -> PlanDecision {
    let mut obstacles = Vec::new();

    if query.rows.len() != 1 || !query.columns.is_empty() {
        obstacles.push(format!(
            "{} row and {} column axes",
            query.rows.len(),
            query.columns.len()
        ));
    }
    if !query.filters.is_empty() {
        obstacles.push(format!("{} filter(s)", query.filters.len()));
    }
    if query.drill.is_some() {
        obstacles.push("a drill".to_string());
    }
    if query.rollup.is_some() {
        obstacles.push("a rollup".to_string());
    }

    if obstacles.is_empty() {
        let axis = &query.rows[0];
        PlanDecision {
            strategy: PlanStrategy::PreAggregate,
            reason: format!(
                "single row axis on {}.{} with no predicates; serving from pre-aggregates",
                axis.dimension, axis.level
            ),
        }
    } else {
        PlanDecision {
            strategy: PlanStrategy::RawScan,
            reason: format!("fact scan required: query has {}", obstacles.join(", ")),
        }
    }
}
