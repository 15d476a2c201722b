//! Per-measure accumulators.
//!
//! One concrete accumulator per aggregation kind, constructed by tag. The
//! executor feeds a cell's accumulators the raw metric scalars and reads one
//! finalized number from each. Null and absent metrics are filtered at the
//! call site; `add` never sees them.

use std::collections::HashSet;

use crate::model::types::{AggregationKind, Scalar};

/// Running aggregation state.
pub trait Accumulator: Send {
    /// Ingest one metric value.
    fn add(&mut self, value: &Scalar);
    /// Collapse the state to a number.
    fn finalize(&self) -> f64;
}

/// Construct the accumulator for an aggregation kind.
pub fn accumulator_for(kind: AggregationKind) -> Box<dyn Accumulator> {
    match kind {
        AggregationKind::Sum => Box::new(SumAccumulator::default()),
        AggregationKind::Count => Box::new(CountAccumulator::default()),
        AggregationKind::Avg => Box::new(AvgAccumulator::default()),
        AggregationKind::Min => Box::new(ExtremumAccumulator::min()),
        AggregationKind::Max => Box::new(ExtremumAccumulator::max()),
        AggregationKind::Distinct => Box::new(DistinctAccumulator::default()),
    }
}

/// SUM ignores non-numeric inputs entirely.
#[derive(Debug, Default)]
struct SumAccumulator {
    total: f64,
}

impl Accumulator for SumAccumulator {
    fn add(&mut self, value: &Scalar) {
        if let Some(n) = value.as_number() {
            self.total += n;
        }
    }

    fn finalize(&self) -> f64 {
        self.total
    }
}

/// COUNT counts every observation, strings included.
#[derive(Debug, Default)]
struct CountAccumulator {
    count: u64,
}

impl Accumulator for CountAccumulator {
    fn add(&mut self, _value: &Scalar) {
        self.count += 1;
    }

    fn finalize(&self) -> f64 {
        self.count as f64
    }
}

#[derive(Debug, Default)]
struct AvgAccumulator {
    total: f64,
    count: u64,
}

impl Accumulator for AvgAccumulator {
    fn add(&mut self, value: &Scalar) {
        if let Some(n) = value.as_number() {
            self.total += n;
            self.count += 1;
        }
    }

    /// 0 when nothing numeric was seen.
    fn finalize(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// MIN and MAX share state; only the comparison direction differs.
#[derive(Debug)]
struct ExtremumAccumulator {
    best: Option<f64>,
    keep_smaller: bool,
}

impl ExtremumAccumulator {
    fn min() -> Self {
        Self {
            best: None,
            keep_smaller: true,
        }
    }

    fn max() -> Self {
        Self {
            best: None,
            keep_smaller: false,
        }
    }
}

impl Accumulator for ExtremumAccumulator {
    fn add(&mut self, value: &Scalar) {
        let Some(n) = value.as_number() else { return };
        self.best = Some(match self.best {
            None => n,
            Some(b) if self.keep_smaller && n < b => n,
            Some(b) if !self.keep_smaller && n > b => n,
            Some(b) => b,
        });
    }

    fn finalize(&self) -> f64 {
        self.best.unwrap_or(0.0)
    }
}

/// DISTINCT tracks the set of stringified inputs.
#[derive(Debug, Default)]
struct DistinctAccumulator {
    seen: HashSet<String>,
}

impl Accumulator for DistinctAccumulator {
    fn add(&mut self, value: &Scalar) {
        self.seen.insert(value.key_string());
    }

    fn finalize(&self) -> f64 {
        self.seen.len() as f64
    }
}
