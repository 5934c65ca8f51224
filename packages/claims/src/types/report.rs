use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Patient-level statistics over a collection of claims.
///
/// Recomputed on every request and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total_copay: f64,
    pub total_allowed_amount: f64,
    pub total_insurance_paid: f64,
    /// Distinct provider names. Ordering is incidental.
    pub providers: BTreeSet<String>,
    pub diagnosis_counts: BTreeMap<String, usize>,
    pub count: usize,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
