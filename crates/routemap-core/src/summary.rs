//! Aggregate statistics gathered while validating a route map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMapSummary {
    pub num_networks: usize,
    pub num_ipv4: usize,
    pub num_ipv6: usize,
    /// Occurrences of each exact label string across the whole document.
    pub label_distribution: BTreeMap<String, usize>,
}

impl RouteMapSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label` and return how many have been seen.
    pub fn summarize_label(&mut self, label: &str) -> usize {
        let count = self.label_distribution.entry(label.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn unique_labels(&self) -> usize {
        self.label_distribution.len()
    }

    /// Histogram entries as `label: count`, ordered by label.
    pub fn label_histogram(&self) -> Vec<String> {
        self.label_distribution
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect()
    }
}
