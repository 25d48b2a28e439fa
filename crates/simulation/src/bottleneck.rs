//! Post-run bottleneck classification.

use flowsim_types::constants::{
    BOTTLENECK_QUEUE_THRESHOLD, BOTTLENECK_UTILIZATION_THRESHOLD, MAX_REPORTED_BOTTLENECKS,
};
use flowsim_types::{Bottleneck, NodeId, NodeMetrics};
use indexmap::IndexMap;

/// Thresholds a node must exceed to count as a bottleneck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottleneckThresholds {
    /// Strict lower bound on utilization.
    pub utilization: f64,
    /// Strict lower bound on average queue length.
    pub queue_length: f64,
    /// Report at most this many nodes.
    pub max_reported: usize,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self {
            utilization: BOTTLENECK_UTILIZATION_THRESHOLD,
            queue_length: BOTTLENECK_QUEUE_THRESHOLD,
            max_reported: MAX_REPORTED_BOTTLENECKS,
        }
    }
}

impl BottleneckThresholds {
    /// Nodes over both thresholds, busiest first. Equal utilizations keep
    /// the metrics' order.
    pub fn detect(&self, node_metrics: &IndexMap<NodeId, NodeMetrics>) -> Vec<Bottleneck> {
        let mut found: Vec<Bottleneck> = node_metrics
            .iter()
            .filter(|(_, m)| m.utilization > self.utilization && m.avg_queue_length > self.queue_length)
            .map(|(id, m)| Bottleneck {
                node_id: id.clone(),
                utilization: m.utilization,
                avg_queue_length: m.avg_queue_length,
            })
            .collect();

        found.sort_by(|a, b| b.utilization.total_cmp(&a.utilization));
        found.truncate(self.max_reported);
        found
    }
}

/// Detect bottlenecks with the default thresholds.
pub fn detect_bottlenecks(node_metrics: &IndexMap<NodeId, NodeMetrics>) -> Vec<Bottleneck> {
    BottleneckThresholds::default().detect(node_metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(entries: &[(&str, f64, f64)]) -> IndexMap<NodeId, NodeMetrics> {
        entries
            .iter()
            .map(|&(id, utilization, avg_queue_length)| {
                (
                    NodeId::from(id),
                    NodeMetrics {
                        utilization,
                        avg_queue_length,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_both_thresholds_required() {
        let m = metrics(&[
            ("busy_no_queue", 0.95, 0.5),
            ("queue_not_busy", 0.5, 10.0),
            ("at_threshold", 0.85, 1.0),
            ("bottleneck", 0.9, 2.0),
        ]);
        let found = detect_bottlenecks(&m);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node_id.as_str(), "bottleneck");
        assert_eq!(found[0].utilization, 0.9);
        assert_eq!(found[0].avg_queue_length, 2.0);
    }

    #[test]
    fn test_sorted_and_truncated_to_three() {
        let m = metrics(&[
            ("a", 0.86, 2.0),
            ("b", 0.99, 2.0),
            ("c", 0.90, 2.0),
            ("d", 0.95, 2.0),
        ]);
        let ids: Vec<String> = detect_bottlenecks(&m)
            .into_iter()
            .map(|b| b.node_id.0)
            .collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_custom_thresholds() {
        let m = metrics(&[("a", 0.6, 0.6)]);
        assert!(detect_bottlenecks(&m).is_empty());

        let lenient = BottleneckThresholds {
            utilization: 0.5,
            queue_length: 0.5,
            max_reported: 1,
        };
        assert_eq!(lenient.detect(&m).len(), 1);
    }
}
