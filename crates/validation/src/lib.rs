//! Model validation.
//!
//! The engine assumes it is given a well-formed model. [`validate_model`]
//! checks everything the engine relies on and reports every violation it
//! finds, not just the first.

mod issue;

pub use issue::{DistributionIssue, ValidationIssue};

use flowsim_types::constants::{MAX_NODES, MAX_SIMULATION_DURATION};
use flowsim_types::{Distribution, NodeParams, NodeType, ProcessModel, SimConfig, SimNode};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Outcome of validating a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable messages, one per issue.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// True if any issue matches `predicate`.
    pub fn has(&self, predicate: impl Fn(&ValidationIssue) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("model is valid");
        }
        for (i, issue) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "- {issue}")?;
        }
        Ok(())
    }
}

/// Check a model for structural and semantic correctness.
pub fn validate_model(model: &ProcessModel) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_node_set(model, &mut report);
    let ids = check_ids(model, &mut report);
    check_edges(model, &ids, &mut report);
    check_connectivity(model, &ids, &mut report);
    for node in &model.nodes {
        check_params(node, &mut report);
    }
    check_config(&model.config, &mut report);

    report
}

fn check_node_set(model: &ProcessModel, report: &mut ValidationReport) {
    if model.nodes_of_type(NodeType::Source).next().is_none() {
        report.push(ValidationIssue::MissingSource);
    }
    if model.nodes_of_type(NodeType::Sink).next().is_none() {
        report.push(ValidationIssue::MissingSink);
    }
    if model.nodes.len() > MAX_NODES {
        report.push(ValidationIssue::TooManyNodes {
            count: model.nodes.len(),
            max: MAX_NODES,
        });
    }
}

/// Node types by id, for the ids that are usable.
fn check_ids<'m>(model: &'m ProcessModel, report: &mut ValidationReport) -> HashMap<&'m str, NodeType> {
    let mut ids = HashMap::with_capacity(model.nodes.len());
    for (index, node) in model.nodes.iter().enumerate() {
        if node.id.as_str().trim().is_empty() {
            report.push(ValidationIssue::EmptyNodeId { index });
            continue;
        }
        if ids.insert(node.id.as_str(), node.node_type()).is_some() {
            report.push(ValidationIssue::DuplicateNodeId {
                id: node.id.clone(),
            });
        }
    }
    ids
}

fn check_edges(model: &ProcessModel, ids: &HashMap<&str, NodeType>, report: &mut ValidationReport) {
    for edge in &model.edges {
        match ids.get(edge.from.as_str()) {
            None => report.push(ValidationIssue::UnknownEdgeSource {
                edge: edge.id.clone(),
                node: edge.from.clone(),
            }),
            Some(NodeType::Sink) => report.push(ValidationIssue::EdgeFromSink {
                edge: edge.id.clone(),
                node: edge.from.clone(),
            }),
            Some(_) => {}
        }
        match ids.get(edge.to.as_str()) {
            None => report.push(ValidationIssue::UnknownEdgeTarget {
                edge: edge.id.clone(),
                node: edge.to.clone(),
            }),
            Some(NodeType::Source) => report.push(ValidationIssue::EdgeIntoSource {
                edge: edge.id.clone(),
                node: edge.to.clone(),
            }),
            Some(_) => {}
        }
    }

    let connected: HashSet<&str> = model
        .edges
        .iter()
        .flat_map(|e| [e.from.as_str(), e.to.as_str()])
        .collect();
    for node in &model.nodes {
        if !connected.contains(node.id.as_str()) {
            report.push(ValidationIssue::IsolatedNode {
                id: node.id.clone(),
            });
        }
    }
}

/// Every node must be reachable from the first one, ignoring direction.
fn check_connectivity(
    model: &ProcessModel,
    ids: &HashMap<&str, NodeType>,
    report: &mut ValidationReport,
) {
    let Some(first) = model.nodes.first() else {
        return;
    };
    if model.edges.is_empty() {
        return;
    }

    let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &model.edges {
        let (from, to) = (edge.from.as_str(), edge.to.as_str());
        if ids.contains_key(from) && ids.contains_key(to) {
            neighbors.entry(from).or_default().push(to);
            neighbors.entry(to).or_default().push(from);
        }
    }

    let mut visited = HashSet::new();
    let mut stack = vec![first.id.as_str()];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = neighbors.get(current) {
            stack.extend(next.iter().filter(|n| !visited.contains(*n)));
        }
    }

    let unreachable = ids.keys().filter(|id| !visited.contains(*id)).count();
    if unreachable > 0 {
        report.push(ValidationIssue::Disconnected { unreachable });
    }
}

fn check_params(node: &SimNode, report: &mut ValidationReport) {
    match &node.params {
        NodeParams::Source(p) => {
            let issues = distribution_issues(&p.inter_arrival_time);
            let sound = issues.is_empty();
            push_distribution_issues(node, "interArrivalTime", issues, report);
            if sound && p.inter_arrival_time.mean() <= 0.0 {
                report.push(ValidationIssue::ZeroInterArrival {
                    node: node.id.clone(),
                });
            }
        }
        // Capacity is unsigned, so every value is meaningful.
        NodeParams::Queue(_) => {}
        NodeParams::Process(p) => {
            if p.resource_count < 1 {
                report.push(ValidationIssue::NoResources {
                    node: node.id.clone(),
                });
            }
            push_distribution_issues(node, "serviceTime", distribution_issues(&p.service_time), report);
        }
        NodeParams::Sink(_) => {}
    }
}

fn push_distribution_issues(
    node: &SimNode,
    field: &'static str,
    issues: Vec<DistributionIssue>,
    report: &mut ValidationReport,
) {
    for issue in issues {
        report.push(ValidationIssue::InvalidDistribution {
            node: node.id.clone(),
            field,
            issue,
        });
    }
}

/// Parameter problems of a single distribution.
pub fn distribution_issues(dist: &Distribution) -> Vec<DistributionIssue> {
    let params: Vec<f64> = match *dist {
        Distribution::Fixed { value } => vec![value],
        Distribution::Exponential { mean } => vec![mean],
        Distribution::Normal { mean, stddev } => vec![mean, stddev],
        Distribution::Uniform { min, max } => vec![min, max],
        Distribution::Triangular { min, mode, max } => vec![min, mode, max],
    };
    if params.iter().any(|v| !v.is_finite()) {
        return vec![DistributionIssue::NonFinite];
    }

    let mut issues = Vec::new();
    match *dist {
        Distribution::Fixed { value } => {
            if value < 0.0 {
                issues.push(DistributionIssue::NegativeFixed);
            }
        }
        Distribution::Exponential { mean } => {
            if mean <= 0.0 {
                issues.push(DistributionIssue::NonPositiveMean);
            }
        }
        Distribution::Normal { stddev, .. } => {
            if stddev < 0.0 {
                issues.push(DistributionIssue::NegativeStddev);
            }
        }
        Distribution::Uniform { min, max } => {
            if min < 0.0 {
                issues.push(DistributionIssue::NegativeMin { kind: "uniform" });
            }
            if max < min {
                issues.push(DistributionIssue::MaxBelowMin { kind: "uniform" });
            }
        }
        Distribution::Triangular { min, mode, max } => {
            if min < 0.0 {
                issues.push(DistributionIssue::NegativeMin { kind: "triangular" });
            }
            if max < min {
                issues.push(DistributionIssue::MaxBelowMin { kind: "triangular" });
            } else if mode < min || mode > max {
                issues.push(DistributionIssue::ModeOutOfRange);
            }
        }
    }
    issues
}

fn check_config(config: &SimConfig, report: &mut ValidationReport) {
    let duration = config.duration;
    if !duration.is_finite() || duration <= 0.0 {
        report.push(ValidationIssue::NonPositiveDuration { duration });
    } else if duration > MAX_SIMULATION_DURATION {
        report.push(ValidationIssue::DurationTooLong {
            duration,
            max: MAX_SIMULATION_DURATION,
        });
    }

    let warmup = config.warmup_period;
    if !warmup.is_finite() || warmup < 0.0 {
        report.push(ValidationIssue::NegativeWarmup { warmup });
    } else if duration.is_finite() && duration > 0.0 && warmup >= duration {
        report.push(ValidationIssue::WarmupCoversRun { warmup, duration });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsim_types::{QueueDiscipline, SimConfig};

    fn fixed(value: f64) -> Distribution {
        Distribution::Fixed { value }
    }

    fn valid_model() -> ProcessModel {
        ProcessModel::new("model-1", "Test Model")
            .with_node(SimNode::source("src", fixed(5.0)))
            .with_node(SimNode::queue("q1", 100, QueueDiscipline::Fifo))
            .with_node(SimNode::process("p1", fixed(3.0), 1))
            .with_node(SimNode::sink("sink"))
            .with_edge("src", "q1")
            .with_edge("q1", "p1")
            .with_edge("p1", "sink")
            .with_config(SimConfig::new(42, 100.0))
    }

    #[test]
    fn test_valid_model_passes() {
        let report = validate_model(&valid_model());
        assert!(report.is_valid(), "{report}");
        assert_eq!(report.to_string(), "model is valid");
    }

    #[test]
    fn test_missing_source_and_sink() {
        let mut model = valid_model();
        model.nodes.retain(|n| n.node_type() == NodeType::Queue);
        model.edges.clear();

        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::MissingSource)));
        assert!(report.has(|i| matches!(i, ValidationIssue::MissingSink)));
        assert!(report.messages().iter().any(|m| m.contains("Source")));
        assert!(report.messages().iter().any(|m| m.contains("Sink")));
    }

    #[test]
    fn test_duplicate_and_empty_ids() {
        let model = valid_model()
            .with_node(SimNode::sink("sink"))
            .with_node(SimNode::sink(""));
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::DuplicateNodeId { id } if id.as_str() == "sink")));
        assert!(report.has(|i| matches!(i, ValidationIssue::EmptyNodeId { index: 5 })));
    }

    #[test]
    fn test_unknown_edge_endpoints() {
        let model = valid_model().with_edge("ghost", "p1").with_edge("p1", "phantom");
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::UnknownEdgeSource { node, .. } if node.as_str() == "ghost")));
        assert!(report.has(|i| matches!(i, ValidationIssue::UnknownEdgeTarget { node, .. } if node.as_str() == "phantom")));
    }

    #[test]
    fn test_edge_direction_rules() {
        let model = valid_model().with_edge("sink", "src");
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::EdgeFromSink { .. })));
        assert!(report.has(|i| matches!(i, ValidationIssue::EdgeIntoSource { .. })));
    }

    #[test]
    fn test_isolated_node() {
        let model = valid_model().with_node(SimNode::queue("orphan", 10, QueueDiscipline::Fifo));
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::IsolatedNode { id } if id.as_str() == "orphan")));
        assert!(report.messages().iter().any(|m| m.contains("isolated")));
        assert!(report.has(|i| matches!(i, ValidationIssue::Disconnected { unreachable: 1 })));
    }

    #[test]
    fn test_disconnected_components() {
        let model = valid_model()
            .with_node(SimNode::source("src2", fixed(1.0)))
            .with_node(SimNode::sink("sink2"))
            .with_edge("src2", "sink2");
        let report = validate_model(&model);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::Disconnected { unreachable: 2 }]
        );
    }

    #[test]
    fn test_negative_fixed_time() {
        let mut model = valid_model();
        model.nodes[0] = SimNode::source("src", fixed(-1.0));
        let report = validate_model(&model);
        assert!(!report.is_valid());
        assert!(report
            .messages()
            .iter()
            .any(|m| m.contains("fixed value must be >= 0")));
    }

    #[test]
    fn test_zero_resources() {
        let mut model = valid_model();
        model.nodes[2] = SimNode::process("p1", fixed(3.0), 0);
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::NoResources { .. })));
        assert!(report.messages().iter().any(|m| m.contains("resourceCount")));
    }

    #[test]
    fn test_zero_inter_arrival_is_runaway() {
        let mut model = valid_model();
        model.nodes[0] = SimNode::source("src", fixed(0.0));
        let report = validate_model(&model);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::ZeroInterArrival {
                node: "src".into()
            }]
        );
    }

    #[test]
    fn test_distribution_rules() {
        assert_eq!(
            distribution_issues(&Distribution::Exponential { mean: 0.0 }),
            vec![DistributionIssue::NonPositiveMean]
        );
        assert_eq!(
            distribution_issues(&Distribution::Normal {
                mean: 1.0,
                stddev: -1.0
            }),
            vec![DistributionIssue::NegativeStddev]
        );
        assert_eq!(
            distribution_issues(&Distribution::Uniform { min: -1.0, max: -2.0 }),
            vec![
                DistributionIssue::NegativeMin { kind: "uniform" },
                DistributionIssue::MaxBelowMin { kind: "uniform" }
            ]
        );
        assert_eq!(
            distribution_issues(&Distribution::Triangular {
                min: 4.0,
                mode: 5.0,
                max: 3.0
            }),
            vec![DistributionIssue::MaxBelowMin { kind: "triangular" }]
        );
        assert_eq!(
            distribution_issues(&Distribution::Triangular {
                min: 1.0,
                mode: 5.0,
                max: 3.0
            }),
            vec![DistributionIssue::ModeOutOfRange]
        );
        assert_eq!(
            distribution_issues(&Distribution::Triangular {
                min: 1.0,
                mode: 0.5,
                max: 3.0
            }),
            vec![DistributionIssue::ModeOutOfRange]
        );
        assert_eq!(
            distribution_issues(&Distribution::Fixed { value: f64::NAN }),
            vec![DistributionIssue::NonFinite]
        );
        // Normal may have a mean near zero; samples are clamped.
        assert!(distribution_issues(&Distribution::Normal {
            mean: 0.1,
            stddev: 5.0
        })
        .is_empty());
    }

    #[test]
    fn test_config_rules() {
        let mut model = valid_model();
        model.config.duration = 0.0;
        model.config.warmup_period = -1.0;
        let report = validate_model(&model);
        assert!(report.has(|i| matches!(i, ValidationIssue::NonPositiveDuration { .. })));
        assert!(report.has(|i| matches!(i, ValidationIssue::NegativeWarmup { .. })));

        let mut model = valid_model();
        model.config.duration = MAX_SIMULATION_DURATION + 1.0;
        assert!(validate_model(&model).has(|i| matches!(i, ValidationIssue::DurationTooLong { .. })));

        let mut model = valid_model();
        model.config.warmup_period = 100.0;
        assert!(validate_model(&model).has(|i| matches!(i, ValidationIssue::WarmupCoversRun { .. })));
    }

    #[test]
    fn test_too_many_nodes() {
        let mut model = valid_model();
        for i in 0..MAX_NODES {
            let id = format!("extra{i}");
            model = model
                .with_node(SimNode::queue(id.as_str(), 0, QueueDiscipline::Fifo))
                .with_edge(id.as_str(), "p1");
        }
        let report = validate_model(&model);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::TooManyNodes {
                count: MAX_NODES + 4,
                max: MAX_NODES
            }]
        );
    }

    #[test]
    fn test_reports_every_issue() {
        let mut model = valid_model();
        model.nodes[0] = SimNode::source("src", Distribution::Exponential { mean: -1.0 });
        model.nodes[2] = SimNode::process("p1", fixed(-2.0), 0);
        model.config.duration = -5.0;
        let report = validate_model(&model);
        assert_eq!(report.errors.len(), 4, "{report}");
    }
}
