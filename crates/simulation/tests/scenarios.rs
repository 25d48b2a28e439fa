//! End-to-end scenarios and whole-run properties.

use flowsim_simulation::{ProgressObserver, SimEngine, SimulationError};
use flowsim_types::{Distribution, ProcessModel, QueueDiscipline, SimConfig, SimNode};
use tracing_test::traced_test;

fn fixed(value: f64) -> Distribution {
    Distribution::Fixed { value }
}

/// Source → Queue → Process → Sink.
fn line(
    inter_arrival: Distribution,
    service: Distribution,
    capacity: usize,
    resources: u32,
    config: SimConfig,
) -> ProcessModel {
    ProcessModel::new("line", "Single line")
        .with_node(SimNode::source("src", inter_arrival))
        .with_node(SimNode::queue("q", capacity, QueueDiscipline::Fifo))
        .with_node(SimNode::process("p", service, resources))
        .with_node(SimNode::sink("sink"))
        .with_edge("src", "q")
        .with_edge("q", "p")
        .with_edge("p", "sink")
        .with_config(config)
}

#[test]
fn test_fixed_arrivals_all_complete() {
    let model = line(fixed(5.0), fixed(3.0), 0, 1, SimConfig::new(42, 100.0));
    let result = SimEngine::new(&model).run().unwrap();

    assert_eq!(result.summary.total_entities, 20);
    assert_eq!(result.node_metrics["p"].processed, 20);
    assert_eq!(result.summary.simulated_time, 100.0);
    assert!((result.summary.throughput - 0.2).abs() < 1e-12);
    assert!(result.bottlenecks.is_empty());
}

#[test]
fn test_queue_capacity_limits_throughput() {
    let model = line(fixed(1.0), fixed(5.0), 2, 1, SimConfig::new(42, 50.0));
    let (result, stats) = SimEngine::new(&model).run_with_stats().unwrap();

    assert!(result.node_metrics["p"].processed < result.summary.total_entities);
    assert!(stats.entities_dropped > 0);
    assert!(result.node_metrics["q"].avg_queue_length <= 2.0);
    // The process is saturated and its queue is full most of the time.
    assert_eq!(result.bottlenecks.len(), 1);
    assert_eq!(result.bottlenecks[0].node_id.as_str(), "p");
}

#[test]
fn test_entity_conservation() {
    for seed in [1, 2, 3, 4, 5] {
        let model = line(
            Distribution::Exponential { mean: 2.0 },
            Distribution::Exponential { mean: 3.0 },
            4,
            1,
            SimConfig::new(seed, 200.0),
        );
        let (result, stats) = SimEngine::new(&model).run_with_stats().unwrap();

        assert_eq!(
            stats.entities_created,
            stats.entities_departed + stats.entities_dropped + stats.entities_in_flight,
            "seed {seed}"
        );
        // Without warmup the summary counts everything.
        assert_eq!(result.summary.total_entities, stats.entities_created);
        assert!(result.summary.total_entities >= result.node_metrics["sink"].processed);
    }
}

#[test]
fn test_utilization_bounds() {
    for seed in 0..5 {
        let model = line(
            Distribution::Exponential { mean: 1.0 },
            Distribution::Exponential { mean: 4.0 },
            0,
            2,
            SimConfig::new(seed, 300.0).with_warmup_period(30.0),
        );
        let result = SimEngine::new(&model).run().unwrap();
        for (id, metrics) in &result.node_metrics {
            assert!(
                (0.0..=1.0).contains(&metrics.utilization),
                "{id}: {}",
                metrics.utilization
            );
        }
    }
}

#[test]
fn test_more_resources_never_raise_utilization() {
    let mut previous = f64::INFINITY;
    for resources in 1..=4 {
        let model = line(
            Distribution::Exponential { mean: 2.0 },
            Distribution::Exponential { mean: 3.0 },
            0,
            resources,
            SimConfig::new(11, 400.0),
        );
        let utilization = SimEngine::new(&model).run().unwrap().node_metrics["p"].utilization;
        assert!(utilization <= previous + 1e-12, "{resources} resources");
        previous = utilization;
    }
}

#[test]
fn test_first_edge_routing() {
    // Two outgoing edges from the process: only the first one is used.
    let model = ProcessModel::new("fork", "Fork")
        .with_node(SimNode::source("src", fixed(2.0)))
        .with_node(SimNode::queue("q", 0, QueueDiscipline::Fifo))
        .with_node(SimNode::process("p", fixed(1.0), 1))
        .with_node(SimNode::sink("a"))
        .with_node(SimNode::sink("b"))
        .with_edge("src", "q")
        .with_edge("q", "p")
        .with_edge("p", "a")
        .with_edge("p", "b")
        .with_config(SimConfig::new(42, 20.0));

    let result = SimEngine::new(&model).run().unwrap();
    assert_eq!(result.node_metrics["a"].processed, 10);
    assert_eq!(result.node_metrics["b"].processed, 0);
}

#[test]
fn test_queue_feeds_first_free_process() {
    // One queue in front of two single-resource processes.
    let model = ProcessModel::new("pool", "Parallel stations")
        .with_node(SimNode::source("src", fixed(1.0)))
        .with_node(SimNode::queue("q", 0, QueueDiscipline::Fifo))
        .with_node(SimNode::process("p1", fixed(1.5), 1))
        .with_node(SimNode::process("p2", fixed(1.5), 1))
        .with_node(SimNode::sink("sink"))
        .with_edge("src", "q")
        .with_edge("q", "p1")
        .with_edge("q", "p2")
        .with_edge("p1", "sink")
        .with_edge("p2", "sink")
        .with_config(SimConfig::new(42, 20.5));

    let (result, stats) = SimEngine::new(&model).run_with_stats().unwrap();
    assert_eq!(stats.entities_dropped, 0);
    // Arrivals alternate between the two stations, nothing waits.
    assert!(result.node_metrics["p1"].processed > 0);
    assert!(result.node_metrics["p2"].processed > 0);
    assert_eq!(result.node_metrics["q"].avg_wait_time, 0.0);
}

#[test]
fn test_queue_without_process_passes_through() {
    let model = ProcessModel::new("relay", "Relay")
        .with_node(SimNode::source("src", fixed(2.0)))
        .with_node(SimNode::queue("q", 0, QueueDiscipline::Fifo))
        .with_node(SimNode::sink("sink"))
        .with_edge("src", "q")
        .with_edge("q", "sink")
        .with_config(SimConfig::new(42, 10.0));

    let result = SimEngine::new(&model).run().unwrap();
    assert_eq!(result.summary.total_entities, 5);
    assert_eq!(result.node_metrics["sink"].processed, 5);
    assert_eq!(result.summary.avg_lead_time, 0.0);
    assert_eq!(result.node_metrics["q"].avg_queue_length, 0.0);
}

#[test]
fn test_warmup_excludes_early_entities() {
    let model = line(
        fixed(5.0),
        fixed(3.0),
        0,
        1,
        SimConfig::new(42, 100.0).with_warmup_period(50.0),
    );
    let result = SimEngine::new(&model).run().unwrap();

    // Arrivals at 50, 55, ..., 95.
    assert_eq!(result.summary.total_entities, 10);
    assert!((result.summary.avg_lead_time - 3.0).abs() < 1e-12);
    // Busy 3 of every 5 time units: WIP averages 0.6 over the window.
    assert!((result.summary.avg_wip - 0.6).abs() < 1e-9);
    assert_eq!(result.time_series.timestamps[0], 50.0);
}

#[test]
fn test_runaway_model_is_an_error() {
    let model = line(fixed(0.0), fixed(1.0), 0, 1, SimConfig::new(42, 10.0));
    let err = SimEngine::new(&model).run().unwrap_err();
    match err {
        SimulationError::EventLimitExceeded { limit, time } => {
            assert_eq!(limit, 1_000_000);
            assert_eq!(time, 0.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

struct Recorder(Vec<u8>);

impl ProgressObserver for Recorder {
    fn on_progress(&mut self, percent: u8) {
        self.0.push(percent);
    }
}

#[test]
fn test_progress_reports() {
    let model = line(fixed(1.0), fixed(0.5), 0, 1, SimConfig::new(42, 100.0));
    let mut recorder = Recorder(Vec::new());
    SimEngine::new(&model)
        .with_observer(&mut recorder)
        .run()
        .unwrap();

    assert_eq!(recorder.0.last(), Some(&100));
    assert!(recorder.0.windows(2).all(|w| w[0] < w[1]));
    assert!(recorder.0.len() >= 10);
}

#[traced_test]
#[test]
fn test_drops_are_logged() {
    let model = ProcessModel::new("direct", "No buffer")
        .with_node(SimNode::source("src", fixed(1.0)))
        .with_node(SimNode::process("p", fixed(3.0), 1))
        .with_node(SimNode::sink("sink"))
        .with_edge("src", "p")
        .with_edge("p", "sink")
        .with_config(SimConfig::new(42, 10.0));

    let (_, stats) = SimEngine::new(&model).run_with_stats().unwrap();
    assert!(stats.entities_dropped > 0);
    assert!(logs_contain("Entity dropped"));
}
