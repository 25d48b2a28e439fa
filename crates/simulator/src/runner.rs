//! Validate, configure and run a model.

use crate::config::SimulatorConfig;
use crate::error::RunError;
use flowsim_simulation::{RunStats, SimEngine};
use flowsim_types::{ProcessModel, SimConfig, SimResult};
use flowsim_validation::{validate_model, ValidationReport};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Config the run actually used, after overrides.
    pub config: SimConfig,
    pub result: SimResult,
    pub stats: RunStats,
}

/// Runs models under a fixed [`SimulatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The model as it will be run: its config with overrides applied.
    pub fn prepare(&self, model: &ProcessModel) -> ProcessModel {
        let mut model = model.clone();
        model.config = model.config.with_overrides(&self.config.overrides);
        model
    }

    /// Validate the prepared model without running it.
    pub fn validate(&self, model: &ProcessModel) -> ValidationReport {
        validate_model(&self.prepare(model))
    }

    /// Validate and run `model`.
    pub fn run(&self, model: &ProcessModel) -> Result<RunReport, RunError> {
        let model = self.prepare(model);

        let report = validate_model(&model);
        if !report.is_valid() {
            debug!(model = %model.id, issues = report.errors.len(), "Model rejected");
            return Err(RunError::Invalid(report));
        }

        let engine = SimEngine::with_config(&model, self.config.engine);
        let mut log_progress = |percent: u8| info!(percent, "Simulation progress");
        let (result, stats) = if self.config.log_progress {
            engine.with_observer(&mut log_progress).run_with_stats()?
        } else {
            engine.run_with_stats()?
        };

        Ok(RunReport {
            config: model.config,
            result,
            stats,
        })
    }
}

/// Read a model from a JSON file.
pub fn load_model(path: impl AsRef<Path>) -> Result<ProcessModel, RunError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = serde_json::from_str(&text)?;
    Ok(model)
}
