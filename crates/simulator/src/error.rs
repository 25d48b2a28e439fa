//! Errors from loading and running models.

use flowsim_simulation::SimulationError;
use flowsim_validation::ValidationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Why a model could not be run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The model failed validation. Nothing was simulated.
    #[error("Model is invalid:\n{0}")]
    Invalid(ValidationReport),

    /// The run itself failed.
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
}
