//! Flowsim Simulator
//!
//! The calling layer around the simulation engine: load a model, merge
//! run-time config overrides, validate, run.
//!
//! # Example
//!
//! ```ignore
//! use flowsim_simulator::{load_model, Simulator, SimulatorConfig};
//!
//! let model = load_model("line.json")?;
//! let simulator = Simulator::new(SimulatorConfig::new().with_seed(7));
//! let report = simulator.run(&model)?;
//!
//! println!("Throughput: {:.3}", report.result.summary.throughput);
//! ```

pub mod config;
mod error;
mod runner;

pub use config::SimulatorConfig;
pub use error::RunError;
pub use runner::{load_model, RunReport, Simulator};
