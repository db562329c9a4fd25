pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use adapters::persistence::InputStore;
pub use adapters::presentation::Report;
pub use app::session::CalculatorSession;
pub use config::toml_config::EngineConfig;
pub use crate::core::engine::{calculate, AffordabilityCalculator};
pub use domain::model::{DerivedResult, InputField, Outcome, RawInputs, ValidInputs, Visibility};
pub use utils::error::{AffordError, InvalidInput, Result};
