use crate::config::toml_config::EngineConfig;
use crate::core::{metrics, validator, visibility};
use crate::core::{DerivedResult, InvalidInput, RawInputs, ValidInputs};

/// Maps an input vector to its derived result.
///
/// Stateless: every call recomputes from scratch, so the last complete vector
/// passed in always wins.
#[derive(Debug, Clone, Default)]
pub struct AffordabilityCalculator {
    config: EngineConfig,
}

impl AffordabilityCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, raw: &RawInputs) -> Result<DerivedResult, InvalidInput> {
        let inputs = validator::validate(raw, &self.config)?;
        Ok(self.calculate_valid(&inputs))
    }

    pub fn calculate_valid(&self, inputs: &ValidInputs) -> DerivedResult {
        let mut result = metrics::derive(inputs, &self.config);
        result.visibility = visibility::evaluate(inputs, &result);
        result
    }
}

/// One-shot form of [`AffordabilityCalculator::calculate`].
pub fn calculate(raw: &RawInputs, config: &EngineConfig) -> Result<DerivedResult, InvalidInput> {
    AffordabilityCalculator::new(config.clone()).calculate(raw)
}
