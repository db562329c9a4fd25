use crate::utils::error::{AffordError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings. Every section is optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: DefaultsConfig,
    pub policy: PolicyConfig,
    pub display: DisplayConfig,
}

/// Values used when an optional input is left blank, and the fixed desired
/// yield of the simpler calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub desired_yield: f64,
    pub rent_inclusion_ratio: f64,
    pub max_debt_ratio: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            desired_yield: 0.05,
            rent_inclusion_ratio: 0.7,
            max_debt_ratio: 0.35,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub ratio_bounds: RatioBounds,
    pub desired_yield: DesiredYieldSource,
    pub situation: SituationPolicy,
}

/// How `maxDebtRatio` and `rentInclusionRatio` outside [0, 1] are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBounds {
    /// Any finite value is accepted; staying in [0, 1] is up to the caller.
    #[default]
    Trust,
    /// Values outside [0, 1] make the whole vector invalid.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredYieldSource {
    /// Yield at which rent alone services the loan under the max debt ratio.
    #[default]
    Derived,
    /// `defaults.desired_yield`, whatever the loan terms.
    Fixed,
}

/// Visibility of the situation (debt ratio) group when inputs are invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SituationPolicy {
    #[default]
    Always,
    HideWhenInvalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub decimal_separator: String,
    pub thousands_separator: String,
    pub percent_decimals: usize,
    pub unknown: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_string(),
            decimal_separator: ",".to_string(),
            thousands_separator: " ".to_string(),
            percent_decimals: 2,
            unknown: "-".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AffordError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AffordError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AffordError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("defaults.desired_yield", self.defaults.desired_yield, 0.0, 1.0)?;
        validation::validate_range(
            "defaults.rent_inclusion_ratio",
            self.defaults.rent_inclusion_ratio,
            0.0,
            1.0,
        )?;
        validation::validate_range("defaults.max_debt_ratio", self.defaults.max_debt_ratio, 0.0, 1.0)?;

        validation::validate_range("display.percent_decimals", self.display.percent_decimals, 1, 2)?;
        validation::validate_non_empty_string("display.decimal_separator", &self.display.decimal_separator)?;
        validation::validate_non_empty_string("display.unknown", &self.display.unknown)?;

        if self.policy.desired_yield == DesiredYieldSource::Fixed && self.defaults.desired_yield <= 0.0 {
            return Err(AffordError::InvalidConfigValueError {
                field: "defaults.desired_yield".to_string(),
                value: self.defaults.desired_yield.to_string(),
                reason: "A fixed desired yield must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.defaults.max_debt_ratio, 0.35);
        assert_eq!(config.policy.situation, SituationPolicy::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_policies() {
        let toml_content = r#"
[defaults]
desired_yield = 0.06

[policy]
ratio_bounds = "strict"
desired_yield = "fixed"
situation = "hide_when_invalid"

[display]
currency_symbol = "$"
decimal_separator = "."
thousands_separator = ","
percent_decimals = 1
"#;

        let config = EngineConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.defaults.desired_yield, 0.06);
        assert_eq!(config.defaults.rent_inclusion_ratio, 0.7);
        assert_eq!(config.policy.ratio_bounds, RatioBounds::Strict);
        assert_eq!(config.policy.desired_yield, DesiredYieldSource::Fixed);
        assert_eq!(config.policy.situation, SituationPolicy::HideWhenInvalid);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.unknown, "-");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = EngineConfig::from_toml_str("[policy]\nratio_bounds = \"clamp\"\n").unwrap_err();
        assert!(matches!(err, AffordError::ConfigError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AFFORDABILITY_TEST_CURRENCY", "CHF");

        let config =
            EngineConfig::from_toml_str("[display]\ncurrency_symbol = \"${AFFORDABILITY_TEST_CURRENCY}\"\n")
                .unwrap();
        assert_eq!(config.display.currency_symbol, "CHF");

        std::env::remove_var("AFFORDABILITY_TEST_CURRENCY");
    }

    #[test]
    fn test_config_validation() {
        let config = EngineConfig::from_toml_str("[defaults]\nmax_debt_ratio = 1.4\n").unwrap();
        assert!(config.validate().is_err());

        let config = EngineConfig::from_toml_str("[display]\npercent_decimals = 4\n").unwrap();
        assert!(config.validate().is_err());

        let config = EngineConfig::from_toml_str(
            "[defaults]\ndesired_yield = 0.0\n[policy]\ndesired_yield = \"fixed\"\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[defaults]\nrent_inclusion_ratio = 0.8\n")
            .unwrap();

        let config = EngineConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.defaults.rent_inclusion_ratio, 0.8);
    }
}
