//! TOML configuration for building a scale registry
//!
//! ```toml
//! system = "geological"
//! length = "500 km"
//! temperature = 1300
//! stress = "10 MPa"
//! viscosity = "1e21 Pa*s"
//! ```
//!
//! Missing entries fall back to the system defaults. Bare numbers take the
//! system's default unit.

use super::factories::{make_registry, ScaleInput, ScaleInputs};
use super::registry::{ScaleRegistry, UnitSystem};
use crate::error::{Result, ScalingError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One configured scale: a number or `"<number> <unit>"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ScaleValue {
    fn to_input(&self) -> Result<ScaleInput> {
        match self {
            ScaleValue::Integer(n) => Ok(ScaleInput::from(*n)),
            ScaleValue::Number(x) => Ok(ScaleInput::from(*x)),
            ScaleValue::Text(text) => ScaleInput::parse(text),
        }
    }
}

/// Registry configuration as read from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    #[serde(default = "default_system")]
    pub system: UnitSystem,
    #[serde(default)]
    pub length: Option<ScaleValue>,
    #[serde(default)]
    pub temperature: Option<ScaleValue>,
    #[serde(default)]
    pub stress: Option<ScaleValue>,
    #[serde(default)]
    pub viscosity: Option<ScaleValue>,
}

fn default_system() -> UnitSystem {
    UnitSystem::Geological
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            system: default_system(),
            length: None,
            temperature: None,
            stress: None,
            viscosity: None,
        }
    }
}

impl ScaleConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    /// Returns [`ScalingError::Config`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScalingError::Config(format!("Failed to parse scale config: {e}")))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ScalingError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScalingError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "Loaded scale config");
        Self::from_toml_str(&content)
    }

    /// Resolve to registry inputs, filling gaps with the system defaults
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] for a malformed value string.
    pub fn inputs(&self) -> Result<ScaleInputs> {
        let mut inputs = ScaleInputs::defaults_for(self.system);
        if let Some(v) = &self.length {
            inputs.length = v.to_input()?;
        }
        if let Some(v) = &self.temperature {
            inputs.temperature = v.to_input()?;
        }
        if let Some(v) = &self.stress {
            inputs.stress = v.to_input()?;
        }
        if let Some(v) = &self.viscosity {
            inputs.viscosity = v.to_input()?;
        }
        Ok(inputs)
    }

    /// Build the configured registry
    ///
    /// # Errors
    /// Propagates parse and validation failures from [`make_registry`].
    pub fn build(&self) -> Result<ScaleRegistry> {
        make_registry(self.system, &self.inputs()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_config_is_geological_default() {
        let config = ScaleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScaleConfig::default());
        let g = config.build().unwrap();
        assert_eq!(g.system(), UnitSystem::Geological);
        assert_relative_eq!(g.length(), 1e6);
    }

    #[test]
    fn test_mixed_values() {
        let config = ScaleConfig::from_toml_str(
            r#"
            system = "si"
            length = "2 km"
            temperature = 1600
            viscosity = 1e21
            "#,
        )
        .unwrap();
        assert_eq!(config.system, UnitSystem::Si);
        let g = config.build().unwrap();
        assert_relative_eq!(g.length(), 2000.0);
        assert_relative_eq!(g.temperature(), 1600.0);
        assert_relative_eq!(g.viscosity(), 1e21);
        assert_relative_eq!(g.stress(), 10.0);
    }

    #[test]
    fn test_dimensionless_config_rejects_units() {
        let config = ScaleConfig::from_toml_str(
            r#"
            system = "dimensionless"
            length = "3 m"
            "#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(ScalingError::Validation(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ScaleConfig::from_toml_str("system = 4"),
            Err(ScalingError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScaleConfig::from_file("/nonexistent/scales.toml"),
            Err(ScalingError::Config(_))
        ));
    }
}
