//! Thermal conductivity

use super::{consistent_scalar, require_scalar};
use crate::core_types::Quantity;
use crate::error::Result;
use crate::nondim::{FieldTransform, ParameterSet};
use serde::{Deserialize, Serialize};

/// Temperature-independent conductivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantConductivity {
    k: Quantity<f64>,
    dimensional: bool,
}

impl ConstantConductivity {
    /// # Errors
    /// Returns [`IncompatibleUnits`](crate::ScalingError::IncompatibleUnits)
    /// unless `k` is a conductivity.
    pub fn new(k: Quantity<f64>) -> Result<Self> {
        Ok(Self {
            k: require_scalar(k, "W/m/K")?,
            dimensional: true,
        })
    }

    /// Conductivity in W/(m·K)
    ///
    /// # Errors
    /// Only fails if the unit table is broken.
    pub fn from_value(k: f64) -> Result<Self> {
        Self::new(Quantity::parse(k, "W/m/K")?)
    }

    pub fn k(&self) -> &Quantity<f64> {
        &self.k
    }

    /// Conductivity in consistent units
    pub fn conductivity(&self) -> f64 {
        consistent_scalar(&self.k)
    }
}

impl ParameterSet for ConstantConductivity {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            k: fields.quantity(&self.k)?,
            dimensional: self.dimensional,
        })
    }

    fn is_dimensional(&self) -> bool {
        self.dimensional
    }

    fn with_dimensional(mut self, dimensional: bool) -> Self {
        self.dimensional = dimensional;
        self
    }
}
