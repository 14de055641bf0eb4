//! Density laws
//!
//! - Constant density
//! - Linear pressure-temperature dependence
//!   ρ = ρ₀ (1 − α (T − T₀) + β (P − P₀))
//!
//! # Scientific References
//! - Turcotte, D.L. & Schubert, G. (2014). "Geodynamics", 3rd ed., §4.26
//!   Cambridge University Press

use super::{argument, consistent_scalar, require_scalar};
use crate::core_types::Quantity;
use crate::error::Result;
use crate::nondim::{FieldTransform, ParameterSet};
use serde::{Deserialize, Serialize};

/// Density that ignores pressure and temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDensity {
    rho: Quantity<f64>,
    dimensional: bool,
}

impl ConstantDensity {
    /// # Errors
    /// Returns [`IncompatibleUnits`](crate::ScalingError::IncompatibleUnits)
    /// unless `rho` is a density.
    pub fn new(rho: Quantity<f64>) -> Result<Self> {
        Ok(Self {
            rho: require_scalar(rho, "kg/m^3")?,
            dimensional: true,
        })
    }

    /// Density in kg/m³
    ///
    /// # Errors
    /// Only fails if the unit table is broken.
    pub fn from_value(rho: f64) -> Result<Self> {
        Self::new(Quantity::parse(rho, "kg/m^3")?)
    }

    pub fn rho(&self) -> &Quantity<f64> {
        &self.rho
    }

    /// Density in consistent units
    pub fn density(&self) -> f64 {
        consistent_scalar(&self.rho)
    }
}

impl ParameterSet for ConstantDensity {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            rho: fields.quantity(&self.rho)?,
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

/// Density linear in pressure and temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtDensity {
    rho0: Quantity<f64>,
    alpha: Quantity<f64>,
    beta: Quantity<f64>,
    t0: Quantity<f64>,
    p0: Quantity<f64>,
    dimensional: bool,
}

impl PtDensity {
    /// # Arguments
    /// * `rho0` - Reference density
    /// * `alpha` - Thermal expansivity (1/temperature)
    /// * `beta` - Compressibility (1/stress)
    /// * `t0` - Reference temperature
    /// * `p0` - Reference pressure
    ///
    /// # Errors
    /// Returns [`IncompatibleUnits`](crate::ScalingError::IncompatibleUnits)
    /// if any argument has the wrong dimension.
    pub fn new(
        rho0: Quantity<f64>,
        alpha: Quantity<f64>,
        beta: Quantity<f64>,
        t0: Quantity<f64>,
        p0: Quantity<f64>,
    ) -> Result<Self> {
        Ok(Self {
            rho0: require_scalar(rho0, "kg/m^3")?,
            alpha: require_scalar(alpha, "K^-1")?,
            beta: require_scalar(beta, "Pa^-1")?,
            t0: require_scalar(t0, "K")?,
            p0: require_scalar(p0, "Pa")?,
            dimensional: true,
        })
    }

    /// Mantle-like reference: 3300 kg/m³, α = 3e-5 /K, β = 1e-11 /Pa,
    /// T₀ = 0 °C, P₀ = 0 `MPa`
    ///
    /// # Errors
    /// Only fails if the unit table is broken.
    pub fn mantle() -> Result<Self> {
        Self::new(
            Quantity::parse(3300.0, "kg/m^3")?,
            Quantity::parse(3e-5, "K^-1")?,
            Quantity::parse(1e-11, "Pa^-1")?,
            Quantity::parse(0.0, "°C")?,
            Quantity::parse(0.0, "MPa")?,
        )
    }

    pub fn rho0(&self) -> &Quantity<f64> {
        &self.rho0
    }

    /// Density at `pressure` and `temperature`, in consistent units
    ///
    /// # Errors
    /// Returns [`StateMismatch`](crate::ScalingError::StateMismatch) if the
    /// arguments are not in the same state as the parameters.
    pub fn density(&self, pressure: &Quantity<f64>, temperature: &Quantity<f64>) -> Result<f64> {
        let p = argument(pressure, self.dimensional)?;
        let t = argument(temperature, self.dimensional)?;
        let rho0 = consistent_scalar(&self.rho0);
        let alpha = consistent_scalar(&self.alpha);
        let beta = consistent_scalar(&self.beta);
        let t0 = consistent_scalar(&self.t0);
        let p0 = consistent_scalar(&self.p0);
        Ok(rho0 * (1.0 - alpha * (t - t0) + beta * (p - p0)))
    }
}

impl ParameterSet for PtDensity {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            rho0: fields.quantity(&self.rho0)?,
            alpha: fields.quantity(&self.alpha)?,
            beta: fields.quantity(&self.beta)?,
            t0: fields.quantity(&self.t0)?,
            p0: fields.quantity(&self.p0)?,
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

/// Density law attached to a material phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DensityLaw {
    Constant(ConstantDensity),
    PressureTemperature(Box<PtDensity>),
}

impl From<ConstantDensity> for DensityLaw {
    fn from(law: ConstantDensity) -> Self {
        DensityLaw::Constant(law)
    }
}

impl From<PtDensity> for DensityLaw {
    fn from(law: PtDensity) -> Self {
        DensityLaw::PressureTemperature(Box::new(law))
    }
}

impl DensityLaw {
    /// Density at `pressure` and `temperature`, in consistent units
    ///
    /// # Errors
    /// See [`PtDensity::density`].
    pub fn density(&self, pressure: &Quantity<f64>, temperature: &Quantity<f64>) -> Result<f64> {
        match self {
            DensityLaw::Constant(law) => Ok(law.density()),
            DensityLaw::PressureTemperature(law) => law.density(pressure, temperature),
        }
    }
}

impl ParameterSet for DensityLaw {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(match self {
            DensityLaw::Constant(law) => DensityLaw::Constant(law.transform(fields)?),
            DensityLaw::PressureTemperature(law) => {
                DensityLaw::PressureTemperature(Box::new(law.transform(fields)?))
            }
        })
    }

    fn is_dimensional(&self) -> bool {
        match self {
            DensityLaw::Constant(law) => law.is_dimensional(),
            DensityLaw::PressureTemperature(law) => law.is_dimensional(),
        }
    }

    fn with_dimensional(self, dimensional: bool) -> Self {
        match self {
            DensityLaw::Constant(law) => DensityLaw::Constant(law.with_dimensional(dimensional)),
            DensityLaw::PressureTemperature(law) => {
                DensityLaw::PressureTemperature(Box::new((*law).with_dimensional(dimensional)))
            }
        }
    }
}
