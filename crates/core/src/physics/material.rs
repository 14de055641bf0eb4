//! Material phase: the full parameter set of one rock type

use super::conductivity::ConstantConductivity;
use super::creep::PowerLawCreep;
use super::density::DensityLaw;
use super::melting::MeltingLaw;
use super::require_scalar;
use crate::core_types::Quantity;
use crate::error::Result;
use crate::nondim::{FieldTransform, ParameterSet};

/// Parameters of one material phase
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPhase {
    /// Human-readable label
    pub name: String,
    /// Phase number used by the model
    pub phase: usize,
    density: DensityLaw,
    creep: Vec<PowerLawCreep>,
    conductivity: Option<ConstantConductivity>,
    melting: Vec<MeltingLaw>,
    gravity: Quantity<f64>,
    dimensional: bool,
}

impl MaterialPhase {
    /// Phase with only a density law and standard gravity (9.81 m/s²)
    ///
    /// # Errors
    /// Only fails if the unit table is broken.
    pub fn new(
        name: impl Into<String>,
        phase: usize,
        density: impl Into<DensityLaw>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            phase,
            density: density.into(),
            creep: Vec::new(),
            conductivity: None,
            melting: Vec::new(),
            gravity: Quantity::parse(9.81, "m/s^2")?,
            dimensional: true,
        })
    }

    /// Add a creep law
    #[must_use]
    pub fn with_creep(mut self, law: PowerLawCreep) -> Self {
        self.creep.push(law);
        self
    }

    /// Set the conductivity
    #[must_use]
    pub fn with_conductivity(mut self, law: ConstantConductivity) -> Self {
        self.conductivity = Some(law);
        self
    }

    /// Add a melting law
    #[must_use]
    pub fn with_melting(mut self, law: impl Into<MeltingLaw>) -> Self {
        self.melting.push(law.into());
        self
    }

    /// Replace gravitational acceleration
    ///
    /// # Errors
    /// Returns [`IncompatibleUnits`](crate::ScalingError::IncompatibleUnits)
    /// unless `gravity` is an acceleration.
    pub fn with_gravity(mut self, gravity: Quantity<f64>) -> Result<Self> {
        self.gravity = require_scalar(gravity, "m/s^2")?;
        Ok(self)
    }

    pub fn density(&self) -> &DensityLaw {
        &self.density
    }

    pub fn creep(&self) -> &[PowerLawCreep] {
        &self.creep
    }

    pub fn conductivity(&self) -> Option<&ConstantConductivity> {
        self.conductivity.as_ref()
    }

    pub fn melting(&self) -> &[MeltingLaw] {
        &self.melting
    }

    pub fn gravity(&self) -> &Quantity<f64> {
        &self.gravity
    }
}

impl ParameterSet for MaterialPhase {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            phase: self.phase,
            density: fields.nested(&self.density)?,
            creep: fields.collection(&self.creep)?,
            conductivity: self
                .conductivity
                .as_ref()
                .map(|law| fields.nested(law))
                .transpose()?,
            melting: fields.collection(&self.melting)?,
            gravity: fields.quantity(&self.gravity)?,
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
