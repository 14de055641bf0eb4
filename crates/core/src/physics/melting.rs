//! Melting parameterizations
//!
//! A material may carry several melting laws of different kinds; they are
//! collected as a closed [`MeltingLaw`] enum.

use super::phase_diagram::PhaseDiagramTable;
use super::{argument, consistent_scalar, require_scalar};
use crate::core_types::Quantity;
use crate::error::{Result, ScalingError};
use crate::nondim::{FieldTransform, ParameterSet};

/// Melt fraction rising linearly from solidus to liquidus
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMelting {
    solidus: Quantity<f64>,
    liquidus: Quantity<f64>,
    dimensional: bool,
}

impl LinearMelting {
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] unless both are
    /// temperatures and [`ScalingError::Validation`] unless both are single
    /// values with the liquidus above the solidus.
    pub fn new(solidus: Quantity<f64>, liquidus: Quantity<f64>) -> Result<Self> {
        let solidus = require_scalar(solidus, "K")?;
        let liquidus = require_scalar(liquidus, "K")?;
        if consistent_scalar(&liquidus) <= consistent_scalar(&solidus) {
            return Err(ScalingError::Validation(
                "liquidus must be above solidus".to_string(),
            ));
        }
        Ok(Self {
            solidus,
            liquidus,
            dimensional: true,
        })
    }

    pub fn solidus(&self) -> &Quantity<f64> {
        &self.solidus
    }

    pub fn liquidus(&self) -> &Quantity<f64> {
        &self.liquidus
    }

    /// Melt fraction in [0, 1] at `temperature`
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] if `temperature` is in a
    /// different state than the law.
    pub fn melt_fraction(&self, temperature: &Quantity<f64>) -> Result<f64> {
        let t = argument(temperature, self.dimensional)?;
        let ts = consistent_scalar(&self.solidus);
        let tl = consistent_scalar(&self.liquidus);
        Ok(((t - ts) / (tl - ts)).clamp(0.0, 1.0))
    }
}

impl ParameterSet for LinearMelting {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            solidus: fields.quantity(&self.solidus)?,
            liquidus: fields.quantity(&self.liquidus)?,
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

/// Any supported melting law
#[derive(Debug, Clone, PartialEq)]
pub enum MeltingLaw {
    Linear(LinearMelting),
    Table(PhaseDiagramTable),
}

impl MeltingLaw {
    /// Melt fraction at `pressure` and `temperature`
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] on a state mismatch.
    pub fn melt_fraction(
        &self,
        pressure: &Quantity<f64>,
        temperature: &Quantity<f64>,
    ) -> Result<f64> {
        match self {
            MeltingLaw::Linear(law) => law.melt_fraction(temperature),
            MeltingLaw::Table(table) => table.melt_fraction(pressure, temperature),
        }
    }
}

impl From<LinearMelting> for MeltingLaw {
    fn from(law: LinearMelting) -> Self {
        MeltingLaw::Linear(law)
    }
}

impl From<PhaseDiagramTable> for MeltingLaw {
    fn from(table: PhaseDiagramTable) -> Self {
        MeltingLaw::Table(table)
    }
}

impl ParameterSet for MeltingLaw {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(match self {
            MeltingLaw::Linear(law) => MeltingLaw::Linear(law.transform(fields)?),
            MeltingLaw::Table(table) => MeltingLaw::Table(table.transform(fields)?),
        })
    }

    fn is_dimensional(&self) -> bool {
        match self {
            MeltingLaw::Linear(law) => law.is_dimensional(),
            MeltingLaw::Table(table) => table.is_dimensional(),
        }
    }

    fn with_dimensional(self, dimensional: bool) -> Self {
        match self {
            MeltingLaw::Linear(law) => MeltingLaw::Linear(law.with_dimensional(dimensional)),
            MeltingLaw::Table(table) => MeltingLaw::Table(table.with_dimensional(dimensional)),
        }
    }
}
