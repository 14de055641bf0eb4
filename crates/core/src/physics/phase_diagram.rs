//! Tabulated melt fraction over pressure and temperature
//!
//! A [`PhaseDiagramSource`] keeps the table as it was supplied, with its
//! axes in physical units. The lookup structure [`PhaseDiagramTable`] holds
//! the axes pre-converted to consistent units and is rebuilt from the source
//! whenever the material is scaled, so repeated round trips never accumulate
//! rounding in the axes.

use super::argument;
use crate::core_types::Quantity;
use crate::error::{Result, ScalingError};
use crate::nondim::{nondimensionalize, FieldTransform, ParameterSet};
use crate::scaling::ScaleRegistry;
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

/// Phase-diagram data in physical units
///
/// `melt_fraction[(i, j)]` is the melt fraction at `pressure[i]`,
/// `temperature[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDiagramSource {
    pressure: Quantity<f64>,
    temperature: Quantity<f64>,
    melt_fraction: DMatrix<f64>,
}

impl PhaseDiagramSource {
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] for axes with the wrong
    /// dimension and [`ScalingError::Validation`] when an axis is not
    /// strictly increasing, has fewer than two points, or does not match the
    /// matrix shape.
    pub fn new(
        pressure: Quantity<f64>,
        temperature: Quantity<f64>,
        melt_fraction: DMatrix<f64>,
    ) -> Result<Self> {
        let pressure = super::require_unit(pressure, "Pa")?;
        let temperature = super::require_unit(temperature, "K")?;
        if !pressure.is_dimensional() || !temperature.is_dimensional() {
            return Err(ScalingError::Validation(
                "phase diagram axes must be dimensional".to_string(),
            ));
        }
        check_axis("pressure", &pressure, melt_fraction.nrows())?;
        check_axis("temperature", &temperature, melt_fraction.ncols())?;
        Ok(Self {
            pressure,
            temperature,
            melt_fraction,
        })
    }

    pub fn pressure(&self) -> &Quantity<f64> {
        &self.pressure
    }

    pub fn temperature(&self) -> &Quantity<f64> {
        &self.temperature
    }

    pub fn melt_fraction(&self) -> &DMatrix<f64> {
        &self.melt_fraction
    }
}

fn check_axis(name: &str, axis: &Quantity<f64>, expected: usize) -> Result<()> {
    let values = axis.numeric_value().clone().into_array();
    if values.len() != expected {
        return Err(ScalingError::Validation(format!(
            "{name} axis has {} points but the table has {expected}",
            values.len()
        )));
    }
    if values.len() < 2 {
        return Err(ScalingError::Validation(format!(
            "{name} axis needs at least two points"
        )));
    }
    if values.as_slice().windows(2).any(|w| w[1] <= w[0]) {
        return Err(ScalingError::Validation(format!(
            "{name} axis must be strictly increasing"
        )));
    }
    Ok(())
}

/// Melt-fraction lookup with axes in consistent units
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDiagramTable {
    source: Arc<PhaseDiagramSource>,
    pressure: DVector<f64>,
    temperature: DVector<f64>,
    dimensional: bool,
}

impl PhaseDiagramTable {
    /// Build a lookup from `source`
    ///
    /// With `registry == None` the axes are in SI units and the table is
    /// dimensional; otherwise they are non-dimensionalized with `registry`.
    ///
    /// # Errors
    /// Fails if an axis unit has no characteristic scale.
    pub fn build(
        source: Arc<PhaseDiagramSource>,
        registry: Option<&ScaleRegistry>,
    ) -> Result<Self> {
        let (pressure, temperature) = match registry {
            None => (
                source.pressure.consistent_value().into_array(),
                source.temperature.consistent_value().into_array(),
            ),
            Some(g) => (
                nondimensionalize(&source.pressure, g)?.numeric_value().clone().into_array(),
                nondimensionalize(&source.temperature, g)?.numeric_value().clone().into_array(),
            ),
        };
        Ok(Self {
            source,
            pressure,
            temperature,
            dimensional: registry.is_none(),
        })
    }

    pub fn source(&self) -> &PhaseDiagramSource {
        &self.source
    }

    /// Bilinear melt fraction at `pressure` and `temperature`
    ///
    /// Points outside the table are clamped to its edge.
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] if an argument's state differs
    /// from the table's.
    pub fn melt_fraction(
        &self,
        pressure: &Quantity<f64>,
        temperature: &Quantity<f64>,
    ) -> Result<f64> {
        let p = argument(pressure, self.dimensional)?;
        let t = argument(temperature, self.dimensional)?;
        let (i0, fp) = bracket(&self.pressure, p);
        let (j0, ft) = bracket(&self.temperature, t);
        let m = &self.source.melt_fraction;

        let m00 = m[(i0, j0)];
        let m10 = m[(i0 + 1, j0)];
        let m01 = m[(i0, j0 + 1)];
        let m11 = m[(i0 + 1, j0 + 1)];

        let m0 = m00 * (1.0 - fp) + m10 * fp;
        let m1 = m01 * (1.0 - fp) + m11 * fp;
        Ok(m0 * (1.0 - ft) + m1 * ft)
    }
}

/// Lower cell index and fractional position of `x` on `axis`, clamped
fn bracket(axis: &DVector<f64>, x: f64) -> (usize, f64) {
    let n = axis.len();
    let x = x.clamp(axis[0], axis[n - 1]);
    let upper = axis.as_slice().partition_point(|&a| a <= x);
    let i0 = upper.saturating_sub(1).min(n - 2);
    let frac = (x - axis[i0]) / (axis[i0 + 1] - axis[i0]);
    (i0, frac.clamp(0.0, 1.0))
}

impl ParameterSet for PhaseDiagramTable {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        let registry = (!fields.direction().target_dimensional()).then(|| fields.registry());
        let rebuilt = PhaseDiagramTable::build(Arc::clone(&self.source), registry)?;
        Ok(rebuilt.with_dimensional(self.dimensional))
    }

    fn is_dimensional(&self) -> bool {
        self.dimensional
    }

    fn with_dimensional(mut self, dimensional: bool) -> Self {
        self.dimensional = dimensional;
        self
    }
}
