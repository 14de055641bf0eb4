//! Dislocation (power-law) creep
//!
//! ε̇ = A τⁿ exp(−(E + P V) / (R T))
//!
//! The prefactor unit depends on the stress exponent (`MPa^-n s^-1`), so
//! its characteristic scale is `stress^-n / time` and is resolved through
//! the unit's fractional dimension exponents.
//!
//! # Scientific References
//! - Ranalli, G. (1995). "Rheology of the Earth", 2nd ed., Chapman & Hall
//! - Karato, S. & Wu, P. (1993). "Rheology of the upper mantle: a synthesis"
//!   Science, 260(5109), 771-778

use super::{argument, consistent_scalar, require_scalar};
use crate::core_types::{Quantity, Unit};
use crate::error::{Result, ScalingError};
use crate::nondim::{FieldTransform, ParameterSet};
use serde::{Deserialize, Serialize};

/// Molar gas constant [J/(mol·K)]
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Power-law creep law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerLawCreep {
    /// Material label
    pub name: String,
    a: Quantity<f64>,
    n: Quantity<f64>,
    e: Quantity<f64>,
    v: Quantity<f64>,
    r: Quantity<f64>,
    dimensional: bool,
}

impl PowerLawCreep {
    /// # Arguments
    /// * `a` - Prefactor, dimension stress^-n / time
    /// * `n` - Stress exponent
    /// * `e` - Activation energy (energy / amount)
    /// * `v` - Activation volume (volume / amount)
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] for a wrong dimension and
    /// [`ScalingError::Validation`] for a non-positive stress exponent.
    pub fn new(
        name: impl Into<String>,
        a: Quantity<f64>,
        n: f64,
        e: Quantity<f64>,
        v: Quantity<f64>,
    ) -> Result<Self> {
        if !(n.is_finite() && n > 0.0) {
            return Err(ScalingError::Validation(format!(
                "stress exponent must be positive, got {n}"
            )));
        }
        let prefactor_unit = &Unit::parse("Pa")?.powf(-n) / &Unit::parse("s")?;
        a.unit().ensure_compatible(&prefactor_unit)?;
        if !a.numeric_value().is_scalar() {
            return Err(ScalingError::Validation(
                "creep prefactor must be a single value".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            a,
            n: Quantity::new(n, Unit::dimensionless()),
            e: require_scalar(e, "J/mol")?,
            v: require_scalar(v, "m^3/mol")?,
            r: Quantity::parse(GAS_CONSTANT, "J/mol/K")?,
            dimensional: true,
        })
    }

    /// Law with the prefactor in `MPa^-n s^-1`, E in J/mol and V in m³/mol
    ///
    /// # Errors
    /// See [`PowerLawCreep::new`].
    pub fn from_values(name: &str, a: f64, n: f64, e: f64, v: f64) -> Result<Self> {
        let a_unit = &Unit::parse("MPa")?.powf(-n) / &Unit::parse("s")?;
        Self::new(
            name,
            Quantity::new(a, a_unit),
            n,
            Quantity::parse(e, "J/mol")?,
            Quantity::parse(v, "m^3/mol")?,
        )
    }

    /// Wet quartzite (Ranalli, 1995)
    ///
    /// # Errors
    /// Only fails if the unit table is broken.
    pub fn wet_quartzite() -> Result<Self> {
        Self::from_values("Wet Quartzite | Ranalli (1995)", 3.2e-4, 2.3, 154e3, 0.0)
    }

    /// Prefactor A
    pub fn a(&self) -> &Quantity<f64> {
        &self.a
    }

    /// Stress exponent n
    pub fn n(&self) -> f64 {
        consistent_scalar(&self.n)
    }

    fn arrhenius(&self, pressure: f64, temperature: f64) -> f64 {
        let e = consistent_scalar(&self.e);
        let v = consistent_scalar(&self.v);
        let r = consistent_scalar(&self.r);
        (-(e + pressure * v) / (r * temperature)).exp()
    }

    /// Strain rate at the given stress, pressure and temperature
    ///
    /// # Returns
    /// Strain rate in consistent units (1/s when dimensional)
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] if an argument's state differs
    /// from the law's.
    pub fn strain_rate(
        &self,
        stress: &Quantity<f64>,
        pressure: &Quantity<f64>,
        temperature: &Quantity<f64>,
    ) -> Result<f64> {
        let tau = argument(stress, self.dimensional)?;
        let p = argument(pressure, self.dimensional)?;
        let t = argument(temperature, self.dimensional)?;
        let a = consistent_scalar(&self.a);
        Ok(a * tau.powf(self.n()) * self.arrhenius(p, t))
    }

    /// Stress needed to creep at `strain_rate` (inverse of
    /// [`strain_rate`](Self::strain_rate))
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] if an argument's state differs
    /// from the law's.
    pub fn stress(
        &self,
        strain_rate: &Quantity<f64>,
        pressure: &Quantity<f64>,
        temperature: &Quantity<f64>,
    ) -> Result<f64> {
        let eps = argument(strain_rate, self.dimensional)?;
        let p = argument(pressure, self.dimensional)?;
        let t = argument(temperature, self.dimensional)?;
        let a = consistent_scalar(&self.a);
        Ok((eps / (a * self.arrhenius(p, t))).powf(1.0 / self.n()))
    }
}

impl ParameterSet for PowerLawCreep {
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            a: fields.quantity(&self.a)?,
            n: fields.quantity(&self.n)?,
            e: fields.quantity(&self.e)?,
            v: fields.quantity(&self.v)?,
            r: fields.quantity(&self.r)?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nondim::{dimensionalize_params, nondimensionalize, nondimensionalize_params};
    use crate::scaling::{geo_units, ScaleInputs};
    use approx::assert_relative_eq;

    fn conditions() -> (Quantity<f64>, Quantity<f64>, Quantity<f64>) {
        (
            Quantity::parse(50.0, "MPa").unwrap(),
            Quantity::parse(500.0, "MPa").unwrap(),
            Quantity::parse(600.0, "°C").unwrap(),
        )
    }

    #[test]
    fn test_prefactor_scale_from_fractional_exponent() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let law = PowerLawCreep::from_values("test", 6.3e-2, 3.05, 276e3, 0.0).unwrap();
        let nd = nondimensionalize_params(&law, &g).unwrap();
        assert_relative_eq!(nd.a().scalar().unwrap(), 7.0693e14, max_relative = 1e-3);
        assert_relative_eq!(nd.n(), 3.05);
    }

    #[test]
    fn test_strain_rate_consistent_in_both_states() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let law = PowerLawCreep::wet_quartzite().unwrap();
        let (tau, p, t) = conditions();
        let dim = law.strain_rate(&tau, &p, &t).unwrap();
        assert!(dim > 0.0);

        let nd_law = nondimensionalize_params(&law, &g).unwrap();
        let nd = nd_law
            .strain_rate(
                &nondimensionalize(&tau, &g).unwrap(),
                &nondimensionalize(&p, &g).unwrap(),
                &nondimensionalize(&t, &g).unwrap(),
            )
            .unwrap();
        assert_relative_eq!(nd * g.derived().strain_rate, dim, max_relative = 1e-9);
    }

    #[test]
    fn test_stress_inverts_strain_rate() {
        let law = PowerLawCreep::wet_quartzite().unwrap();
        let (tau, p, t) = conditions();
        let eps = law.strain_rate(&tau, &p, &t).unwrap();
        let eps = Quantity::parse(eps, "s^-1").unwrap();
        assert_relative_eq!(law.stress(&eps, &p, &t).unwrap(), 50e6, max_relative = 1e-9);
    }

    #[test]
    fn test_round_trip_restores_law() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let law = PowerLawCreep::wet_quartzite().unwrap();
        let back = dimensionalize_params(&nondimensionalize_params(&law, &g).unwrap(), &g).unwrap();
        assert!(back.is_dimensional());
        assert_eq!(back.a().unit(), law.a().unit());
        assert_relative_eq!(back.a().scalar().unwrap(), 3.2e-4, max_relative = 1e-10);
    }

    #[test]
    fn test_bad_prefactor_unit() {
        let a = Quantity::parse(1.0, "MPa^-2*s^-1").unwrap();
        let e = Quantity::parse(1.0, "J/mol").unwrap();
        let v = Quantity::parse(0.0, "m^3/mol").unwrap();
        assert!(matches!(
            PowerLawCreep::new("bad", a, 3.0, e, v),
            Err(ScalingError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_array_parameters_rejected() {
        let a = Quantity::parse(vec![1.0, 2.0], "MPa^-3*s^-1").unwrap();
        let e = Quantity::parse(1.0, "J/mol").unwrap();
        let v = Quantity::parse(0.0, "m^3/mol").unwrap();
        assert!(matches!(
            PowerLawCreep::new("array", a, 3.0, e.clone(), v.clone()),
            Err(ScalingError::Validation(_))
        ));

        let a = Quantity::parse(1.0, "MPa^-3*s^-1").unwrap();
        let e = Quantity::parse(vec![1.0, 2.0], "J/mol").unwrap();
        assert!(matches!(
            PowerLawCreep::new("array", a, 3.0, e, v),
            Err(ScalingError::Validation(_))
        ));
    }
}
