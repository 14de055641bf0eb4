//! Runtime unit representation
//!
//! A [`Unit`] is a product of symbolic terms (`MPa^-3.05*s^-1`) together with
//! the scale factor that maps one unit to the SI-preferred unit of the same
//! dimension. Absolute temperature units (°C) additionally carry an offset;
//! the offset only applies when the unit stands alone. Inside a product
//! (`J/kg/°C`) a Celsius degree behaves as a Kelvin-sized interval.

use super::dimension::{BaseDimension, Dimension};
use crate::error::{Result, ScalingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

const EXPONENT_EPSILON: f64 = 1e-12;

/// Physical unit with SI conversion data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Symbolic factors and their exponents, in order of appearance
    terms: Vec<(String, f64)>,
    /// SI-preferred value of one unit
    factor: f64,
    /// Additive offset to SI (only non-zero for absolute temperature scales)
    offset: f64,
    dimension: Dimension,
}

impl Unit {
    /// The dimensionless unit `1`
    pub fn dimensionless() -> Self {
        Self {
            terms: Vec::new(),
            factor: 1.0,
            offset: 0.0,
            dimension: Dimension::NONE,
        }
    }

    /// Single named unit
    pub(crate) fn atom(symbol: &str, factor: f64, offset: f64, dimension: Dimension) -> Self {
        Self {
            terms: vec![(symbol.to_string(), 1.0)],
            factor,
            offset,
            dimension,
        }
    }

    /// Parse a unit expression such as `"km"`, `"cm/yr"` or `"MPa^-3.05*s^-1"`
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] for unknown symbols or malformed input.
    pub fn parse(expr: &str) -> Result<Self> {
        super::parse::parse_unit(expr)
    }

    /// Physical dimension
    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// SI-preferred value of one unit
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Offset added after scaling to reach SI (°C → K)
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// True for affine temperature scales such as °C
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }

    /// True when the unit carries no physical dimension
    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// True for the bare `1` unit with no symbolic terms
    fn is_identity(&self) -> bool {
        self.terms.is_empty() && self.factor == 1.0
    }

    /// SI-preferred unit with the same dimension (`km/Myr` → `m*s^-1`)
    pub fn preferred(&self) -> Unit {
        let terms = self
            .dimension
            .decompose()
            .map(|(dim, exp)| (dim.si_symbol().to_string(), exp))
            .collect();
        Unit {
            terms,
            factor: 1.0,
            offset: 0.0,
            dimension: self.dimension,
        }
    }

    /// Express `value` (given in this unit) in SI-preferred units
    #[inline]
    pub fn to_si(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Express an SI-preferred `value` in this unit
    #[inline]
    pub fn from_si(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }

    /// Check that `self` and `target` share a dimension
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] when dimensions differ.
    pub fn ensure_compatible(&self, target: &Unit) -> Result<()> {
        if self.dimension.approx_eq(&target.dimension) {
            Ok(())
        } else {
            Err(ScalingError::IncompatibleUnits {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Convert `value` from this unit into `target`
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] when dimensions differ.
    pub fn convert(&self, value: f64, target: &Unit) -> Result<f64> {
        self.ensure_compatible(target)?;
        Ok(target.from_si(self.to_si(value)))
    }

    /// Raise to a (possibly fractional, possibly negative) power
    pub fn powf(&self, exp: f64) -> Unit {
        if (exp - 1.0).abs() < EXPONENT_EPSILON {
            return self.clone();
        }
        let terms = self
            .terms
            .iter()
            .map(|(sym, e)| (sym.clone(), e * exp))
            .filter(|(_, e)| e.abs() > EXPONENT_EPSILON)
            .collect();
        Unit {
            terms,
            factor: self.factor.powf(exp),
            offset: 0.0,
            dimension: self.dimension.powf(exp),
        }
    }

    /// Base dimensions this unit uses that no scale registry can cover
    pub fn unsupported_dimension(&self) -> Option<BaseDimension> {
        self.dimension
            .decompose()
            .map(|(dim, _)| dim)
            .find(|dim| matches!(dim, BaseDimension::Current | BaseDimension::Luminosity))
    }

    fn product(&self, rhs: &Unit) -> Unit {
        if self.is_identity() {
            return rhs.clone();
        }
        if rhs.is_identity() {
            return self.clone();
        }
        let mut terms = self.terms.clone();
        for (sym, exp) in &rhs.terms {
            match terms.iter_mut().find(|(s, _)| s == sym) {
                Some((_, e)) => *e += exp,
                None => terms.push((sym.clone(), *exp)),
            }
        }
        terms.retain(|(_, e)| e.abs() > EXPONENT_EPSILON);
        Unit {
            terms,
            factor: self.factor * rhs.factor,
            offset: 0.0,
            dimension: self.dimension * rhs.dimension,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::dimensionless()
    }
}

impl Mul<&Unit> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.product(rhs)
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        self.product(&rhs)
    }
}

impl Div<&Unit> for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.product(&rhs.powf(-1.0))
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        self.product(&rhs.powf(-1.0))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "1");
        }
        for (i, (sym, exp)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if (exp - 1.0).abs() < EXPONENT_EPSILON {
                write!(f, "{sym}")?;
            } else {
                write!(f, "{sym}^{exp}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Unit {
    type Err = ScalingError;

    fn from_str(s: &str) -> Result<Self> {
        Unit::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_km_to_m() {
        let km = Unit::parse("km").unwrap();
        let m = Unit::parse("m").unwrap();
        assert_relative_eq!(km.convert(3.0, &m).unwrap(), 3000.0);
    }

    #[test]
    fn test_celsius_offset_applies_alone() {
        let c = Unit::parse("°C").unwrap();
        let k = Unit::parse("K").unwrap();
        assert_relative_eq!(c.convert(1000.0, &k).unwrap(), 1273.15);
        assert_relative_eq!(k.convert(273.15, &c).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_celsius_in_product_is_interval() {
        let per_c = Unit::parse("J/kg/°C").unwrap();
        assert!(!per_c.is_affine());
        assert_relative_eq!(per_c.to_si(1000.0), 1000.0);
    }

    #[test]
    fn test_incompatible_conversion_fails() {
        let km = Unit::parse("km").unwrap();
        let s = Unit::parse("s").unwrap();
        assert!(matches!(
            km.convert(1.0, &s),
            Err(ScalingError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_preferred_form() {
        let v = Unit::parse("cm/yr").unwrap();
        let p = v.preferred();
        assert_eq!(p.to_string(), "m*s^-1");
        assert_eq!(p.factor(), 1.0);
        assert!(p.dimension().approx_eq(&v.dimension()));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let u = Unit::parse("MPa^-3.05 * s^-1").unwrap();
        assert_eq!(u.to_string(), "MPa^-3.05*s^-1");
        let again = Unit::parse(&u.to_string()).unwrap();
        assert_relative_eq!(again.factor(), u.factor(), max_relative = 1e-12);
    }

    #[test]
    fn test_terms_cancel() {
        let u = &Unit::parse("m").unwrap() / &Unit::parse("m").unwrap();
        assert!(u.is_dimensionless());
        assert_eq!(u.to_string(), "1");
    }

    #[test]
    fn test_unsupported_dimension() {
        assert_eq!(
            Unit::parse("A*s").unwrap().unsupported_dimension(),
            Some(BaseDimension::Current)
        );
        assert_eq!(Unit::parse("Pa*s").unwrap().unsupported_dimension(), None);
    }
}
