//! Plain unit-bearing values
//!
//! A [`Measure`] is a number (or array) with a unit attached and no notion of
//! scaling state. It is what physical inputs look like before they enter the
//! scaling engine, and what [`Quantity::unit_value`](super::Quantity::unit_value)
//! hands back.

use super::float::Float;
use super::payload::Payload;
use super::unit::Unit;
use crate::error::{Result, ScalingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// Numeric payload with an attached unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure<T: Float> {
    value: Payload<T>,
    unit: Unit,
}

impl<T: Float> Measure<T> {
    /// Attach `unit` to `value`
    pub fn new(value: impl Into<Payload<T>>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    /// Attach the unit described by `expr` to `value`
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] if `expr` is not a valid unit.
    pub fn with_unit(value: impl Into<Payload<T>>, expr: &str) -> Result<Self> {
        Ok(Self::new(value, Unit::parse(expr)?))
    }

    /// Parse `"<number> <unit>"` (e.g. `"1000 km"`, `"1e20 Pa*s"`); a bare
    /// number is dimensionless
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] for a bad number or unit.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (number, unit) = match text.split_once(char::is_whitespace) {
            Some((number, unit)) => (number, Some(unit.trim())),
            None => (text, None),
        };
        let value: f64 = number.parse().map_err(|_| ScalingError::UnitParse {
            input: text.to_string(),
            reason: format!("invalid number '{number}'"),
        })?;
        let unit = match unit {
            Some(expr) if !expr.is_empty() => Unit::parse(expr)?,
            _ => Unit::dimensionless(),
        };
        Ok(Self::new(T::cast_from_f64(value), unit))
    }

    /// Numeric payload in this measure's unit
    #[inline]
    pub fn value(&self) -> &Payload<T> {
        &self.value
    }

    /// Attached unit
    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Scalar value, if the payload is a scalar
    pub fn scalar(&self) -> Option<T> {
        self.value.as_scalar()
    }

    /// Split into payload and unit
    pub fn into_parts(self) -> (Payload<T>, Unit) {
        (self.value, self.unit)
    }

    /// Same value in the SI-preferred unit of its dimension
    pub fn to_si(&self) -> Measure<T> {
        let unit = &self.unit;
        Measure {
            value: self.value.map_f64(|x| unit.to_si(x)),
            unit: self.unit.preferred(),
        }
    }

    /// Same value expressed in `target`
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] when dimensions differ.
    pub fn convert_to(&self, target: &Unit) -> Result<Measure<T>> {
        self.unit.ensure_compatible(target)?;
        let unit = &self.unit;
        Ok(Measure {
            value: self.value.map_f64(|x| target.from_si(unit.to_si(x))),
            unit: target.clone(),
        })
    }

    /// Sum, expressed in this measure's unit
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] when dimensions differ.
    pub fn checked_add(&self, rhs: &Measure<T>) -> Result<Measure<T>> {
        let rhs = rhs.convert_to(&self.unit)?;
        Ok(Measure {
            value: self.value.zip_map(&rhs.value, |a, b| a + b),
            unit: self.unit.clone(),
        })
    }

    /// Difference, expressed in this measure's unit
    ///
    /// # Errors
    /// Returns [`ScalingError::IncompatibleUnits`] when dimensions differ.
    pub fn checked_sub(&self, rhs: &Measure<T>) -> Result<Measure<T>> {
        let rhs = rhs.convert_to(&self.unit)?;
        Ok(Measure {
            value: self.value.zip_map(&rhs.value, |a, b| a - b),
            unit: self.unit.clone(),
        })
    }
}

impl<T: Float> Mul for Measure<T> {
    type Output = Measure<T>;

    fn mul(self, rhs: Measure<T>) -> Measure<T> {
        Measure {
            value: self.value.zip_map(&rhs.value, |a, b| a * b),
            unit: &self.unit * &rhs.unit,
        }
    }
}

impl<T: Float> Div for Measure<T> {
    type Output = Measure<T>;

    fn div(self, rhs: Measure<T>) -> Measure<T> {
        Measure {
            value: self.value.zip_map(&rhs.value, |a, b| a / b),
            unit: &self.unit / &rhs.unit,
        }
    }
}

impl<T: Float> Mul<T> for Measure<T> {
    type Output = Measure<T>;

    fn mul(self, rhs: T) -> Measure<T> {
        Measure {
            value: self.value.map(|a| a * rhs),
            unit: self.unit,
        }
    }
}

impl<T: Float> Div<T> for Measure<T> {
    type Output = Measure<T>;

    fn div(self, rhs: T) -> Measure<T> {
        Measure {
            value: self.value.map(|a| a / rhs),
            unit: self.unit,
        }
    }
}

impl<T: Float> fmt::Display for Measure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Payload::Scalar(x) => write!(f, "{x}")?,
            Payload::Array(v) => {
                let items: Vec<String> = v.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))?;
            }
        }
        if self.unit.is_dimensionless() && self.unit.factor() == 1.0 {
            Ok(())
        } else {
            write!(f, " {}", self.unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_with_unit() {
        let m: Measure<f64> = Measure::parse("1e20 Pa*s").unwrap();
        assert_eq!(m.scalar(), Some(1e20));
        assert_eq!(m.unit().to_string(), "Pa*s");
    }

    #[test]
    fn test_parse_bare_number_is_dimensionless() {
        let m: Measure<f64> = Measure::parse(" 10 ").unwrap();
        assert!(m.unit().is_dimensionless());
        assert_eq!(m.to_string(), "10");
    }

    #[test]
    fn test_to_si_celsius() {
        let m: Measure<f64> = Measure::with_unit(1000.0_f64, "°C").unwrap();
        let si = m.to_si();
        assert_relative_eq!(si.scalar().unwrap(), 1273.15);
        assert_eq!(si.unit().to_string(), "K");
    }

    #[test]
    fn test_convert_array() {
        let m: Measure<f32> = Measure::with_unit(vec![1.0_f32, 2.5], "km").unwrap();
        let c = m.convert_to(&Unit::parse("m").unwrap()).unwrap();
        assert_eq!(c.value().get(1), Some(2500.0_f32));
    }

    #[test]
    fn test_product_combines_units() {
        let stress: Measure<f64> = Measure::with_unit(10.0_f64, "MPa").unwrap();
        let area: Measure<f64> = Measure::with_unit(2.0_f64, "m^2").unwrap();
        let force = (stress * area).to_si();
        assert_relative_eq!(force.scalar().unwrap(), 2e7);
        assert!(force
            .unit()
            .dimension()
            .approx_eq(&Unit::parse("N").unwrap().dimension()));
    }

    #[test]
    fn test_checked_add_converts_rhs() {
        let a: Measure<f64> = Measure::with_unit(1.0_f64, "km").unwrap();
        let b: Measure<f64> = Measure::with_unit(500.0_f64, "m").unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_relative_eq!(sum.scalar().unwrap(), 1.5);
        let t: Measure<f64> = Measure::with_unit(1.0_f64, "s").unwrap();
        assert!(a.checked_sub(&t).is_err());
    }
}
