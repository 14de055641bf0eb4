//! Quantity wrapper that remembers its unit and scaling state
//!
//! A [`Quantity`] stores the numeric payload with the unit stripped off, the
//! unit that payload is (or was) expressed in, and a [`DimState`] tag. The unit
//! never changes across a non-dimensionalize/dimensionalize round trip, which
//! is what makes restoring the original unit exact.
//!
//! # Arithmetic
//! - `Quantity ⊗ T` keeps unit and state
//! - `Quantity ⊗ Quantity` via `checked_*` combines units and requires equal states
//! - `Quantity ⊗ Measure` keeps units attached and yields a [`Measure`]
//! - `Quantity ⊗ DVector<T>` drops unit metadata and yields a bare `DVector<T>`

use super::float::Float;
use super::measure::Measure;
use super::payload::Payload;
use super::unit::Unit;
use crate::error::{Result, ScalingError};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Range, Sub};

/// Whether a payload is in physical units or scaled to a pure number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimState {
    /// Payload is expressed in the quantity's unit
    Dimensional,
    /// Payload was divided by its characteristic scale
    Nondimensional,
}

/// State-dependent view returned by [`Quantity::value`]
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue<T: Float> {
    /// Dimensional payload with its unit attached
    WithUnit(Measure<T>),
    /// Non-dimensional payload
    Plain(Payload<T>),
}

/// Numeric payload tagged with a unit and a dimensional state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity<T: Float> {
    value: Payload<T>,
    unit: Unit,
    state: DimState,
}

impl<T: Float> Quantity<T> {
    /// Dimensional quantity: `value` expressed in `unit`
    pub fn new(value: impl Into<Payload<T>>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
            state: DimState::Dimensional,
        }
    }

    /// Dimensional quantity with a unit given as text
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] if `expr` is not a valid unit.
    pub fn parse(value: impl Into<Payload<T>>, expr: &str) -> Result<Self> {
        Ok(Self::new(value, Unit::parse(expr)?))
    }

    /// Bare number without a unit; already non-dimensional
    pub fn from_number(value: impl Into<Payload<T>>) -> Self {
        Self {
            value: value.into(),
            unit: Unit::dimensionless(),
            state: DimState::Nondimensional,
        }
    }

    /// Assemble from raw parts (used by the conversion operations)
    pub fn from_parts(value: Payload<T>, unit: Unit, state: DimState) -> Self {
        Self { value, unit, state }
    }

    /// True if the payload is expressed in physical units
    #[inline]
    pub fn is_dimensional(&self) -> bool {
        self.state == DimState::Dimensional
    }

    /// Current dimensional state
    #[inline]
    pub fn state(&self) -> DimState {
        self.state
    }

    /// Retained unit
    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Numeric payload with the unit stripped
    #[inline]
    pub fn numeric_value(&self) -> &Payload<T> {
        &self.value
    }

    /// Scalar payload, if any
    pub fn scalar(&self) -> Option<T> {
        self.value.as_scalar()
    }

    /// Payload with the retained unit attached
    pub fn unit_value(&self) -> Measure<T> {
        Measure::new(self.value.clone(), self.unit.clone())
    }

    /// Unit-attached payload when dimensional, the bare payload otherwise
    pub fn value(&self) -> StateValue<T> {
        match self.state {
            DimState::Dimensional => StateValue::WithUnit(self.unit_value()),
            DimState::Nondimensional => StateValue::Plain(self.value.clone()),
        }
    }

    /// Payload in SI-preferred units when dimensional, unchanged otherwise
    ///
    /// Useful for evaluating formulas that must work in both states.
    pub fn consistent_value(&self) -> Payload<T> {
        match self.state {
            DimState::Dimensional => {
                let unit = &self.unit;
                self.value.map_f64(|x| unit.to_si(x))
            }
            DimState::Nondimensional => self.value.clone(),
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// True for an empty array payload
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Element `index` as a scalar quantity with the same unit and state
    pub fn at(&self, index: usize) -> Option<Quantity<T>> {
        self.value.get(index).map(|x| Quantity {
            value: Payload::Scalar(x),
            unit: self.unit.clone(),
            state: self.state,
        })
    }

    /// Sub-range as an array quantity with the same unit and state
    pub fn slice(&self, range: Range<usize>) -> Option<Quantity<T>> {
        self.value.slice(range).map(|value| Quantity {
            value,
            unit: self.unit.clone(),
            state: self.state,
        })
    }

    /// Overwrite one payload element; unit and state are untouched
    ///
    /// # Errors
    /// Returns [`ScalingError::IndexOutOfBounds`] when `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.value.set(index, value)
    }

    fn same_state(&self, rhs: &Quantity<T>) -> Result<()> {
        if self.state == rhs.state {
            Ok(())
        } else {
            Err(ScalingError::StateMismatch)
        }
    }

    /// Product; units multiply
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] for mixed states.
    pub fn checked_mul(&self, rhs: &Quantity<T>) -> Result<Quantity<T>> {
        self.same_state(rhs)?;
        Ok(Quantity {
            value: self.value.zip_map(&rhs.value, |a, b| a * b),
            unit: &self.unit * &rhs.unit,
            state: self.state,
        })
    }

    /// Quotient; units divide
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] for mixed states.
    pub fn checked_div(&self, rhs: &Quantity<T>) -> Result<Quantity<T>> {
        self.same_state(rhs)?;
        Ok(Quantity {
            value: self.value.zip_map(&rhs.value, |a, b| a / b),
            unit: &self.unit / &rhs.unit,
            state: self.state,
        })
    }

    /// Sum in the left operand's unit
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] for mixed states and
    /// [`ScalingError::IncompatibleUnits`] for different dimensions.
    pub fn checked_add(&self, rhs: &Quantity<T>) -> Result<Quantity<T>> {
        let rhs = self.aligned(rhs)?;
        Ok(Quantity {
            value: self.value.zip_map(&rhs, |a, b| a + b),
            unit: self.unit.clone(),
            state: self.state,
        })
    }

    /// Difference in the left operand's unit
    ///
    /// # Errors
    /// Returns [`ScalingError::StateMismatch`] for mixed states and
    /// [`ScalingError::IncompatibleUnits`] for different dimensions.
    pub fn checked_sub(&self, rhs: &Quantity<T>) -> Result<Quantity<T>> {
        let rhs = self.aligned(rhs)?;
        Ok(Quantity {
            value: self.value.zip_map(&rhs, |a, b| a - b),
            unit: self.unit.clone(),
            state: self.state,
        })
    }

    /// Right operand's payload expressed like the left operand's
    fn aligned(&self, rhs: &Quantity<T>) -> Result<Payload<T>> {
        self.same_state(rhs)?;
        self.unit.ensure_compatible(&rhs.unit)?;
        match self.state {
            DimState::Dimensional => Ok(rhs.unit_value().convert_to(&self.unit)?.into_parts().0),
            // Equal dimensions share one characteristic scale
            DimState::Nondimensional => Ok(rhs.value.clone()),
        }
    }

    /// Raise payload and unit to a power
    pub fn powf(&self, exp: f64) -> Quantity<T> {
        Quantity {
            value: self.value.map_f64(|x| x.powf(exp)),
            unit: self.unit.powf(exp),
            state: self.state,
        }
    }
}

impl<T: Float> From<Measure<T>> for Quantity<T> {
    fn from(measure: Measure<T>) -> Self {
        let (value, unit) = measure.into_parts();
        Quantity::new(value, unit)
    }
}

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: Float> $trait<T> for Quantity<T> {
            type Output = Quantity<T>;

            fn $method(self, rhs: T) -> Quantity<T> {
                Quantity {
                    value: self.value.map(|a| a $op rhs),
                    unit: self.unit,
                    state: self.state,
                }
            }
        }

        impl<T: Float> $trait<DVector<T>> for Quantity<T> {
            type Output = DVector<T>;

            fn $method(self, rhs: DVector<T>) -> DVector<T> {
                match self.value.zip_map(&Payload::Array(rhs), |a, b| a $op b) {
                    Payload::Array(v) => v,
                    Payload::Scalar(x) => DVector::from_element(1, x),
                }
            }
        }
    };
}

scalar_op!(Add, add, +);
scalar_op!(Sub, sub, -);
scalar_op!(Mul, mul, *);
scalar_op!(Div, div, /);

impl<T: Float> Mul<Measure<T>> for Quantity<T> {
    type Output = Measure<T>;

    fn mul(self, rhs: Measure<T>) -> Measure<T> {
        self.unit_value() * rhs
    }
}

impl<T: Float> Div<Measure<T>> for Quantity<T> {
    type Output = Measure<T>;

    fn div(self, rhs: Measure<T>) -> Measure<T> {
        self.unit_value() / rhs
    }
}

impl<T: Float> fmt::Display for Quantity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            DimState::Dimensional => write!(f, "{}", self.unit_value()),
            DimState::Nondimensional => write!(
                f,
                "{} (non-dimensional, {})",
                Measure::new(self.value.clone(), Unit::dimensionless()),
                self.unit
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn km(values: Vec<f64>) -> Quantity<f64> {
        Quantity::parse(values, "km").unwrap()
    }

    #[test]
    fn test_accessors_follow_state() {
        let q: Quantity<f64> = Quantity::parse(3.0_f64, "cm/yr").unwrap();
        assert!(q.is_dimensional());
        assert_eq!(q.numeric_value(), &Payload::Scalar(3.0));
        assert!(matches!(q.value(), StateValue::WithUnit(_)));

        let n = Quantity::from_parts(
            Payload::Scalar(0.5_f64),
            q.unit().clone(),
            DimState::Nondimensional,
        );
        assert!(matches!(n.value(), StateValue::Plain(Payload::Scalar(x)) if x == 0.5));
        assert_eq!(n.unit_value().unit().to_string(), "cm*yr^-1");
    }

    #[test]
    fn test_bare_number_is_nondimensional() {
        let q: Quantity<f64> = Quantity::from_number(3.05_f64);
        assert!(!q.is_dimensional());
        assert!(q.unit().is_dimensionless());
    }

    #[test]
    fn test_indexing_keeps_tags() {
        let q = km(vec![1.0, 2.0, 3.0]);
        let second = q.at(1).unwrap();
        assert_eq!(second.scalar(), Some(2.0));
        assert_eq!(second.unit(), q.unit());
        assert!(second.is_dimensional());
        assert_eq!(q.slice(0..2).unwrap().len(), 2);
        assert!(q.at(3).is_none());
    }

    #[test]
    fn test_set_mutates_payload_only() {
        let mut q = km(vec![1.0, 2.0]);
        q.set(0, 10.0).unwrap();
        assert_eq!(q.at(0).unwrap().scalar(), Some(10.0));
        assert_eq!(q.unit().to_string(), "km");
        assert!(q.set(5, 1.0).is_err());
    }

    #[test]
    fn test_wrapper_times_wrapper_adds_dimensions() {
        let stress: Quantity<f64> = Quantity::parse(10.0_f64, "MPa").unwrap();
        let time: Quantity<f64> = Quantity::parse(2.0_f64, "s").unwrap();
        let visc = stress.checked_mul(&time).unwrap();
        assert_eq!(visc.scalar(), Some(20.0));
        assert!(visc
            .unit()
            .dimension()
            .approx_eq(&Unit::parse("Pa*s").unwrap().dimension()));
    }

    #[test]
    fn test_wrapper_add_converts_rhs() {
        let a = km(vec![1.0]);
        let b: Quantity<f64> = Quantity::parse(vec![250.0_f64], "m").unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_relative_eq!(sum.at(0).unwrap().scalar().unwrap(), 1.25);
    }

    #[test]
    fn test_mixed_state_rejected() {
        let a = km(vec![1.0]);
        let b = Quantity::from_parts(
            Payload::Scalar(1.0),
            Unit::parse("km").unwrap(),
            DimState::Nondimensional,
        );
        assert_eq!(a.checked_mul(&b), Err(ScalingError::StateMismatch));
    }

    #[test]
    fn test_wrapper_with_measure_keeps_units() {
        let q: Quantity<f64> = Quantity::parse(2.0_f64, "m").unwrap();
        let m: Measure<f64> = Measure::with_unit(3.0_f64, "m").unwrap();
        let area = q * m;
        assert_eq!(area.scalar(), Some(6.0));
        assert_eq!(area.unit().to_string(), "m^2");
    }

    #[test]
    fn test_wrapper_with_array_drops_units() {
        let q: Quantity<f64> = Quantity::parse(2.0_f64, "m").unwrap();
        let out = q * DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(out, DVector::from_vec(vec![2.0, 4.0]));
    }

    #[test]
    fn test_wrapper_with_number_keeps_tags() {
        let q: Quantity<f32> = Quantity::parse(2.0_f32, "MPa").unwrap();
        let doubled = q * 2.0_f32;
        assert_eq!(doubled.scalar(), Some(4.0_f32));
        assert_eq!(doubled.unit().to_string(), "MPa");
    }
}
