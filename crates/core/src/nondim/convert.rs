//! Non-dimensionalization and dimensionalization
//!
//! Both directions are pure: they return a new value and never touch the
//! input. Plain numbers and arrays carry no unit and pass through unchanged;
//! only [`Quantity`] payloads are scaled.

use super::compute::characteristic_value;
use crate::core_types::{DimState, Float, Measure, Payload, Quantity, Unit};
use crate::error::Result;
use crate::scaling::ScaleRegistry;
use nalgebra::DVector;
use tracing::trace;

/// Values that can be divided by their characteristic scale
pub trait Nondimensionalize {
    /// Non-dimensional form
    type Output;

    /// Return the non-dimensional form of `self`
    ///
    /// # Errors
    /// Fails if a unit involves a dimension the registry has no scale for.
    fn nondimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output>;
}

/// Values that can be restored to physical units
pub trait Dimensionalize {
    /// Dimensional form
    type Output;

    /// Return the dimensional form of `self`
    ///
    /// # Errors
    /// Fails if a unit involves a dimension the registry has no scale for.
    fn dimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output>;
}

/// Values that know whether they are currently in physical units
pub trait DimensionalState {
    /// True if expressed in physical units
    fn is_dimensional(&self) -> bool;
}

/// Non-dimensionalize `value` with `registry`
///
/// # Errors
/// See [`Nondimensionalize::nondimensionalize`].
pub fn nondimensionalize<V>(value: &V, registry: &ScaleRegistry) -> Result<V::Output>
where
    V: Nondimensionalize + ?Sized,
{
    value.nondimensionalize(registry)
}

/// Dimensionalize `value` with `registry`
///
/// # Errors
/// See [`Dimensionalize::dimensionalize`].
pub fn dimensionalize<V>(value: &V, registry: &ScaleRegistry) -> Result<V::Output>
where
    V: Dimensionalize + ?Sized,
{
    value.dimensionalize(registry)
}

/// Give a non-dimensional number or array the physical unit `unit`
///
/// # Errors
/// Fails if `unit` involves current or luminosity.
pub fn dimensionalize_to<T: Float>(
    value: impl Into<Payload<T>>,
    unit: &Unit,
    registry: &ScaleRegistry,
) -> Result<Measure<T>> {
    let scaled = Quantity::from_parts(value.into(), unit.clone(), DimState::Nondimensional);
    Ok(scaled.dimensionalize(registry)?.unit_value())
}

/// True if `value` is expressed in physical units
pub fn is_dimensional<V: DimensionalState + ?Sized>(value: &V) -> bool {
    value.is_dimensional()
}

impl<T: Float> Nondimensionalize for Quantity<T> {
    type Output = Quantity<T>;

    fn nondimensionalize(&self, registry: &ScaleRegistry) -> Result<Quantity<T>> {
        if !self.is_dimensional() {
            return Ok(self.clone());
        }
        let unit = self.unit();
        let scale = characteristic_value(unit, registry)?;
        trace!(unit = %unit, scale, "Non-dimensionalizing quantity");
        let value = self.numeric_value().map_f64(|x| unit.to_si(x) / scale);
        Ok(Quantity::from_parts(value, unit.clone(), DimState::Nondimensional))
    }
}

impl<T: Float> Dimensionalize for Quantity<T> {
    type Output = Quantity<T>;

    fn dimensionalize(&self, registry: &ScaleRegistry) -> Result<Quantity<T>> {
        if self.is_dimensional() {
            return Ok(self.clone());
        }
        let unit = self.unit();
        let scale = characteristic_value(unit, registry)?;
        trace!(unit = %unit, scale, "Dimensionalizing quantity");
        let value = self.numeric_value().map_f64(|x| unit.from_si(x * scale));
        Ok(Quantity::from_parts(value, unit.clone(), DimState::Dimensional))
    }
}

impl<T: Float> DimensionalState for Quantity<T> {
    fn is_dimensional(&self) -> bool {
        Quantity::is_dimensional(self)
    }
}

impl<T: Float> Nondimensionalize for Measure<T> {
    type Output = Payload<T>;

    fn nondimensionalize(&self, registry: &ScaleRegistry) -> Result<Payload<T>> {
        let wrapped = Quantity::from(self.clone());
        let scaled = wrapped.nondimensionalize(registry)?;
        Ok(scaled.numeric_value().clone())
    }
}

impl<T: Float> Dimensionalize for Measure<T> {
    type Output = Measure<T>;

    fn dimensionalize(&self, _registry: &ScaleRegistry) -> Result<Measure<T>> {
        Ok(self.clone())
    }
}

impl<T: Float> DimensionalState for Measure<T> {
    fn is_dimensional(&self) -> bool {
        true
    }
}

// Unit-free values pass through both directions untouched.
macro_rules! passthrough {
    ($(impl[$($gen:tt)*] $ty:ty;)*) => {
        $(
            impl<$($gen)*> Nondimensionalize for $ty {
                type Output = $ty;

                fn nondimensionalize(&self, _registry: &ScaleRegistry) -> Result<$ty> {
                    Ok(self.clone())
                }
            }

            impl<$($gen)*> Dimensionalize for $ty {
                type Output = $ty;

                fn dimensionalize(&self, _registry: &ScaleRegistry) -> Result<$ty> {
                    Ok(self.clone())
                }
            }

            impl<$($gen)*> DimensionalState for $ty {
                fn is_dimensional(&self) -> bool {
                    false
                }
            }
        )*
    };
}

passthrough! {
    impl[] f32;
    impl[] f64;
    impl[T: Float] DVector<T>;
    impl[T: Float] Payload<T>;
}

impl<V: Nondimensionalize> Nondimensionalize for Vec<V> {
    type Output = Vec<V::Output>;

    fn nondimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output> {
        self.iter().map(|v| v.nondimensionalize(registry)).collect()
    }
}

impl<V: Dimensionalize> Dimensionalize for Vec<V> {
    type Output = Vec<V::Output>;

    fn dimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output> {
        self.iter().map(|v| v.dimensionalize(registry)).collect()
    }
}

/// A collection is dimensional if any element is
impl<V: DimensionalState> DimensionalState for Vec<V> {
    fn is_dimensional(&self) -> bool {
        self.iter().any(DimensionalState::is_dimensional)
    }
}

impl<V: Nondimensionalize> Nondimensionalize for Option<V> {
    type Output = Option<V::Output>;

    fn nondimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output> {
        self.as_ref().map(|v| v.nondimensionalize(registry)).transpose()
    }
}

impl<V: Dimensionalize> Dimensionalize for Option<V> {
    type Output = Option<V::Output>;

    fn dimensionalize(&self, registry: &ScaleRegistry) -> Result<Self::Output> {
        self.as_ref().map(|v| v.dimensionalize(registry)).transpose()
    }
}

impl<V: DimensionalState> DimensionalState for Option<V> {
    fn is_dimensional(&self) -> bool {
        self.as_ref().is_some_and(DimensionalState::is_dimensional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScalingError;
    use crate::scaling::{geo_units, no_units, ScaleInputs};
    use approx::assert_relative_eq;

    fn geo() -> ScaleRegistry {
        geo_units(&ScaleInputs::default()).unwrap()
    }

    #[test]
    fn test_plate_velocity() {
        let g = geo();
        let v: Quantity<f64> = Quantity::parse(3.0_f64, "cm/yr").unwrap();
        let nd = nondimensionalize(&v, &g).unwrap();
        assert!(!nd.is_dimensional());
        assert_eq!(nd.unit(), v.unit());
        assert_relative_eq!(nd.scalar().unwrap(), 0.0095066, max_relative = 1e-4);
    }

    #[test]
    fn test_creep_prefactor() {
        let g = geo();
        let a: Quantity<f64> = Quantity::parse(6.3e-2_f64, "MPa^-3.05*s^-1").unwrap();
        let nd = nondimensionalize(&a, &g).unwrap();
        assert_relative_eq!(nd.scalar().unwrap(), 7.0693e14, max_relative = 1e-3);
    }

    #[test]
    fn test_round_trip_restores_unit_and_value() {
        let g = geo();
        let t: Quantity<f64> = Quantity::parse(vec![0.0_f64, 500.0, 1350.0], "°C").unwrap();
        let back = dimensionalize(&nondimensionalize(&t, &g).unwrap(), &g).unwrap();
        assert!(back.is_dimensional());
        assert_eq!(back.unit(), t.unit());
        for i in 0..3 {
            assert_relative_eq!(
                back.at(i).unwrap().scalar().unwrap(),
                t.at(i).unwrap().scalar().unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let g = geo();
        let q: Quantity<f64> = Quantity::parse(10.0_f64, "MPa").unwrap();
        let once = nondimensionalize(&q, &g).unwrap();
        assert_eq!(nondimensionalize(&once, &g).unwrap(), once);
        assert_eq!(dimensionalize(&q, &g).unwrap(), q);
    }

    #[test]
    fn test_measure_returns_bare_payload() {
        let g = geo();
        let m: Measure<f64> = Measure::with_unit(1000.0_f64, "km").unwrap();
        let nd = nondimensionalize(&m, &g).unwrap();
        assert_eq!(nd, Payload::Scalar(1.0));
        assert!(is_dimensional(&m));
        assert!(!is_dimensional(&nd));
    }

    #[test]
    fn test_plain_values_pass_through() {
        let g = geo();
        assert_eq!(nondimensionalize(&2.5_f64, &g).unwrap(), 2.5);
        let v = DVector::from_vec(vec![1.0_f32, 2.0]);
        assert_eq!(dimensionalize(&v, &g).unwrap(), v);
        assert!(!is_dimensional(&2.5_f64));
    }

    #[test]
    fn test_dimensionalize_to() {
        let g = geo();
        let m = dimensionalize_to(1.0_f64, &Unit::parse("km").unwrap(), &g).unwrap();
        assert_relative_eq!(m.scalar().unwrap(), 1000.0, max_relative = 1e-12);
        assert_eq!(m.unit().to_string(), "km");
    }

    #[test]
    fn test_collections() {
        let g = geo();
        let items: Vec<Quantity<f64>> = vec![
            Quantity::parse(1.0_f64, "km").unwrap(),
            Quantity::parse(1.0_f64, "MPa").unwrap(),
        ];
        let nd = nondimensionalize(&items, &g).unwrap();
        assert!(!is_dimensional(&nd));
        assert!(is_dimensional(&items));
        let none: Option<Quantity<f64>> = None;
        assert_eq!(nondimensionalize(&none, &g).unwrap(), None);
    }

    #[test]
    fn test_f32_stays_f32() {
        let g = geo();
        let q: Quantity<f32> = Quantity::parse(vec![1.0_f32, 2.0], "km").unwrap();
        let nd: Quantity<f32> = nondimensionalize(&q, &g).unwrap();
        assert_relative_eq!(nd.at(1).unwrap().scalar().unwrap(), 2e-3_f32);
    }

    #[test]
    fn test_dimensionless_registry_is_identity() {
        let g = no_units(&ScaleInputs::dimensionless()).unwrap();
        let q: Quantity<f64> = Quantity::parse(42.0_f64, "m").unwrap();
        assert_relative_eq!(nondimensionalize(&q, &g).unwrap().scalar().unwrap(), 42.0);
    }

    #[test]
    fn test_current_rejected() {
        let g = geo();
        let q: Quantity<f64> = Quantity::parse(1.0_f64, "A").unwrap();
        assert!(matches!(
            nondimensionalize(&q, &g),
            Err(ScalingError::DimensionMismatch { .. })
        ));
    }
}
