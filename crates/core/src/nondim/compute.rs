//! Dimension decomposition
//!
//! The characteristic value of any unit is the product of the registry's
//! primary scales raised to the unit's base-dimension exponents:
//!
//! ```text
//! [MPa^-3.05 s^-1] = M^-3.05 L^3.05 T^5.1
//!     → mass^-3.05 · length^3.05 · time^5.1
//! ```

use crate::core_types::{Float, Measure, Quantity, Unit};
use crate::error::{Result, ScalingError};
use crate::scaling::ScaleRegistry;

/// Characteristic value of `unit` in SI-preferred units
///
/// # Errors
/// Returns [`ScalingError::DimensionMismatch`] if the unit involves current
/// or luminosity.
pub fn characteristic_value(unit: &Unit, registry: &ScaleRegistry) -> Result<f64> {
    let mut value = 1.0_f64;
    for (dim, exp) in unit.dimension().decompose() {
        let scale = registry
            .scale_for(dim)
            .ok_or_else(|| ScalingError::DimensionMismatch {
                unit: unit.to_string(),
                dimension: dim,
            })?;
        value *= scale.powf(exp);
    }
    Ok(value)
}

/// Characteristic value for the unit of `quantity`, as a measure in the
/// SI-preferred unit and the quantity's float type
///
/// # Errors
/// Returns [`ScalingError::DimensionMismatch`] for current or luminosity and
/// [`ScalingError::Validation`] if the scale does not fit in `T`.
pub fn compute_units<T: Float>(
    quantity: &Quantity<T>,
    registry: &ScaleRegistry,
) -> Result<Measure<T>> {
    let unit = quantity.unit();
    let value = characteristic_value(unit, registry)?;
    let cast = T::cast_from_f64(value);
    let widened = cast.to_f64();
    if !widened.is_finite() || (widened == 0.0 && value != 0.0) {
        return Err(ScalingError::Validation(format!(
            "characteristic value {value:e} of {unit} is out of range for the payload precision"
        )));
    }
    Ok(Measure::new(cast, unit.preferred()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::{geo_units, ScaleInputs};
    use approx::assert_relative_eq;

    #[test]
    fn test_length_is_length_scale() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let q: Quantity<f64> = Quantity::parse(1.0_f64, "km").unwrap();
        let c = compute_units(&q, &g).unwrap();
        assert_relative_eq!(c.scalar().unwrap(), g.length());
        assert_eq!(c.unit().to_string(), "m");
    }

    #[test]
    fn test_velocity_is_length_over_time() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let u = Unit::parse("cm/yr").unwrap();
        assert_relative_eq!(
            characteristic_value(&u, &g).unwrap(),
            g.length() / g.time(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            characteristic_value(&u, &g).unwrap(),
            g.derived().velocity,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_stress_matches_primary() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let u = Unit::parse("MPa").unwrap();
        assert_relative_eq!(
            characteristic_value(&u, &g).unwrap(),
            g.stress(),
            max_relative = 1e-12
        );
        let visc = Unit::parse("Pa*s").unwrap();
        assert_relative_eq!(
            characteristic_value(&visc, &g).unwrap(),
            g.viscosity(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_dimensionless_is_one() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        assert_eq!(characteristic_value(&Unit::dimensionless(), &g).unwrap(), 1.0);
    }

    #[test]
    fn test_current_rejected() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let u = Unit::parse("A").unwrap();
        assert!(matches!(
            characteristic_value(&u, &g),
            Err(ScalingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_f32_preserved() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let q: Quantity<f32> = Quantity::parse(1.0_f32, "MPa").unwrap();
        let c: Measure<f32> = compute_units(&q, &g).unwrap();
        assert_relative_eq!(c.scalar().unwrap(), 1e7_f32);
    }

    #[test]
    fn test_f32_overflowing_scale_rejected() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        assert!(g.mass() > f64::from(f32::MAX));

        let q: Quantity<f32> = Quantity::parse(1.0_f32, "kg").unwrap();
        assert!(matches!(
            compute_units(&q, &g),
            Err(ScalingError::Validation(_))
        ));

        let q64: Quantity<f64> = Quantity::parse(1.0, "kg").unwrap();
        assert_relative_eq!(compute_units(&q64, &g).unwrap().scalar().unwrap(), g.mass());
    }
}
