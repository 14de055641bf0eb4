//! Parameter-structure traversal
//!
//! Structures that hold [`Quantity`] fields implement [`ParameterSet`] by
//! rebuilding themselves field by field through a [`FieldTransform`]. The
//! traversal then flips the structure's dimensional marker. Independent
//! structures can be processed in parallel with rayon.

use super::convert::{Dimensionalize, Nondimensionalize};
use crate::core_types::{Float, Quantity};
use crate::error::Result;
use crate::scaling::ScaleRegistry;
use rayon::prelude::*;
use tracing::debug;

/// Which way a traversal converts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Physical units → scaled numbers
    Nondimensionalize,
    /// Scaled numbers → physical units
    Dimensionalize,
}

impl Direction {
    /// Dimensional state every field ends in
    pub fn target_dimensional(self) -> bool {
        matches!(self, Direction::Dimensionalize)
    }
}

/// Field visitor handed to [`ParameterSet::transform`]
#[derive(Debug, Clone, Copy)]
pub struct FieldTransform<'a> {
    direction: Direction,
    registry: &'a ScaleRegistry,
}

impl<'a> FieldTransform<'a> {
    pub fn new(direction: Direction, registry: &'a ScaleRegistry) -> Self {
        Self {
            direction,
            registry,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Registry the traversal scales against
    pub fn registry(&self) -> &'a ScaleRegistry {
        self.registry
    }

    /// Convert one quantity field
    ///
    /// # Errors
    /// Fails if the field's unit has no characteristic scale.
    pub fn quantity<T: Float>(&self, field: &Quantity<T>) -> Result<Quantity<T>> {
        match self.direction {
            Direction::Nondimensionalize => field.nondimensionalize(self.registry),
            Direction::Dimensionalize => field.dimensionalize(self.registry),
        }
    }

    /// Convert a nested parameter structure, marker included
    ///
    /// # Errors
    /// Propagates the first field failure.
    pub fn nested<P: ParameterSet>(&self, field: &P) -> Result<P> {
        apply(field, self)
    }

    /// Convert every structure in a collection, in order
    ///
    /// # Errors
    /// Propagates the first element failure.
    pub fn collection<P: ParameterSet>(&self, items: &[P]) -> Result<Vec<P>> {
        items.iter().map(|p| self.nested(p)).collect()
    }
}

/// A structure whose quantity fields can be scaled as a unit
pub trait ParameterSet: Clone + Sized {
    /// Rebuild `self` with every quantity field passed through `fields`
    ///
    /// Implementations leave the dimensional marker alone.
    ///
    /// # Errors
    /// Propagates the first field failure.
    fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self>;

    /// Dimensional marker
    fn is_dimensional(&self) -> bool;

    /// Same structure with the marker set to `dimensional`
    #[must_use]
    fn with_dimensional(self, dimensional: bool) -> Self;
}

fn apply<P: ParameterSet>(params: &P, fields: &FieldTransform<'_>) -> Result<P> {
    let target = fields.direction().target_dimensional();
    if params.is_dimensional() == target {
        return Ok(params.clone());
    }
    debug!(
        kind = std::any::type_name::<P>(),
        direction = ?fields.direction(),
        "Transforming parameter set"
    );
    Ok(params.transform(fields)?.with_dimensional(target))
}

/// Non-dimensionalize every quantity field of `params`
///
/// # Errors
/// Fails if any field's unit has no characteristic scale.
pub fn nondimensionalize_params<P: ParameterSet>(
    params: &P,
    registry: &ScaleRegistry,
) -> Result<P> {
    apply(params, &FieldTransform::new(Direction::Nondimensionalize, registry))
}

/// Restore every quantity field of `params` to physical units
///
/// # Errors
/// Fails if any field's unit has no characteristic scale.
pub fn dimensionalize_params<P: ParameterSet>(params: &P, registry: &ScaleRegistry) -> Result<P> {
    apply(params, &FieldTransform::new(Direction::Dimensionalize, registry))
}

/// Non-dimensionalize independent structures in parallel
///
/// # Errors
/// Returns one of the failures if any structure fails.
pub fn nondimensionalize_all<P>(items: &[P], registry: &ScaleRegistry) -> Result<Vec<P>>
where
    P: ParameterSet + Send + Sync,
{
    items
        .par_iter()
        .map(|p| nondimensionalize_params(p, registry))
        .collect()
}

/// Dimensionalize independent structures in parallel
///
/// # Errors
/// Returns one of the failures if any structure fails.
pub fn dimensionalize_all<P>(items: &[P], registry: &ScaleRegistry) -> Result<Vec<P>>
where
    P: ParameterSet + Send + Sync,
{
    items
        .par_iter()
        .map(|p| dimensionalize_params(p, registry))
        .collect()
}

/// Implement the conversion traits for [`ParameterSet`] types so they can be
/// passed to `nondimensionalize`, `dimensionalize` and `is_dimensional`
#[macro_export]
macro_rules! impl_parameter_conversions {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::nondim::Nondimensionalize for $ty {
                type Output = $ty;

                fn nondimensionalize(
                    &self,
                    registry: &$crate::scaling::ScaleRegistry,
                ) -> $crate::error::Result<$ty> {
                    $crate::nondim::nondimensionalize_params(self, registry)
                }
            }

            impl $crate::nondim::Dimensionalize for $ty {
                type Output = $ty;

                fn dimensionalize(
                    &self,
                    registry: &$crate::scaling::ScaleRegistry,
                ) -> $crate::error::Result<$ty> {
                    $crate::nondim::dimensionalize_params(self, registry)
                }
            }

            impl $crate::nondim::DimensionalState for $ty {
                fn is_dimensional(&self) -> bool {
                    $crate::nondim::ParameterSet::is_dimensional(self)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::{geo_units, ScaleInputs};
    use approx::assert_relative_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Slab {
        thickness: Quantity<f64>,
        stress: Quantity<f64>,
        dimensional: bool,
    }

    impl ParameterSet for Slab {
        fn transform(&self, fields: &FieldTransform<'_>) -> Result<Self> {
            Ok(Self {
                thickness: fields.quantity(&self.thickness)?,
                stress: fields.quantity(&self.stress)?,
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

    fn slab(km: f64) -> Slab {
        Slab {
            thickness: Quantity::parse(km, "km").unwrap(),
            stress: Quantity::parse(50.0_f64, "MPa").unwrap(),
            dimensional: true,
        }
    }

    #[test]
    fn test_marker_flips_both_ways() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let s = slab(100.0);
        let nd = nondimensionalize_params(&s, &g).unwrap();
        assert!(!nd.is_dimensional());
        assert_relative_eq!(nd.thickness.scalar().unwrap(), 0.1, max_relative = 1e-12);
        assert_relative_eq!(nd.stress.scalar().unwrap(), 5.0, max_relative = 1e-12);

        let back = dimensionalize_params(&nd, &g).unwrap();
        assert!(back.is_dimensional());
        assert_relative_eq!(back.stress.scalar().unwrap(), 50.0, max_relative = 1e-12);
    }

    #[test]
    fn test_already_converted_is_untouched() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let s = slab(100.0);
        assert_eq!(dimensionalize_params(&s, &g).unwrap(), s);
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let g = geo_units(&ScaleInputs::default()).unwrap();
        let batch: Vec<Slab> = (1..=32).map(|i| slab(f64::from(i) * 10.0)).collect();
        let par = nondimensionalize_all(&batch, &g).unwrap();
        let seq = FieldTransform::new(Direction::Nondimensionalize, &g)
            .collection(&batch)
            .unwrap();
        assert_eq!(par, seq);
        assert_eq!(dimensionalize_all(&par, &g).unwrap().len(), 32);
    }
}
