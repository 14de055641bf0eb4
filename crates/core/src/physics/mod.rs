//! Material parameter structures
//!
//! Every structure stores its parameters as [`Quantity`] fields and
//! implements [`ParameterSet`](crate::nondim::ParameterSet), so a whole
//! material can be scaled in one call. Evaluation functions read fields
//! through [`Quantity::consistent_value`] and therefore give the same answer
//! (up to the registry's scale) in either state.

pub mod conductivity;
pub mod creep;
pub mod density;
pub mod material;
pub mod melting;
pub mod phase_diagram;

pub use conductivity::ConstantConductivity;
pub use creep::{PowerLawCreep, GAS_CONSTANT};
pub use density::{ConstantDensity, DensityLaw, PtDensity};
pub use material::MaterialPhase;
pub use melting::{LinearMelting, MeltingLaw};
pub use phase_diagram::{PhaseDiagramSource, PhaseDiagramTable};

use crate::core_types::{Quantity, Unit};
use crate::error::{Result, ScalingError};

crate::impl_parameter_conversions!(
    ConstantConductivity,
    PowerLawCreep,
    ConstantDensity,
    PtDensity,
    DensityLaw,
    LinearMelting,
    MeltingLaw,
    PhaseDiagramTable,
    MaterialPhase,
);

/// Check that `quantity` has the dimension of `expected`
pub(crate) fn require_unit(quantity: Quantity<f64>, expected: &str) -> Result<Quantity<f64>> {
    quantity.unit().ensure_compatible(&Unit::parse(expected)?)?;
    Ok(quantity)
}

/// Check that `quantity` is a single value with the dimension of `expected`
pub(crate) fn require_scalar(quantity: Quantity<f64>, expected: &str) -> Result<Quantity<f64>> {
    let quantity = require_unit(quantity, expected)?;
    if !quantity.numeric_value().is_scalar() {
        return Err(ScalingError::Validation(format!(
            "expected a single {expected} value, got {} values",
            quantity.numeric_value().len()
        )));
    }
    Ok(quantity)
}

/// Scalar field value in consistent units (SI when dimensional)
///
/// Fields reaching here went through [`require_scalar`].
pub(crate) fn consistent_scalar(quantity: &Quantity<f64>) -> f64 {
    quantity.consistent_value().as_scalar().unwrap_or(f64::NAN)
}

/// Scalar argument in consistent units; its state must match `dimensional`
pub(crate) fn argument(quantity: &Quantity<f64>, dimensional: bool) -> Result<f64> {
    if quantity.is_dimensional() != dimensional {
        return Err(ScalingError::StateMismatch);
    }
    quantity.consistent_value().as_scalar().ok_or_else(|| {
        ScalingError::Validation("expected a scalar argument".to_string())
    })
}
