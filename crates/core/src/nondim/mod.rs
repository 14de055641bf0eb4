//! Conversion between physical units and scaled numbers
//!
//! - [`compute`]: characteristic value of any unit from a registry
//! - [`convert`]: `nondimensionalize` / `dimensionalize` for values
//! - [`traversal`]: the same for whole parameter structures

pub mod compute;
pub mod convert;
pub mod traversal;

pub use compute::{characteristic_value, compute_units};
pub use convert::{
    dimensionalize, dimensionalize_to, is_dimensional, nondimensionalize, DimensionalState,
    Dimensionalize, Nondimensionalize,
};
pub use traversal::{
    dimensionalize_all, dimensionalize_params, nondimensionalize_all, nondimensionalize_params,
    Direction, FieldTransform, ParameterSet,
};
