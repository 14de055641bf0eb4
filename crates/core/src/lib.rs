//! Geodynamic Scaling Core Library
//!
//! Non-dimensionalization of physical parameters for geodynamic models.
//! A model picks four characteristic scales (length, temperature, stress,
//! viscosity); every other scale follows from them, and any quantity can be
//! divided by the scale matching its unit and later restored exactly.
//!
//! ## Workflow
//!
//! 1. Build one [`ScaleRegistry`] with [`geo_units`], [`si_units`],
//!    [`no_units`] or a [`ScaleConfig`]
//! 2. Wrap inputs in [`Quantity`] (or pass [`Measure`] values directly)
//! 3. Call [`nondimensionalize`] before solving and [`dimensionalize`] after
//!
//! Whole material descriptions in [`physics`] convert in one call through
//! [`ParameterSet`](nondim::ParameterSet).

// Units, dimensions and unit-bearing values
pub mod core_types;

// Error types
pub mod error;

// Registry of characteristic scales
pub mod scaling;

// Conversion engine and structure traversal
pub mod nondim;

// Material parameter structures
pub mod physics;

// Re-export core types
pub use core_types::{BaseDimension, DimState, Dimension, Float, Measure, Payload, Quantity, Unit};

// Re-export error types
pub use error::{Result, ScalingError};

// Re-export scaling types
pub use scaling::{
    geo_units, make_registry, no_units, si_units, ScaleConfig, ScaleInput, ScaleInputs,
    ScaleRegistry, UnitSystem,
};

// Re-export conversion operations
pub use nondim::{
    compute_units, dimensionalize, dimensionalize_to, is_dimensional, nondimensionalize,
    nondimensionalize_all, nondimensionalize_params,
};
