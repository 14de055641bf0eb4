//! Characteristic scales
//!
//! Build one [`ScaleRegistry`] per model with [`geo_units`], [`si_units`],
//! [`no_units`] or from a [`ScaleConfig`], then pass it to every conversion.

pub mod config;
pub mod factories;
pub mod registry;

pub use config::{ScaleConfig, ScaleValue};
pub use factories::{
    geo_units, make_registry, no_units, si_units, ScaleInput, ScaleInputs, SECONDS_PER_MYR,
};
pub use registry::{
    DerivedScales, DisplayScales, PrimaryScales, ScaleRegistry, UnitSystem, YEARS_PER_MYR,
};
