//! Core types: units, dimensions and unit-bearing values

pub mod dimension;
pub mod float;
pub mod measure;
pub(crate) mod parse;
pub mod payload;
pub mod quantity;
pub mod unit;
pub mod unit_table;

pub use dimension::{BaseDimension, Dimension};
pub use float::Float;
pub use measure::Measure;
pub use payload::Payload;
pub use quantity::{DimState, Quantity, StateValue};
pub use unit::Unit;
pub use unit_table::{init, init_with, UnitTable, CELSIUS_KELVIN_OFFSET, SECONDS_PER_YEAR};
