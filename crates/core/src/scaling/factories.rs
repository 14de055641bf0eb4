//! Registry factories for the geological, SI and dimensionless systems
//!
//! All three validate their inputs up front, normalise them to the system's
//! display units, and derive the characteristic time from the Maxwell
//! relaxation time `viscosity / stress`.

use super::registry::{DisplayScales, PrimaryScales, ScaleRegistry, UnitSystem, YEARS_PER_MYR};
use crate::core_types::{Measure, Unit, SECONDS_PER_YEAR};
use crate::error::{Result, ScalingError};
use tracing::info;

/// One registry input: a bare number or a unit-bearing value
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleInput {
    /// Bare number; the system's default unit is assumed
    Number(f64),
    /// Value with an explicit unit
    Measure(Measure<f64>),
}

impl ScaleInput {
    /// Parse `"1000 km"` as a measure and `"1000"` as a bare number
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] on malformed input.
    pub fn parse(text: &str) -> Result<Self> {
        let measure = Measure::<f64>::parse(text)?;
        if measure.unit().is_dimensionless() && measure.unit().factor() == 1.0 {
            let value = measure.scalar().unwrap_or(f64::NAN);
            Ok(ScaleInput::Number(value))
        } else {
            Ok(ScaleInput::Measure(measure))
        }
    }

    fn has_units(&self) -> bool {
        match self {
            ScaleInput::Number(_) => false,
            ScaleInput::Measure(m) => !m.unit().is_dimensionless() || m.unit().factor() != 1.0,
        }
    }

    /// Express in `unit`, assigning `unit` to bare numbers
    fn in_unit(&self, unit: &Unit) -> Result<Measure<f64>> {
        match self {
            ScaleInput::Number(n) => Ok(Measure::new(*n, unit.clone())),
            ScaleInput::Measure(m) => m.convert_to(unit),
        }
    }
}

impl From<f64> for ScaleInput {
    fn from(value: f64) -> Self {
        ScaleInput::Number(value)
    }
}

impl From<f32> for ScaleInput {
    fn from(value: f32) -> Self {
        ScaleInput::Number(f64::from(value))
    }
}

impl From<i32> for ScaleInput {
    fn from(value: i32) -> Self {
        ScaleInput::Number(f64::from(value))
    }
}

impl From<u32> for ScaleInput {
    fn from(value: u32) -> Self {
        ScaleInput::Number(f64::from(value))
    }
}

impl From<i64> for ScaleInput {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        ScaleInput::Number(value as f64)
    }
}

impl From<Measure<f64>> for ScaleInput {
    fn from(value: Measure<f64>) -> Self {
        ScaleInput::Measure(value)
    }
}

/// User-chosen primary scales
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleInputs {
    /// Characteristic length
    pub length: ScaleInput,
    /// Characteristic temperature
    pub temperature: ScaleInput,
    /// Characteristic stress
    pub stress: ScaleInput,
    /// Characteristic viscosity
    pub viscosity: ScaleInput,
}

impl ScaleInputs {
    /// 1000 km, 1000 °C, 10 `MPa`, 1e20 Pa·s
    pub fn geological() -> Self {
        Self::numbers(1000.0, 1000.0, 10.0, 1e20)
    }

    /// 1000 m, 1000 K, 10 Pa, 1e20 Pa·s
    pub fn si() -> Self {
        Self::numbers(1000.0, 1000.0, 10.0, 1e20)
    }

    /// All ones
    pub fn dimensionless() -> Self {
        Self::numbers(1.0, 1.0, 1.0, 1.0)
    }

    /// Defaults for `system`
    pub fn defaults_for(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Geological => Self::geological(),
            UnitSystem::Si => Self::si(),
            UnitSystem::Dimensionless => Self::dimensionless(),
        }
    }

    fn numbers(length: f64, temperature: f64, stress: f64, viscosity: f64) -> Self {
        Self {
            length: length.into(),
            temperature: temperature.into(),
            stress: stress.into(),
            viscosity: viscosity.into(),
        }
    }

    /// Replace the length input
    pub fn with_length(mut self, length: impl Into<ScaleInput>) -> Self {
        self.length = length.into();
        self
    }

    /// Replace the temperature input
    pub fn with_temperature(mut self, temperature: impl Into<ScaleInput>) -> Self {
        self.temperature = temperature.into();
        self
    }

    /// Replace the stress input
    pub fn with_stress(mut self, stress: impl Into<ScaleInput>) -> Self {
        self.stress = stress.into();
        self
    }

    /// Replace the viscosity input
    pub fn with_viscosity(mut self, viscosity: impl Into<ScaleInput>) -> Self {
        self.viscosity = viscosity.into();
        self
    }
}

impl Default for ScaleInputs {
    fn default() -> Self {
        Self::geological()
    }
}

/// Display units of a dimensional system
struct SystemUnits {
    length: Unit,
    temperature: Unit,
    stress: Unit,
    viscosity: Unit,
    time: Unit,
}

impl SystemUnits {
    fn for_system(system: UnitSystem) -> Result<Self> {
        let (length, temperature, stress, time) = match system {
            UnitSystem::Geological => ("km", "°C", "MPa", "Myr"),
            UnitSystem::Si | UnitSystem::Dimensionless => ("m", "K", "Pa", "s"),
        };
        Ok(Self {
            length: Unit::parse(length)?,
            temperature: Unit::parse(temperature)?,
            stress: Unit::parse(stress)?,
            viscosity: Unit::parse("Pa*s")?,
            time: Unit::parse(time)?,
        })
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ScalingError::Validation(format!(
            "characteristic {name} must be positive and finite, got {value}"
        )))
    }
}

fn si_scalar(name: &str, measure: &Measure<f64>) -> Result<f64> {
    let value = measure.to_si().scalar().ok_or_else(|| {
        ScalingError::Validation(format!("characteristic {name} must be a scalar"))
    })?;
    ensure_positive(name, value)
}

fn build_dimensional(system: UnitSystem, inputs: &ScaleInputs) -> Result<ScaleRegistry> {
    let units = SystemUnits::for_system(system)?;

    let length = inputs.length.in_unit(&units.length)?;
    let temperature = inputs.temperature.in_unit(&units.temperature)?;
    let stress = inputs.stress.in_unit(&units.stress)?;
    let viscosity = inputs.viscosity.in_unit(&units.viscosity)?;

    let length_si = si_scalar("length", &length)?;
    let temperature_si = si_scalar("temperature", &temperature)?;
    let stress_si = si_scalar("stress", &stress)?;
    let viscosity_si = si_scalar("viscosity", &viscosity)?;

    // Maxwell relaxation time
    let time_si = ensure_positive("time", viscosity_si / stress_si)?;
    let time = Measure::new(units.time.from_si(time_si), units.time.clone());

    let primary = PrimaryScales {
        temperature: temperature_si,
        length: length_si,
        time: time_si,
        stress: stress_si,
        viscosity: viscosity_si,
        mass: stress_si * length_si * time_si.powi(2),
        amount: 1.0,
    };
    let display = DisplayScales {
        temperature,
        length,
        stress,
        time,
        viscosity,
    };
    Ok(finish(system, display, primary))
}

fn finish(system: UnitSystem, display: DisplayScales, primary: PrimaryScales) -> ScaleRegistry {
    let registry = ScaleRegistry::from_scales(system, display, primary);
    info!(
        system = %system,
        length = primary.length,
        temperature = primary.temperature,
        stress = primary.stress,
        time = primary.time,
        "Built scale registry"
    );
    registry
}

/// Geological registry (km, °C, `MPa`, Pa·s; time reported in Myr)
///
/// # Errors
/// Fails with [`ScalingError::IncompatibleUnits`] if an input has the wrong
/// dimension and [`ScalingError::Validation`] for non-positive scales.
pub fn geo_units(inputs: &ScaleInputs) -> Result<ScaleRegistry> {
    build_dimensional(UnitSystem::Geological, inputs)
}

/// SI registry (m, K, Pa, Pa·s, s)
///
/// # Errors
/// Fails with [`ScalingError::IncompatibleUnits`] if an input has the wrong
/// dimension and [`ScalingError::Validation`] for non-positive scales.
pub fn si_units(inputs: &ScaleInputs) -> Result<ScaleRegistry> {
    build_dimensional(UnitSystem::Si, inputs)
}

/// Dimensionless registry; every input must be a plain number
///
/// # Errors
/// Fails with [`ScalingError::Validation`] (`"quantity X should not have
/// units"`) if any input carries a unit, or for non-positive scales.
pub fn no_units(inputs: &ScaleInputs) -> Result<ScaleRegistry> {
    let named = [
        ("length", &inputs.length),
        ("temperature", &inputs.temperature),
        ("stress", &inputs.stress),
        ("viscosity", &inputs.viscosity),
    ];
    let mut values = [0.0; 4];
    for (slot, (name, input)) in values.iter_mut().zip(named) {
        if input.has_units() {
            return Err(ScalingError::Validation(format!(
                "quantity {name} should not have units"
            )));
        }
        let plain = input.in_unit(&Unit::dimensionless())?;
        *slot = si_scalar(name, &plain)?;
    }
    let [length, temperature, stress, viscosity] = values;
    let time = ensure_positive("time", viscosity / stress)?;

    let plain = |v: f64| Measure::new(v, Unit::dimensionless());
    let display = DisplayScales {
        temperature: plain(temperature),
        length: plain(length),
        stress: plain(stress),
        time: plain(time),
        viscosity: plain(viscosity),
    };
    let primary = PrimaryScales {
        temperature,
        length,
        time,
        stress,
        viscosity,
        mass: stress * length * time.powi(2),
        amount: 1.0,
    };
    Ok(finish(UnitSystem::Dimensionless, display, primary))
}

/// Build a registry for `system`
///
/// # Errors
/// See [`geo_units`], [`si_units`] and [`no_units`].
pub fn make_registry(system: UnitSystem, inputs: &ScaleInputs) -> Result<ScaleRegistry> {
    match system {
        UnitSystem::Geological => geo_units(inputs),
        UnitSystem::Si => si_units(inputs),
        UnitSystem::Dimensionless => no_units(inputs),
    }
}

/// Seconds in one Myr
pub const SECONDS_PER_MYR: f64 = SECONDS_PER_YEAR * YEARS_PER_MYR;
