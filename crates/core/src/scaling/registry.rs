//! Characteristic-scale registry
//!
//! A [`ScaleRegistry`] holds the primary characteristic scales of one unit
//! system (in a display unit and in SI-preferred form) plus every derived
//! scale, computed once at construction. It is never mutated afterwards; a
//! different scaling needs a new registry.

use crate::core_types::{BaseDimension, Measure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds per year used by the registry convenience constants
pub use crate::core_types::SECONDS_PER_YEAR;

/// Years in one million years
pub const YEARS_PER_MYR: f64 = 1e6;

/// Unit system a registry was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// km, °C, `MPa`, Pa·s, Myr
    Geological,
    /// m, K, Pa, Pa·s, s
    Si,
    /// Plain numbers, no units
    Dimensionless,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitSystem::Geological => "geological",
            UnitSystem::Si => "SI",
            UnitSystem::Dimensionless => "dimensionless",
        };
        write!(f, "{name}")
    }
}

/// Primary scales as chosen by the user, in their display units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayScales {
    /// Characteristic temperature (°C, K or plain)
    pub temperature: Measure<f64>,
    /// Characteristic length (km, m or plain)
    pub length: Measure<f64>,
    /// Characteristic stress (`MPa`, Pa or plain)
    pub stress: Measure<f64>,
    /// Characteristic time (Myr, s or plain)
    pub time: Measure<f64>,
    /// Characteristic viscosity (Pa·s or plain)
    pub viscosity: Measure<f64>,
}

/// Primary scales in SI-preferred units (K, m, s, Pa, kg, mol)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimaryScales {
    /// Temperature [K]
    pub temperature: f64,
    /// Length [m]
    pub length: f64,
    /// Time [s]
    pub time: f64,
    /// Stress [Pa]
    pub stress: f64,
    /// Viscosity [Pa·s]
    pub viscosity: f64,
    /// Mass [kg], `stress * length * time²`
    pub mass: f64,
    /// Amount of substance [mol]
    pub amount: f64,
}

/// Secondary scales, algebraic combinations of [`PrimaryScales`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedScales {
    /// [m²]
    pub area: f64,
    /// [m³]
    pub volume: f64,
    /// [m/s]
    pub velocity: f64,
    /// [kg/m³]
    pub density: f64,
    /// [m/s²]
    pub acceleration: f64,
    /// [N]
    pub force: f64,
    /// [J]
    pub energy: f64,
    /// [W]
    pub power: f64,
    /// [J/(kg·K)]
    pub heat_capacity: f64,
    /// [W/(m·K)]
    pub conductivity: f64,
    /// [1/s]
    pub strain_rate: f64,
}

impl DerivedScales {
    fn from_primary(p: &PrimaryScales) -> Self {
        let force = p.mass * p.length / p.time.powi(2);
        let energy = force * p.length;
        let power = energy / p.time;
        Self {
            area: p.length.powi(2),
            volume: p.length.powi(3),
            velocity: p.length / p.time,
            density: p.mass / p.length.powi(3),
            acceleration: p.length / p.time.powi(2),
            force,
            energy,
            power,
            heat_capacity: energy / p.mass / p.temperature,
            conductivity: power / p.length / p.temperature,
            strain_rate: 1.0 / p.time,
        }
    }
}

/// Immutable set of characteristic scales for one unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRegistry {
    system: UnitSystem,
    display: DisplayScales,
    primary: PrimaryScales,
    derived: DerivedScales,
    /// Seconds per year
    seconds_per_year: f64,
    /// Factor from m/s to cm/yr
    cm_per_year: f64,
}

impl ScaleRegistry {
    /// Assemble a registry; derived scales are computed here, once
    pub(crate) fn from_scales(
        system: UnitSystem,
        display: DisplayScales,
        primary: PrimaryScales,
    ) -> Self {
        Self {
            system,
            derived: DerivedScales::from_primary(&primary),
            display,
            primary,
            seconds_per_year: SECONDS_PER_YEAR,
            cm_per_year: SECONDS_PER_YEAR * 100.0,
        }
    }

    /// Unit system tag
    pub fn system(&self) -> UnitSystem {
        self.system
    }

    /// Primary scales in display units
    pub fn display(&self) -> &DisplayScales {
        &self.display
    }

    /// Primary scales in SI-preferred units
    pub fn primary(&self) -> &PrimaryScales {
        &self.primary
    }

    /// Derived scales in SI-preferred units
    pub fn derived(&self) -> &DerivedScales {
        &self.derived
    }

    /// Characteristic scale for one basis dimension, in SI-preferred units
    ///
    /// Returns `None` for current and luminosity, which no registry covers.
    pub fn scale_for(&self, dimension: BaseDimension) -> Option<f64> {
        match dimension {
            BaseDimension::Length => Some(self.primary.length),
            BaseDimension::Mass => Some(self.primary.mass),
            BaseDimension::Time => Some(self.primary.time),
            BaseDimension::Temperature => Some(self.primary.temperature),
            BaseDimension::Amount => Some(self.primary.amount),
            BaseDimension::Current | BaseDimension::Luminosity => None,
        }
    }

    /// Characteristic length [m]
    pub fn length(&self) -> f64 {
        self.primary.length
    }

    /// Characteristic temperature [K]
    pub fn temperature(&self) -> f64 {
        self.primary.temperature
    }

    /// Characteristic time [s]
    pub fn time(&self) -> f64 {
        self.primary.time
    }

    /// Characteristic stress [Pa]
    pub fn stress(&self) -> f64 {
        self.primary.stress
    }

    /// Characteristic viscosity [Pa·s]
    pub fn viscosity(&self) -> f64 {
        self.primary.viscosity
    }

    /// Characteristic mass [kg]
    pub fn mass(&self) -> f64 {
        self.primary.mass
    }

    /// Seconds per year (365.25 days)
    pub fn seconds_per_year(&self) -> f64 {
        self.seconds_per_year
    }

    /// Years in one Myr
    pub fn years_per_myr(&self) -> f64 {
        YEARS_PER_MYR
    }

    /// Multiply a velocity in m/s by this to get cm/yr
    pub fn cm_per_year(&self) -> f64 {
        self.cm_per_year
    }
}

impl fmt::Display for ScaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Employing {} units", self.system)?;
        writeln!(f, "Characteristic values:")?;
        writeln!(f, "         length:      {}", self.display.length)?;
        writeln!(f, "         temperature: {}", self.display.temperature)?;
        writeln!(f, "         stress:      {}", self.display.stress)?;
        writeln!(f, "         viscosity:   {}", self.display.viscosity)?;
        write!(f, "         time:        {}", self.display.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_primary() -> PrimaryScales {
        PrimaryScales {
            temperature: 2.0,
            length: 10.0,
            time: 5.0,
            stress: 3.0,
            viscosity: 15.0,
            mass: 3.0 * 10.0 * 25.0,
            amount: 1.0,
        }
    }

    #[test]
    fn test_derived_scales() {
        let d = DerivedScales::from_primary(&unit_primary());
        assert_relative_eq!(d.area, 100.0);
        assert_relative_eq!(d.volume, 1000.0);
        assert_relative_eq!(d.velocity, 2.0);
        assert_relative_eq!(d.density, 0.75);
        assert_relative_eq!(d.strain_rate, 0.2);
        // force = mass * length / time^2 = stress * length^2
        assert_relative_eq!(d.force, 300.0);
        assert_relative_eq!(d.energy, 3000.0);
        assert_relative_eq!(d.power, 600.0);
        assert_relative_eq!(d.heat_capacity, 3000.0 / 750.0 / 2.0);
        assert_relative_eq!(d.conductivity, 600.0 / 10.0 / 2.0);
    }

    #[test]
    fn test_scale_for_rejects_current() {
        let display = DisplayScales {
            temperature: Measure::new(2.0, crate::core_types::Unit::dimensionless()),
            length: Measure::new(10.0, crate::core_types::Unit::dimensionless()),
            stress: Measure::new(3.0, crate::core_types::Unit::dimensionless()),
            time: Measure::new(5.0, crate::core_types::Unit::dimensionless()),
            viscosity: Measure::new(15.0, crate::core_types::Unit::dimensionless()),
        };
        let g = ScaleRegistry::from_scales(UnitSystem::Dimensionless, display, unit_primary());
        assert_eq!(g.scale_for(BaseDimension::Mass), Some(750.0));
        assert_eq!(g.scale_for(BaseDimension::Current), None);
        assert_eq!(g.scale_for(BaseDimension::Luminosity), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let g = crate::scaling::geo_units(&crate::scaling::ScaleInputs::default()).unwrap();
        let text = toml::to_string(&g).unwrap();
        let back: ScaleRegistry = toml::from_str(&text).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.system(), UnitSystem::Geological);
    }
}
