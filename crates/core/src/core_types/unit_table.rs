//! Unit symbol table
//!
//! The table is process-wide and fixed after first use. Applications that
//! need extra symbols register them once with [`init_with`] before any unit
//! is parsed; otherwise the standard table is installed lazily by [`init`].

use super::dimension::{BaseDimension, Dimension};
use super::unit::Unit;
use crate::error::{Result, ScalingError};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Seconds in a Julian year (365.25 days)
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Celsius to Kelvin offset (0°C = 273.15 K)
pub const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

/// SI prefixes; two-letter prefixes first so `da` wins over `d`
const PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("μ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
];

static TABLE: OnceLock<UnitTable> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
struct UnitDef {
    factor: f64,
    offset: f64,
    dimension: Dimension,
    prefixable: bool,
}

/// Mapping from unit symbols to their SI definitions
#[derive(Debug, Clone)]
pub struct UnitTable {
    units: FxHashMap<String, UnitDef>,
}

impl UnitTable {
    /// Table with SI base and derived units plus the geological time units
    pub fn standard() -> Self {
        use BaseDimension::{Amount, Current, Length, Luminosity, Mass, Temperature, Time};

        let mut table = Self {
            units: FxHashMap::default(),
        };
        let stress = [(Mass, 1.0), (Length, -1.0), (Time, -2.0)];
        let force = [(Mass, 1.0), (Length, 1.0), (Time, -2.0)];
        let energy = [(Mass, 1.0), (Length, 2.0), (Time, -2.0)];
        let power = [(Mass, 1.0), (Length, 2.0), (Time, -3.0)];

        // Base units
        table.insert("m", 1.0, &[(Length, 1.0)], true);
        table.insert("g", 1e-3, &[(Mass, 1.0)], true);
        table.insert("kg", 1.0, &[(Mass, 1.0)], false);
        table.insert("s", 1.0, &[(Time, 1.0)], true);
        table.insert("K", 1.0, &[(Temperature, 1.0)], false);
        table.insert("mol", 1.0, &[(Amount, 1.0)], true);
        table.insert("A", 1.0, &[(Current, 1.0)], true);
        table.insert("cd", 1.0, &[(Luminosity, 1.0)], false);

        // Time
        table.insert("min", 60.0, &[(Time, 1.0)], false);
        table.insert("h", 3600.0, &[(Time, 1.0)], false);
        table.insert("d", 86400.0, &[(Time, 1.0)], false);
        table.insert("yr", SECONDS_PER_YEAR, &[(Time, 1.0)], true);
        table.insert("year", SECONDS_PER_YEAR, &[(Time, 1.0)], false);

        // Derived
        table.insert("N", 1.0, &force, true);
        table.insert("Pa", 1.0, &stress, true);
        table.insert("bar", 1e5, &stress, true);
        table.insert("J", 1.0, &energy, true);
        table.insert("W", 1.0, &power, true);
        table.insert("Hz", 1.0, &[(Time, -1.0)], true);
        table.insert(
            "Pas",
            1.0,
            &[(Mass, 1.0), (Length, -1.0), (Time, -1.0)],
            false,
        );

        // Absolute Celsius scale
        for sym in ["°C", "degC", "celsius"] {
            table.units.insert(
                sym.to_string(),
                UnitDef {
                    factor: 1.0,
                    offset: CELSIUS_KELVIN_OFFSET,
                    dimension: Dimension::base(Temperature),
                    prefixable: false,
                },
            );
        }

        table
    }

    fn insert(
        &mut self,
        symbol: &str,
        factor: f64,
        dims: &[(BaseDimension, f64)],
        prefixable: bool,
    ) {
        self.units.insert(
            symbol.to_string(),
            UnitDef {
                factor,
                offset: 0.0,
                dimension: Dimension::from_pairs(dims),
                prefixable,
            },
        );
    }

    /// Number of registered symbols (prefixed forms not counted)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no symbols are registered
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Resolve a symbol, trying SI prefixes when there is no exact match
    pub fn lookup(&self, symbol: &str) -> Option<Unit> {
        if let Some(def) = self.units.get(symbol) {
            return Some(Unit::atom(symbol, def.factor, def.offset, def.dimension));
        }
        PREFIXES.iter().find_map(|&(prefix, scale)| {
            let base = symbol.strip_prefix(prefix)?;
            let def = self.units.get(base).filter(|d| d.prefixable)?;
            Some(Unit::atom(symbol, scale * def.factor, 0.0, def.dimension))
        })
    }

    /// Register `symbol` as an alias for the unit expression `definition`
    ///
    /// # Errors
    /// Returns [`ScalingError::UnitParse`] if `definition` does not parse, or
    /// if the definition is an affine temperature scale.
    pub fn define(&mut self, symbol: &str, definition: &str) -> Result<()> {
        let unit = super::parse::parse_with(self, definition)?;
        if unit.is_affine() {
            return Err(ScalingError::UnitParse {
                input: definition.to_string(),
                reason: "custom units cannot be affine temperature scales".to_string(),
            });
        }
        self.units.insert(
            symbol.to_string(),
            UnitDef {
                factor: unit.factor(),
                offset: 0.0,
                dimension: unit.dimension(),
                prefixable: false,
            },
        );
        Ok(())
    }
}

/// Install the standard unit table (idempotent) and return it
///
/// Call once during application start-up; parsing also triggers it lazily.
pub fn init() -> &'static UnitTable {
    TABLE.get_or_init(|| {
        let table = UnitTable::standard();
        debug!(symbols = table.len(), "Initialized standard unit table");
        table
    })
}

/// Install the standard table extended with `(symbol, definition)` pairs
///
/// # Errors
/// Returns [`ScalingError::AlreadyInitialized`] if the table was already
/// installed, or a parse error for a bad definition.
pub fn init_with(custom: &[(&str, &str)]) -> Result<&'static UnitTable> {
    if TABLE.get().is_some() {
        return Err(ScalingError::AlreadyInitialized);
    }
    let mut table = UnitTable::standard();
    for (symbol, definition) in custom {
        table.define(symbol, definition)?;
    }
    let count = table.len();
    TABLE
        .set(table)
        .map_err(|_| ScalingError::AlreadyInitialized)?;
    debug!(symbols = count, custom = custom.len(), "Initialized custom unit table");
    Ok(init())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prefix_lookup() {
        let table = UnitTable::standard();
        assert_relative_eq!(table.lookup("km").unwrap().factor(), 1e3);
        assert_relative_eq!(table.lookup("MPa").unwrap().factor(), 1e6);
        assert_relative_eq!(table.lookup("Myr").unwrap().factor(), 1e6 * SECONDS_PER_YEAR);
        assert_relative_eq!(table.lookup("kbar").unwrap().factor(), 1e8);
    }

    #[test]
    fn test_exact_match_wins_over_prefix() {
        let table = UnitTable::standard();
        // "min" is minutes, not milli-inches; "cd" is candela, not centi-days
        assert_relative_eq!(table.lookup("min").unwrap().factor(), 60.0);
        assert_eq!(
            table.lookup("cd").unwrap().unsupported_dimension(),
            Some(BaseDimension::Luminosity)
        );
    }

    #[test]
    fn test_affine_units_are_not_prefixable() {
        let table = UnitTable::standard();
        assert!(table.lookup("k°C").is_none());
        assert!(table.lookup("kK").is_none());
    }

    #[test]
    fn test_define_alias() {
        let mut table = UnitTable::standard();
        table.define("cmyr", "cm/yr").unwrap();
        let u = table.lookup("cmyr").unwrap();
        assert_relative_eq!(u.factor(), 0.01 / SECONDS_PER_YEAR);
    }

    #[test]
    fn test_unknown_symbol() {
        assert!(UnitTable::standard().lookup("furlong").is_none());
    }
}
