//! Physical dimensions as exponent vectors over the SI base quantities
//!
//! Exponents are `f64` because geodynamic flow laws routinely carry
//! fractional powers (e.g. `MPa^-3.05`). Current and luminosity are
//! representable so that units using them can be recognised and rejected by
//! the scaling engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// Tolerance used when comparing fractional exponents
const EXPONENT_EPSILON: f64 = 1e-9;

/// SI base dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseDimension {
    /// Length (L)
    Length,
    /// Mass (M)
    Mass,
    /// Time (T)
    Time,
    /// Thermodynamic temperature (Θ)
    Temperature,
    /// Amount of substance (N)
    Amount,
    /// Electric current (I)
    Current,
    /// Luminous intensity (J)
    Luminosity,
}

impl BaseDimension {
    /// All base dimensions, in storage order
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::Current,
        BaseDimension::Luminosity,
    ];

    /// SI base unit symbol for this dimension
    pub const fn si_symbol(self) -> &'static str {
        match self {
            BaseDimension::Length => "m",
            BaseDimension::Mass => "kg",
            BaseDimension::Time => "s",
            BaseDimension::Temperature => "K",
            BaseDimension::Amount => "mol",
            BaseDimension::Current => "A",
            BaseDimension::Luminosity => "cd",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BaseDimension::Length => "length",
            BaseDimension::Mass => "mass",
            BaseDimension::Time => "time",
            BaseDimension::Temperature => "temperature",
            BaseDimension::Amount => "amount",
            BaseDimension::Current => "current",
            BaseDimension::Luminosity => "luminosity",
        };
        write!(f, "{name}")
    }
}

/// Dimension of a unit: one exponent per [`BaseDimension`]
///
/// Velocity is `L¹ T⁻¹`, stress is `M¹ L⁻¹ T⁻²`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    exponents: [f64; 7],
}

impl Dimension {
    /// Dimensionless (all exponents zero)
    pub const NONE: Dimension = Dimension { exponents: [0.0; 7] };

    /// Dimension of a single base quantity raised to the first power
    pub fn base(dim: BaseDimension) -> Self {
        let mut exponents = [0.0; 7];
        exponents[dim.index()] = 1.0;
        Self { exponents }
    }

    /// Build from `(dimension, exponent)` pairs; repeated entries accumulate
    pub fn from_pairs(pairs: &[(BaseDimension, f64)]) -> Self {
        let mut exponents = [0.0; 7];
        for &(dim, exp) in pairs {
            exponents[dim.index()] += exp;
        }
        Self { exponents }
    }

    /// Exponent of one base dimension
    #[inline]
    pub fn exponent(&self, dim: BaseDimension) -> f64 {
        self.exponents[dim.index()]
    }

    /// Non-zero `(dimension, exponent)` pairs
    pub fn decompose(&self) -> impl Iterator<Item = (BaseDimension, f64)> + '_ {
        BaseDimension::ALL
            .iter()
            .map(|&dim| (dim, self.exponent(dim)))
            .filter(|(_, exp)| exp.abs() > EXPONENT_EPSILON)
    }

    /// True when every exponent is (numerically) zero
    pub fn is_dimensionless(&self) -> bool {
        self.decompose().next().is_none()
    }

    /// Equality with a tolerance on fractional exponents
    pub fn approx_eq(&self, other: &Dimension) -> bool {
        self.exponents
            .iter()
            .zip(other.exponents.iter())
            .all(|(a, b)| (a - b).abs() <= EXPONENT_EPSILON)
    }

    /// Raise to a (possibly fractional) power
    pub fn powf(&self, exp: f64) -> Self {
        Self {
            exponents: self.exponents.map(|e| e * exp),
        }
    }
}

impl Mul for Dimension {
    type Output = Dimension;

    // exponents add when dimensions multiply
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn mul(self, rhs: Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents) {
            *e += r;
        }
        Dimension { exponents }
    }
}

impl Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.powf(-1.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .decompose()
            .map(|(dim, exp)| {
                if (exp - 1.0).abs() <= EXPONENT_EPSILON {
                    dim.to_string()
                } else {
                    format!("{dim}^{exp}")
                }
            })
            .collect();
        write!(f, "{}", parts.join("*"))
    }
}
