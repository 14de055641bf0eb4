//! Floating-point precision abstraction
//!
//! Payloads are stored in either `f32` or `f64`. Unit arithmetic and scale
//! factors are always evaluated in `f64` and cast back to the payload
//! precision, so a quantity built from `f32` values stays `f32` through every
//! transform.

use nalgebra::RealField;

/// Payload precision (`f32` or `f64`)
///
/// `RealField` already implies `SupersetOf<f64>`, which gives the two casts.
pub trait Float: RealField + Copy {
    /// Cast from `f64` (rounds for `f32`)
    #[inline]
    fn cast_from_f64(value: f64) -> Self {
        nalgebra::convert(value)
    }

    /// Widen to `f64`
    #[inline]
    fn to_f64(self) -> f64 {
        nalgebra::try_convert(self).unwrap_or(f64::NAN)
    }
}

impl Float for f32 {}
impl Float for f64 {}
