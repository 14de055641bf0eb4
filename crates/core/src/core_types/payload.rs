//! Numeric payload: a scalar or a column of values with one shared unit

use super::float::Float;
use crate::error::{Result, ScalingError};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Unit-free numeric content of a [`Measure`](super::Measure) or
/// [`Quantity`](super::Quantity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload<T: Float> {
    /// Single value
    Scalar(T),
    /// Array of values sharing one unit
    Array(DVector<T>),
}

impl<T: Float> Payload<T> {
    /// Number of stored values (1 for scalars)
    pub fn len(&self) -> usize {
        match self {
            Payload::Scalar(_) => 1,
            Payload::Array(v) => v.len(),
        }
    }

    /// True for an empty array
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for [`Payload::Scalar`]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Payload::Scalar(_))
    }

    /// The scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Payload::Scalar(x) => Some(*x),
            Payload::Array(_) => None,
        }
    }

    /// The array, if this is an array
    pub fn as_array(&self) -> Option<&DVector<T>> {
        match self {
            Payload::Scalar(_) => None,
            Payload::Array(v) => Some(v),
        }
    }

    /// Element `index`; a scalar answers index 0
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Payload::Scalar(x) => (index == 0).then_some(*x),
            Payload::Array(v) => v.get(index).copied(),
        }
    }

    /// Overwrite element `index`
    ///
    /// # Errors
    /// Returns [`ScalingError::IndexOutOfBounds`] when `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        match self {
            Payload::Scalar(x) if index == 0 => {
                *x = value;
                Ok(())
            }
            Payload::Array(v) if index < len => {
                v[index] = value;
                Ok(())
            }
            _ => Err(ScalingError::IndexOutOfBounds { index, len }),
        }
    }

    /// Contiguous sub-range as a new array payload
    pub fn slice(&self, range: Range<usize>) -> Option<Payload<T>> {
        match self {
            Payload::Array(v) if range.start <= range.end && range.end <= v.len() => Some(
                Payload::Array(v.rows(range.start, range.end - range.start).into_owned()),
            ),
            _ => None,
        }
    }

    /// Apply `f` to every value
    pub fn map(&self, mut f: impl FnMut(T) -> T) -> Payload<T> {
        match self {
            Payload::Scalar(x) => Payload::Scalar(f(*x)),
            Payload::Array(v) => Payload::Array(v.map(f)),
        }
    }

    /// Apply `f` through `f64`, casting back to the payload precision
    pub fn map_f64(&self, mut f: impl FnMut(f64) -> f64) -> Payload<T> {
        self.map(|x| T::cast_from_f64(f(x.to_f64())))
    }

    /// Element-wise combination; a scalar broadcasts against an array
    ///
    /// # Panics
    /// Panics if both sides are arrays of different length.
    pub fn zip_map(&self, other: &Payload<T>, f: impl Fn(T, T) -> T) -> Payload<T> {
        match (self, other) {
            (Payload::Scalar(a), Payload::Scalar(b)) => Payload::Scalar(f(*a, *b)),
            (Payload::Scalar(a), Payload::Array(b)) => Payload::Array(b.map(|y| f(*a, y))),
            (Payload::Array(a), Payload::Scalar(b)) => Payload::Array(a.map(|x| f(x, *b))),
            (Payload::Array(a), Payload::Array(b)) => {
                assert_eq!(
                    a.len(),
                    b.len(),
                    "Payload::zip_map: array lengths differ"
                );
                Payload::Array(a.zip_map(b, f))
            }
        }
    }

    /// Convert to an array (a scalar becomes a one-element vector)
    pub fn into_array(self) -> DVector<T> {
        match self {
            Payload::Scalar(x) => DVector::from_element(1, x),
            Payload::Array(v) => v,
        }
    }
}

impl<T: Float> From<T> for Payload<T> {
    fn from(value: T) -> Self {
        Payload::Scalar(value)
    }
}

impl<T: Float> From<DVector<T>> for Payload<T> {
    fn from(value: DVector<T>) -> Self {
        Payload::Array(value)
    }
}

impl<T: Float> From<Vec<T>> for Payload<T> {
    fn from(value: Vec<T>) -> Self {
        Payload::Array(DVector::from_vec(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_broadcast() {
        let a = Payload::Scalar(2.0_f64);
        let b: Payload<f64> = Payload::from(vec![1.0, 2.0, 3.0]);
        let c = a.zip_map(&b, |x, y| x * y);
        assert_eq!(c, Payload::Array(DVector::from_vec(vec![2.0, 4.0, 6.0])));
    }

    #[test]
    #[should_panic(expected = "Payload::zip_map: array lengths differ")]
    fn test_length_mismatch_panics() {
        let a: Payload<f64> = Payload::from(vec![1.0, 2.0]);
        let b: Payload<f64> = Payload::from(vec![1.0, 2.0, 3.0]);
        let _ = a.zip_map(&b, |x, y| x + y);
    }

    #[test]
    fn test_set_and_bounds() {
        let mut p: Payload<f32> = Payload::from(vec![1.0, 2.0]);
        p.set(1, 5.0).unwrap();
        assert_eq!(p.get(1), Some(5.0));
        assert_eq!(
            p.set(2, 0.0),
            Err(ScalingError::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_slice() {
        let p: Payload<f64> = Payload::from(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            p.slice(1..3),
            Some(Payload::Array(DVector::from_vec(vec![2.0, 3.0])))
        );
        assert_eq!(p.slice(2..9), None);
        assert_eq!(Payload::Scalar(1.0_f64).slice(0..1), None);
    }
}
