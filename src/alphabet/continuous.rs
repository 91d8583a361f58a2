use std::{cmp::Ordering, fmt::Display};

use quickcheck::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The closed interval `[min, max]` of real values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "ContinuousRepr", into = "ContinuousRepr")]
pub struct ContinuousAlphabet {
    min: f64,
    max: f64,
}

impl ContinuousAlphabet {
    /// Creates the interval `[min, max]`.
    /// Both bounds must be finite and `min < max`.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::ContinuousAlphabet;
    ///
    /// let a = ContinuousAlphabet::new(-1.0, 1.0).unwrap();
    /// assert_eq!(a.length(), 2.0);
    /// assert!(a.is_encoded_value(0.5));
    /// assert!(!a.is_encoded_value(f64::NAN));
    /// assert!(ContinuousAlphabet::new(1.0, 1.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The widest representable interval `[-f64::MAX, f64::MAX]`.
    pub fn unbounded() -> Self {
        Self {
            min: -f64::MAX,
            max: f64::MAX,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// The width of the interval.
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    /// Checks whether `value` lies in the interval. NaN never does.
    pub fn is_encoded_value(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Orders by the lower bound first and by the upper bound second.
    pub fn compare(&self, other: &Self) -> Ordering {
        // bounds are finite, so only -0.0 and 0.0 tie
        let by = |a: f64, b: f64| a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        by(self.min, other.min).then(by(self.max, other.max))
    }
}

impl Display for ContinuousAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[derive(Serialize, Deserialize)]
struct ContinuousRepr {
    min: f64,
    max: f64,
}

impl TryFrom<ContinuousRepr> for ContinuousAlphabet {
    type Error = Error;

    fn try_from(repr: ContinuousRepr) -> Result<Self> {
        ContinuousAlphabet::new(repr.min, repr.max)
    }
}

impl From<ContinuousAlphabet> for ContinuousRepr {
    fn from(a: ContinuousAlphabet) -> Self {
        ContinuousRepr {
            min: a.min,
            max: a.max,
        }
    }
}

impl Arbitrary for ContinuousAlphabet {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let min = (i8::arbitrary(g) % 3) as f64;
        let width = (1 + u8::arbitrary(g) % 2) as f64;
        Self {
            min,
            max: min + width,
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn invalid_ranges() {
        assert!(ContinuousAlphabet::new(2.0, 1.0).is_err());
        assert!(ContinuousAlphabet::new(f64::NAN, 1.0).is_err());
        assert!(ContinuousAlphabet::new(0.0, f64::INFINITY).is_err());
        assert!(ContinuousAlphabet::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let a = ContinuousAlphabet::new(0.0, 10.0).unwrap();
        assert!(a.is_encoded_value(0.0));
        assert!(a.is_encoded_value(10.0));
        assert!(!a.is_encoded_value(10.5));
        assert!(!a.is_encoded_value(-0.1));
    }

    #[test]
    fn unbounded_is_valid() {
        let u = ContinuousAlphabet::unbounded();
        let rebuilt = ContinuousAlphabet::new(u.min(), u.max()).unwrap();
        assert_eq!(rebuilt.compare(&u), Ordering::Equal);
        assert!(u.is_encoded_value(1e300));
    }

    #[test]
    fn compare_by_min_then_max() {
        let a = ContinuousAlphabet::new(0.0, 1.0).unwrap();
        let b = ContinuousAlphabet::new(0.0, 2.0).unwrap();
        let c = ContinuousAlphabet::new(-1.0, 5.0).unwrap();
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(c.compare(&a), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
    }

    #[test]
    fn display() {
        let a = ContinuousAlphabet::new(-1.5, 2.0).unwrap();
        assert_eq!(a.to_string(), "[-1.5, 2]");
    }

    #[test]
    fn signed_zero_bounds_are_consistent() {
        let a = ContinuousAlphabet::new(-0.0, 1.0).unwrap();
        let b = ContinuousAlphabet::new(0.0, 1.0).unwrap();
        assert_eq!(a.compare(&b), Ordering::Equal);
        let c = ContinuousAlphabet::new(-1.0, -0.0).unwrap();
        let d = ContinuousAlphabet::new(-1.0, 0.0).unwrap();
        assert_eq!(c.compare(&d), Ordering::Equal);
        assert_eq!(a.compare(&ContinuousAlphabet::new(-0.5, 1.0).unwrap()), Ordering::Greater);
    }

    #[quickcheck]
    fn compare_is_antisymmetric(a: ContinuousAlphabet, b: ContinuousAlphabet) -> bool {
        a.compare(&b) == b.compare(&a).reverse()
    }
}
