//! An alphabet is the set of values a single position of a sequence can take.
//!
//! Alphabets are either discrete, i.e., a finite list of symbols encoded by their index,
//! or continuous, i.e., an interval of real values that encode themselves.
//! Discrete alphabets can additionally define a complement for each symbol, which is needed to build reverse complements of, e.g., DNA sequences.
//! This module provides the three kinds and the [Alphabet] type that unifies them.

mod complement;
mod continuous;
mod discrete;

use std::{cmp::Ordering, fmt::Display, sync::Arc};

use lazy_static::lazy_static;
use quickcheck::Arbitrary;
use serde::{Deserialize, Serialize};

pub use complement::ComplementableDiscreteAlphabet;
pub use continuous::ContinuousAlphabet;
pub use discrete::DiscreteAlphabet;

use crate::error::Result;

lazy_static! {
    static ref SHARED_DNA: Arc<Alphabet> = Arc::new(Alphabet::dna());
}

/// An alphabet of any kind.
///
/// Alphabets are immutable. Two alphabets are *consistent* if they are of the same kind and define the same symbols (in the same order) or the same interval.
/// Consistency is decided by [Alphabet::compare], which is a total order on alphabets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Alphabet {
    Discrete(DiscreteAlphabet),
    Complementable(ComplementableDiscreteAlphabet),
    Continuous(ContinuousAlphabet),
}

impl Alphabet {
    /// The DNA alphabet, see [ComplementableDiscreteAlphabet::dna].
    /// This is an owned copy. [shared_dna](Self::shared_dna) hands out the process-wide instance.
    pub fn dna() -> Self {
        Alphabet::Complementable(ComplementableDiscreteAlphabet::dna().clone())
    }

    /// The process-wide DNA alphabet. Every call returns the same instance.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use seq_alphabet::alphabet::Alphabet;
    ///
    /// assert!(Arc::ptr_eq(&Alphabet::shared_dna(), &Alphabet::shared_dna()));
    /// ```
    pub fn shared_dna() -> Arc<Self> {
        Arc::clone(&SHARED_DNA)
    }

    /// The number of symbols of a discrete alphabet or the width of the interval of a continuous alphabet.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::{Alphabet, ContinuousAlphabet};
    ///
    /// assert_eq!(Alphabet::dna().length(), 4.0);
    /// let c: Alphabet = ContinuousAlphabet::new(1.0, 3.5).unwrap().into();
    /// assert_eq!(c.length(), 2.5);
    /// ```
    pub fn length(&self) -> f64 {
        match self {
            Alphabet::Discrete(d) => d.len() as f64,
            Alphabet::Complementable(c) => c.discrete().len() as f64,
            Alphabet::Continuous(c) => c.length(),
        }
    }

    /// The smallest value that encodes a symbol. Codes of discrete alphabets start at 0.
    pub fn min(&self) -> f64 {
        match self {
            Alphabet::Discrete(_) | Alphabet::Complementable(_) => 0.0,
            Alphabet::Continuous(c) => c.min(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Alphabet::Discrete(_) => 0,
            Alphabet::Complementable(_) => 1,
            Alphabet::Continuous(_) => 2,
        }
    }

    /// Total order on alphabets.
    /// Alphabets of different kinds are ordered discrete < complementable < continuous,
    /// alphabets of the same kind are ordered by their symbols or intervals.
    /// Returns [Ordering::Equal] iff the alphabets are consistent.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Alphabet::Discrete(a), Alphabet::Discrete(b)) => a.compare(b),
            (Alphabet::Complementable(a), Alphabet::Complementable(b)) => a.compare(b),
            (Alphabet::Continuous(a), Alphabet::Continuous(b)) => a.compare(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Checks whether the two alphabets are consistent, i.e., interchangeable.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::{Alphabet, DiscreteAlphabet};
    ///
    /// let a: Alphabet = DiscreteAlphabet::new(false, ["A", "B"]).unwrap().into();
    /// let b: Alphabet = DiscreteAlphabet::new(false, ["A", "B"]).unwrap().into();
    /// let c: Alphabet = DiscreteAlphabet::new(false, ["B", "A"]).unwrap().into();
    /// assert!(a.check_consistency(&b));
    /// assert!(!a.check_consistency(&c));
    /// ```
    pub fn check_consistency(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Returns true if this is a discrete alphabet, complementable or not.
    pub fn is_discrete(&self) -> bool {
        !self.is_continuous()
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Alphabet::Continuous(_))
    }

    /// The discrete view of this alphabet, if it is discrete.
    pub fn as_discrete(&self) -> Option<&DiscreteAlphabet> {
        match self {
            Alphabet::Discrete(d) => Some(d),
            Alphabet::Complementable(c) => Some(c.discrete()),
            Alphabet::Continuous(_) => None,
        }
    }

    pub fn as_complementable(&self) -> Option<&ComplementableDiscreteAlphabet> {
        match self {
            Alphabet::Complementable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_continuous(&self) -> Option<&ContinuousAlphabet> {
        match self {
            Alphabet::Continuous(c) => Some(c),
            _ => None,
        }
    }

    /// Whether symbols are looked up case-insensitively. Continuous alphabets have no case and always return true.
    pub fn ignores_case(&self) -> bool {
        self.as_discrete().map_or(true, DiscreteAlphabet::ignores_case)
    }

    /// The length of the longest symbol of a discrete alphabet, `None` for continuous alphabets.
    pub fn maximal_symbol_length(&self) -> Option<usize> {
        self.as_discrete().map(DiscreteAlphabet::maximal_symbol_length)
    }

    /// Writes this alphabet in its tagged text form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads an alphabet from its tagged text form. The alphabet is validated as if it was constructed directly.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::Alphabet;
    ///
    /// let a = Alphabet::from_json(r#"{"Continuous":{"min":0.0,"max":1.0}}"#).unwrap();
    /// assert!(a.is_continuous());
    /// assert!(Alphabet::from_json(r#"{"Continuous":{"min":1.0,"max":0.0}}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<DiscreteAlphabet> for Alphabet {
    fn from(a: DiscreteAlphabet) -> Self {
        Alphabet::Discrete(a)
    }
}

impl From<ComplementableDiscreteAlphabet> for Alphabet {
    fn from(a: ComplementableDiscreteAlphabet) -> Self {
        Alphabet::Complementable(a)
    }
}

impl From<ContinuousAlphabet> for Alphabet {
    fn from(a: ContinuousAlphabet) -> Self {
        Alphabet::Continuous(a)
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::Discrete(d) => write!(f, "{}", d),
            Alphabet::Complementable(c) => write!(f, "{}", c),
            Alphabet::Continuous(c) => write!(f, "{}", c),
        }
    }
}

impl Arbitrary for Alphabet {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 | 1 => Alphabet::Discrete(DiscreteAlphabet::arbitrary(g)),
            2 => Alphabet::dna(),
            _ => Alphabet::Continuous(ContinuousAlphabet::arbitrary(g)),
        }
    }
}
