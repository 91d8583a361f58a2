//! Sequences of encoded values over an [AlphabetContainer].
//!
//! A sequence stores one value per position. Discrete positions store the code of their symbol, continuous positions the value itself.

use std::fmt::Display;

use itertools::Itertools;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    container::{span, AlphabetContainer},
    error::{Error, Result},
};

/// An encoded sequence together with the container it was encoded with.
///
/// Deserialization checks the values like [from_codes](Sequence::from_codes).
///
/// # Example
/// ```
/// use seq_alphabet::{alphabet::Alphabet, AlphabetContainer, Sequence};
///
/// let con = AlphabetContainer::new(Alphabet::dna());
/// let seq = Sequence::parse(&con, "GAT").unwrap();
/// let json = serde_json::to_string(&seq).unwrap();
/// assert_eq!(serde_json::from_str::<Sequence>(&json).unwrap(), seq);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SequenceRepr", into = "SequenceRepr")]
pub struct Sequence {
    container: AlphabetContainer,
    values: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct SequenceRepr {
    container: AlphabetContainer,
    values: Vec<f64>,
}

impl TryFrom<SequenceRepr> for Sequence {
    type Error = Error;

    fn try_from(repr: SequenceRepr) -> Result<Self> {
        Sequence::from_codes(&repr.container, repr.values)
    }
}

impl From<Sequence> for SequenceRepr {
    fn from(seq: Sequence) -> Self {
        SequenceRepr {
            container: seq.container,
            values: seq.values,
        }
    }
}

impl Sequence {
    /// Parses `text` with the given container.
    ///
    /// If the [delimiter](AlphabetContainer::delimiter) of the container is empty, every character is a symbol.
    /// Otherwise symbols are separated by whitespace.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::Alphabet, AlphabetContainer, Sequence};
    ///
    /// let con = AlphabetContainer::new(Alphabet::dna());
    /// let seq = Sequence::parse(&con, "ACgT").unwrap();
    /// assert_eq!(seq.values(), &[0.0, 1.0, 2.0, 3.0]);
    /// assert_eq!(seq.to_string(), "ACGT");
    /// ```
    pub fn parse(container: &AlphabetContainer, text: &str) -> Result<Self> {
        let symbols: Vec<&str> = if container.delimiter().is_empty() {
            let text = text.trim();
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split_whitespace().collect()
        };
        Self::check_length(container, symbols.len())?;
        let values = symbols
            .into_iter()
            .enumerate()
            .map(|(pos, s)| container.code_of(pos, s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            container: container.clone(),
            values,
        })
    }

    /// Creates a sequence from already encoded values.
    pub fn from_codes(container: &AlphabetContainer, values: Vec<f64>) -> Result<Self> {
        Self::check_length(container, values.len())?;
        for (pos, &value) in values.iter().enumerate() {
            if !container.is_encoded_value(pos, value) {
                return Err(Error::ValueOutOfRange {
                    value,
                    alphabet: container.alphabet_at(pos).to_string(),
                });
            }
        }
        Ok(Self {
            container: container.clone(),
            values,
        })
    }

    fn check_length(container: &AlphabetContainer, length: usize) -> Result<()> {
        let expected = container.possible_length();
        if expected != 0 && expected != length {
            return Err(Error::SequenceLength {
                expected,
                actual: length,
            });
        }
        Ok(())
    }

    pub fn container(&self) -> &AlphabetContainer {
        &self.container
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The encoded value at `pos`.
    ///
    /// # Panics
    /// If `pos` is out of bounds.
    pub fn value_at(&self, pos: usize) -> f64 {
        self.values[pos]
    }

    /// The value at `pos` mapped to a discrete index, see [AlphabetContainer::to_discrete_index].
    pub fn discrete_at(&self, pos: usize) -> Result<i64> {
        let value = self.values.get(pos).ok_or(Error::PositionOutOfRange {
            position: pos,
            length: self.len(),
        })?;
        self.container.to_discrete_index(pos, *value)
    }

    /// The subsequence of `length` values starting at `start`, over the matching sub-container.
    pub fn sub_sequence(&self, start: usize, length: usize) -> Result<Self> {
        let range = span(start, length, self.len())?;
        Ok(Self {
            container: self.container.sub_container(start, length)?,
            values: self.values[range].to_vec(),
        })
    }

    /// The reverse complement of this sequence.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::Alphabet, AlphabetContainer, Sequence};
    ///
    /// let con = AlphabetContainer::new(Alphabet::dna());
    /// let seq = Sequence::parse(&con, "AACG").unwrap();
    /// assert_eq!(seq.reverse_complement().unwrap().to_string(), "CGTT");
    /// ```
    pub fn reverse_complement(&self) -> Result<Self> {
        if !self.container.is_reverse_complementable() {
            return Err(Error::NotComplementable(0));
        }
        let values = self
            .values
            .iter()
            .rev()
            .enumerate()
            .map(|(pos, &value)| {
                let code = value.to_usize().ok_or_else(|| Error::ValueOutOfRange {
                    value,
                    alphabet: self.container.alphabet_at(pos).to_string(),
                })?;
                self.container.complement_of(pos, code).map(|c| c as f64)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            container: self.container.clone(),
            values,
        })
    }

    /// Decodes the sequence into its symbols.
    pub fn symbols(&self) -> Result<Vec<String>> {
        self.values
            .iter()
            .enumerate()
            .map(|(pos, &v)| self.container.symbol_of(pos, v))
            .collect()
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols = self.symbols().map_err(|_| std::fmt::Error)?;
        write!(f, "{}", symbols.iter().join(self.container.delimiter()))
    }
}

/// Enumerates all sequences of a given length over a discrete container.
///
/// Sequences are produced in lexicographic order of their codes, the last position changing fastest.
///
/// # Example
/// ```
/// use seq_alphabet::{alphabet::DiscreteAlphabet, AlphabetContainer, DiscreteSequenceEnumerator};
///
/// let con = AlphabetContainer::new(DiscreteAlphabet::new(false, ["0", "1"]).unwrap());
/// let all: Vec<String> = DiscreteSequenceEnumerator::new(&con, 2)
///     .unwrap()
///     .map(|s| s.to_string())
///     .collect();
/// assert_eq!(all, vec!["00", "01", "10", "11"]);
/// ```
#[derive(Debug, Clone)]
pub struct DiscreteSequenceEnumerator {
    container: AlphabetContainer,
    sizes: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl DiscreteSequenceEnumerator {
    pub fn new(container: &AlphabetContainer, length: usize) -> Result<Self> {
        Sequence::check_length(container, length)?;
        let sizes = (0..length)
            .map(|pos| {
                container
                    .alphabet_at(pos)
                    .as_discrete()
                    .map(|d| d.len())
                    .ok_or(Error::NotDiscrete(pos))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            container: container.clone(),
            sizes,
            next: Some(vec![0; length]),
        })
    }

    /// The number of sequences that are enumerated in total, `None` if it does not fit into a `usize`.
    pub fn count_all(&self) -> Option<usize> {
        self.sizes.iter().try_fold(1usize, |n, &size| n.checked_mul(size))
    }
}

impl Iterator for DiscreteSequenceEnumerator {
    type Item = Sequence;

    fn next(&mut self) -> Option<Sequence> {
        let current = self.next.take()?;
        let mut following = current.clone();
        // odometer increment, `None` once every position wrapped around
        let mut carry = true;
        for (c, &size) in following.iter_mut().zip(&self.sizes).rev() {
            *c += 1;
            if *c < size {
                carry = false;
                break;
            }
            *c = 0;
        }
        if !carry {
            self.next = Some(following);
        }
        Some(Sequence {
            container: self.container.clone(),
            values: current.into_iter().map(|c| c as f64).collect(),
        })
    }
}
