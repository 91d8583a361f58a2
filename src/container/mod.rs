//! Alphabet containers assign an [Alphabet] to every position of a sequence.
//!
//! A container is either *simple*, i.e., it uses a single alphabet for all positions and is therefore valid for sequences of any length,
//! or it stores a list of alphabets together with an assignment from each position to one of them.
//! In the latter case the container is only valid for sequences of exactly its [possible length](AlphabetContainer::possible_length).
//!
//! Containers are immutable and cheap to clone, clones share the same data.
//! Derived containers (see [AlphabetContainer::sub_container] and friends) share the underlying alphabets with their source.

mod derive;
mod serial;

pub(crate) use derive::span;

use std::{cmp::Ordering, fmt::Display, sync::Arc};

use bit_set::BitSet;
use log::trace;
use num_traits::ToPrimitive;
use quickcheck::Arbitrary;
use smallvec::SmallVec;

use crate::{
    alphabet::Alphabet,
    config::{AlphabetConfig, AlphabetContainerConfig, AlphabetFactory, StandardFactory},
    error::{Error, Result},
};

/// The alphabets of a container. Most containers use very few distinct alphabets.
pub(crate) type Alphabets = SmallVec<[Arc<Alphabet>; 4]>;

/// The kinds of alphabets used by a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    /// All alphabets are discrete.
    Discrete,
    /// All alphabets are continuous.
    Continuous,
    /// Discrete and continuous alphabets are mixed.
    Both,
}

impl ContainerType {
    /// Determines the type of a list of alphabets.
    /// Stops at the first alphabet that makes the list neither purely discrete nor purely continuous.
    pub fn determine<'a>(alphabets: impl IntoIterator<Item = &'a Alphabet>) -> Self {
        let mut discrete = true;
        let mut continuous = true;
        for a in alphabets {
            discrete &= a.is_discrete();
            continuous &= a.is_continuous();
            if !(discrete || continuous) {
                return ContainerType::Both;
            }
        }
        if discrete {
            ContainerType::Discrete
        } else {
            ContainerType::Continuous
        }
    }
}

/// Assigns an alphabet to each position of a sequence.
#[derive(Debug, Clone)]
pub struct AlphabetContainer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    alphabets: Alphabets,
    /// Position to alphabet index. `None` iff there is exactly one alphabet.
    index: Option<Vec<usize>>,
    delim: &'static str,
    max_alphabet_length: f64,
}

impl AlphabetContainer {
    /// Creates a simple container that uses `alphabet` for every position.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::DiscreteAlphabet, AlphabetContainer};
    ///
    /// let dna = DiscreteAlphabet::new(false, ["A", "C", "G", "T"]).unwrap();
    /// let con = AlphabetContainer::new(dna);
    /// assert!(con.is_simple());
    /// assert!(con.is_discrete());
    /// assert_eq!(con.possible_length(), 0);
    /// assert_eq!(con.maximal_alphabet_length(), 4.0);
    /// assert_eq!(con.delimiter(), "");
    /// assert_eq!(con.code_of(17, "G").unwrap(), 2.0);
    /// assert_eq!(con.symbol_of(17, 2.0).unwrap(), "G");
    /// ```
    pub fn new(alphabet: impl Into<Alphabet>) -> Self {
        Self::from_shared(Arc::new(alphabet.into()))
    }

    /// Creates a simple container around an already shared alphabet.
    pub fn from_shared(alphabet: Arc<Alphabet>) -> Self {
        let mut alphabets = Alphabets::new();
        alphabets.push(alphabet);
        Self::assemble(alphabets, None)
    }

    /// Creates a container from a list of alphabets and an assignment of positions to alphabets.
    ///
    /// If only one alphabet is given, the container is simple and the assignment is ignored.
    /// If no assignment is given, position `i` uses alphabet `i`.
    /// Otherwise, every entry of the assignment must be an index into `alphabets` and every alphabet must be used at least once.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, DiscreteAlphabet}, AlphabetContainer};
    ///
    /// let a: Alphabet = DiscreteAlphabet::new(false, ["A", "B"]).unwrap().into();
    /// let b: Alphabet = DiscreteAlphabet::new(false, ["x", "y", "z"]).unwrap().into();
    ///
    /// let con = AlphabetContainer::with_assignment(vec![a.clone(), b.clone()], Some(vec![0, 1, 1])).unwrap();
    /// assert_eq!(con.possible_length(), 3);
    /// assert_eq!(con.code_of(2, "z").unwrap(), 2.0);
    ///
    /// // alphabet 1 is never used
    /// assert!(AlphabetContainer::with_assignment(vec![a.clone(), b.clone()], Some(vec![0, 0, 0])).is_err());
    /// // there is no alphabet 5
    /// assert!(AlphabetContainer::with_assignment(vec![a, b], Some(vec![0, 1, 5])).is_err());
    /// ```
    pub fn with_assignment(alphabets: Vec<Alphabet>, assignment: Option<Vec<usize>>) -> Result<Self> {
        let alphabets = alphabets.into_iter().map(Arc::new).collect();
        Self::with_shared_assignment(alphabets, assignment)
    }

    pub(crate) fn with_shared_assignment(
        alphabets: Alphabets,
        assignment: Option<Vec<usize>>,
    ) -> Result<Self> {
        match alphabets.len() {
            0 => Err(Error::NoAlphabets),
            1 => Ok(Self::assemble(alphabets, None)),
            n => {
                let index = match assignment {
                    None => (0..n).collect(),
                    Some(index) => {
                        let mut used = BitSet::with_capacity(n);
                        for (position, &a) in index.iter().enumerate() {
                            if a >= n {
                                return Err(Error::CorruptedAssignment { position });
                            }
                            used.insert(a);
                        }
                        if let Some(unused) = (0..n).find(|a| !used.contains(*a)) {
                            return Err(Error::NotSurjective(unused));
                        }
                        index
                    }
                };
                Ok(Self::assemble(alphabets, Some(index)))
            }
        }
    }

    /// Builds the container from validated parts and precomputes the delimiter and the maximal alphabet length.
    fn assemble(alphabets: Alphabets, index: Option<Vec<usize>>) -> Self {
        let single_chars = alphabets
            .iter()
            .all(|a| a.maximal_symbol_length() == Some(1));
        let delim = if single_chars { "" } else { " " };
        let max_alphabet_length = alphabets
            .iter()
            .map(|a| a.length())
            .fold(f64::NEG_INFINITY, f64::max);
        Self {
            inner: Arc::new(Inner {
                alphabets,
                index,
                delim,
                max_alphabet_length,
            }),
        }
    }

    /// Creates a container from a configuration, building the alphabets with the [StandardFactory].
    pub fn from_config(config: &AlphabetContainerConfig) -> Result<Self> {
        Self::from_config_with(config, &StandardFactory)
    }

    /// Creates a container from a configuration, building the alphabets with the given factory.
    /// Errors of the factory are wrapped into [Error::NotInstantiable].
    pub fn from_config_with(
        config: &AlphabetContainerConfig,
        factory: &dyn AlphabetFactory,
    ) -> Result<Self> {
        config.validate()?;
        let build = |c: &AlphabetConfig| {
            factory.build(c).map_err(|e| Error::NotInstantiable {
                    tag: c.tag().to_string(),
                    reason: e.to_string(),
                })
        };
        match config {
            AlphabetContainerConfig::Single(c) => Ok(Self::from_shared(build(c)?)),
            AlphabetContainerConfig::Array { alphabets } => {
                let alphabets = alphabets.iter().map(build).collect::<Result<Alphabets>>()?;
                Self::with_shared_assignment(alphabets, None)
            }
            AlphabetContainerConfig::Sections { length, sections } => {
                let mut index = Vec::new();
                index
                    .try_reserve_exact(*length)
                    .map_err(|e| Error::Config(e.to_string()))?;
                index.resize(*length, 0);
                let mut alphabets = Alphabets::with_capacity(sections.len());
                for (i, section) in sections.iter().enumerate() {
                    alphabets.push(build(&section.alphabet)?);
                    for p in section.positions(*length)? {
                        index[p] = i;
                    }
                }
                Self::with_shared_assignment(alphabets, Some(index))
            }
        }
    }

    /// The configuration that rebuilds this container.
    ///
    /// Simple containers become a single alphabet, containers with one alphabet per position an array of alphabets,
    /// and all other containers a list of alphabets with the sections they are used in.
    pub fn to_config(&self) -> AlphabetContainerConfig {
        AlphabetContainerConfig::of(self)
    }

    /// Whether this container uses a single alphabet for all positions.
    pub fn is_simple(&self) -> bool {
        self.inner.index.is_none()
    }

    /// The length of sequences this container can be used for, `0` if it can be used for sequences of any length.
    pub fn possible_length(&self) -> usize {
        self.inner.index.as_ref().map_or(0, Vec::len)
    }

    /// The number of distinct alphabets.
    pub fn number_of_alphabets(&self) -> usize {
        self.inner.alphabets.len()
    }

    /// The alphabets of this container.
    pub fn alphabets(&self) -> impl Iterator<Item = &Alphabet> + '_ {
        self.inner.alphabets.iter().map(|a| a.as_ref())
    }

    pub(crate) fn shared_alphabets(&self) -> &[Arc<Alphabet>] {
        &self.inner.alphabets
    }

    /// The assignment of positions to alphabet indices, `None` for simple containers.
    pub fn assignment(&self) -> Option<&[usize]> {
        self.inner.index.as_deref()
    }

    /// The index of the alphabet used at `pos`, always 0 for simple containers.
    ///
    /// # Panics
    /// If the container is not simple and `pos` is not less than its possible length.
    pub fn alphabet_index_for_position(&self, pos: usize) -> usize {
        match &self.inner.index {
            None => 0,
            Some(index) => index[pos],
        }
    }

    /// The alphabet used at `pos`.
    ///
    /// # Panics
    /// If the container is not simple and `pos` is not less than its possible length.
    pub fn alphabet_at(&self, pos: usize) -> &Alphabet {
        &self.inner.alphabets[self.alphabet_index_for_position(pos)]
    }

    /// Like [alphabet_at](Self::alphabet_at) but returns an error for positions outside of the container.
    pub fn checked_alphabet_at(&self, pos: usize) -> Result<&Alphabet> {
        match &self.inner.index {
            None => Ok(self.inner.alphabets[0].as_ref()),
            Some(index) => index
                .get(pos)
                .map(|&i| self.inner.alphabets[i].as_ref())
                .ok_or(Error::PositionOutOfRange {
                    position: pos,
                    length: index.len(),
                }),
        }
    }

    /// Whether the alphabet at `pos` is discrete.
    pub fn is_discrete_at(&self, pos: usize) -> bool {
        self.alphabet_at(pos).is_discrete()
    }

    /// Whether all alphabets are discrete.
    pub fn is_discrete(&self) -> bool {
        self.container_type() == ContainerType::Discrete
    }

    /// Whether the alphabets of this container are all discrete, all continuous, or both kinds are mixed.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, ContinuousAlphabet}, AlphabetContainer, ContainerType};
    ///
    /// assert_eq!(AlphabetContainer::new(Alphabet::dna()).container_type(), ContainerType::Discrete);
    /// let mixed = AlphabetContainer::with_assignment(
    ///     vec![Alphabet::dna(), ContinuousAlphabet::new(0.0, 1.0).unwrap().into()],
    ///     None,
    /// ).unwrap();
    /// assert_eq!(mixed.container_type(), ContainerType::Both);
    /// ```
    pub fn container_type(&self) -> ContainerType {
        ContainerType::determine(self.alphabets())
    }

    /// The minimal value of the alphabet at `pos`.
    pub fn min_at(&self, pos: usize) -> f64 {
        self.alphabet_at(pos).min()
    }

    /// The length of the alphabet at `pos`.
    pub fn alphabet_length_at(&self, pos: usize) -> f64 {
        self.alphabet_at(pos).length()
    }

    /// The maximal length over all alphabets.
    pub fn maximal_alphabet_length(&self) -> f64 {
        self.inner.max_alphabet_length
    }

    /// The minimal length over all alphabets.
    pub fn minimal_alphabet_length(&self) -> f64 {
        self.alphabets()
            .map(Alphabet::length)
            .fold(f64::INFINITY, f64::min)
    }

    /// The delimiter to put between symbols when writing sequences.
    /// Empty if all alphabets are discrete with single-character symbols, a single blank otherwise.
    pub fn delimiter(&self) -> &'static str {
        self.inner.delim
    }

    /// Encodes `symbol` at position `pos`.
    ///
    /// Discrete alphabets return the code of the symbol, continuous alphabets parse the symbol as a number
    /// that must lie in the interval of the alphabet.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, ContinuousAlphabet}, AlphabetContainer};
    ///
    /// let con = AlphabetContainer::with_assignment(
    ///     vec![Alphabet::dna(), ContinuousAlphabet::new(0.0, 1.0).unwrap().into()],
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(con.code_of(0, "t").unwrap(), 3.0);
    /// assert_eq!(con.code_of(1, "0.25").unwrap(), 0.25);
    /// assert!(con.code_of(1, "1.5").is_err());
    /// assert!(con.code_of(2, "A").is_err());
    /// ```
    pub fn code_of(&self, pos: usize, symbol: &str) -> Result<f64> {
        match self.checked_alphabet_at(pos)? {
            Alphabet::Continuous(c) => {
                let value: f64 = symbol
                    .trim()
                    .parse()
                    .map_err(|_| Error::NotANumber(symbol.to_string()))?;
                if c.is_encoded_value(value) {
                    Ok(value)
                } else {
                    Err(Error::ValueOutOfRange {
                        value,
                        alphabet: c.to_string(),
                    })
                }
            }
            Alphabet::Discrete(d) => Ok(d.code_of(symbol)? as f64),
            Alphabet::Complementable(c) => Ok(c.discrete().code_of(symbol)? as f64),
        }
    }

    /// Decodes `value` at position `pos`, the inverse of [code_of](Self::code_of).
    pub fn symbol_of(&self, pos: usize, value: f64) -> Result<String> {
        let alphabet = self.checked_alphabet_at(pos)?;
        match alphabet.as_discrete() {
            Some(d) => {
                let code = value.to_usize().ok_or_else(|| Error::ValueOutOfRange {
                    value,
                    alphabet: d.to_string(),
                })?;
                Ok(d.symbol_of(code)?.to_string())
            }
            None => Ok(value.to_string()),
        }
    }

    /// Whether `value` encodes a symbol at position `pos`.
    /// For discrete alphabets, the value must be an integral code.
    pub fn is_encoded_value(&self, pos: usize, value: f64) -> bool {
        match self.checked_alphabet_at(pos) {
            Ok(Alphabet::Continuous(c)) => c.is_encoded_value(value),
            Ok(a) => {
                value.fract() == 0.0
                    && value
                        .to_usize()
                        .zip(a.as_discrete())
                        .is_some_and(|(code, d)| d.is_encoded_code(code))
            }
            Err(_) => false,
        }
    }

    /// Maps `value` at position `pos` to a discrete index.
    ///
    /// Discrete positions truncate the value to an integer, which is the code itself for valid codes.
    /// Continuous positions truncate `value - min`. This is a crude discretization that downstream
    /// lookup tables rely on; NaN can not be discretized and yields an error.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::ContinuousAlphabet, AlphabetContainer};
    ///
    /// let con = AlphabetContainer::new(ContinuousAlphabet::new(-2.0, 2.0).unwrap());
    /// assert_eq!(con.to_discrete_index(0, 1.7).unwrap(), 3);
    /// assert!(con.to_discrete_index(0, f64::NAN).is_err());
    /// ```
    pub fn to_discrete_index(&self, pos: usize, value: f64) -> Result<i64> {
        if value.is_nan() {
            return Err(Error::NanDiscretization);
        }
        let alphabet = self.checked_alphabet_at(pos)?;
        let shifted = if alphabet.is_discrete() {
            value
        } else {
            value - alphabet.min()
        };
        shifted.to_i64().ok_or_else(|| Error::ValueOutOfRange {
            value,
            alphabet: alphabet.to_string(),
        })
    }

    /// The code of the complement of `code` at position `pos`.
    pub fn complement_of(&self, pos: usize, code: usize) -> Result<usize> {
        self.checked_alphabet_at(pos)?
            .as_complementable()
            .ok_or(Error::NotComplementable(pos))?
            .complement_of(code)
    }

    /// Whether sequences over this container can be reverse complemented,
    /// i.e., the container is simple and its alphabet is complementable.
    pub fn is_reverse_complementable(&self) -> bool {
        self.is_simple() && self.inner.alphabets[0].as_complementable().is_some()
    }

    /// Whether all discrete alphabets ignore case.
    pub fn ignores_case(&self) -> bool {
        self.alphabets().all(Alphabet::ignores_case)
    }

    /// Total order on containers.
    ///
    /// Containers are first ordered by their possible length. Simple containers are compared by their alphabets,
    /// other containers by the alphabets at each position, in order, until the first difference.
    /// Returns [Ordering::Equal] iff the containers are consistent.
    pub fn compare(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return Ordering::Equal;
        }
        let (l1, l2) = (self.possible_length(), other.possible_length());
        if l1 != l2 {
            return l1.cmp(&l2);
        }
        let (a1, a2) = (&self.inner.alphabets, &other.inner.alphabets);
        let (i1, i2) = match (&self.inner.index, &other.inner.index) {
            (Some(i1), Some(i2)) => (i1, i2),
            _ => return a1[0].compare(&a2[0]),
        };
        // positions share few alphabets, so every pair of alphabets is compared at most once
        let mut checked: Vec<Option<Ordering>> = vec![None; a1.len() * a2.len()];
        for (&x, &y) in i1.iter().zip(i2.iter()) {
            let o = *checked[x * a2.len() + y].get_or_insert_with(|| {
                let o = a1[x].compare(&a2[y]);
                trace!("compared alphabets {} and {}: {:?}", x, y, o);
                o
            });
            if o.is_ne() {
                return o;
            }
        }
        Ordering::Equal
    }

    /// Whether the containers are consistent, i.e., can be used interchangeably.
    pub fn check_consistency(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Whether both handles point to the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for AlphabetContainer {
    fn eq(&self, other: &Self) -> bool {
        self.check_consistency(other)
    }
}

impl Eq for AlphabetContainer {}

impl PartialOrd for AlphabetContainer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AlphabetContainer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<Alphabet> for AlphabetContainer {
    fn from(a: Alphabet) -> Self {
        AlphabetContainer::new(a)
    }
}

impl Display for AlphabetContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "possible length: {}", self.possible_length())?;
        write!(f, "alphabet: ")?;
        if self.is_simple() {
            write!(f, "{}", self.inner.alphabets[0])?;
        } else {
            for pos in 0..self.possible_length() {
                write!(f, "\n\t{}\t{}", pos, self.alphabet_at(pos))?;
            }
        }
        writeln!(f)
    }
}

impl Arbitrary for AlphabetContainer {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        if bool::arbitrary(g) {
            return AlphabetContainer::new(Alphabet::arbitrary(g));
        }
        let n = 2 + usize::arbitrary(g) % 2;
        let alphabets: Alphabets = (0..n).map(|_| Arc::new(Alphabet::arbitrary(g))).collect();
        // the first n positions use every alphabet once, keeping the assignment surjective
        let extra = usize::arbitrary(g) % 6;
        let index = (0..n)
            .chain((0..extra).map(|_| usize::arbitrary(g) % n))
            .collect();
        AlphabetContainer::assemble(alphabets, Some(index))
    }
}
