use std::{cmp::Ordering, fmt::Display};

use indexmap::IndexSet;
use itertools::Itertools;
use quickcheck::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A finite, ordered set of symbols.
///
/// Every symbol is a non-empty string without blanks or tabs.
/// The symbols are encoded by their position in the alphabet, i.e., the codes form the dense range `0..len()`.
/// If the alphabet ignores case, symbols are looked up case-insensitively and two symbols that only differ in case are considered duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DiscreteRepr", into = "DiscreteRepr")]
pub struct DiscreteAlphabet {
    symbols: Vec<String>,
    /// Lookup keys, upper-cased if the alphabet ignores case. The index of a key is its code.
    keys: IndexSet<String>,
    case_insensitive: bool,
    longest_symbol: usize,
}

impl DiscreteAlphabet {
    /// Creates a new discrete alphabet from the given symbols.
    /// The code of a symbol is its position in `symbols`.
    ///
    /// Returns an error if no symbols are given, a symbol is empty or contains a blank or tab, or a symbol occurs twice.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::DiscreteAlphabet;
    ///
    /// let dna = DiscreteAlphabet::new(true, ["A", "C", "G", "T"]).unwrap();
    /// assert_eq!(dna.code_of("g").unwrap(), 2);
    /// assert_eq!(dna.symbol_of(3).unwrap(), "T");
    /// assert!(DiscreteAlphabet::new(true, ["A", "a"]).is_err());
    /// ```
    pub fn new<I, S>(case_insensitive: bool, symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        let mut keys = IndexSet::with_capacity(symbols.len());
        let mut longest_symbol = 0;
        for symbol in &symbols {
            if symbol.is_empty() {
                return Err(Error::EmptySymbol);
            }
            if symbol.contains(' ') || symbol.contains('\t') {
                return Err(Error::WhitespaceInSymbol(symbol.clone()));
            }
            let key = Self::key(case_insensitive, symbol);
            if !keys.insert(key.clone()) {
                return Err(Error::DuplicateSymbol(key));
            }
            longest_symbol = longest_symbol.max(symbol.chars().count());
        }
        Ok(Self {
            symbols,
            keys,
            case_insensitive,
            longest_symbol,
        })
    }

    /// Creates a case-sensitive alphabet whose symbols are the decimal representations of the integers in `min..=max`.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::DiscreteAlphabet;
    ///
    /// let a = DiscreteAlphabet::from_int_range(-1, 2).unwrap();
    /// assert_eq!(a.len(), 4);
    /// assert_eq!(a.code_of("-1").unwrap(), 0);
    /// assert_eq!(a.symbol_of(3).unwrap(), "2");
    /// ```
    pub fn from_int_range(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::EmptyIntRange { min, max });
        }
        Self::new(false, (min..=max).map(|i| i.to_string()))
    }

    /// Assembles an alphabet from parts that are known to be valid.
    pub(super) fn from_validated(
        symbols: Vec<String>,
        keys: IndexSet<String>,
        case_insensitive: bool,
        longest_symbol: usize,
    ) -> Self {
        debug_assert_eq!(symbols.len(), keys.len());
        Self {
            symbols,
            keys,
            case_insensitive,
            longest_symbol,
        }
    }

    fn key(case_insensitive: bool, symbol: &str) -> String {
        if case_insensitive {
            symbol.to_uppercase()
        } else {
            symbol.to_string()
        }
    }

    /// Returns the code of the given symbol.
    pub fn code_of(&self, symbol: &str) -> Result<usize> {
        let found = if self.case_insensitive {
            self.keys.get_index_of(symbol.to_uppercase().as_str())
        } else {
            self.keys.get_index_of(symbol)
        };
        found.ok_or_else(|| Error::UndefinedSymbol {
            symbol: symbol.to_string(),
            alphabet: self.to_string(),
        })
    }

    /// Returns the symbol encoded by `code`.
    pub fn symbol_of(&self, code: usize) -> Result<&str> {
        self.symbols
            .get(code)
            .map(String::as_str)
            .ok_or(Error::UndefinedCode {
                code,
                size: self.len(),
            })
    }

    /// Checks whether `symbol` is defined in this alphabet.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.code_of(symbol).is_ok()
    }

    /// Checks whether `code` encodes a symbol of this alphabet.
    pub fn is_encoded_code(&self, code: usize) -> bool {
        code < self.len()
    }

    /// The number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false, an alphabet has at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The length (in characters) of the longest symbol.
    pub fn maximal_symbol_length(&self) -> usize {
        self.longest_symbol
    }

    pub fn ignores_case(&self) -> bool {
        self.case_insensitive
    }

    /// The symbols in code order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }

    /// Total order on discrete alphabets.
    /// Alphabets are ordered by size, then case sensitive before case insensitive, then by the first differing symbol.
    /// Two alphabets compare equal iff they define the same symbols in the same order under the same case policy.
    pub fn compare(&self, other: &Self) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.len()
            .cmp(&other.len())
            .then(self.case_insensitive.cmp(&other.case_insensitive))
            .then_with(|| {
                // with equal case policy the keys are comparable directly
                self.keys
                    .iter()
                    .zip(other.keys.iter())
                    .map(|(a, b)| a.cmp(b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

impl Display for DiscreteAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.symbols.iter().map(|s| format!("\"{}\"", s)).join(", ")
        )
    }
}

#[derive(Serialize, Deserialize)]
struct DiscreteRepr {
    symbols: Vec<String>,
    #[serde(default)]
    case_insensitive: bool,
}

impl TryFrom<DiscreteRepr> for DiscreteAlphabet {
    type Error = Error;

    fn try_from(repr: DiscreteRepr) -> Result<Self> {
        DiscreteAlphabet::new(repr.case_insensitive, repr.symbols)
    }
}

impl From<DiscreteAlphabet> for DiscreteRepr {
    fn from(a: DiscreteAlphabet) -> Self {
        DiscreteRepr {
            symbols: a.symbols,
            case_insensitive: a.case_insensitive,
        }
    }
}

/// Symbols used to generate arbitrary alphabets.
/// The pool is small so that generated alphabets are frequently consistent with each other.
const ARBITRARY_SYMBOLS: [&str; 6] = ["A", "C", "G", "T", "Gly", "Asp"];

impl Arbitrary for DiscreteAlphabet {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let case_insensitive = bool::arbitrary(g);
        let mut pool = ARBITRARY_SYMBOLS.to_vec();
        let len = 1 + usize::arbitrary(g) % 3;
        let mut symbols = Vec::with_capacity(len);
        for _ in 0..len {
            let i = usize::arbitrary(g) % pool.len();
            symbols.push(pool.remove(i).to_string());
        }
        // no two symbols of the pool differ only in case
        let keys = symbols
            .iter()
            .map(|s| Self::key(case_insensitive, s))
            .collect();
        let longest_symbol = symbols.iter().map(|s| s.len()).max().unwrap_or(0);
        Self::from_validated(symbols, keys, case_insensitive, longest_symbol)
    }
}
