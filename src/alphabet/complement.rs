use std::{cmp::Ordering, fmt::Display};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::DiscreteAlphabet;
use crate::error::{Error, Result};

lazy_static! {
    static ref DNA: ComplementableDiscreteAlphabet = ComplementableDiscreteAlphabet::dna_table();
}

/// A discrete alphabet where every symbol has a complementary symbol, e.g., the nucleotides of DNA.
///
/// The complement is given as a table over the codes of the alphabet and must be an involution,
/// that is, the complement of the complement of a code is the code itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ComplementableRepr", into = "ComplementableRepr")]
pub struct ComplementableDiscreteAlphabet {
    discrete: DiscreteAlphabet,
    complement: Vec<usize>,
}

impl ComplementableDiscreteAlphabet {
    /// Creates a new complementable alphabet.
    /// `complement[i]` is the code of the complement of the symbol with code `i`.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::alphabet::ComplementableDiscreteAlphabet;
    ///
    /// let rna = ComplementableDiscreteAlphabet::new(true, ["A", "C", "G", "U"], vec![3, 2, 1, 0]).unwrap();
    /// assert_eq!(rna.complement_of(0).unwrap(), 3);
    /// // not an involution: 0 -> 1 -> 2
    /// assert!(ComplementableDiscreteAlphabet::new(true, ["A", "C", "G"], vec![1, 2, 0]).is_err());
    /// ```
    pub fn new<I, S>(case_insensitive: bool, symbols: I, complement: Vec<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let discrete = DiscreteAlphabet::new(case_insensitive, symbols)?;
        Self::from_discrete(discrete, complement)
    }

    /// Equips an existing discrete alphabet with a complement table.
    pub fn from_discrete(discrete: DiscreteAlphabet, complement: Vec<usize>) -> Result<Self> {
        if complement.len() != discrete.len() {
            return Err(Error::ComplementLengthMismatch {
                expected: discrete.len(),
                actual: complement.len(),
            });
        }
        for (code, &comp) in complement.iter().enumerate() {
            if complement.get(comp) != Some(&code) {
                return Err(Error::NotAnInvolution(code));
            }
        }
        Ok(Self {
            discrete,
            complement,
        })
    }

    /// The DNA alphabet `A`, `C`, `G`, `T`, case-insensitive, where `A` pairs with `T` and `C` pairs with `G`.
    ///
    /// ```
    /// use seq_alphabet::alphabet::ComplementableDiscreteAlphabet;
    ///
    /// let dna = ComplementableDiscreteAlphabet::dna();
    /// let a = dna.discrete().code_of("a").unwrap();
    /// assert_eq!(dna.discrete().symbol_of(dna.complement_of(a).unwrap()).unwrap(), "T");
    /// ```
    pub fn dna() -> &'static ComplementableDiscreteAlphabet {
        &DNA
    }

    fn dna_table() -> Self {
        let symbols = ["A", "C", "G", "T"];
        let mut keys = indexmap::IndexSet::with_capacity(symbols.len());
        keys.extend(symbols.iter().map(|s| s.to_string()));
        Self {
            discrete: DiscreteAlphabet::from_validated(
                symbols.iter().map(|s| s.to_string()).collect(),
                keys,
                true,
                1,
            ),
            complement: vec![3, 2, 1, 0],
        }
    }

    /// The code of the complement of the symbol encoded by `code`.
    pub fn complement_of(&self, code: usize) -> Result<usize> {
        self.complement
            .get(code)
            .copied()
            .ok_or(Error::UndefinedCode {
                code,
                size: self.complement.len(),
            })
    }

    /// The underlying discrete alphabet.
    pub fn discrete(&self) -> &DiscreteAlphabet {
        &self.discrete
    }

    pub fn complement_table(&self) -> &[usize] {
        &self.complement
    }

    /// Orders by the discrete alphabet first and by the complement table second.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.discrete
            .compare(&other.discrete)
            .then_with(|| self.complement.cmp(&other.complement))
    }
}

impl Display for ComplementableDiscreteAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.discrete)
    }
}

#[derive(Serialize, Deserialize)]
struct ComplementableRepr {
    symbols: Vec<String>,
    #[serde(default)]
    case_insensitive: bool,
    complement: Vec<usize>,
}

impl TryFrom<ComplementableRepr> for ComplementableDiscreteAlphabet {
    type Error = Error;

    fn try_from(repr: ComplementableRepr) -> Result<Self> {
        ComplementableDiscreteAlphabet::new(repr.case_insensitive, repr.symbols, repr.complement)
    }
}

impl From<ComplementableDiscreteAlphabet> for ComplementableRepr {
    fn from(a: ComplementableDiscreteAlphabet) -> Self {
        ComplementableRepr {
            symbols: a.discrete.symbols().map(str::to_string).collect(),
            case_insensitive: a.discrete.ignores_case(),
            complement: a.complement,
        }
    }
}
