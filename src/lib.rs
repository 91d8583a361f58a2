//! Alphabets and per-position alphabet containers for biological sequences.
//!
//! An [Alphabet](alphabet::Alphabet) defines the values a single position of a sequence can take, either a finite set of symbols
//! such as the nucleotides of DNA, or an interval of real values.
//! An [AlphabetContainer] assigns an alphabet to every position of a sequence and encodes and decodes the symbols at each position.
//!
//! ```
//! use seq_alphabet::{alphabet::DiscreteAlphabet, AlphabetContainer, Sequence};
//!
//! let dna = DiscreteAlphabet::new(false, ["A", "C", "G", "T"]).unwrap();
//! let con = AlphabetContainer::new(dna);
//! let seq = Sequence::parse(&con, "GATTACA").unwrap();
//! assert_eq!(seq.value_at(0), 2.0);
//! assert_eq!(seq.to_string(), "GATTACA");
//! ```

pub mod alphabet;
pub mod config;
pub mod container;
pub mod error;
#[cfg(feature = "sampling")]
pub mod sampling;
pub mod sequence;

pub use container::{AlphabetContainer, ContainerType};
pub use error::{Error, Result};
pub use sequence::{DiscreteSequenceEnumerator, Sequence};
