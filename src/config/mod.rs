//! Declarative configuration of alphabets and containers.
//!
//! An [AlphabetContainerConfig] describes a container in one of three shapes:
//! a single alphabet for all positions, one alphabet per position, or alphabets assigned to [sections](parse_sections) of positions.
//! Configurations are plain data that can be read from and written to JSON. Alphabets are built from their configuration
//! by an [AlphabetFactory], which allows callers to plug in their own alphabet construction.

mod section;

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub use section::{check_coverage, format_sections, parse_sections, parse_sections_within};

use crate::{
    alphabet::{Alphabet, ComplementableDiscreteAlphabet, ContinuousAlphabet, DiscreteAlphabet},
    container::AlphabetContainer,
    error::{Error, Result},
};

/// The configuration of a single alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlphabetConfig {
    /// The DNA alphabet, see [ComplementableDiscreteAlphabet::dna].
    Dna,
    Discrete {
        symbols: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },
    Complementable {
        symbols: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
        complement: Vec<usize>,
    },
    /// The integers `min..=max` as a discrete alphabet.
    IntRange { min: i64, max: i64 },
    /// An interval of real values, unbounded if the bounds are left out.
    Continuous {
        #[serde(default = "lowest")]
        min: f64,
        #[serde(default = "highest")]
        max: f64,
    },
}

fn lowest() -> f64 {
    -f64::MAX
}

fn highest() -> f64 {
    f64::MAX
}

impl AlphabetConfig {
    /// The name of the kind of alphabet.
    pub fn tag(&self) -> &'static str {
        match self {
            AlphabetConfig::Dna => "Dna",
            AlphabetConfig::Discrete { .. } => "Discrete",
            AlphabetConfig::Complementable { .. } => "Complementable",
            AlphabetConfig::IntRange { .. } => "IntRange",
            AlphabetConfig::Continuous { .. } => "Continuous",
        }
    }

    pub fn is_discrete(&self) -> bool {
        !matches!(self, AlphabetConfig::Continuous { .. })
    }

    /// The configuration that rebuilds `alphabet` with the [StandardFactory].
    pub fn of(alphabet: &Alphabet) -> Self {
        match alphabet {
            Alphabet::Discrete(d) => AlphabetConfig::Discrete {
                symbols: d.symbols().map(str::to_string).collect(),
                case_insensitive: d.ignores_case(),
            },
            Alphabet::Complementable(c) => AlphabetConfig::Complementable {
                symbols: c.discrete().symbols().map(str::to_string).collect(),
                case_insensitive: c.discrete().ignores_case(),
                complement: c.complement_table().to_vec(),
            },
            Alphabet::Continuous(c) => AlphabetConfig::Continuous {
                min: c.min(),
                max: c.max(),
            },
        }
    }
}

/// Builds alphabets from their configuration.
///
/// Alphabets are returned shared, so a factory may hand out the same instance for equal configurations.
pub trait AlphabetFactory {
    fn build(&self, config: &AlphabetConfig) -> Result<Arc<Alphabet>>;
}

/// Builds every kind of alphabet this crate provides. All DNA alphabets it builds are one instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFactory;

impl AlphabetFactory for StandardFactory {
    fn build(&self, config: &AlphabetConfig) -> Result<Arc<Alphabet>> {
        let alphabet: Alphabet = match config {
            AlphabetConfig::Dna => return Ok(Alphabet::shared_dna()),
            AlphabetConfig::Discrete {
                symbols,
                case_insensitive,
            } => DiscreteAlphabet::new(*case_insensitive, symbols.iter().cloned())?.into(),
            AlphabetConfig::Complementable {
                symbols,
                case_insensitive,
                complement,
            } => ComplementableDiscreteAlphabet::new(
                *case_insensitive,
                symbols.iter().cloned(),
                complement.clone(),
            )?
            .into(),
            AlphabetConfig::IntRange { min, max } => DiscreteAlphabet::from_int_range(*min, *max)?.into(),
            AlphabetConfig::Continuous { min, max } => ContinuousAlphabet::new(*min, *max)?.into(),
        };
        Ok(Arc::new(alphabet))
    }
}

/// An alphabet together with the positions it is used at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub alphabet: AlphabetConfig,
    /// The positions, e.g. `"1-3,5"`, see [parse_sections].
    pub section: String,
}

impl SectionConfig {
    /// The zero-based positions of this section in a container of the given length, see [parse_sections_within].
    pub fn positions(&self, length: usize) -> Result<Vec<usize>> {
        parse_sections_within(&self.section, length)
    }
}

/// The configuration of a container.
///
/// # Example
/// ```
/// use seq_alphabet::{config::AlphabetContainerConfig, AlphabetContainer};
///
/// let config = AlphabetContainerConfig::from_json(r#"{"Sections":{"length":5,"sections":[
///     {"alphabet":"Dna","section":"1-3,5"},
///     {"alphabet":{"Continuous":{"min":0.0,"max":1.0}},"section":"4"}
/// ]}}"#).unwrap();
/// assert_eq!(config.possible_length(), 5);
/// assert!(!config.is_discrete());
///
/// let con = AlphabetContainer::from_config(&config).unwrap();
/// assert_eq!(con.code_of(4, "T").unwrap(), 3.0);
/// assert!(!con.is_discrete_at(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlphabetContainerConfig {
    /// One alphabet for sequences of any length.
    Single(AlphabetConfig),
    /// One alphabet per position.
    Array { alphabets: Vec<AlphabetConfig> },
    /// Alphabets used at the positions of their sections. Every position in `0..length` must be covered exactly once.
    Sections {
        length: usize,
        sections: Vec<SectionConfig>,
    },
}

impl AlphabetContainerConfig {
    pub fn is_simple(&self) -> bool {
        matches!(self, AlphabetContainerConfig::Single(_))
    }

    /// Whether all configured alphabets are discrete.
    pub fn is_discrete(&self) -> bool {
        match self {
            AlphabetContainerConfig::Single(a) => a.is_discrete(),
            AlphabetContainerConfig::Array { alphabets } => alphabets.iter().all(AlphabetConfig::is_discrete),
            AlphabetContainerConfig::Sections { sections, .. } => {
                sections.iter().all(|s| s.alphabet.is_discrete())
            }
        }
    }

    /// The possible length of the configured container, see [AlphabetContainer::possible_length].
    ///
    /// A container built from a single alphabet is simple, so this is 0 for [Single](Self::Single)
    /// and for arrays or section lists with only one alphabet.
    pub fn possible_length(&self) -> usize {
        match self {
            AlphabetContainerConfig::Single(_) => 0,
            AlphabetContainerConfig::Array { alphabets } if alphabets.len() <= 1 => 0,
            AlphabetContainerConfig::Array { alphabets } => alphabets.len(),
            AlphabetContainerConfig::Sections { sections, .. } if sections.len() <= 1 => 0,
            AlphabetContainerConfig::Sections { length, .. } => *length,
        }
    }

    /// Checks that the configuration describes a container, in particular that sections cover every position exactly once.
    pub fn validate(&self) -> Result<()> {
        match self {
            AlphabetContainerConfig::Single(_) => Ok(()),
            AlphabetContainerConfig::Array { alphabets } if alphabets.is_empty() => Err(Error::NoAlphabets),
            AlphabetContainerConfig::Array { .. } => Ok(()),
            AlphabetContainerConfig::Sections { sections, .. } if sections.is_empty() => {
                Err(Error::NoAlphabets)
            }
            AlphabetContainerConfig::Sections { length, sections } => {
                check_coverage(*length, sections.iter().map(|s| s.section.as_str()))
            }
        }
    }

    /// The configuration of an existing container.
    pub fn of(container: &AlphabetContainer) -> Self {
        match container.assignment() {
            None => AlphabetContainerConfig::Single(AlphabetConfig::of(container.alphabet_at(0))),
            Some(index) if index.len() == container.number_of_alphabets() => AlphabetContainerConfig::Array {
                alphabets: (0..index.len())
                    .map(|p| AlphabetConfig::of(container.alphabet_at(p)))
                    .collect(),
            },
            Some(index) => AlphabetContainerConfig::Sections {
                length: index.len(),
                sections: container
                    .alphabets()
                    .enumerate()
                    .map(|(i, a)| SectionConfig {
                        alphabet: AlphabetConfig::of(a),
                        section: format_sections(&index.iter().positions(|&x| x == i).collect_vec()),
                    })
                    .collect(),
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}
