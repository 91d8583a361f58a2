//! Errors raised while building, querying and (de)serializing alphabets and containers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("an alphabet needs at least one symbol")]
    EmptyAlphabet,

    #[error("\"\" can not be a symbol")]
    EmptySymbol,

    #[error("blanks and tabs can not be part of a symbol: {0:?}")]
    WhitespaceInSymbol(String),

    #[error("symbol {0:?} is defined more than once")]
    DuplicateSymbol(String),

    #[error("the range [{min}, {max}] is invalid, both bounds must be finite and min < max")]
    InvalidRange { min: f64, max: f64 },

    #[error("the integer range {min}..={max} is empty")]
    EmptyIntRange { min: i64, max: i64 },

    #[error("complement table has {actual} entries but the alphabet has {expected} symbols")]
    ComplementLengthMismatch { expected: usize, actual: usize },

    #[error("complement table is not an involution at code {0}")]
    NotAnInvolution(usize),

    #[error("an alphabet container needs at least one alphabet")]
    NoAlphabets,

    #[error("the assignment from positions to alphabets is corrupted at position {position}")]
    CorruptedAssignment { position: usize },

    #[error("the assignment from positions to alphabets is not surjective, alphabet {0} is never used")]
    NotSurjective(usize),

    #[error("the alphabet container {container} can not handle sequences of length {length} (possible length {expected})")]
    LengthMismatch {
        container: usize,
        expected: usize,
        length: usize,
    },

    #[error("the mask of positions using the new alphabet is empty")]
    EmptyMask,

    #[error("the template container has possible length {expected} but the mask keeps {actual} positions")]
    MaskMismatch { expected: usize, actual: usize },

    #[error("position {position} is out of range for a container of possible length {length}")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("got {starts} start positions but {lengths} lengths")]
    StartsLengthsMismatch { starts: usize, lengths: usize },

    #[error("malformed section {section:?}: {reason}")]
    MalformedSection { section: String, reason: String },

    #[error("position {0} is out of the range defined by the length")]
    SectionOutOfRange(usize),

    #[error("alphabet for position {0} defined at least twice")]
    DoublyDefinedPosition(usize),

    #[error("no alphabet defined for position {0}")]
    UndefinedPosition(usize),

    #[error("symbol {symbol:?} is not defined in alphabet {alphabet}")]
    UndefinedSymbol { symbol: String, alphabet: String },

    #[error("code {code} is not defined in an alphabet with {size} symbols")]
    UndefinedCode { code: usize, size: usize },

    #[error("value {value} is outside of the continuous alphabet {alphabet}")]
    ValueOutOfRange { value: f64, alphabet: String },

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("NaN can not be discretized")]
    NanDiscretization,

    #[error("the alphabet at position {0} is not discrete")]
    NotDiscrete(usize),

    #[error("the alphabet at position {0} is not complementable")]
    NotComplementable(usize),

    #[error("sequence of length {actual} does not fit a container of possible length {expected}")]
    SequenceLength { expected: usize, actual: usize },

    #[error("can not parse serialized form: {0}")]
    Parse(String),

    #[error("malformed representation: {0}")]
    Malformed(String),

    #[error("alphabet of kind {tag} is not instantiable: {reason}")]
    NotInstantiable { tag: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
