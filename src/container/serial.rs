//! The tagged text form of containers.
//!
//! A container is written as
//! `{"AlphabetContainer":{"Alphabets":[...],"Assignment":[...]}}`,
//! where the assignment is left out for simple containers.

use std::sync::Arc;

use log::debug;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{AlphabetContainer, Alphabets};
use crate::{
    alphabet::Alphabet,
    error::{Error, Result},
};

#[derive(Serialize)]
enum TaggedRef<'a> {
    AlphabetContainer(WireRef<'a>),
}

#[derive(Serialize)]
struct WireRef<'a> {
    #[serde(rename = "Alphabets")]
    alphabets: Vec<&'a Alphabet>,
    #[serde(rename = "Assignment", skip_serializing_if = "Option::is_none")]
    assignment: Option<&'a [usize]>,
}

#[derive(Deserialize)]
enum Tagged {
    AlphabetContainer(Wire),
}

#[derive(Deserialize)]
struct Wire {
    #[serde(rename = "Alphabets")]
    alphabets: Vec<Alphabet>,
    #[serde(rename = "Assignment", default)]
    assignment: Option<Vec<usize>>,
}

impl TryFrom<Wire> for AlphabetContainer {
    type Error = Error;

    fn try_from(wire: Wire) -> Result<Self> {
        let alphabets: Alphabets = wire.alphabets.into_iter().map(Arc::new).collect();
        if alphabets.len() > 1 && wire.assignment.is_none() {
            return Err(Error::Malformed(format!(
                "{} alphabets but no assignment",
                alphabets.len()
            )));
        }
        AlphabetContainer::with_shared_assignment(alphabets, wire.assignment)
    }
}

impl Serialize for AlphabetContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TaggedRef::AlphabetContainer(WireRef {
            alphabets: self.alphabets().collect(),
            assignment: self.assignment(),
        })
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AlphabetContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let Tagged::AlphabetContainer(wire) = Tagged::deserialize(deserializer)?;
        AlphabetContainer::try_from(wire).map_err(de::Error::custom)
    }
}

impl AlphabetContainer {
    /// Writes the container in its tagged text form.
    pub fn to_serialized(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a container from its tagged text form.
    ///
    /// The container is validated as if it was constructed directly, in particular every entry of the
    /// assignment must refer to one of the alphabets.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::AlphabetContainer;
    ///
    /// let json = r#"{"AlphabetContainer":{"Alphabets":[
    ///     {"Discrete":{"symbols":["A","C"]}},
    ///     {"Continuous":{"min":0.0,"max":1.0}}
    /// ],"Assignment":[0,1,1]}}"#;
    /// let con = AlphabetContainer::from_serialized(json).unwrap();
    /// assert_eq!(con.possible_length(), 3);
    ///
    /// let broken = json.replace("[0,1,1]", "[0,1,5]");
    /// let err = AlphabetContainer::from_serialized(&broken).unwrap_err();
    /// assert!(err.to_string().contains("corrupted at position 2"));
    /// ```
    pub fn from_serialized(text: &str) -> Result<Self> {
        let con: AlphabetContainer = serde_json::from_str(text)?;
        debug!(
            "parsed container with {} alphabets and possible length {}",
            con.number_of_alphabets(),
            con.possible_length()
        );
        Ok(con)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::alphabet::DiscreteAlphabet;

    fn discrete(symbols: &[&str]) -> Alphabet {
        DiscreteAlphabet::new(false, symbols.iter().copied())
            .unwrap()
            .into()
    }

    #[test]
    fn simple_form_has_no_assignment() {
        let con = AlphabetContainer::new(discrete(&["A", "C"]));
        assert_eq!(
            con.to_serialized().unwrap(),
            r#"{"AlphabetContainer":{"Alphabets":[{"Discrete":{"symbols":["A","C"],"case_insensitive":false}}]}}"#
        );
    }

    #[test]
    fn round_trip_three_alphabets_ten_positions() {
        let con = AlphabetContainer::with_assignment(
            vec![discrete(&["A", "C"]), discrete(&["X", "Y", "Z"]), discrete(&["0", "1"])],
            Some(vec![0, 1, 2, 2, 1, 0, 0, 1, 2, 1]),
        )
        .unwrap();
        let back = AlphabetContainer::from_serialized(&con.to_serialized().unwrap()).unwrap();
        assert_eq!(back.compare(&con), std::cmp::Ordering::Equal);
        assert_eq!(back.possible_length(), 10);
        assert!(!back.ptr_eq(&con));
    }

    #[test]
    fn corrupted_assignment() {
        let json = r#"{"AlphabetContainer":{"Alphabets":[{"Discrete":{"symbols":["A"]}},{"Discrete":{"symbols":["B"]}}],"Assignment":[0,1,5]}}"#;
        let err = AlphabetContainer::from_serialized(json).unwrap_err();
        assert!(matches!(&err, Error::Parse(msg) if msg.contains("corrupted at position 2")));
    }

    #[test]
    fn missing_assignment() {
        let json = r#"{"AlphabetContainer":{"Alphabets":[{"Discrete":{"symbols":["A"]}},{"Discrete":{"symbols":["B"]}}]}}"#;
        assert!(matches!(
            AlphabetContainer::from_serialized(json),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn invalid_alphabet() {
        let json = r#"{"AlphabetContainer":{"Alphabets":[{"Continuous":{"min":2.0,"max":1.0}}]}}"#;
        assert!(AlphabetContainer::from_serialized(json).is_err());
    }

    #[test]
    fn wrong_tag() {
        let json = r#"{"Container":{"Alphabets":[{"Discrete":{"symbols":["A"]}}]}}"#;
        assert!(AlphabetContainer::from_serialized(json).is_err());
        assert!(AlphabetContainer::from_serialized("").is_err());
    }

    #[quickcheck]
    fn text_form_round_trips(c: AlphabetContainer) -> bool {
        let back = AlphabetContainer::from_serialized(&c.to_serialized().unwrap()).unwrap();
        back.check_consistency(&c) && back.possible_length() == c.possible_length()
    }
}
