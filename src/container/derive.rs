//! Containers built from other containers or from possibly redundant lists of alphabets.
//!
//! None of these operations modify their inputs. The derived containers share the alphabets of their sources.

use std::{ops::Range, sync::Arc};

use log::debug;

use super::{AlphabetContainer, Alphabets};
use crate::{
    alphabet::Alphabet,
    error::{Error, Result},
};

/// The positions `start..start + length`, failing if they reach beyond `total`.
pub(crate) fn span(start: usize, length: usize, total: usize) -> Result<Range<usize>> {
    match start.checked_add(length) {
        Some(end) if end <= total => Ok(start..end),
        _ => Err(Error::PositionOutOfRange {
            position: start.saturating_add(length).saturating_sub(1),
            length: total,
        }),
    }
}

/// Returns the index of an alphabet in `alphabets` that is consistent with `alphabet`, adding it if there is none.
fn intern(alphabets: &mut Alphabets, alphabet: &Arc<Alphabet>) -> usize {
    match alphabets
        .iter()
        .position(|a| Arc::ptr_eq(a, alphabet) || a.check_consistency(alphabet))
    {
        Some(i) => i,
        None => {
            alphabets.push(alphabet.clone());
            alphabets.len() - 1
        }
    }
}

impl AlphabetContainer {
    /// Merges several containers into one container that covers their positions one after another.
    ///
    /// The `i`-th container covers `length` positions. Its possible length must either be 0 or equal to `length`.
    /// Consistent alphabets of different containers are stored only once.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, DiscreteAlphabet}, AlphabetContainer};
    ///
    /// let x = AlphabetContainer::new(DiscreteAlphabet::new(false, ["A", "B"]).unwrap());
    /// let y = AlphabetContainer::new(Alphabet::dna());
    /// let merged = AlphabetContainer::from_sparse_merge(&[(x.clone(), 2), (y, 3), (x, 1)]).unwrap();
    /// assert_eq!(merged.possible_length(), 6);
    /// assert_eq!(merged.number_of_alphabets(), 2);
    /// assert_eq!(merged.assignment(), Some(&[0, 0, 1, 1, 1, 0][..]));
    /// ```
    pub fn from_sparse_merge(parts: &[(AlphabetContainer, usize)]) -> Result<Self> {
        let mut alphabets = Alphabets::new();
        let mut index = Vec::with_capacity(parts.iter().map(|(_, l)| l).sum());
        for (i, (con, length)) in parts.iter().enumerate() {
            let expected = con.possible_length();
            if expected != 0 && expected != *length {
                return Err(Error::LengthMismatch {
                    container: i,
                    expected,
                    length: *length,
                });
            }
            if *length == 0 {
                continue;
            }
            let remap: Vec<usize> = con
                .shared_alphabets()
                .iter()
                .map(|a| intern(&mut alphabets, a))
                .collect();
            index.extend((0..*length).map(|p| remap[con.alphabet_index_for_position(p)]));
        }
        debug!(
            "merged {} containers into {} positions over {} distinct alphabets",
            parts.len(),
            index.len(),
            alphabets.len()
        );
        Self::with_shared_assignment(alphabets, Some(index))
    }

    /// Builds a container from `alphabets` and `assignment`, storing consistent alphabets only once.
    ///
    /// Alphabets that are not referenced by `assignment` are dropped.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, DiscreteAlphabet}, AlphabetContainer};
    ///
    /// let x: Alphabet = DiscreteAlphabet::new(false, ["A", "B"]).unwrap().into();
    /// let y = x.clone();
    /// let con = AlphabetContainer::simplified(vec![x, y], &[0, 1, 1, 0]).unwrap();
    /// assert!(con.is_simple());
    /// assert_eq!(con.number_of_alphabets(), 1);
    /// ```
    pub fn simplified(alphabets: Vec<Alphabet>, assignment: &[usize]) -> Result<Self> {
        let alphabets: Alphabets = alphabets.into_iter().map(Arc::new).collect();
        Self::simplified_shared(&alphabets, assignment)
    }

    fn simplified_shared(alphabets: &[Arc<Alphabet>], assignment: &[usize]) -> Result<Self> {
        let mut list = Alphabets::new();
        let mut remap: Vec<Option<usize>> = vec![None; alphabets.len()];
        let mut index = Vec::with_capacity(assignment.len());
        for (position, &a) in assignment.iter().enumerate() {
            let slot = remap
                .get_mut(a)
                .ok_or(Error::CorruptedAssignment { position })?;
            let i = *slot.get_or_insert_with(|| intern(&mut list, &alphabets[a]));
            index.push(i);
        }
        if list.len() < alphabets.len() {
            debug!(
                "reduced {} alphabets to {} distinct alphabets",
                alphabets.len(),
                list.len()
            );
        }
        Self::with_shared_assignment(list, Some(index))
    }

    /// Restricts the container to the positions `start..start + length`.
    ///
    /// Simple containers and requests covering the whole container return the container itself.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, DiscreteAlphabet}, AlphabetContainer};
    ///
    /// let a: Alphabet = DiscreteAlphabet::new(false, ["A", "B"]).unwrap().into();
    /// let con = AlphabetContainer::with_assignment(vec![a, Alphabet::dna()], Some(vec![0, 1, 1, 0])).unwrap();
    /// let sub = con.sub_container(1, 2).unwrap();
    /// assert!(sub.is_simple());
    /// assert!(sub.is_reverse_complementable());
    /// assert!(con.sub_container(0, 4).unwrap().ptr_eq(&con));
    /// ```
    pub fn sub_container(&self, start: usize, length: usize) -> Result<Self> {
        if self.is_simple() || (start == 0 && length == self.possible_length()) {
            return Ok(self.clone());
        }
        self.restrict(std::iter::once((start, length)))
    }

    /// Concatenates the ranges `starts[i]..starts[i] + lengths[i]` of this container into a new container.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, ContinuousAlphabet}, AlphabetContainer};
    ///
    /// let c: Alphabet = ContinuousAlphabet::new(0.0, 1.0).unwrap().into();
    /// let con = AlphabetContainer::with_assignment(vec![Alphabet::dna(), c], Some(vec![0, 0, 1, 1, 0])).unwrap();
    /// let comp = con.composite_container(&[0, 3], &[1, 2]).unwrap();
    /// assert_eq!(comp.possible_length(), 3);
    /// assert!(comp.is_discrete_at(0));
    /// assert!(!comp.is_discrete_at(1));
    /// assert!(comp.is_discrete_at(2));
    /// ```
    pub fn composite_container(&self, starts: &[usize], lengths: &[usize]) -> Result<Self> {
        if starts.len() != lengths.len() {
            return Err(Error::StartsLengthsMismatch {
                starts: starts.len(),
                lengths: lengths.len(),
            });
        }
        if self.is_simple() {
            return Ok(self.clone());
        }
        self.restrict(starts.iter().copied().zip(lengths.iter().copied()))
    }

    /// Builds a container over the `(start, length)` ranges of positions, in order.
    fn restrict(&self, ranges: impl Iterator<Item = (usize, usize)>) -> Result<Self> {
        let length = self.possible_length();
        let alphabets = self.shared_alphabets();
        let mut used: Vec<Option<usize>> = vec![None; alphabets.len()];
        let mut list = Alphabets::new();
        let mut index = Vec::new();
        for (start, len) in ranges {
            for pos in span(start, len, length)? {
                let a = self.alphabet_index_for_position(pos);
                let i = *used[a].get_or_insert_with(|| {
                    list.push(alphabets[a].clone());
                    list.len() - 1
                });
                index.push(i);
            }
        }
        Self::with_shared_assignment(list, Some(index))
    }

    /// Builds a container of length `mask.len()` that uses `alphabet` at all positions where `mask` is true.
    /// The remaining positions take the alphabets of this container, in order.
    ///
    /// If this container is not simple, its possible length must equal the number of false entries of `mask`.
    /// Consistent alphabets are stored only once.
    ///
    /// # Example
    /// ```
    /// use seq_alphabet::{alphabet::{Alphabet, ContinuousAlphabet}, AlphabetContainer};
    ///
    /// let template = AlphabetContainer::new(Alphabet::dna());
    /// let c: Alphabet = ContinuousAlphabet::new(0.0, 1.0).unwrap().into();
    /// let con = template.insert_alphabet(c, &[false, true, false]).unwrap();
    /// assert_eq!(con.possible_length(), 3);
    /// assert!(con.is_discrete_at(0));
    /// assert!(!con.is_discrete_at(1));
    /// ```
    pub fn insert_alphabet(&self, alphabet: impl Into<Alphabet>, mask: &[bool]) -> Result<Self> {
        if mask.is_empty() {
            return Err(Error::EmptyMask);
        }
        let kept = mask.iter().filter(|m| !**m).count();
        let expected = self.possible_length();
        if expected != 0 && expected != kept {
            return Err(Error::MaskMismatch {
                expected,
                actual: kept,
            });
        }
        let mut alphabets: Alphabets = self.shared_alphabets().iter().cloned().collect();
        let inserted = alphabets.len();
        alphabets.push(Arc::new(alphabet.into()));
        let mut next = 0;
        let assignment: Vec<usize> = mask
            .iter()
            .map(|&use_new| {
                if use_new {
                    inserted
                } else {
                    next += 1;
                    self.alphabet_index_for_position(next - 1)
                }
            })
            .collect();
        Self::simplified_shared(&alphabets, &assignment)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::alphabet::{ContinuousAlphabet, DiscreteAlphabet};

    fn discrete(symbols: &[&str]) -> Alphabet {
        DiscreteAlphabet::new(false, symbols.iter().copied())
            .unwrap()
            .into()
    }

    fn continuous(min: f64, max: f64) -> Alphabet {
        ContinuousAlphabet::new(min, max).unwrap().into()
    }

    #[test]
    fn simplified_deduplicates() {
        let x = discrete(&["A", "B"]);
        let y = discrete(&["A", "B"]);
        let con = AlphabetContainer::simplified(vec![x, y], &[0, 1, 1, 0]).unwrap();
        assert_eq!(con.number_of_alphabets(), 1);
        assert!(con.is_simple());
    }

    #[test]
    fn simplified_remaps_in_order_of_use() {
        let x = discrete(&["A"]);
        let y = discrete(&["B"]);
        let z = discrete(&["A"]);
        let con = AlphabetContainer::simplified(vec![x, y, z], &[1, 2, 0, 1]).unwrap();
        assert_eq!(con.number_of_alphabets(), 2);
        assert_eq!(con.assignment(), Some(&[0, 1, 1, 0][..]));
        assert_eq!(con.code_of(1, "A").unwrap(), 0.0);
    }

    #[test]
    fn simplified_drops_unused() {
        let con = AlphabetContainer::simplified(
            vec![discrete(&["A"]), discrete(&["B"]), discrete(&["C"])],
            &[2, 0, 2],
        )
        .unwrap();
        assert_eq!(con.number_of_alphabets(), 2);
        assert_eq!(con.code_of(0, "C").unwrap(), 0.0);
    }

    #[test]
    fn simplified_checks_range() {
        let err = AlphabetContainer::simplified(vec![discrete(&["A"])], &[0, 0, 3]).unwrap_err();
        assert_eq!(err, Error::CorruptedAssignment { position: 2 });
    }

    #[test]
    fn sparse_merge_of_inconsistent_containers() {
        let cx = AlphabetContainer::new(discrete(&["A", "B"]));
        let cy = AlphabetContainer::new(discrete(&["X", "Y", "Z"]));
        assert!(!cx.check_consistency(&cy));
        let merged = AlphabetContainer::from_sparse_merge(&[(cx, 5), (cy, 5)]).unwrap();
        assert_eq!(merged.possible_length(), 10);
        assert_eq!(merged.number_of_alphabets(), 2);
        assert_eq!(merged.code_of(4, "B").unwrap(), 1.0);
        assert_eq!(merged.code_of(5, "Z").unwrap(), 2.0);
    }

    #[test]
    fn sparse_merge_of_consistent_containers_is_simple() {
        let cx = AlphabetContainer::new(discrete(&["A", "B"]));
        let cy = AlphabetContainer::new(discrete(&["A", "B"]));
        let merged = AlphabetContainer::from_sparse_merge(&[(cx, 2), (cy, 3)]).unwrap();
        assert!(merged.is_simple());
    }

    #[test]
    fn sparse_merge_checks_lengths() {
        let fixed = AlphabetContainer::with_assignment(vec![discrete(&["A"]), discrete(&["B"])], None)
            .unwrap();
        let simple = AlphabetContainer::new(discrete(&["A"]));
        let err = AlphabetContainer::from_sparse_merge(&[(simple, 4), (fixed, 3)]).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                container: 1,
                expected: 2,
                length: 3
            }
        );
    }

    #[test]
    fn sparse_merge_of_nothing() {
        assert_eq!(
            AlphabetContainer::from_sparse_merge(&[]).unwrap_err(),
            Error::NoAlphabets
        );
    }

    #[test]
    fn sub_container_of_simple_is_identical() {
        let con = AlphabetContainer::new(discrete(&["A"]));
        assert!(con.sub_container(3, 10).unwrap().ptr_eq(&con));
    }

    #[test]
    fn sub_container_identity() {
        let con = AlphabetContainer::with_assignment(
            vec![discrete(&["A"]), discrete(&["B"]), continuous(0.0, 1.0)],
            Some(vec![0, 1, 2, 2, 1]),
        )
        .unwrap();
        let sub = con.sub_container(0, con.possible_length()).unwrap();
        assert!(sub.check_consistency(&con));
        assert!(sub.ptr_eq(&con));
    }

    #[test]
    fn sub_container_shares_alphabets() {
        let con = AlphabetContainer::with_assignment(
            vec![discrete(&["A"]), discrete(&["B"]), continuous(0.0, 1.0)],
            Some(vec![0, 1, 2, 2, 1]),
        )
        .unwrap();
        let sub = con.sub_container(1, 3).unwrap();
        assert_eq!(sub.possible_length(), 3);
        assert_eq!(sub.number_of_alphabets(), 2);
        assert!(Arc::ptr_eq(&sub.shared_alphabets()[0], &con.shared_alphabets()[1]));
        assert!(Arc::ptr_eq(&sub.shared_alphabets()[1], &con.shared_alphabets()[2]));
    }

    #[test]
    fn sub_container_out_of_range() {
        let con = AlphabetContainer::with_assignment(vec![discrete(&["A"]), discrete(&["B"])], None)
            .unwrap();
        assert_eq!(
            con.sub_container(1, 2).unwrap_err(),
            Error::PositionOutOfRange {
                position: 2,
                length: 2
            }
        );
    }

    #[test]
    fn overflowing_ranges_are_out_of_range() {
        let con = AlphabetContainer::with_assignment(vec![discrete(&["A"]), discrete(&["B"])], None)
            .unwrap();
        assert!(matches!(
            con.sub_container(1, usize::MAX),
            Err(Error::PositionOutOfRange { length: 2, .. })
        ));
        assert!(matches!(
            con.composite_container(&[0, usize::MAX], &[1, 2]),
            Err(Error::PositionOutOfRange { length: 2, .. })
        ));
        assert_eq!(span(1, 1, 2), Ok(1..2));
    }

    #[test]
    fn empty_sub_container() {
        let con = AlphabetContainer::with_assignment(vec![discrete(&["A"]), discrete(&["B"])], None)
            .unwrap();
        assert_eq!(con.sub_container(1, 0).unwrap_err(), Error::NoAlphabets);
    }

    #[test]
    fn composite_container_argument_mismatch() {
        let con = AlphabetContainer::new(discrete(&["A"]));
        assert_eq!(
            con.composite_container(&[0, 1], &[1]).unwrap_err(),
            Error::StartsLengthsMismatch {
                starts: 2,
                lengths: 1
            }
        );
    }

    #[test]
    fn composite_container_of_simple() {
        let con = AlphabetContainer::new(discrete(&["A"]));
        assert!(con.composite_container(&[0, 5], &[2, 2]).unwrap().ptr_eq(&con));
    }

    #[test]
    fn insert_into_simple() {
        let template = AlphabetContainer::new(discrete(&["A", "C"]));
        let con = template
            .insert_alphabet(continuous(0.0, 1.0), &[true, false, false, true])
            .unwrap();
        assert_eq!(con.possible_length(), 4);
        assert_eq!(con.assignment(), Some(&[0, 1, 1, 0][..]));
        assert!(!con.is_discrete_at(0));
        assert!(con.is_discrete_at(1));
    }

    #[test]
    fn insert_consumes_template_positions_in_order() {
        let template = AlphabetContainer::with_assignment(
            vec![discrete(&["A"]), discrete(&["B"])],
            Some(vec![1, 0]),
        )
        .unwrap();
        let con = template
            .insert_alphabet(continuous(0.0, 1.0), &[false, true, false])
            .unwrap();
        assert_eq!(con.code_of(0, "B").unwrap(), 0.0);
        assert!(!con.is_discrete_at(1));
        assert_eq!(con.code_of(2, "A").unwrap(), 0.0);
    }

    #[test]
    fn insert_consistent_alphabet_collapses() {
        let template = AlphabetContainer::new(discrete(&["A", "C"]));
        let con = template
            .insert_alphabet(discrete(&["A", "C"]), &[true, false])
            .unwrap();
        assert!(con.is_simple());
    }

    #[test]
    fn insert_everywhere_drops_template() {
        let template = AlphabetContainer::new(discrete(&["A", "C"]));
        let con = template
            .insert_alphabet(continuous(0.0, 1.0), &[true, true])
            .unwrap();
        assert!(con.is_simple());
        assert!(!con.is_discrete());
    }

    #[test]
    fn insert_checks_mask() {
        let template = AlphabetContainer::with_assignment(vec![discrete(&["A"]), discrete(&["B"])], None)
            .unwrap();
        assert_eq!(
            template.insert_alphabet(continuous(0.0, 1.0), &[]).unwrap_err(),
            Error::EmptyMask
        );
        assert_eq!(
            template
                .insert_alphabet(continuous(0.0, 1.0), &[false, true, true])
                .unwrap_err(),
            Error::MaskMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[quickcheck]
    fn whole_sub_container_is_consistent(c: AlphabetContainer) -> bool {
        c.sub_container(0, c.possible_length())
            .is_ok_and(|s| s.check_consistency(&c))
    }

    #[quickcheck]
    fn split_and_merge_is_consistent(c: AlphabetContainer) -> bool {
        let n = c.possible_length();
        if n < 2 {
            return true;
        }
        let first = c.sub_container(0, 1).unwrap();
        let rest = c.sub_container(1, n - 1).unwrap();
        let merged = AlphabetContainer::from_sparse_merge(&[(first, 1), (rest, n - 1)]).unwrap();
        (0..n).all(|p| merged.alphabet_at(p).check_consistency(c.alphabet_at(p)))
    }
}
