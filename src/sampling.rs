//! Random sequences over a container.

use rand::{rng, seq::IteratorRandom, Rng};

use crate::{
    alphabet::Alphabet,
    container::AlphabetContainer,
    error::Result,
    sequence::Sequence,
};

/// Draws a value of `alphabet` uniformly at random.
/// Discrete alphabets yield a code, continuous alphabets a value in their interval.
pub fn sample_value<R: Rng + ?Sized>(alphabet: &Alphabet, rng: &mut R) -> f64 {
    match alphabet.as_continuous() {
        Some(c) => {
            // the width of an unbounded interval is infinite, the bounds are not
            let (min, max) = (c.min(), c.max());
            let t: f64 = rng.random();
            (min * (1.0 - t) + max * t).clamp(min, max)
        }
        // the length of a discrete alphabet is its number of symbols, never 0
        None => (0..alphabet.length() as usize).choose(rng).unwrap_or(0) as f64,
    }
}

/// Samples a sequence of `length` values over `container` using `rng`.
///
/// Fails if the container is not simple and `length` differs from its possible length.
///
/// # Example
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use seq_alphabet::{alphabet::Alphabet, sampling::sample_sequence_with, AlphabetContainer};
///
/// let con = AlphabetContainer::new(Alphabet::dna());
/// let seq = sample_sequence_with(&con, 8, &mut StdRng::seed_from_u64(7)).unwrap();
/// assert_eq!(seq.len(), 8);
/// assert!(seq.to_string().chars().all(|c| "ACGT".contains(c)));
/// ```
pub fn sample_sequence_with<R: Rng + ?Sized>(
    container: &AlphabetContainer,
    length: usize,
    rng: &mut R,
) -> Result<Sequence> {
    let values = (0..length)
        .map(|pos| Ok(sample_value(container.checked_alphabet_at(pos)?, rng)))
        .collect::<Result<Vec<_>>>()?;
    Sequence::from_codes(container, values)
}

/// Samples a sequence of `length` values over `container` using the thread-local generator.
pub fn sample_sequence(container: &AlphabetContainer, length: usize) -> Result<Sequence> {
    sample_sequence_with(container, length, &mut rng())
}
