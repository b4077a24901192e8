use rand::Rng;
use rand::seq::IndexedRandom;

use crate::consts::NUCLEOTIDES;
use crate::errors::{Result, SimulationError};

/// Check that a list of candidate indel lengths is usable: non-empty and
/// made only of positive lengths.
pub(crate) fn validate_lengths(candidate_lengths: &[u32]) -> Result<()> {
    if candidate_lengths.is_empty() {
        return Err(SimulationError::InvalidInput(
            "candidate length list is empty".to_string(),
        ));
    }
    if candidate_lengths.contains(&0) {
        return Err(SimulationError::InvalidInput(
            "candidate lengths must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Pick one length uniformly from `candidate_lengths`.
pub(crate) fn choose_length<R: Rng + ?Sized>(candidate_lengths: &[u32], rng: &mut R) -> Result<u32> {
    candidate_lengths.choose(rng).copied().ok_or_else(|| {
        SimulationError::InvalidInput("candidate length list is empty".to_string())
    })
}

///
/// Generate a random insertion sequence.
///
/// The length is drawn uniformly from `candidate_lengths`; every base is drawn
/// uniformly, with replacement, from `A`, `T`, `G`, `C`.
///
/// # Arguments
/// - candidate_lengths: insertion lengths to choose from
/// - rng: random source
pub fn random_insertion<R: Rng + ?Sized>(candidate_lengths: &[u32], rng: &mut R) -> Result<String> {
    validate_lengths(candidate_lengths)?;

    let length = choose_length(candidate_lengths, rng)?;
    let sequence = (0..length)
        .map(|_| NUCLEOTIDES[rng.random_range(0..NUCLEOTIDES.len())])
        .collect();

    Ok(sequence)
}
