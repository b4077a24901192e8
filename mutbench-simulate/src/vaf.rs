//! Variant allele fraction simulation.
//!
//! For every mutation the read depth `D` at its start is looked up and the
//! alt-read count is drawn from `Binomial(D, expected_vaf)`; the simulated
//! VAF is `alt / D`. Uncovered positions get a VAF of exactly 0 and consume
//! no randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::depth::DepthSource;
use crate::errors::{Result, SimulationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VafObservation {
    pub chrom: String,
    pub position: u32,
    pub depth: u32,
    pub vaf: f64,
}

impl VafObservation {
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}\t{}", self.chrom, self.position, self.depth, self.vaf)
    }
}

fn validate_expected_vaf(expected_vaf: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&expected_vaf) {
        return Err(SimulationError::InvalidInput(format!(
            "expected VAF must lie in [0, 1], got {}",
            expected_vaf
        )));
    }
    Ok(())
}

fn observe<D, R>(
    chrom: &str,
    position: u32,
    expected_vaf: f64,
    depth_source: &D,
    rng: &mut R,
) -> Result<VafObservation>
where
    D: DepthSource + ?Sized,
    R: Rng + ?Sized,
{
    let depth = depth_source.depth(chrom, position)?;

    let vaf = if depth > 0 {
        let binomial = Binomial::new(depth as u64, expected_vaf)
            .map_err(|e| SimulationError::InvalidInput(format!("binomial parameters: {}", e)))?;
        let alt_count = binomial.sample(rng);
        alt_count as f64 / depth as f64
    } else {
        0.0
    };

    Ok(VafObservation {
        chrom: chrom.to_string(),
        position,
        depth,
        vaf,
    })
}

///
/// Simulate one observation per mutation, in input order.
///
/// # Arguments
/// - mutations: `(chrom, start)` of each mutation
/// - expected_vaf: binomial success probability, in `[0, 1]`
/// - depth_source: where read depth comes from
/// - rng: random source, drawn from once per covered mutation
pub fn simulate_observations<D, R>(
    mutations: &[(String, u32)],
    expected_vaf: f64,
    depth_source: &D,
    rng: &mut R,
) -> Result<Vec<VafObservation>>
where
    D: DepthSource + ?Sized,
    R: Rng + ?Sized,
{
    validate_expected_vaf(expected_vaf)?;

    mutations
        .iter()
        .map(|(chrom, position)| observe(chrom, *position, expected_vaf, depth_source, rng))
        .collect()
}

///
/// Simulated VAFs only; same length and order as `mutations`.
///
pub fn simulate_vafs<D, R>(
    mutations: &[(String, u32)],
    expected_vaf: f64,
    depth_source: &D,
    rng: &mut R,
) -> Result<Vec<f64>>
where
    D: DepthSource + ?Sized,
    R: Rng + ?Sized,
{
    Ok(
        simulate_observations(mutations, expected_vaf, depth_source, rng)?
            .into_iter()
            .map(|o| o.vaf)
            .collect(),
    )
}

///
/// Like [simulate_observations] but with depth queries running on the rayon
/// pool.
///
/// One seed per mutation is drawn from `rng` up front, in input order, and
/// each mutation samples from its own generator. The result depends only on
/// the state of `rng`, not on scheduling; it is not the same stream as the
/// sequential version.
pub fn simulate_observations_parallel<D, R>(
    mutations: &[(String, u32)],
    expected_vaf: f64,
    depth_source: &D,
    rng: &mut R,
) -> Result<Vec<VafObservation>>
where
    D: DepthSource + Sync + ?Sized,
    R: Rng + ?Sized,
{
    validate_expected_vaf(expected_vaf)?;

    let seeds: Vec<u64> = (0..mutations.len()).map(|_| rng.random()).collect();

    mutations
        .par_iter()
        .zip(seeds.par_iter())
        .map(|((chrom, position), seed)| {
            let mut local_rng = StdRng::seed_from_u64(*seed);
            observe(chrom, *position, expected_vaf, depth_source, &mut local_rng)
        })
        .collect()
}
