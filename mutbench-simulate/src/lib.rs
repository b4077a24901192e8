//! # Mutation spike-in simulation
//!
//! Builds configuration tables of artificial insertions, deletions and SNPs
//! for a read-spiking tool, and models the variant allele fraction such a
//! mutation would show at a given read depth.
//!
//! All randomness is drawn from a caller-supplied generator, so a fixed seed
//! reproduces a run exactly:
//!
//! ```no_run
//! use mutbench_core::models::RegionSet;
//! use mutbench_simulate::{create_rng, generate_insertions, simulate_vafs, SamtoolsDepth};
//!
//! let mut rng = create_rng(Some(42));
//! let regions = RegionSet::try_from("candidates.bed").unwrap();
//!
//! let insertions = generate_insertions(&regions, &[1, 2, 5], 10, &mut rng).unwrap();
//! insertions.write_tsv("ins.tsv").unwrap();
//!
//! let depth = SamtoolsDepth::new("tumor.bam");
//! let vafs = simulate_vafs(&insertions.positions(), 0.1, &depth, &mut rng).unwrap();
//! ```
pub mod consts;
pub mod depth;
pub mod errors;
pub mod mutations;
pub mod purity;
pub mod rng;
pub mod sequence;
pub mod vaf;

// re-exports
pub use depth::{DepthSource, SamtoolsDepth, parse_depth_output};
pub use errors::{Result, SimulationError};
pub use mutations::{
    MutationLabel, MutationRecord, MutationTable, generate_deletions, generate_insertions,
    generate_snps,
};
pub use purity::purity_to_fraction;
pub use rng::create_rng;
pub use sequence::random_insertion;
pub use vaf::{
    VafObservation, simulate_observations, simulate_observations_parallel, simulate_vafs,
};
