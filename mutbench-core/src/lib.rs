//! # Core models for mutbench
//!
//! Genomic regions and the small reader utilities shared by the simulation
//! and evaluation crates. A [`models::RegionSet`] is the candidate-region
//! table that mutation generators sample from.
//!
//! ```no_run
//! use mutbench_core::models::RegionSet;
//!
//! let regions = RegionSet::try_from("candidate_regions.bed").unwrap();
//! println!("{} candidate regions", regions.len());
//! ```
pub mod errors;
pub mod models;
pub mod utils;
