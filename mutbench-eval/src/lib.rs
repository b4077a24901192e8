//! # Reproducibility of mutation calls across diluted replicates
//!
//! A sample is sequenced once at full purity and again as replicates diluted
//! to lower tumor fractions. The calls of the undiluted sample form a
//! [ReferenceSet]; every replicate is scored against the part of that set
//! still expected to be detectable after dilution.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mutbench_eval::{EvaluationConfig, TsvCallTableLoader, run_evaluation};
//!
//! let config = EvaluationConfig::from_file(Path::new("eval.yaml")).unwrap();
//! let loader = TsvCallTableLoader::new(config.columns.clone());
//! let report = run_evaluation(&config, &loader).unwrap();
//!
//! for replicate in &report.replicates {
//!     println!("{}\t{}", replicate.replicate, replicate.reproducibility);
//! }
//! ```
//!
//! Samples generated by spiking a known [MutationTable](mutbench_simulate::MutationTable)
//! into reads are scored with [evaluate_spiked] instead.
pub mod calls;
pub mod config;
pub mod consts;
pub mod errors;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod reference;
pub mod reproducibility;
pub mod spiked;

pub use calls::{CallRecord, CallTableLoader, MutationCallTable};
pub use config::EvaluationConfig;
pub use errors::{EvalError, Result};
pub use filter::{FilterConfig, VariantTypes, filtration_mask, selection_mask, variant_type_mask};
pub use loader::{CallTableColumns, TsvCallTableLoader};
pub use metrics::{
    PurityLookup, PuritySummary, ReplicateMetrics, aggregate_by_purity, precision, recall,
    replicate_metrics, reproducibility,
};
pub use pipeline::{EvaluationReport, PurityBand, evaluate_tables, load_tables, run_evaluation};
pub use reference::{ReferenceSet, build_reference_sets};
pub use reproducibility::{ConfusionRecord, ReplicateId, ReproducibilityEvaluator, ThresholdPolicy};
pub use spiked::{
    FilterColumn, SpikedSummary, SpikedTruth, call_key, evaluate_spiked, purity_label,
    summarize_spiked,
};
