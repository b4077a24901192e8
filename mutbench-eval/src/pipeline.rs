//! Config-driven evaluation: load tables, build references, score replicates.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use crate::calls::{CallTableLoader, MutationCallTable};
use crate::config::EvaluationConfig;
use crate::errors::Result;
use crate::metrics::{PuritySummary, ReplicateMetrics, aggregate_by_purity, replicate_metrics};
use crate::reference::build_reference_sets;
use crate::reproducibility::ReproducibilityEvaluator;

/// A purity group with its confidence band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurityBand {
    #[serde(flatten)]
    pub summary: PuritySummary,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub reference_vaf_threshold: f64,
    pub replicates: Vec<ReplicateMetrics>,
    pub purity: Vec<PurityBand>,
}

///
/// Load every table in `paths`, keyed like the input.
///
pub fn load_tables<L>(
    paths: &BTreeMap<String, PathBuf>,
    loader: &L,
) -> Result<BTreeMap<String, MutationCallTable>>
where
    L: CallTableLoader + ?Sized,
{
    paths
        .iter()
        .map(|(key, path)| -> Result<(String, MutationCallTable)> {
            Ok((key.clone(), loader.load(path)?))
        })
        .collect()
}

impl EvaluationConfig {
    pub fn evaluator(&self) -> ReproducibilityEvaluator {
        ReproducibilityEvaluator::new(self.filter, self.target_variants.clone())
            .with_advanced_mode(self.advanced_mode)
            .with_thresholds(self.thresholds)
    }
}

///
/// Score already loaded tables with the settings of `config`.
///
pub fn evaluate_tables(
    config: &EvaluationConfig,
    references: &BTreeMap<String, MutationCallTable>,
    replicates: &BTreeMap<String, MutationCallTable>,
) -> Result<EvaluationReport> {
    let evaluator = config.evaluator();
    let reference_sets = build_reference_sets(references, &config.filter, &config.target_variants);

    let confusion = evaluator.evaluate(&reference_sets, replicates)?;
    let metrics = replicate_metrics(&confusion, &config.purity)?;

    let purity = aggregate_by_purity(&metrics)
        .into_iter()
        .map(|summary| {
            let (lower, upper) = summary.band(config.band_coefficient);
            PurityBand {
                summary,
                lower,
                upper,
            }
        })
        .collect();

    Ok(EvaluationReport {
        reference_vaf_threshold: evaluator.reference_vaf_threshold(),
        replicates: metrics,
        purity,
    })
}

///
/// Run a whole evaluation from a config.
///
pub fn run_evaluation<L>(config: &EvaluationConfig, loader: &L) -> Result<EvaluationReport>
where
    L: CallTableLoader + ?Sized,
{
    info!("Loading {} reference tables", config.reference.len());
    let references = load_tables(&config.reference, loader)?;

    info!("Loading {} replicate tables", config.replicates.len());
    let replicates = load_tables(&config.replicates, loader)?;

    evaluate_tables(config, &references, &replicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalError;
    use crate::loader::TsvCallTableLoader;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::Path;

    #[fixture]
    fn config() -> EvaluationConfig {
        let path = std::env::current_dir()
            .unwrap()
            .join("../tests/data/eval/config.yaml");
        EvaluationConfig::from_file(&path).unwrap()
    }

    #[rstest]
    fn test_run_evaluation(config: EvaluationConfig) {
        let loader = TsvCallTableLoader::new(config.columns.clone());
        let report = run_evaluation(&config, &loader).unwrap();

        assert_eq!(report.reference_vaf_threshold, 0.0);

        let ids: Vec<&str> = report.replicates.iter().map(|m| m.replicate.as_str()).collect();
        assert_eq!(ids, vec!["P1_25", "P1_50"]);

        let p25 = &report.replicates[0];
        assert_eq!(p25.confusion.tp, 2);
        assert_eq!(p25.confusion.fp, 1);
        assert_eq!(p25.confusion.all_tp, 4);
        assert_eq!(p25.reproducibility, 0.5);

        let p50 = &report.replicates[1];
        assert_eq!(p50.reproducibility, 1.0);
        assert_eq!(p50.precision, 0.8);

        assert_eq!(report.purity.len(), 2);
        assert_eq!(report.purity[0].summary.purity, 0.2);
        assert_eq!(report.purity[1].summary.mean, 1.0);
        assert!(report.purity[1].lower.is_nan());
    }

    #[rstest]
    fn test_run_evaluation_with_current_filter(mut config: EvaluationConfig) {
        config.filter.apply_current_filter = true;
        let report = run_evaluation(&config, &TsvCallTableLoader::default()).unwrap();

        assert_eq!(report.reference_vaf_threshold, 0.05);

        let p25 = &report.replicates[0];
        assert_eq!(p25.confusion.all_tp, 1);
        assert_eq!(p25.confusion.tp, 1);
        assert_eq!(p25.confusion.fp, 2);
    }

    #[rstest]
    fn test_closure_loader(config: EvaluationConfig) {
        let loader = |_: &Path| MutationCallTable::new(vec![]);
        let report = run_evaluation(&config, &loader).unwrap();

        assert!(report.replicates.iter().all(|m| m.reproducibility.is_nan()));
    }

    #[rstest]
    fn test_missing_purity(mut config: EvaluationConfig) {
        config.purity = Default::default();
        let result = run_evaluation(&config, &TsvCallTableLoader::default());
        assert!(matches!(result, Err(EvalError::UnknownSample(_))));
    }

    #[rstest]
    fn test_report_serializes(config: EvaluationConfig) {
        let report = run_evaluation(&config, &TsvCallTableLoader::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["replicates"][0]["All_TP"], 4);
        assert_eq!(json["purity"][1]["replicates"][0], "P1_50");
        assert!(json["purity"][0]["std"].is_null());
    }
}
