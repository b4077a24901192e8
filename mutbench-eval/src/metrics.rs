//! Per-replicate metrics and their aggregation by purity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::errors::{EvalError, Result};
use crate::reproducibility::{ConfusionRecord, ReplicateId};

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// `TP / All_TP`, NaN when the adjusted reference set is empty.
pub fn reproducibility(record: &ConfusionRecord) -> f64 {
    ratio(record.tp, record.all_tp)
}

/// `TP / (TP + FP)`, NaN when nothing was called.
pub fn precision(record: &ConfusionRecord) -> f64 {
    ratio(record.tp, record.tp + record.fp)
}

/// `TP / (TP + FN)`, NaN when nothing was expected.
pub fn recall(record: &ConfusionRecord) -> f64 {
    ratio(record.tp, record.tp + record.fn_)
}

///
/// Replicate id -> tumor purity of the replicate.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurityLookup(BTreeMap<String, f64>);

impl PurityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, replicate: &str, purity: f64) {
        self.0.insert(replicate.to_string(), purity);
    }

    pub fn purity(&self, replicate: &str) -> Result<f64> {
        self.0
            .get(replicate)
            .copied()
            .ok_or_else(|| EvalError::UnknownSample(replicate.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for PurityLookup {
    fn from(map: BTreeMap<String, f64>) -> Self {
        PurityLookup(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicateMetrics {
    pub replicate: String,
    pub sample: String,
    pub fraction: f64,
    pub purity: f64,
    pub reproducibility: f64,
    pub precision: f64,
    pub recall: f64,
    #[serde(flatten)]
    pub confusion: ConfusionRecord,
}

///
/// Attach fraction, purity and the three ratios to every confusion record.
///
pub fn replicate_metrics(
    results: &BTreeMap<String, ConfusionRecord>,
    purity: &PurityLookup,
) -> Result<Vec<ReplicateMetrics>> {
    results
        .iter()
        .map(|(id, confusion)| -> Result<ReplicateMetrics> {
            let replicate = ReplicateId::parse(id)?;
            Ok(ReplicateMetrics {
                replicate: id.clone(),
                fraction: replicate.fraction(),
                sample: replicate.sample,
                purity: purity.purity(id)?,
                reproducibility: reproducibility(confusion),
                precision: precision(confusion),
                recall: recall(confusion),
                confusion: *confusion,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuritySummary {
    pub purity: f64,
    pub replicates: Vec<String>,
    pub mean: f64,
    pub std: f64,
}

impl PuritySummary {
    /// `(mean - coeff * std, mean + coeff * std)`
    pub fn band(&self, coefficient: f64) -> (f64, f64) {
        let half = coefficient * self.std;
        (self.mean - half, self.mean + half)
    }
}

///
/// Group replicates by purity and summarise their reproducibility.
///
/// Groups come out in ascending purity. NaN reproducibilities are left
/// out of mean and std but the replicate is still listed.
///
pub fn aggregate_by_purity(metrics: &[ReplicateMetrics]) -> Vec<PuritySummary> {
    let mut sorted: Vec<&ReplicateMetrics> = metrics.iter().collect();
    sorted.sort_by(|a, b| a.purity.total_cmp(&b.purity));

    sorted
        .chunk_by(|a, b| a.purity.total_cmp(&b.purity).is_eq())
        .map(|group| {
            let values: Vec<f64> = group
                .iter()
                .map(|m| m.reproducibility)
                .filter(|v| !v.is_nan())
                .collect();

            PuritySummary {
                purity: group[0].purity,
                replicates: group.iter().map(|m| m.replicate.clone()).collect(),
                mean: values.iter().mean(),
                std: values.iter().std_dev(),
            }
        })
        .collect()
}
