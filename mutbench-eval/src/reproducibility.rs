//! Confusion counts of replicate calls against their sample's reference set.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::calls::MutationCallTable;
use crate::consts::{CURRENT_FILTER_VAF_THRESHOLD, NEW_FILTER_VAF_THRESHOLD, REPLICATE_DELIMITER};
use crate::errors::{EvalError, Result};
use crate::filter::{FilterConfig, VariantTypes, selection_mask};
use crate::reference::ReferenceSet;

///
/// A replicate identifier of the form `<sample>_<percent>`, e.g. `P1_50`
/// is sample `P1` diluted to 50%.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplicateId {
    pub id: String,
    pub sample: String,
    pub percent: u32,
}

impl ReplicateId {
    pub fn parse(id: &str) -> Result<Self> {
        let (sample, percent) = id
            .rsplit_once(REPLICATE_DELIMITER)
            .ok_or_else(|| EvalError::InvalidReplicateId(id.to_string()))?;

        if sample.is_empty() {
            return Err(EvalError::InvalidReplicateId(id.to_string()));
        }

        let percent = percent
            .parse::<u32>()
            .map_err(|_| EvalError::InvalidReplicateId(id.to_string()))?;

        Ok(ReplicateId {
            id: id.to_string(),
            sample: sample.to_string(),
            percent,
        })
    }

    /// Dilution as a fraction, `50` -> `0.5`.
    pub fn fraction(&self) -> f64 {
        self.percent as f64 / 100.0
    }
}

impl FromStr for ReplicateId {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        ReplicateId::parse(s)
    }
}

impl Display for ReplicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

///
/// VAF cut-offs a diluted reference mutation must clear to still be
/// expected in the replicate.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    pub current_filter_vaf: f64,
    pub new_filter_vaf: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy {
            current_filter_vaf: CURRENT_FILTER_VAF_THRESHOLD,
            new_filter_vaf: NEW_FILTER_VAF_THRESHOLD,
        }
    }
}

impl ThresholdPolicy {
    pub fn reference_vaf_threshold(&self, filter: &FilterConfig, advanced_mode: bool) -> f64 {
        if advanced_mode {
            0.0
        } else if filter.apply_current_filter {
            self.current_filter_vaf
        } else if filter.apply_new_filter {
            self.new_filter_vaf
        } else {
            filter.vaf_threshold
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionRecord {
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
    #[serde(rename = "All_TP")]
    pub all_tp: usize,
}

impl ConfusionRecord {
    ///
    /// Count agreement between `called` (passes filters) and `expected`
    /// (in the adjusted reference set). Both masks must be equally long.
    ///
    pub fn from_masks(called: &[bool], expected: &[bool], all_tp: usize) -> Self {
        let mut record = ConfusionRecord {
            all_tp,
            ..Default::default()
        };

        for (&c, &e) in called.iter().zip(expected) {
            match (c, e) {
                (true, true) => record.tp += 1,
                (false, false) => record.tn += 1,
                (true, false) => record.fp += 1,
                (false, true) => record.fn_ += 1,
            }
        }

        record
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }
}

///
/// Scores replicate call tables against the reference sets of the samples
/// they were diluted from.
///
#[derive(Debug, Clone, Default)]
pub struct ReproducibilityEvaluator {
    pub filter: FilterConfig,
    pub target_variants: VariantTypes,
    pub advanced_mode: bool,
    pub thresholds: ThresholdPolicy,
}

impl ReproducibilityEvaluator {
    pub fn new(filter: FilterConfig, target_variants: VariantTypes) -> Self {
        ReproducibilityEvaluator {
            filter,
            target_variants,
            ..Default::default()
        }
    }

    pub fn with_advanced_mode(mut self, advanced_mode: bool) -> Self {
        self.advanced_mode = advanced_mode;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdPolicy) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn reference_vaf_threshold(&self) -> f64 {
        self.thresholds
            .reference_vaf_threshold(&self.filter, self.advanced_mode)
    }

    ///
    /// Score one replicate table against `reference` diluted to `fraction`.
    ///
    pub fn evaluate_replicate(
        &self,
        reference: &ReferenceSet,
        table: &MutationCallTable,
        fraction: f64,
    ) -> ConfusionRecord {
        let threshold = self.reference_vaf_threshold();
        let adjusted = reference.adjusted_ids(fraction, threshold);

        let called = selection_mask(table, &self.filter, &self.target_variants);
        let expected: Vec<bool> = table.iter().map(|r| adjusted.contains(r.id.as_str())).collect();

        ConfusionRecord::from_masks(&called, &expected, adjusted.len())
    }

    ///
    /// Score every replicate. Replicate ids must parse as [ReplicateId] and
    /// their sample must have a reference set.
    ///
    pub fn evaluate(
        &self,
        references: &BTreeMap<String, ReferenceSet>,
        replicates: &BTreeMap<String, MutationCallTable>,
    ) -> Result<BTreeMap<String, ConfusionRecord>> {
        info!(
            "Evaluating {} replicates against {} reference sets (threshold {})",
            replicates.len(),
            references.len(),
            self.reference_vaf_threshold()
        );

        let mut results = BTreeMap::new();
        for (id, table) in replicates {
            let replicate = ReplicateId::parse(id)?;
            let reference = references
                .get(&replicate.sample)
                .ok_or_else(|| EvalError::UnknownSample(replicate.sample.clone()))?;

            let record = self.evaluate_replicate(reference, table, replicate.fraction());
            debug!("{}: {:?}", id, record);
            results.insert(id.clone(), record);
        }

        Ok(results)
    }
}
