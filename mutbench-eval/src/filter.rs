//! Row selection over call tables.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calls::{CallRecord, MutationCallTable};
use crate::consts::DEFAULT_TARGET_VARIANTS;

///
/// Which filters a call must pass to count.
///
/// A call always needs `tumor_vaf >= vaf_threshold` and a target-kit entry;
/// each enabled flag adds one more requirement.
///
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub apply_current_filter: bool,
    pub apply_new_filter: bool,
    pub apply_basic_filter: bool,
    pub vaf_threshold: f64,
}

impl FilterConfig {
    pub fn passes(&self, record: &CallRecord) -> bool {
        record.tumor_vaf >= self.vaf_threshold
            && record.is_on_target()
            && (!self.apply_current_filter || record.passes_current_filter())
            && (!self.apply_new_filter || record.passes_new_filter())
            && (!self.apply_basic_filter || record.passes_basic_filter())
    }
}

/// Variant types (`SNP`, `DNP`, ...) under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantTypes(BTreeSet<String>);

impl Default for VariantTypes {
    fn default() -> Self {
        VariantTypes::from(DEFAULT_TARGET_VARIANTS)
    }
}

impl From<&[&str]> for VariantTypes {
    fn from(types: &[&str]) -> Self {
        VariantTypes(types.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for VariantTypes {
    fn from(types: [&str; N]) -> Self {
        VariantTypes::from(&types[..])
    }
}

impl From<Vec<String>> for VariantTypes {
    fn from(types: Vec<String>) -> Self {
        VariantTypes(types.into_iter().collect())
    }
}

impl VariantTypes {
    pub fn contains(&self, variant_type: &str) -> bool {
        self.0.contains(variant_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

///
/// One boolean per row: does the call pass the configured filters.
///
pub fn filtration_mask(table: &MutationCallTable, config: &FilterConfig) -> Vec<bool> {
    table.iter().map(|r| config.passes(r)).collect()
}

/// One boolean per row: is the call's variant type among `types`.
pub fn variant_type_mask(table: &MutationCallTable, types: &VariantTypes) -> Vec<bool> {
    table.iter().map(|r| types.contains(&r.variant_type)).collect()
}

/// Filtration mask AND variant-type membership.
pub fn selection_mask(
    table: &MutationCallTable,
    config: &FilterConfig,
    types: &VariantTypes,
) -> Vec<bool> {
    table
        .iter()
        .map(|r| config.passes(r) && types.contains(&r.variant_type))
        .collect()
}
