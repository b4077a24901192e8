use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::calls::MutationCallTable;
use crate::filter::{FilterConfig, VariantTypes};

///
/// Ground-truth calls of one sample: row id -> tumor VAF.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceSet {
    pub vafs: BTreeMap<String, f64>,
}

impl ReferenceSet {
    ///
    /// Keep the rows of `table` passing `filter` whose variant type is in `types`.
    ///
    pub fn from_table(table: &MutationCallTable, filter: &FilterConfig, types: &VariantTypes) -> Self {
        let vafs = table
            .iter()
            .filter(|r| filter.passes(r) && types.contains(&r.variant_type))
            .map(|r| (r.id.clone(), r.tumor_vaf))
            .collect();

        ReferenceSet { vafs }
    }

    pub fn len(&self) -> usize {
        self.vafs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vafs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.vafs.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vafs.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.vafs.keys().map(String::as_str)
    }

    ///
    /// Ids still expected to be detectable after diluting the sample to
    /// `fraction`: those with `vaf * fraction >= threshold`.
    ///
    pub fn adjusted_ids(&self, fraction: f64, threshold: f64) -> BTreeSet<&str> {
        self.vafs
            .iter()
            .filter(|(_, vaf)| *vaf * fraction >= threshold)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

impl From<BTreeMap<String, f64>> for ReferenceSet {
    fn from(vafs: BTreeMap<String, f64>) -> Self {
        ReferenceSet { vafs }
    }
}

///
/// Build one reference set per sample.
///
pub fn build_reference_sets(
    tables: &BTreeMap<String, MutationCallTable>,
    filter: &FilterConfig,
    types: &VariantTypes,
) -> BTreeMap<String, ReferenceSet> {
    tables
        .iter()
        .map(|(sample, table)| {
            let reference = ReferenceSet::from_table(table, filter, types);
            debug!(
                "reference set for {}: {} of {} calls",
                sample,
                reference.len(),
                table.len()
            );
            (sample.clone(), reference)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallTableLoader;
    use crate::loader::TsvCallTableLoader;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn p1_table() -> MutationCallTable {
        let path = std::env::current_dir()
            .unwrap()
            .join("../tests/data/calls/P1_100.maf");
        TsvCallTableLoader::default().load(&path).unwrap()
    }

    #[rstest]
    fn test_reference_set_no_filters(p1_table: MutationCallTable) {
        let reference =
            ReferenceSet::from_table(&p1_table, &FilterConfig::default(), &VariantTypes::default());

        // DEL is not a target type and X:150 is off target
        let ids: Vec<&str> = reference.ids().collect();
        assert_eq!(
            ids,
            vec!["17:7670050:CC>TT", "1:1500:C>T", "1:5300:G>A", "2:9050:A>G"]
        );
        assert_eq!(reference.get("1:1500:C>T"), Some(0.4));
    }

    #[rstest]
    fn test_reference_set_current_filter(p1_table: MutationCallTable) {
        let filter = FilterConfig {
            apply_current_filter: true,
            ..Default::default()
        };
        let reference = ReferenceSet::from_table(&p1_table, &filter, &VariantTypes::default());

        assert_eq!(reference.len(), 3);
        assert!(!reference.contains("2:9050:A>G"));
    }

    #[rstest]
    fn test_build_reference_sets(p1_table: MutationCallTable) {
        let mut tables = BTreeMap::new();
        tables.insert("P1".to_string(), p1_table);
        tables.insert("P2".to_string(), MutationCallTable::new(vec![]).unwrap());

        let sets = build_reference_sets(&tables, &FilterConfig::default(), &VariantTypes::default());

        assert_eq!(sets.len(), 2);
        assert_eq!(sets["P1"].len(), 4);
        assert!(sets["P2"].is_empty());
    }

    #[rstest]
    #[case(1.0, 0.05, 4)]
    #[case(0.5, 0.05, 3)]
    #[case(0.25, 0.05, 2)]
    #[case(0.25, 0.0, 4)]
    fn test_adjusted_ids(
        p1_table: MutationCallTable,
        #[case] fraction: f64,
        #[case] threshold: f64,
        #[case] expected: usize,
    ) {
        let reference =
            ReferenceSet::from_table(&p1_table, &FilterConfig::default(), &VariantTypes::default());
        assert_eq!(reference.adjusted_ids(fraction, threshold).len(), expected);
    }
}
