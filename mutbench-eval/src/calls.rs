//! Mutation call tables ("mafs").
//!
//! A [MutationCallTable] is the per-sample table of called variants after
//! preprocessing: coordinates, variant type, tumor VAF and the filter-outcome
//! columns. Producing it from raw caller output is the job of a
//! [CallTableLoader]; this crate only reads the result.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::PASS;
use crate::errors::{EvalError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Mutation identity, shared by the same mutation across samples
    pub id: String,
    pub chromosome: String,
    pub start_position: u32,
    pub variant_type: String,
    pub tumor_vaf: f64,
    /// Set when the call lies in the capture kit's target regions
    pub target_filter: Option<String>,
    pub current_filter: Option<String>,
    pub new_filter: Option<String>,
    pub basic_filter: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CallRecord {
    pub fn new(id: &str, chromosome: &str, start_position: u32, variant_type: &str, tumor_vaf: f64) -> Self {
        Self {
            id: id.to_string(),
            chromosome: chromosome.to_string(),
            start_position,
            variant_type: variant_type.to_string(),
            tumor_vaf,
            target_filter: None,
            current_filter: None,
            new_filter: None,
            basic_filter: None,
        }
    }

    pub fn with_target_filter(mut self, value: &str) -> Self {
        self.target_filter = present(Some(value.to_string()));
        self
    }

    pub fn with_current_filter(mut self, value: &str) -> Self {
        self.current_filter = present(Some(value.to_string()));
        self
    }

    pub fn with_new_filter(mut self, value: &str) -> Self {
        self.new_filter = present(Some(value.to_string()));
        self
    }

    pub fn with_basic_filter(mut self, value: &str) -> Self {
        self.basic_filter = present(Some(value.to_string()));
        self
    }

    pub fn is_on_target(&self) -> bool {
        self.target_filter.is_some()
    }

    pub fn passes_current_filter(&self) -> bool {
        self.current_filter.as_deref() == Some(PASS)
    }

    pub fn passes_new_filter(&self) -> bool {
        self.new_filter.as_deref() == Some(PASS)
    }

    pub fn passes_basic_filter(&self) -> bool {
        self.basic_filter.is_some()
    }
}

///
/// Called mutations of one sample. Row ids are unique within a table.
///
#[derive(Debug, Clone, Default)]
pub struct MutationCallTable {
    records: Vec<CallRecord>,
    index: HashMap<String, usize>,
}

impl MutationCallTable {
    pub fn new(records: Vec<CallRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), i).is_some() {
                return Err(EvalError::InvalidInput(format!(
                    "Duplicate row id {:?} in call table",
                    record.id
                )));
            }
        }
        Ok(Self { records, index })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CallRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }
}

impl<'a> IntoIterator for &'a MutationCallTable {
    type Item = &'a CallRecord;
    type IntoIter = std::slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Produces a processed call table from a file on disk.
pub trait CallTableLoader {
    fn load(&self, path: &Path) -> Result<MutationCallTable>;
}

impl<F> CallTableLoader for F
where
    F: Fn(&Path) -> Result<MutationCallTable>,
{
    fn load(&self, path: &Path) -> Result<MutationCallTable> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_filter_accessors() {
        let record = CallRecord::new("a", "1", 10, "SNP", 0.2)
            .with_target_filter("kit_v2")
            .with_current_filter("PASS")
            .with_new_filter("low_depth")
            .with_basic_filter("");

        assert!(record.is_on_target());
        assert!(record.passes_current_filter());
        assert!(!record.passes_new_filter());
        assert!(!record.passes_basic_filter());
    }

    #[rstest]
    fn test_lookup_by_id() {
        let table = MutationCallTable::new(vec![
            CallRecord::new("a", "1", 10, "SNP", 0.2),
            CallRecord::new("b", "1", 20, "DEL", 0.4),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.contains_id("b"));
        assert!(!table.contains_id("c"));
        assert_eq!(table.get("b").unwrap().start_position, 20);
    }

    #[rstest]
    fn test_duplicate_ids_rejected() {
        let result = MutationCallTable::new(vec![
            CallRecord::new("a", "1", 10, "SNP", 0.2),
            CallRecord::new("a", "1", 10, "SNP", 0.3),
        ]);
        assert!(matches!(result, Err(EvalError::InvalidInput(_))));
    }

    #[rstest]
    fn test_closure_loader() {
        let loader = |_: &Path| MutationCallTable::new(vec![CallRecord::new("x", "2", 5, "SNP", 0.1)]);
        let table = loader.load(Path::new("ignored.maf")).unwrap();
        assert_eq!(table.len(), 1);
    }
}
