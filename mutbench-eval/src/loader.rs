//! Reader for call tables that have already been preprocessed into a
//! tab-delimited file with a header row.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use mutbench_core::utils::get_dynamic_reader;

use crate::calls::{CallRecord, CallTableLoader, MutationCallTable};
use crate::consts::*;
use crate::errors::{EvalError, Result};

/// Column names of a processed call table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallTableColumns {
    pub id: String,
    pub chromosome: String,
    pub start_position: String,
    pub variant_type: String,
    pub tumor_vaf: String,
    pub reference_allele: String,
    pub tumor_allele: String,
    pub target_filter: String,
    pub current_filter: String,
    pub new_filter: String,
    pub basic_filter: String,
}

impl Default for CallTableColumns {
    fn default() -> Self {
        Self {
            id: ID_COL.to_string(),
            chromosome: CHROMOSOME_COL.to_string(),
            start_position: START_POSITION_COL.to_string(),
            variant_type: VARIANT_TYPE_COL.to_string(),
            tumor_vaf: TUMOR_VAF_COL.to_string(),
            reference_allele: REFERENCE_ALLELE_COL.to_string(),
            tumor_allele: TUMOR_ALLELE_COL.to_string(),
            target_filter: TARGET_FILTER_COL.to_string(),
            current_filter: CURRENT_FILTER_COL.to_string(),
            new_filter: NEW_FILTER_COL.to_string(),
            basic_filter: BASIC_FILTER_COL.to_string(),
        }
    }
}

/// Positions of the known columns within one file's header.
struct ColumnIndex {
    id: Option<usize>,
    chromosome: usize,
    start_position: usize,
    variant_type: usize,
    tumor_vaf: usize,
    reference_allele: Option<usize>,
    tumor_allele: Option<usize>,
    target_filter: usize,
    current_filter: Option<usize>,
    new_filter: Option<usize>,
    basic_filter: Option<usize>,
}

fn is_missing(value: &str) -> bool {
    MISSING_VALUES.contains(&value)
}

fn cell(row: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !is_missing(v))
        .map(str::to_string)
}

///
/// Loads processed call tables written as TSV (optionally gzipped), skipping
/// `#` comment lines. Optional filter columns that are missing from a file
/// count as empty on every row.
///
#[derive(Debug, Clone, Default)]
pub struct TsvCallTableLoader {
    pub columns: CallTableColumns,
}

impl TsvCallTableLoader {
    pub fn new(columns: CallTableColumns) -> Self {
        Self { columns }
    }

    fn index_columns(&self, headers: &csv::StringRecord, source_name: &str) -> Result<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| EvalError::MissingColumn {
                column: name.to_string(),
                source_name: source_name.to_string(),
            })
        };

        let c = &self.columns;
        Ok(ColumnIndex {
            id: find(c.id.as_str()),
            chromosome: require(c.chromosome.as_str())?,
            start_position: require(c.start_position.as_str())?,
            variant_type: require(c.variant_type.as_str())?,
            tumor_vaf: require(c.tumor_vaf.as_str())?,
            reference_allele: find(c.reference_allele.as_str()),
            tumor_allele: find(c.tumor_allele.as_str()),
            target_filter: require(c.target_filter.as_str())?,
            current_filter: find(c.current_filter.as_str()),
            new_filter: find(c.new_filter.as_str()),
            basic_filter: find(c.basic_filter.as_str()),
        })
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        columns: &ColumnIndex,
        row_num: usize,
        source_name: &str,
    ) -> Result<CallRecord> {
        let chromosome = cell(row, Some(columns.chromosome)).ok_or_else(|| {
            EvalError::InvalidInput(format!("{}: empty chromosome on row {}", source_name, row_num))
        })?;

        let start_raw = cell(row, Some(columns.start_position)).unwrap_or_default();
        let start_position: u32 = start_raw.parse().map_err(|_| {
            EvalError::InvalidInput(format!(
                "{}: invalid start position {:?} on row {}",
                source_name, start_raw, row_num
            ))
        })?;

        let variant_type = cell(row, Some(columns.variant_type)).unwrap_or_default();

        // an absent VAF never passes a threshold
        let tumor_vaf = match cell(row, Some(columns.tumor_vaf)) {
            None => f64::NAN,
            Some(v) => v.parse().map_err(|_| {
                EvalError::InvalidInput(format!(
                    "{}: invalid tumor VAF {:?} on row {}",
                    source_name, v, row_num
                ))
            })?,
        };

        let id = match cell(row, columns.id) {
            Some(id) => id,
            None => match (cell(row, columns.reference_allele), cell(row, columns.tumor_allele)) {
                (Some(reference), Some(alt)) => {
                    format!("{}:{}:{}>{}", chromosome, start_position, reference, alt)
                }
                _ => format!("{}:{}:{}", chromosome, start_position, variant_type),
            },
        };

        Ok(CallRecord {
            id,
            chromosome,
            start_position,
            variant_type,
            tumor_vaf,
            target_filter: cell(row, Some(columns.target_filter)),
            current_filter: cell(row, columns.current_filter),
            new_filter: cell(row, columns.new_filter),
            basic_filter: cell(row, columns.basic_filter),
        })
    }
}

impl CallTableLoader for TsvCallTableLoader {
    fn load(&self, path: &Path) -> Result<MutationCallTable> {
        let source_name = path.display().to_string();
        let reader = get_dynamic_reader(path)
            .map_err(|e| EvalError::FileReadError(format!("{}: {}", source_name, e)))?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .quoting(false)
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = self.index_columns(&headers, &source_name)?;

        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            let row = row?;
            records.push(self.parse_row(&row, &columns, i + 1, &source_name)?);
        }

        debug!("Loaded {} calls from {}", records.len(), source_name);
        MutationCallTable::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/calls")
            .join(file_name)
    }

    fn write_temp(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("calls.maf");
        std::fs::write(&path, contents).unwrap();
        (tempdir, path)
    }

    #[rstest]
    fn test_load_fixture() {
        let table = TsvCallTableLoader::default()
            .load(&get_test_path("P1_100.maf"))
            .unwrap();

        assert_eq!(table.len(), 6);
        let first = &table.records()[0];
        assert_eq!(first.id, "1:1500:C>T");
        assert_eq!(first.chromosome, "1");
        assert_eq!(first.variant_type, "SNP");
        assert_eq!(first.tumor_vaf, 0.4);
        assert!(first.passes_current_filter());
        assert!(first.is_on_target());
    }

    #[rstest]
    fn test_missing_values_are_absent() {
        let (_dir, path) = write_temp(
            "#version 2.4\nChromosome\tStart_Position\tVariant_Type\tTumor_VAF\ttarget_filter\tcurrent_filter\n\
             1\t100\tSNP\t0.2\tNA\t\n\
             1\t200\tDEL\t\tkit\tPASS\n",
        );
        let table = TsvCallTableLoader::default().load(&path).unwrap();

        let rows = table.records();
        assert_eq!(rows[0].target_filter, None);
        assert_eq!(rows[0].current_filter, None);
        assert_eq!(rows[0].new_filter, None);
        assert!(rows[1].tumor_vaf.is_nan());
        assert_eq!(rows[1].id, "1:200:DEL");
    }

    #[rstest]
    fn test_explicit_id_column_wins() {
        let (_dir, path) = write_temp(
            "id\tChromosome\tStart_Position\tVariant_Type\tTumor_VAF\ttarget_filter\n\
             mut7\t3\t30\tSNP\t0.5\tkit\n",
        );
        let table = TsvCallTableLoader::default().load(&path).unwrap();
        assert!(table.contains_id("mut7"));
    }

    #[rstest]
    fn test_missing_required_column() {
        let (_dir, path) = write_temp("Chromosome\tStart_Position\tVariant_Type\ttarget_filter\n1\t5\tSNP\tkit\n");
        match TsvCallTableLoader::default().load(&path) {
            Err(EvalError::MissingColumn { column, .. }) => assert_eq!(column, "Tumor_VAF"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[rstest]
    fn test_custom_column_names() {
        let (_dir, path) = write_temp("chrom\tpos\ttype\tvaf\tkit\n2\t9\tSNP\t0.1\tyes\n");
        let loader = TsvCallTableLoader::new(CallTableColumns {
            chromosome: "chrom".to_string(),
            start_position: "pos".to_string(),
            variant_type: "type".to_string(),
            tumor_vaf: "vaf".to_string(),
            target_filter: "kit".to_string(),
            ..Default::default()
        });

        let table = loader.load(&path).unwrap();
        assert_eq!(table.records()[0].start_position, 9);
        assert!(table.records()[0].is_on_target());
    }

    #[rstest]
    fn test_bad_start_position() {
        let (_dir, path) = write_temp(
            "Chromosome\tStart_Position\tVariant_Type\tTumor_VAF\ttarget_filter\n1\tx\tSNP\t0.1\tkit\n",
        );
        let result = TsvCallTableLoader::default().load(&path);
        assert!(matches!(result, Err(EvalError::InvalidInput(_))));
    }

    #[rstest]
    fn test_quote_characters_are_literal() {
        let (_dir, path) = write_temp(
            "Chromosome\tStart_Position\tVariant_Type\tTumor_VAF\tnote\ttarget_filter\tcurrent_filter\n\
             1\t100\tSNP\t0.2\t\"low mapq\tkit\tPASS\n\
             1\t200\tSNP\t0.3\tok\"\tkit\tPASS\n",
        );
        let table = TsvCallTableLoader::default().load(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].target_filter.as_deref(), Some("kit"));
        assert!(table.records()[0].passes_current_filter());
        assert_eq!(table.records()[1].start_position, 200);
    }
}
