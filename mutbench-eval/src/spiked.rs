//! Scoring of samples generated by spiking a known mutation table into reads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mutbench_simulate::MutationTable;

use crate::calls::{CallRecord, MutationCallTable};
use crate::consts::{CURRENT_FILTER_COL, INSERTION_VARIANT, NEW_FILTER_COL, REPLICATE_DELIMITER};
use crate::errors::{EvalError, Result};
use crate::metrics::{precision, recall};
use crate::reproducibility::ConfusionRecord;

/// Filter column whose `PASS` marks a call as made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterColumn {
    #[default]
    #[serde(rename = "current_filter")]
    Current,
    #[serde(rename = "new_filter")]
    New,
}

impl FilterColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterColumn::Current => CURRENT_FILTER_COL,
            FilterColumn::New => NEW_FILTER_COL,
        }
    }

    pub fn is_called(&self, record: &CallRecord) -> bool {
        match self {
            FilterColumn::Current => record.passes_current_filter(),
            FilterColumn::New => record.passes_new_filter(),
        }
    }
}

impl FromStr for FilterColumn {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            CURRENT_FILTER_COL | "current" => Ok(FilterColumn::Current),
            NEW_FILTER_COL | "new" => Ok(FilterColumn::New),
            _ => Err(EvalError::InvalidInput(format!(
                "Unknown filter column {:?}, expected {} or {}",
                s, CURRENT_FILTER_COL, NEW_FILTER_COL
            ))),
        }
    }
}

impl Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// Positions (`chrom:pos`) of the mutations spiked into a generated sample.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpikedTruth {
    keys: BTreeSet<String>,
}

impl SpikedTruth {
    pub fn from_tables(tables: &[MutationTable]) -> Self {
        let keys = tables
            .iter()
            .flat_map(|t| t.iter())
            .map(|r| format!("{}:{}", r.chrom, r.start))
            .collect();
        SpikedTruth { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

impl From<&MutationTable> for SpikedTruth {
    fn from(table: &MutationTable) -> Self {
        SpikedTruth::from_tables(std::slice::from_ref(table))
    }
}

///
/// Position key of a call. Insertions are reported one base before the
/// spiked coordinate, so their start is shifted by one.
///
pub fn call_key(record: &CallRecord) -> String {
    let position = if record.variant_type == INSERTION_VARIANT {
        record.start_position.saturating_add(1)
    } else {
        record.start_position
    };
    format!("{}:{}", record.chromosome, position)
}

///
/// Confusion counts of one generated sample. `All_TP` is the truth size.
///
pub fn evaluate_spiked(
    table: &MutationCallTable,
    truth: &SpikedTruth,
    column: FilterColumn,
) -> ConfusionRecord {
    let called: Vec<bool> = table.iter().map(|r| column.is_called(r)).collect();
    let expected: Vec<bool> = table.iter().map(|r| truth.contains(&call_key(r))).collect();

    ConfusionRecord::from_masks(&called, &expected, truth.len())
}

/// Purity label of a generated sample: the suffix after its last `_`.
pub fn purity_label(sample: &str) -> &str {
    sample
        .rsplit_once(REPLICATE_DELIMITER)
        .map_or(sample, |(_, suffix)| suffix)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpikedSummary {
    pub sample: String,
    pub purity: String,
    pub recall: f64,
    pub precision: f64,
    #[serde(flatten)]
    pub confusion: ConfusionRecord,
}

///
/// Recall and precision per generated sample, ordered by numeric purity.
///
pub fn summarize_spiked(results: &BTreeMap<String, ConfusionRecord>) -> Result<Vec<SpikedSummary>> {
    let mut rows = results
        .iter()
        .map(|(sample, confusion)| -> Result<(f64, SpikedSummary)> {
            let label = purity_label(sample);
            let value = label.parse::<f64>().map_err(|_| {
                EvalError::InvalidInput(format!(
                    "Sample {:?} has no numeric purity suffix",
                    sample
                ))
            })?;
            let summary = SpikedSummary {
                sample: sample.clone(),
                purity: label.to_string(),
                recall: recall(confusion),
                precision: precision(confusion),
                confusion: *confusion,
            };
            Ok((value, summary))
        })
        .collect::<Result<Vec<(f64, SpikedSummary)>>>()?;

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(rows.into_iter().map(|(_, s)| s).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutbench_simulate::{MutationLabel, MutationRecord};

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn truth() -> SpikedTruth {
        let table = MutationTable::from(vec![
            MutationRecord {
                chrom: "1".to_string(),
                start: 1500,
                end: 1501,
                label: Some(MutationLabel::Insertion),
                ins: Some("ACG".to_string()),
            },
            MutationRecord {
                chrom: "2".to_string(),
                start: 300,
                end: 302,
                label: Some(MutationLabel::Deletion),
                ins: None,
            },
            MutationRecord {
                chrom: "3".to_string(),
                start: 42,
                end: 42,
                label: None,
                ins: None,
            },
        ]);
        SpikedTruth::from(&table)
    }

    #[rstest]
    fn test_call_key_shifts_insertions() {
        let ins = CallRecord::new("a", "1", 1499, "INS", 0.3);
        let del = CallRecord::new("b", "2", 300, "DEL", 0.3);
        assert_eq!(call_key(&ins), "1:1500");
        assert_eq!(call_key(&del), "2:300");
    }

    #[rstest]
    fn test_evaluate_spiked(truth: SpikedTruth) {
        let table = MutationCallTable::new(vec![
            CallRecord::new("a", "1", 1499, "INS", 0.3)
                .with_current_filter("PASS")
                .with_new_filter("PASS"),
            CallRecord::new("b", "2", 300, "DEL", 0.3).with_new_filter("PASS"),
            CallRecord::new("c", "5", 10, "SNP", 0.3).with_current_filter("PASS"),
            CallRecord::new("d", "6", 10, "SNP", 0.3).with_current_filter("germline"),
        ])
        .unwrap();

        let current = evaluate_spiked(&table, &truth, FilterColumn::Current);
        assert_eq!(
            current,
            ConfusionRecord {
                tp: 1,
                tn: 1,
                fp: 1,
                fn_: 1,
                all_tp: 3
            }
        );

        let new = evaluate_spiked(&table, &truth, FilterColumn::New);
        assert_eq!(new.tp, 2);
        assert_eq!(new.fp, 0);
        assert_eq!(new.tn, 2);
        assert_eq!(new.fn_, 0);
    }

    #[rstest]
    #[case("PAT3_75", "75")]
    #[case("gen_PAT3_5", "5")]
    #[case("PAT3", "PAT3")]
    fn test_purity_label(#[case] sample: &str, #[case] expected: &str) {
        assert_eq!(purity_label(sample), expected);
    }

    #[rstest]
    fn test_summarize_sorts_numerically() {
        let results = BTreeMap::from([
            (
                "G_100".to_string(),
                ConfusionRecord {
                    tp: 4,
                    tn: 0,
                    fp: 0,
                    fn_: 0,
                    all_tp: 4,
                },
            ),
            (
                "G_25".to_string(),
                ConfusionRecord {
                    tp: 1,
                    tn: 0,
                    fp: 1,
                    fn_: 3,
                    all_tp: 4,
                },
            ),
            ("G_5".to_string(), ConfusionRecord::default()),
        ]);

        let summary = summarize_spiked(&results).unwrap();

        let purities: Vec<&str> = summary.iter().map(|s| s.purity.as_str()).collect();
        assert_eq!(purities, vec!["5", "25", "100"]);
        assert!(summary[0].recall.is_nan());
        assert_eq!(summary[1].recall, 0.25);
        assert_eq!(summary[1].precision, 0.5);
        assert_eq!(summary[2].recall, 1.0);
    }

    #[rstest]
    fn test_summarize_rejects_non_numeric_purity() {
        let results = BTreeMap::from([("G_full".to_string(), ConfusionRecord::default())]);
        assert!(summarize_spiked(&results).is_err());
    }

    #[rstest]
    #[case("current_filter", FilterColumn::Current)]
    #[case("new", FilterColumn::New)]
    fn test_filter_column_parse(#[case] input: &str, #[case] expected: FilterColumn) {
        assert_eq!(input.parse::<FilterColumn>().unwrap(), expected);
    }
}
