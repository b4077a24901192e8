//! Spike-in configuration tables.
//!
//! Each generator samples `n` candidate regions uniformly without replacement
//! and turns every sampled region into one mutation. Output rows follow the
//! sampling order.

use std::fmt::{self, Display};
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use mutbench_core::models::{Region, RegionSet};
use mutbench_core::utils::{get_dynamic_reader, get_dynamic_reader_w_stdin, get_dynamic_writer};

use crate::consts::{DEL_LABEL, INS_LABEL, SNP_LABEL};
use crate::errors::{Result, SimulationError};
use crate::sequence::{choose_length, random_insertion, validate_lengths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationLabel {
    #[serde(rename = "INS")]
    Insertion,
    #[serde(rename = "DEL")]
    Deletion,
    #[serde(rename = "SNP")]
    Snp,
}

impl MutationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationLabel::Insertion => INS_LABEL,
            MutationLabel::Deletion => DEL_LABEL,
            MutationLabel::Snp => SNP_LABEL,
        }
    }
}

impl Display for MutationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MutationLabel {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            INS_LABEL => Ok(MutationLabel::Insertion),
            DEL_LABEL => Ok(MutationLabel::Deletion),
            SNP_LABEL => Ok(MutationLabel::Snp),
            _ => Err(SimulationError::InvalidInput(format!(
                "Unknown mutation label: {}",
                s
            ))),
        }
    }
}

///
/// One row of a spike-in configuration table.
///
/// `label` is absent on SNP rows produced by [generate_snps]; `ins` is only
/// present on insertions.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub label: Option<MutationLabel>,
    pub ins: Option<String>,
}

impl MutationRecord {
    pub fn as_string(&self) -> String {
        let mut line = format!("{}\t{}\t{}", self.chrom, self.start, self.end);
        if let Some(label) = &self.label {
            line.push('\t');
            line.push_str(label.as_str());
        }
        if let Some(ins) = &self.ins {
            line.push('\t');
            line.push_str(ins);
        }
        line
    }
}

impl Display for MutationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationTable {
    pub records: Vec<MutationRecord>,
}

impl From<Vec<MutationRecord>> for MutationTable {
    fn from(records: Vec<MutationRecord>) -> Self {
        MutationTable { records }
    }
}

impl<'a> IntoIterator for &'a MutationTable {
    type Item = &'a MutationRecord;
    type IntoIter = std::slice::Iter<'a, MutationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl MutationTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MutationRecord> {
        self.records.iter()
    }

    /// `(chrom, start)` of every row, in table order.
    pub fn positions(&self) -> Vec<(String, u32)> {
        self.records
            .iter()
            .map(|r| (r.chrom.clone(), r.start))
            .collect()
    }

    /// Merge several tables into one, preserving their order.
    pub fn concat<I: IntoIterator<Item = MutationTable>>(tables: I) -> MutationTable {
        MutationTable {
            records: tables.into_iter().flat_map(|t| t.records).collect(),
        }
    }

    ///
    /// Write the table tab-delimited, one mutation per line, no header.
    ///
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for record in &self.records {
            writeln!(writer, "{}", record.as_string())?;
        }
        writer.flush()
    }

    ///
    /// Write the table to disk; gzipped if the path ends in `.gz`.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn write_tsv<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        let mut writer = get_dynamic_writer(path)
            .map_err(|e| SimulationError::FileReadError(format!("{}: {}", path.display(), e)))?;
        self.write_to(&mut writer)?;
        Ok(())
    }
}

fn parse_record(line: &str, line_num: usize) -> Result<MutationRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(SimulationError::InvalidInput(format!(
            "Line {} has {} fields, expected at least 3",
            line_num,
            fields.len()
        )));
    }

    let coordinate = |value: &str, what: &str| -> Result<u32> {
        value.trim().parse().map_err(|_| {
            SimulationError::InvalidInput(format!("Invalid {} on line {}: {:?}", what, line_num, value))
        })
    };

    let label = match fields.get(3).map(|s| s.trim()) {
        Some(s) if !s.is_empty() => Some(s.parse::<MutationLabel>()?),
        _ => None,
    };
    let ins = fields
        .get(4)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if label == Some(MutationLabel::Insertion) && ins.is_none() {
        return Err(SimulationError::InvalidInput(format!(
            "INS row without an inserted sequence on line {}",
            line_num
        )));
    }

    Ok(MutationRecord {
        chrom: fields[0].to_string(),
        start: coordinate(fields[1], "start")?,
        end: coordinate(fields[2], "end")?,
        label,
        ins,
    })
}

impl MutationTable {
    ///
    /// Read a table previously written by [MutationTable::write_to].
    /// Blank lines and `#` comments are skipped.
    ///
    pub fn from_reader<B: BufRead>(reader: B) -> Result<Self> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            records.push(parse_record(&line, index + 1)?);
        }

        Ok(MutationTable { records })
    }
}

impl TryFrom<&Path> for MutationTable {
    type Error = SimulationError;

    fn try_from(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)
            .map_err(|e| SimulationError::FileReadError(format!("{}: {}", path.display(), e)))?;
        MutationTable::from_reader(reader)
    }
}

impl TryFrom<&str> for MutationTable {
    type Error = SimulationError;

    /// `-` reads from stdin.
    fn try_from(value: &str) -> Result<Self> {
        let reader = get_dynamic_reader_w_stdin(value)
            .map_err(|e| SimulationError::FileReadError(format!("{}: {}", value, e)))?;
        MutationTable::from_reader(reader)
    }
}

/// Sample `n` distinct regions uniformly at random, in sampling order.
fn sample_regions<'a, R: Rng + ?Sized>(
    regions: &'a RegionSet,
    n: usize,
    rng: &mut R,
) -> Result<Vec<&'a Region>> {
    if n > regions.len() {
        return Err(SimulationError::InvalidInput(format!(
            "Cannot sample {} mutations from {} regions",
            n,
            regions.len()
        )));
    }

    Ok(index::sample(rng, regions.len(), n)
        .into_iter()
        .map(|i| &regions.regions[i])
        .collect())
}

///
/// Generate a table of insertions.
///
/// Each sampled region yields an insertion at its integer midpoint
/// `(start + end) / 2`, spanning one base, with a random inserted sequence.
///
/// # Arguments
/// - regions: candidate regions
/// - candidate_lengths: insertion lengths to choose from
/// - n: number of insertions, at most `regions.len()`
/// - rng: random source
pub fn generate_insertions<R: Rng + ?Sized>(
    regions: &RegionSet,
    candidate_lengths: &[u32],
    n: usize,
    rng: &mut R,
) -> Result<MutationTable> {
    validate_lengths(candidate_lengths)?;
    let sampled = sample_regions(regions, n, rng)?;

    let mut records = Vec::with_capacity(n);
    for region in sampled {
        let ins = random_insertion(candidate_lengths, rng)?;
        let start = region.mid_point();
        records.push(MutationRecord {
            chrom: region.chr.clone(),
            start,
            end: start.saturating_add(1),
            label: Some(MutationLabel::Insertion),
            ins: Some(ins),
        });
    }

    Ok(MutationTable { records })
}

///
/// Generate a table of deletions.
///
/// Each sampled region yields a deletion starting at the region start whose
/// size is drawn, with replacement, from `candidate_lengths`.
///
/// # Arguments
/// - regions: candidate regions
/// - candidate_lengths: deletion sizes to choose from
/// - n: number of deletions, at most `regions.len()`
/// - rng: random source
pub fn generate_deletions<R: Rng + ?Sized>(
    regions: &RegionSet,
    candidate_lengths: &[u32],
    n: usize,
    rng: &mut R,
) -> Result<MutationTable> {
    validate_lengths(candidate_lengths)?;
    let sampled = sample_regions(regions, n, rng)?;

    let mut records = Vec::with_capacity(n);
    for region in sampled {
        let size = choose_length(candidate_lengths, rng)?;
        let end = region.start.checked_add(size).ok_or_else(|| {
            SimulationError::InvalidInput(format!(
                "Deletion of {} bp at {}:{} overflows coordinates",
                size, region.chr, region.start
            ))
        })?;
        records.push(MutationRecord {
            chrom: region.chr.clone(),
            start: region.start,
            end,
            label: Some(MutationLabel::Deletion),
            ins: None,
        });
    }

    Ok(MutationTable { records })
}

///
/// Generate a table of point mutations: each sampled region becomes a
/// zero-width row at its start. SNP rows carry no label.
///
/// # Arguments
/// - regions: candidate regions
/// - n: number of SNPs, at most `regions.len()`
/// - rng: random source
pub fn generate_snps<R: Rng + ?Sized>(
    regions: &RegionSet,
    n: usize,
    rng: &mut R,
) -> Result<MutationTable> {
    let records = sample_regions(regions, n, rng)?
        .into_iter()
        .map(|region| MutationRecord {
            chrom: region.chr.clone(),
            start: region.start,
            end: region.start,
            label: None,
            ins: None,
        })
        .collect();

    Ok(MutationTable { records })
}
