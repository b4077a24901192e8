use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use mutbench_core::utils::get_dynamic_writer_w_stdout;
use mutbench_eval::{
    CallTableLoader, FilterColumn, SpikedTruth, TsvCallTableLoader, evaluate_spiked,
    summarize_spiked,
};
use mutbench_simulate::MutationTable;

///
/// Split `SAMPLE=PATH`.
///
pub fn parse_sample_path(value: &str) -> Result<(&str, &Path)> {
    match value.split_once('=') {
        Some((sample, path)) if !sample.is_empty() && !path.is_empty() => {
            Ok((sample, Path::new(path)))
        }
        _ => anyhow::bail!("Expected SAMPLE=PATH, got {:?}", value),
    }
}

pub fn run_spiked(matches: &ArgMatches) -> Result<()> {
    let truth_paths = matches
        .get_many::<String>("truth")
        .expect("--truth is required");
    let calls = matches
        .get_many::<String>("calls")
        .expect("--calls is required");
    let column: FilterColumn = matches
        .get_one::<String>("column")
        .expect("--column has a default")
        .parse()?;
    let output = matches.get_one::<String>("output");

    let truth_tables = truth_paths
        .map(|p| {
            MutationTable::try_from(p.as_str())
                .with_context(|| format!("Failed to read spike-in table {}", p))
        })
        .collect::<Result<Vec<_>>>()?;
    let truth = SpikedTruth::from_tables(&truth_tables);
    info!("{} spiked positions", truth.len());

    let loader = TsvCallTableLoader::default();
    let mut results = BTreeMap::new();
    for value in calls {
        let (sample, path) = parse_sample_path(value)?;
        let table = loader
            .load(path)
            .with_context(|| format!("Failed to load call table {:?}", path))?;
        results.insert(sample.to_string(), evaluate_spiked(&table, &truth, column));
    }

    let summary = summarize_spiked(&results)?;

    let mut writer = get_dynamic_writer_w_stdout(output.map(String::as_str))?;
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    fn test_parse_sample_path() {
        let (sample, path) = parse_sample_path("GEN_50=/data/gen_50.maf").unwrap();
        assert_eq!(sample, "GEN_50");
        assert_eq!(path, Path::new("/data/gen_50.maf"));

        assert!(parse_sample_path("GEN_50").is_err());
        assert!(parse_sample_path("=x.maf").is_err());
    }

    #[rstest]
    fn test_run_spiked() {
        let calls = std::env::current_dir().unwrap().join("../tests/data/calls");
        let dir = tempdir().unwrap();
        let truth = dir.path().join("truth.tsv");
        std::fs::write(&truth, "1\t1500\t1500\n2\t9050\t9050\n9\t10\t10\n").unwrap();
        let output = dir.path().join("spiked.json");

        let p100 = format!("GEN_100={}", calls.join("P1_100.maf").display());
        let p25 = format!("GEN_25={}", calls.join("P1_25.maf").display());

        let matches = build_parser()
            .try_get_matches_from([
                "mutbench",
                "spiked",
                "--truth",
                truth.to_str().unwrap(),
                "--calls",
                p100.as_str(),
                "--calls",
                p25.as_str(),
                "--output",
                output.to_str().unwrap(),
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        run_spiked(sub).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();

        assert_eq!(summary[0]["purity"], "25");
        assert_eq!(summary[0]["TP"], 2);
        assert_eq!(summary[0]["FP"], 1);
        assert_eq!(summary[0]["All_TP"], 3);

        assert_eq!(summary[1]["purity"], "100");
        assert_eq!(summary[1]["TP"], 1);
        assert_eq!(summary[1]["FN"], 1);
        assert_eq!(summary[1]["recall"], 0.5);
    }
}
