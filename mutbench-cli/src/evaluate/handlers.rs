use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use mutbench_core::utils::get_dynamic_writer_w_stdout;
use mutbench_eval::{
    CallTableLoader, EvaluationConfig, EvaluationReport, MutationCallTable, TsvCallTableLoader,
    evaluate_tables,
};

fn load_with_progress(
    paths: &BTreeMap<String, PathBuf>,
    loader: &TsvCallTableLoader,
    pb: &ProgressBar,
) -> Result<BTreeMap<String, MutationCallTable>> {
    let mut tables = BTreeMap::new();
    for (key, path) in paths {
        pb.set_message(key.clone());
        let table = loader
            .load(path)
            .with_context(|| format!("Failed to load call table {:?}", path))?;
        tables.insert(key.clone(), table);
        pb.inc(1);
    }
    Ok(tables)
}

pub fn evaluate_config(config: &EvaluationConfig) -> Result<EvaluationReport> {
    let loader = TsvCallTableLoader::new(config.columns.clone());

    let pb = ProgressBar::new((config.reference.len() + config.replicates.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
    );

    let references = load_with_progress(&config.reference, &loader, &pb)?;
    let replicates = load_with_progress(&config.replicates, &loader, &pb)?;
    pb.finish_with_message("Loaded call tables");

    let report = evaluate_tables(config, &references, &replicates)?;

    for band in &report.purity {
        info!(
            "purity {}: mean reproducibility {:.3} (n={})",
            band.summary.purity,
            band.summary.mean,
            band.summary.replicates.len()
        );
    }

    Ok(report)
}

pub fn run_evaluate(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .expect("--config is required");
    let output = matches.get_one::<String>("output");

    let config = EvaluationConfig::from_file(Path::new(config_path))?;
    let report = evaluate_config(&config)?;

    let mut writer = get_dynamic_writer_w_stdout(output.map(String::as_str))?;
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
