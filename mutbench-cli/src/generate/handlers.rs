use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use mutbench_core::models::RegionSet;
use mutbench_core::utils::get_dynamic_writer_w_stdout;
use mutbench_simulate::consts::DEFAULT_INDEL_LENGTHS;
use mutbench_simulate::{
    MutationTable, create_rng, generate_deletions, generate_insertions, generate_snps,
};

///
/// Parse `1,2,3` into candidate lengths.
///
pub fn parse_lengths(value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("Invalid length {:?} in --lengths", s))
        })
        .collect()
}

pub fn run_generate(matches: &ArgMatches) -> Result<()> {
    let regions_path = matches
        .get_one::<String>("regions")
        .expect("--regions is required");
    let kind = matches
        .get_one::<String>("kind")
        .expect("--kind has a default");
    let n = *matches.get_one::<usize>("number").expect("-n is required");
    let lengths = matches.get_one::<String>("lengths");
    let seed = matches.get_one::<u64>("seed").copied();
    let output = matches.get_one::<String>("output");

    let regions = RegionSet::try_from(regions_path.as_str())
        .with_context(|| format!("Failed to load regions from {}", regions_path))?;
    let lengths = match lengths {
        Some(value) => parse_lengths(value)?,
        None => DEFAULT_INDEL_LENGTHS.to_vec(),
    };
    let mut rng = create_rng(seed);

    info!(
        "Generating {} x {} from {} candidate regions",
        n,
        kind,
        regions.len()
    );

    let table = match kind.as_str() {
        "ins" => generate_insertions(&regions, &lengths, n, &mut rng)?,
        "del" => generate_deletions(&regions, &lengths, n, &mut rng)?,
        "snp" => generate_snps(&regions, n, &mut rng)?,
        "all" => MutationTable::concat([
            generate_insertions(&regions, &lengths, n, &mut rng)?,
            generate_deletions(&regions, &lengths, n, &mut rng)?,
            generate_snps(&regions, n, &mut rng)?,
        ]),
        other => anyhow::bail!("Unknown mutation kind: {}", other),
    };

    let mut writer = get_dynamic_writer_w_stdout(output.map(String::as_str))?;
    table.write_to(&mut writer)?;

    info!("Wrote {} mutations", table.len());

    Ok(())
}
