use clap::{Arg, Command, arg, value_parser};

use mutbench_simulate::consts::DEFAULT_DEPTH_TOOL;

pub const VAF_CMD: &str = "vaf";

pub fn create_vaf_cli() -> Command {
    Command::new(VAF_CMD)
        .about("Simulate the VAF each spiked mutation would show given the read depth of an alignment.")
        .arg(
            arg!(--mutations <MUTATIONS>)
                .required(true)
                .help("Spike-in table written by `generate` (`-` for stdin)"),
        )
        .arg(
            arg!(--bam <BAM>)
                .required(true)
                .help("Indexed alignment file to read depth from"),
        )
        .arg(
            Arg::new("expected-vaf")
                .long("expected-vaf")
                .required(true)
                .value_parser(value_parser!(f64))
                .help("Binomial success probability, between 0 and 1"),
        )
        .arg(
            arg!(--tool <TOOL>)
                .required(false)
                .default_value(DEFAULT_DEPTH_TOOL)
                .help("Depth tool executable"),
        )
        .arg(
            arg!(--seed <SEED>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Seed for the random generator"),
        )
        .arg(
            arg!(--threads <THREADS>)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Run depth queries on this many threads"),
        )
        .arg(
            arg!(--timeout <SECS>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Kill a depth query after this many seconds"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output TSV path (default: stdout)"),
        )
}
