use clap::{Command, arg, value_parser};

pub const GENERATE_CMD: &str = "generate";

pub fn create_generate_cli() -> Command {
    Command::new(GENERATE_CMD)
        .about("Generate a spike-in table of random insertions, deletions and/or SNPs.")
        .arg(
            arg!(--regions <REGIONS>)
                .required(true)
                .help("Candidate regions, tab-delimited chrom/start/end (.gz ok)"),
        )
        .arg(
            arg!(--kind <KIND>)
                .required(false)
                .default_value("all")
                .value_parser(["ins", "del", "snp", "all"])
                .help("Mutation type to generate; `all` concatenates one table of each"),
        )
        .arg(
            arg!(-n --number <N>)
                .required(true)
                .value_parser(value_parser!(usize))
                .help("Number of mutations (per kind)"),
        )
        .arg(
            arg!(--lengths <LENGTHS>)
                .required(false)
                .help("Comma-separated candidate indel lengths (default: 1 to 5)"),
        )
        .arg(
            arg!(--seed <SEED>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Seed for the random generator"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout); gzipped when ending in .gz"),
        )
}
