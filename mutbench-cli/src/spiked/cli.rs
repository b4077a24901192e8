use clap::{Command, arg};

pub const SPIKED_CMD: &str = "spiked";

pub fn create_spiked_cli() -> Command {
    Command::new(SPIKED_CMD)
        .about("Recall and precision of calls on generated samples against the spiked mutations.")
        .arg(
            arg!(--truth <TRUTH> ...)
                .required(true)
                .help("Spike-in tables used to generate the samples"),
        )
        .arg(
            arg!(--calls <CALLS> ...)
                .required(true)
                .help("Call tables as SAMPLE=PATH; the purity is the suffix after the last `_` of SAMPLE"),
        )
        .arg(
            arg!(--column <COLUMN>)
                .required(false)
                .default_value("current_filter")
                .value_parser(["current_filter", "new_filter"])
                .help("Filter column whose PASS counts as a call"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
