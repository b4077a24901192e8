use clap::{Command, arg};

pub const EVALUATE_CMD: &str = "evaluate";

pub fn create_evaluate_cli() -> Command {
    Command::new(EVALUATE_CMD)
        .about("Score diluted replicates against the calls of their undiluted sample.")
        .arg(
            arg!(--config <CONFIG>)
                .required(true)
                .help("YAML evaluation config (reference and replicate tables, filters, purities)"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
