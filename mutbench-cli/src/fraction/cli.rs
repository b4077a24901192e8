use clap::{Arg, Command, value_parser};

pub const FRACTION_CMD: &str = "fraction";

pub fn create_fraction_cli() -> Command {
    Command::new(FRACTION_CMD)
        .about("Read fraction to keep when downsampling a sample of known purity and ploidy to a lower purity.")
        .arg(
            Arg::new("purity-new")
                .long("purity-new")
                .required(true)
                .value_parser(value_parser!(f64))
                .help("Target purity"),
        )
        .arg(
            Arg::new("purity")
                .long("purity")
                .required(true)
                .value_parser(value_parser!(f64))
                .help("Purity of the original sample"),
        )
        .arg(
            Arg::new("ploidy")
                .long("ploidy")
                .required(true)
                .value_parser(value_parser!(u32))
                .help("Tumor ploidy"),
        )
}
