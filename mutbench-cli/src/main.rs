mod evaluate;
mod fraction;
mod generate;
mod spiked;
mod vaf;

use anyhow::Result;
use clap::Command;
use env_logger::Env;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "mutbench";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Spike synthetic mutations into sequencing data and measure how reproducibly a variant caller finds them across diluted replicates.")
        .subcommand_required(true)
        .subcommand(generate::cli::create_generate_cli())
        .subcommand(vaf::cli::create_vaf_cli())
        .subcommand(fraction::cli::create_fraction_cli())
        .subcommand(evaluate::cli::create_evaluate_cli())
        .subcommand(spiked::cli::create_spiked_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // SPIKE-IN TABLES
        //
        Some((generate::cli::GENERATE_CMD, matches)) => {
            generate::handlers::run_generate(matches)?;
        }

        //
        // VAF SIMULATION
        //
        Some((vaf::cli::VAF_CMD, matches)) => {
            vaf::handlers::run_vaf(matches)?;
        }

        //
        // PURITY -> DOWNSAMPLING FRACTION
        //
        Some((fraction::cli::FRACTION_CMD, matches)) => {
            fraction::handlers::run_fraction(matches)?;
        }

        //
        // REPRODUCIBILITY
        //
        Some((evaluate::cli::EVALUATE_CMD, matches)) => {
            evaluate::handlers::run_evaluate(matches)?;
        }

        //
        // SPIKED TRUTH
        //
        Some((spiked::cli::SPIKED_CMD, matches)) => {
            spiked::handlers::run_spiked(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
