use anyhow::Result;
use clap::ArgMatches;
use log::warn;

use mutbench_simulate::purity_to_fraction;

pub fn run_fraction(matches: &ArgMatches) -> Result<()> {
    let purity_new = *matches
        .get_one::<f64>("purity-new")
        .expect("--purity-new is required");
    let purity = *matches.get_one::<f64>("purity").expect("--purity is required");
    let ploidy = *matches.get_one::<u32>("ploidy").expect("--ploidy is required");

    let fraction = purity_to_fraction(purity_new, purity, ploidy);
    if !fraction.is_finite() {
        warn!(
            "Fraction is undefined for purity {} and ploidy {}",
            purity, ploidy
        );
    }

    println!("{}", fraction);

    Ok(())
}
