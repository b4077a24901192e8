use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use mutbench_core::utils::get_dynamic_writer_w_stdout;
use mutbench_simulate::{
    DepthSource, MutationTable, SamtoolsDepth, VafObservation, create_rng,
    simulate_observations, simulate_observations_parallel,
};

/// Ticks a progress bar once per depth query.
struct ProgressDepth<'a, D> {
    inner: D,
    progress: &'a ProgressBar,
}

impl<D: DepthSource> DepthSource for ProgressDepth<'_, D> {
    fn depth(&self, chrom: &str, position: u32) -> mutbench_simulate::Result<u32> {
        let depth = self.inner.depth(chrom, position);
        self.progress.inc(1);
        depth
    }
}

pub fn write_observations<W: Write>(observations: &[VafObservation], writer: &mut W) -> Result<()> {
    writeln!(writer, "chrom\tposition\tdepth\tvaf")?;
    for observation in observations {
        writeln!(writer, "{}", observation.as_string())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_vaf(matches: &ArgMatches) -> Result<()> {
    let mutations = matches
        .get_one::<String>("mutations")
        .expect("--mutations is required");
    let bam = matches.get_one::<String>("bam").expect("--bam is required");
    let expected_vaf = *matches
        .get_one::<f64>("expected-vaf")
        .expect("--expected-vaf is required");
    let tool = matches
        .get_one::<String>("tool")
        .expect("--tool has a default");
    let seed = matches.get_one::<u64>("seed").copied();
    let threads = matches.get_one::<usize>("threads").copied();
    let timeout = matches.get_one::<u64>("timeout").copied();
    let output = matches.get_one::<String>("output");

    let table = MutationTable::try_from(mutations.as_str())
        .with_context(|| format!("Failed to read spike-in table {}", mutations))?;
    let positions = table.positions();

    let mut depth = SamtoolsDepth::new(Path::new(bam)).with_tool(tool);
    if let Some(secs) = timeout {
        depth = depth.with_timeout(Duration::from_secs(secs));
    }

    let pb = ProgressBar::new(positions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
    );
    pb.set_message("Querying depth");

    let source = ProgressDepth {
        inner: &depth,
        progress: &pb,
    };
    let mut rng = create_rng(seed);

    let observations = match threads {
        Some(n) if n > 1 => {
            info!("Querying {} positions on {} threads", positions.len(), n);
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| simulate_observations_parallel(&positions, expected_vaf, &source, &mut rng))?
        }
        _ => simulate_observations(&positions, expected_vaf, &source, &mut rng)?,
    };

    pb.finish_with_message("Done");

    let uncovered = observations.iter().filter(|o| o.depth == 0).count();
    if uncovered > 0 {
        info!("{} of {} positions have no coverage", uncovered, observations.len());
    }

    let mut writer = get_dynamic_writer_w_stdout(output.map(String::as_str))?;
    write_observations(&observations, &mut writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_progress_depth_counts_queries() {
        let depths = HashMap::from([(("1".to_string(), 100u32), 30u32)]);
        let pb = ProgressBar::hidden();
        let source = ProgressDepth {
            inner: &depths,
            progress: &pb,
        };

        assert_eq!(source.depth("1", 100).unwrap(), 30);
        assert_eq!(source.depth("2", 5).unwrap(), 0);
        assert_eq!(pb.position(), 2);
    }

    #[rstest]
    fn test_write_observations() {
        let observations = vec![
            VafObservation {
                chrom: "1".to_string(),
                position: 100,
                depth: 20,
                vaf: 0.25,
            },
            VafObservation {
                chrom: "2".to_string(),
                position: 7,
                depth: 0,
                vaf: 0.0,
            },
        ];

        let mut buffer = Vec::new();
        write_observations(&observations, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "chrom\tposition\tdepth\tvaf");
        assert_eq!(lines[1], observations[0].as_string());
    }
}
