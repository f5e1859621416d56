use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use ribodep_core::utils::{get_dynamic_reader, layout_from_path};
use ribodep_overlaprs::IntervalIndex;
use ribodep_sim::consts::DEFAULT_FREQUENCY_CUTOFF;
use ribodep_sim::filter_snps;

pub fn run_snpfilter(matches: &ArgMatches) -> Result<()> {
    let bed = matches.get_one::<String>("bed").expect("--bed is required");
    let snps = matches
        .get_one::<String>("snps")
        .expect("--snps is required");
    let cutoff = *matches.get_one::<f64>("cutoff").unwrap_or(&DEFAULT_FREQUENCY_CUTOFF);
    let output = matches
        .get_one::<String>("output")
        .expect("--output has a default");

    if !(0.0..0.5).contains(&cutoff) {
        anyhow::bail!("--cutoff must be in [0, 0.5), got {}", cutoff);
    }

    let bed = Path::new(bed);
    let intervals = IntervalIndex::from_annotation_file(bed, layout_from_path(bed))
        .with_context(|| format!("Failed to load intervals from {}", bed.display()))?;

    let reader = get_dynamic_reader(Path::new(snps))?;
    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = BufWriter::new(file);

    let kept = filter_snps(reader, &mut writer, &intervals, cutoff)
        .with_context(|| format!("Failed to filter SNPs from {}", snps))?;
    writer.flush()?;

    eprintln!("Kept {} SNPs, written to {}", kept, output);

    Ok(())
}
