use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::SeedableRng;
use rand::rngs::StdRng;

use ribodep_guides::{
    Genome, MiningParams, PamSpec, mine_guides, read_intended_regions, write_fasta,
};

pub fn run_mine(matches: &ArgMatches) -> Result<()> {
    let genome_path = matches
        .get_one::<String>("genome")
        .expect("--genome is required");
    let regions_path = matches
        .get_one::<String>("regions")
        .expect("--regions is required");
    let pam = matches.get_one::<String>("pam").expect("--pam has a default");
    let output = matches
        .get_one::<String>("output")
        .expect("--output has a default");

    let params = MiningParams {
        guide_length: *matches.get_one::<usize>("length").unwrap_or(&20),
        min_gc: *matches.get_one::<f64>("min-gc").unwrap_or(&30.0),
        max_gc: *matches.get_one::<f64>("max-gc").unwrap_or(&80.0),
    };
    if params.guide_length == 0 {
        anyhow::bail!("--length must be positive");
    }
    if params.min_gc > params.max_gc {
        anyhow::bail!(
            "--min-gc ({}) is greater than --max-gc ({})",
            params.min_gc,
            params.max_gc
        );
    }

    let pam = PamSpec::new(pam)?;
    let genome = Genome::from_fasta(Path::new(genome_path))
        .with_context(|| format!("Failed to load genome {}", genome_path))?;
    let regions = read_intended_regions(Path::new(regions_path))
        .with_context(|| format!("Failed to load intended regions {}", regions_path))?;

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };

    let guides = mine_guides(&regions, &genome, &pam, params, &mut rng)?;

    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = BufWriter::new(file);
    write_fasta(
        &mut writer,
        guides.iter().map(|g| (g.id.as_str(), g.sequence.as_str())),
    )?;
    writer.flush()?;

    eprintln!("Wrote {} candidate guides to {}", guides.len(), output);

    Ok(())
}
