use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use ribodep_sim::{MockConfig, MockSimulator};

pub fn run_mock(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .expect("--config is required");

    let config = MockConfig::from_file(Path::new(config_path))
        .with_context(|| format!("Invalid mock configuration {}", config_path))?;
    let output = config.output.clone();

    let mut simulator = MockSimulator::new(config)?;
    if let Some(seed) = matches.get_one::<u64>("seed") {
        simulator = simulator.with_seed(*seed);
    }

    let written = simulator.run()?;
    eprintln!("Wrote {} reads to {}", written, output.display());

    Ok(())
}
