use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use ribodep_scan::{ScanConfig, Scanner};

pub fn run_deprate(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .expect("--config is required");
    let threads = *matches.get_one::<usize>("threads").unwrap_or(&1);

    let config = ScanConfig::from_file(Path::new(config_path))
        .with_context(|| format!("Invalid scan configuration {}", config_path))?;
    let output = config.output.clone();

    let scanner = Scanner::new(config, threads);
    let rows = scanner.run()?;

    eprintln!("Wrote {} bins to {}", rows, output.display());

    Ok(())
}
