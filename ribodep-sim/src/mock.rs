use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use ribodep_bins::random_windows_by_chrom;
use ribodep_core::models::Bin;
use ribodep_guides::genome::read_fasta;
use ribodep_guides::mining::random_guide_id;

use crate::config::MockConfig;
use crate::snps::SnpDb;
use crate::variant::apply_variant;

/// `{chrom}_{start}_{end}_{1000..=3000}{8 hex digits}`
pub fn mock_read_id<R: Rng + ?Sized>(chrom: &str, window: &Bin, rng: &mut R) -> String {
    random_guide_id(&format!("{}_{}_{}", chrom, window.start, window.end), rng)
}

///
/// Emit `copies` reads for one window.
///
/// Without SNPs every copy is the reference read. Otherwise one SNP position and
/// one of its alleles are drawn, and each copy carries that allele with
/// probability equal to its frequency.
///
pub fn simulate_window<R: Rng + ?Sized>(
    chrom: &str,
    window: &Bin,
    read: &str,
    snps: Option<&SnpDb>,
    copies: u32,
    rng: &mut R,
) -> Vec<(String, String)> {
    let mut variant = None;
    if let Some(db) = snps {
        let positions = db.snps_in_region(chrom, window.start, window.end);
        if let Some(&pos) = positions.choose(&mut *rng) {
            variant = db
                .alleles(chrom, pos)
                .choose(&mut *rng)
                .map(|info| (pos, info.clone()));
        }
    }

    let mut reads = Vec::with_capacity(copies as usize);
    for _ in 0..copies {
        let seq = match &variant {
            Some((pos, info)) if rng.random::<f64>() < info.freq => {
                apply_variant(read, window.start, *pos, info)
            }
            _ => read.to_string(),
        };
        reads.push((mock_read_id(chrom, window, rng), seq));
    }
    reads
}

///
/// Simulates reads from random windows over the rRNA annotation.
///
/// Genome record names have every `chr` removed before they are matched to the
/// window chromosomes. All randomness comes from one generator, seeded from the
/// config when a seed is given.
///
pub struct MockSimulator {
    config: MockConfig,
    snps: Option<SnpDb>,
    rng: StdRng,
}

impl MockSimulator {
    pub fn new(config: MockConfig) -> anyhow::Result<Self> {
        let snps = match (&config.snp_db, config.add_snp) {
            (Some(path), true) => Some(SnpDb::from_file(path)?),
            _ => None,
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(MockSimulator { config, snps, rng })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Write the simulated reads as FASTA. Returns the number of reads written.
    pub fn simulate<W: Write>(&mut self, writer: &mut W) -> anyhow::Result<usize> {
        let windows = random_windows_by_chrom(
            &self.config.rrna_interval,
            self.config.window_length,
            &mut self.rng,
        )
        .with_context(|| {
            format!(
                "Failed to sample windows from {}",
                self.config.rrna_interval.display()
            )
        })?;

        let records = read_fasta(&self.config.genome)
            .with_context(|| format!("Failed to read genome {}", self.config.genome.display()))?;

        let mut written = 0;
        for record in records {
            let chrom = record.name.replace("chr", "");
            let Some(chrom_windows) = windows.get(&chrom) else {
                continue;
            };

            for window in chrom_windows {
                let end = (window.end as usize).min(record.sequence.len());
                let start = (window.start as usize).min(end);
                let read = &record.sequence[start..end];

                let reads = simulate_window(
                    &chrom,
                    window,
                    read,
                    self.snps.as_ref(),
                    self.config.n,
                    &mut self.rng,
                );
                for (id, seq) in reads {
                    writeln!(writer, ">{}\n{}", id, seq)?;
                    written += 1;
                }
            }
            debug!("{}: {} windows", chrom, chrom_windows.len());
        }

        info!("Simulated {} reads", written);
        Ok(written)
    }

    /// [`MockSimulator::simulate`] into the configured output file.
    pub fn run(&mut self) -> anyhow::Result<usize> {
        let file = File::create(&self.config.output)
            .with_context(|| format!("Failed to create {}", self.config.output.display()))?;
        let mut writer = BufWriter::new(file);
        let written = self.simulate(&mut writer)?;
        writer.flush()?;
        Ok(written)
    }
}
