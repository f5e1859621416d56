use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use ribodep_bins::{BinBuilder, DispatchError, dispatch_ordered};
use ribodep_core::models::Bin;
use ribodep_core::utils::layout_from_path;

use crate::config::ScanConfig;
use crate::depletion::{BinCounts, DepletionRecord, Normalization};
use crate::errors::ScanError;
use crate::reads::{BamReadSource, ReadSource, count_valid_reads, total_reads};

/// Thresholds applied to every read while counting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadFilter {
    pub max_soft_clip: u32,
    pub min_fraction: f64,
}

///
/// Count control and depleted reads for every bin of every chunk.
///
/// `open_sources` is called once per chunk, inside the worker, so each worker
/// reads through its own handles. Results come back in chunk order.
///
pub fn count_bins<S, F>(
    chunks: Vec<Vec<Bin>>,
    threads: usize,
    filter: ReadFilter,
    open_sources: F,
    progress: &ProgressBar,
) -> Result<Vec<BinCounts>, DispatchError<ScanError>>
where
    S: ReadSource,
    F: Fn() -> Result<(S, S), ScanError> + Sync,
{
    let per_chunk = dispatch_ordered(
        chunks,
        threads,
        |_, bins: Vec<Bin>| -> Result<Vec<BinCounts>, ScanError> {
            let (mut con, mut del) = open_sources()?;

            let mut counts = Vec::with_capacity(bins.len());
            for bin in bins {
                let n_con =
                    count_valid_reads(&mut con, &bin, filter.max_soft_clip, filter.min_fraction)?;
                let n_del =
                    count_valid_reads(&mut del, &bin, filter.max_soft_clip, filter.min_fraction)?;
                progress.inc(1);
                counts.push(BinCounts { bin, n_con, n_del });
            }
            Ok(counts)
        },
    )?;

    Ok(per_chunk.into_iter().flatten().collect())
}

/// Depletion scan over an rRNA annotation, comparing a control and a depleted BAM.
pub struct Scanner {
    config: ScanConfig,
    threads: usize,
}

impl Scanner {
    pub fn new(config: ScanConfig, threads: usize) -> Self {
        Scanner { config, threads }
    }

    fn normalization(&self) -> Result<Normalization> {
        let ref_reads = match self.config.ref_reads {
            Some(n) => n,
            None => total_reads(&self.config.control_bam())
                .context("Failed to count reads in control BAM")?,
        };
        let del_reads = match self.config.del_reads {
            Some(n) => n,
            None => total_reads(&self.config.depleted_bam())
                .context("Failed to count reads in depleted BAM")?,
        };
        if ref_reads == 0 || del_reads == 0 {
            anyhow::bail!("Library size is zero (control: {ref_reads}, depleted: {del_reads})");
        }

        info!("Library sizes: control {}, depleted {}", ref_reads, del_reads);

        Ok(Normalization {
            ref_reads,
            del_reads,
            ref_rrna_ratio: self.config.ref_rrna_ratio,
            del_rrna_ratio: self.config.del_rrna_ratio,
            bin_length: self.config.bin_length,
        })
    }

    /// Run the scan and return the depletion records in annotation order.
    pub fn scan(&self) -> Result<Vec<DepletionRecord>> {
        let normalization = self.normalization()?;

        let layout = layout_from_path(&self.config.rrna_interval);
        let chunks = BinBuilder::new(&self.config.rrna_interval, layout)
            .with_bin_length(self.config.bin_length)
            .with_step(self.config.step)
            .interval_batch(self.threads)
            .with_context(|| format!("Failed to tile {:?}", self.config.rrna_interval))?;

        let n_bins: usize = chunks.iter().map(|c| c.len()).sum();
        let progress = ProgressBar::new(n_bins as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bins")?,
        );

        let control = self.config.control_bam();
        let depleted = self.config.depleted_bam();
        let filter = ReadFilter {
            max_soft_clip: self.config.max_soft_clip,
            min_fraction: self.config.min_overlap_fraction,
        };

        let counts = count_bins(
            chunks,
            self.threads,
            filter,
            || Ok((BamReadSource::open(&control)?, BamReadSource::open(&depleted)?)),
            &progress,
        )?;
        progress.finish_and_clear();

        Ok(counts
            .into_iter()
            .map(|c| normalization.record(c))
            .collect())
    }

    /// Run the scan and write one tab-separated row per bin to the configured output.
    pub fn run(&self) -> Result<usize> {
        let records = self.scan()?;

        let file = File::create(&self.config.output)
            .with_context(|| format!("Failed to create {:?}", self.config.output))?;
        let mut writer = BufWriter::new(file);
        for record in records.iter() {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;

        info!(
            "Wrote {} bins to {}",
            records.len(),
            self.config.output.display()
        );

        Ok(records.len())
    }
}
