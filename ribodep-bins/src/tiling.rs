use std::path::{Path, PathBuf};

use log::info;
use ribodep_core::models::{Bin, Region};
use ribodep_core::utils::{AnnotationLayout, read_annotation_file};

use crate::consts::{DEFAULT_BIN_LENGTH, DEFAULT_STEP};
use crate::errors::BinError;
use crate::partition::partition_for_workers;

///
/// Tile a region into fixed-length, overlapping bins.
///
/// Bins start at `region.start` and advance by `step` while the bin start is
/// before `region.end`. Every bin is `bin_length` wide, so the last bins may
/// extend past the region end.
///
/// # Arguments
///
/// - region: the region to tile
/// - bin_length: width of each bin
/// - step: distance between consecutive bin starts
///
pub fn tile_fixed(region: &Region, bin_length: u32, step: u32) -> Result<Vec<Bin>, BinError> {
    if bin_length == 0 {
        return Err(BinError::InvalidConfig("bin length must be positive".to_string()));
    }
    if step == 0 {
        return Err(BinError::InvalidConfig("step must be positive".to_string()));
    }

    let mut bins = Vec::new();
    let mut bin_start = region.start;

    while bin_start < region.end {
        bins.push(Bin {
            chr: region.chr.clone(),
            start: bin_start,
            end: bin_start.saturating_add(bin_length),
        });
        bin_start = match bin_start.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(bins)
}

/// Tiles every record of an annotation file and splits the bins across workers.
#[derive(Debug, Clone)]
pub struct BinBuilder {
    pub annotation: PathBuf,
    pub layout: AnnotationLayout,
    pub bin_length: u32,
    pub step: u32,
}

impl BinBuilder {
    pub fn new(annotation: &Path, layout: AnnotationLayout) -> Self {
        BinBuilder {
            annotation: annotation.to_path_buf(),
            layout,
            bin_length: DEFAULT_BIN_LENGTH,
            step: DEFAULT_STEP,
        }
    }

    pub fn with_bin_length(mut self, bin_length: u32) -> Self {
        self.bin_length = bin_length;
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// All bins of all records, in file order.
    pub fn bins(&self) -> Result<Vec<Bin>, BinError> {
        let regions = read_annotation_file(&self.annotation, self.layout)?;

        let mut bins = Vec::new();
        for region in regions.iter() {
            bins.extend(tile_fixed(region, self.bin_length, self.step)?);
        }

        info!(
            "Tiled {} records into {} bins ({}bp, step {})",
            regions.len(),
            bins.len(),
            self.bin_length,
            self.step
        );

        Ok(bins)
    }

    /// Bins partitioned into exactly `worker_count` contiguous chunks.
    pub fn interval_batch(&self, worker_count: usize) -> Result<Vec<Vec<Bin>>, BinError> {
        let bins = self.bins()?;
        partition_for_workers(bins, worker_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn starts_ends(bins: &[Bin]) -> Vec<(u32, u32)> {
        bins.iter().map(|b| (b.start, b.end)).collect()
    }

    #[rstest]
    fn test_tile_fixed_is_not_clipped() {
        let region = Region::new("chr1", 0, 250).unwrap();
        let bins = tile_fixed(&region, 100, 50).unwrap();
        assert_eq!(
            starts_ends(&bins),
            vec![(0, 100), (50, 150), (100, 200), (150, 250), (200, 300)]
        );
        assert!(bins.iter().all(|b| b.chr == "chr1"));
    }

    #[rstest]
    #[case(0, 230, 100, 50, 200)]
    #[case(10, 233, 100, 40, 210)]
    #[case(5, 6, 30, 7, 5)]
    fn test_tile_end_off_step_grid(
        #[case] start: u32,
        #[case] end: u32,
        #[case] bin_length: u32,
        #[case] step: u32,
        #[case] last_start: u32,
    ) {
        let region = Region::new("chr1", start, end).unwrap();
        let bins = tile_fixed(&region, bin_length, step).unwrap();

        let last = bins.last().unwrap();
        assert_eq!(last.start, last_start);
        assert!(last.start < end && last.start + step >= end);
        assert_eq!(last.end, last_start + bin_length);
        assert!(bins.iter().all(|b| (b.start - start) % step == 0));
        assert_eq!(bins.len() as u32, (last_start - start) / step + 1);
    }

    #[rstest]
    fn test_tile_empty_region() {
        let region = Region::new("chr1", 10, 10).unwrap();
        assert!(tile_fixed(&region, 100, 50).unwrap().is_empty());
    }

    #[rstest]
    #[case(0, 50)]
    #[case(100, 0)]
    fn test_tile_rejects_zero(#[case] bin_length: u32, #[case] step: u32) {
        let region = Region::new("chr1", 0, 250).unwrap();
        assert!(matches!(
            tile_fixed(&region, bin_length, step),
            Err(BinError::InvalidConfig(_))
        ));
    }

    #[rstest]
    fn test_bin_builder_batches() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "@SQ header").unwrap();
        writeln!(file, "chr1\t0\t100").unwrap();
        writeln!(file, "chr2\t1000\t1200").unwrap();

        let builder = BinBuilder::new(file.path(), AnnotationLayout::Bed);
        let bins = builder.bins().unwrap();
        assert_eq!(bins.len(), 2 + 4);

        let batches = builder.interval_batch(4).unwrap();
        assert_eq!(batches.len(), 4);
        let flattened: Vec<Bin> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, bins);
    }
}
