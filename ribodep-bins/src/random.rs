use std::collections::HashMap;
use std::path::Path;

use log::debug;
use rand::Rng;
use ribodep_core::models::{Bin, Region};
use ribodep_core::utils::{AnnotationLayout, read_annotation_file};

use crate::consts::{DEFAULT_COVERAGE_FRACTION, MIN_WINDOW_LENGTH};
use crate::errors::BinError;

///
/// Draw randomly placed windows from a region.
///
/// A region shorter than `window_length` is returned as its only window. Otherwise
/// `len / (window_length * coverage_fraction)` (rounded half to even) starts are
/// drawn uniformly from `[region.start, region.end]`, each window is clipped to
/// the region end, and windows shorter than [`MIN_WINDOW_LENGTH`] are dropped.
///
/// # Arguments
///
/// - region: the region to sample from
/// - window_length: nominal window width
/// - coverage_fraction: controls how many windows are drawn
/// - rng: source of randomness
///
pub fn sample_random_windows<R: Rng + ?Sized>(
    region: &Region,
    window_length: u32,
    coverage_fraction: f64,
    rng: &mut R,
) -> Result<Vec<Bin>, BinError> {
    if window_length == 0 {
        return Err(BinError::InvalidConfig(
            "window length must be positive".to_string(),
        ));
    }
    if coverage_fraction.is_nan() || coverage_fraction <= 0.0 {
        return Err(BinError::InvalidConfig(format!(
            "coverage fraction must be positive, got {}",
            coverage_fraction
        )));
    }

    let region_length = region.width();
    if region_length < window_length {
        return Ok(vec![region.clone()]);
    }

    let step = window_length as f64 * coverage_fraction;
    let samples = (region_length as f64 / step).round_ties_even() as usize;

    let mut windows = Vec::with_capacity(samples);
    for _ in 0..samples {
        let start = rng.random_range(region.start..=region.end);
        let end = region.end.min(start.saturating_add(window_length));
        if end - start < MIN_WINDOW_LENGTH {
            continue;
        }
        windows.push(Bin {
            chr: region.chr.clone(),
            start,
            end,
        });
    }

    Ok(windows)
}

///
/// Sample windows for every record of a BED file, grouped by chromosome.
///
/// Record starts are shifted down by one before sampling. Each chromosome's
/// windows are sorted by start.
///
pub fn random_windows_by_chrom<R: Rng + ?Sized>(
    path: &Path,
    window_length: u32,
    rng: &mut R,
) -> Result<HashMap<String, Vec<Bin>>, BinError> {
    let regions = read_annotation_file(path, AnnotationLayout::Bed)?;

    let mut windows: HashMap<String, Vec<Bin>> = HashMap::new();
    for region in regions {
        let shifted = Region {
            start: region.start.saturating_sub(1),
            ..region
        };
        let sampled =
            sample_random_windows(&shifted, window_length, DEFAULT_COVERAGE_FRACTION, rng)?;
        windows.entry(shifted.chr).or_default().extend(sampled);
    }

    for bins in windows.values_mut() {
        bins.sort_by_key(|b| b.start);
    }

    debug!(
        "Sampled {} windows over {} chromosomes",
        windows.values().map(|v| v.len()).sum::<usize>(),
        windows.len()
    );

    Ok(windows)
}
