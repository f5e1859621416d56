use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;

use crate::errors::GuideError;
use crate::genome::Genome;
use crate::pam::PamSpec;
use crate::regions::IntendedRegion;
use crate::sequence::{find_all, gc_content, revcomp};

/// A designed guide: unique id and spacer sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guide {
    pub id: String,
    pub sequence: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningParams {
    pub guide_length: usize,
    pub min_gc: f64,
    pub max_gc: f64,
}

impl Default for MiningParams {
    fn default() -> Self {
        MiningParams {
            guide_length: 20,
            min_gc: 30.0,
            max_gc: 80.0,
        }
    }
}

/// `{prefix}_{1000..=3000}{8 hex digits}`
pub fn random_guide_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let num: u32 = rng.random_range(1000..=3000);
    let tag: u32 = rng.random();
    format!("{}_{}{:08x}", prefix, num, tag)
}

///
/// Spacers of one sequence, in discovery order.
///
/// Forward PAM occurrences at `p` yield `seq[p - guide_length..p]` when
/// `p > guide_length`. Reverse-complement PAM occurrences at `p` yield the reverse
/// complement of the `guide_length` bases after the PAM when they end before the
/// sequence does.
///
pub fn spacers_in(
    sequence: &str,
    pam: &PamSpec,
    guide_length: usize,
) -> Result<Vec<String>, GuideError> {
    let pam_length = pam.len();

    let bottom: Vec<usize> = pam
        .forward
        .iter()
        .flat_map(|p| find_all(sequence, p))
        .collect();
    let top: Vec<usize> = pam
        .reverse
        .iter()
        .flat_map(|p| find_all(sequence, p))
        .collect();

    let mut spacers = Vec::new();

    for p in bottom {
        if p > guide_length {
            if let Some(spacer) = sequence.get(p - guide_length..p) {
                spacers.push(spacer.to_string());
            }
        }
    }

    for p in top {
        let start = p + pam_length;
        let end = start + guide_length;
        if end < sequence.len() {
            if let Some(spacer) = sequence.get(start..end) {
                spacers.push(revcomp(spacer)?);
            }
        }
    }

    Ok(spacers)
}

///
/// Mine guides from every intended region.
///
/// Spacers are deduplicated by sequence across all regions and kept when their
/// GC percentage lies within `[min_gc, max_gc]`. Ids are prefixed with the
/// region name.
///
pub fn mine_guides<R: Rng + ?Sized>(
    regions: &[IntendedRegion],
    genome: &Genome,
    pam: &PamSpec,
    params: MiningParams,
    rng: &mut R,
) -> Result<Vec<Guide>, GuideError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ids: HashSet<String> = HashSet::new();
    let mut guides = Vec::new();

    for region in regions {
        let sequence = region.sequence(genome)?;
        let spacers = spacers_in(&sequence, pam, params.guide_length)?;
        debug!(
            "{} {}:{}-{}: {} spacers",
            region.name,
            region.chrom,
            region.start,
            region.end,
            spacers.len()
        );

        for spacer in spacers {
            if seen.contains(&spacer) {
                continue;
            }
            let gc = gc_content(&spacer);
            if gc < params.min_gc || gc > params.max_gc {
                continue;
            }

            let mut id = random_guide_id(&region.name, rng);
            while ids.contains(&id) {
                id = random_guide_id(&region.name, rng);
            }
            ids.insert(id.clone());
            seen.insert(spacer.clone());

            guides.push(Guide {
                id,
                sequence: spacer,
            });
        }
    }

    info!(
        "Mined {} guides from {} regions",
        guides.len(),
        regions.len()
    );

    Ok(guides)
}
