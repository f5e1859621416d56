use std::collections::{BTreeMap, HashSet};

use fxhash::FxHashMap as HashMap;
use log::{debug, info};
use ribodep_core::models::Strand;
use ribodep_overlaprs::PointLookup;

use crate::errors::PipelineError;
use crate::genome::Genome;
use crate::hits::HitRecord;
use crate::mining::Guide;
use crate::pam::PamSpec;

pub const DEFAULT_GUIDE_LENGTH: u32 = 20;
pub const DEFAULT_PROXIMITY_THRESHOLD: u32 = 50;

/// Phases of a filtering run, in the only order they may be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    OfftargetFiltered,
    DensityCollapsed,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub guide_length: u32,
    pub proximity_threshold: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            guide_length: DEFAULT_GUIDE_LENGTH,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.guide_length == 0 {
            return Err(PipelineError::InvalidConfig(
                "guide length must be greater than 0".to_string(),
            ));
        }
        if self.proximity_threshold == 0 {
            return Err(PipelineError::InvalidConfig(
                "proximity threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A guide under evaluation, with every genomic position it aligned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideCandidate {
    pub id: String,
    pub sequence: String,
    /// `(chrom, position)` in hit-table order.
    pub hit_positions: Vec<(String, u32)>,
}

impl GuideCandidate {
    pub fn new(id: &str, sequence: &str) -> Self {
        GuideCandidate {
            id: id.to_string(),
            sequence: sequence.to_string(),
            hit_positions: Vec::new(),
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hit_positions.len()
    }
}

///
/// Decide whether a hit is a genuine off-target.
///
/// Three conditions must all hold:
/// 1. the bases next to the hit form a PAM. On `+` the window is
///    `[pos + guide_length, pos + guide_length + pam_len)` checked against the
///    forward variants; on `-` it is `[pos - pam_len, pos)` checked against the
///    reverse complements. Windows off the end of the chromosome never match.
/// 2. the position is outside every intended region (closed bounds).
/// 3. the position is inside at least one annotated region (closed bounds).
///
pub fn classify_offtarget<A, I>(
    hit: &HitRecord,
    pam: &PamSpec,
    genome: &Genome,
    annotated: &A,
    intended: &I,
    guide_length: u32,
) -> bool
where
    A: PointLookup + ?Sized,
    I: PointLookup + ?Sized,
{
    let pos = hit.position as usize;
    let pam_length = pam.len();

    let pam_adjacent = match hit.strand {
        Strand::Forward => {
            let start = pos + guide_length as usize;
            genome
                .slice(&hit.chrom, start, start + pam_length)
                .is_some_and(|bases| pam.matches_forward(bases))
        }
        Strand::Reverse => pos
            .checked_sub(pam_length)
            .and_then(|start| genome.slice(&hit.chrom, start, pos))
            .is_some_and(|bases| pam.matches_reverse(bases)),
    };

    pam_adjacent
        && !intended.covers_closed(&hit.chrom, hit.position)
        && annotated.covers_closed(&hit.chrom, hit.position)
}

///
/// Greedy left-to-right collapse of candidates whose hits crowd together.
///
/// Each chromosome is swept in name order over its `(position, candidate)`
/// entries, sorted by position. The anchor is the most recent live entry. An
/// entry of the anchor's own candidate, or one further than
/// `proximity_threshold` from it, becomes the new anchor. Otherwise the
/// candidate with fewer hits is discarded (ties discard the right entry) and the
/// survivor's entry becomes the anchor.
///
/// Because the anchor follows the survivor, a chain of entries that are each
/// within the threshold of the previous one is resolved pairwise along the
/// chain rather than against its first entry. With `A` (1 hit) at 0, `B`
/// (5 hits) at 40, `C` (1 hit) at 80 and a threshold of 50, `B` discards `A`
/// and then `C`, although `C` is 80 away from `A`.
///
/// Returns the ids of the discarded candidates. Running it again over the
/// survivors discards nothing.
///
pub fn collapse_by_density(
    candidates: &[GuideCandidate],
    proximity_threshold: u32,
) -> HashSet<String> {
    let mut by_chrom: BTreeMap<&str, Vec<(u32, usize)>> = BTreeMap::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        for (chrom, pos) in &candidate.hit_positions {
            by_chrom.entry(chrom.as_str()).or_default().push((*pos, idx));
        }
    }

    let mut discarded = vec![false; candidates.len()];

    for (chrom, entries) in by_chrom.iter_mut() {
        entries.sort_by_key(|(pos, _)| *pos);

        let mut anchor: Option<(u32, usize)> = None;
        for &(pos, idx) in entries.iter() {
            if discarded[idx] {
                continue;
            }

            let Some((anchor_pos, anchor_idx)) = anchor else {
                anchor = Some((pos, idx));
                continue;
            };

            if anchor_idx == idx || pos - anchor_pos > proximity_threshold {
                anchor = Some((pos, idx));
                continue;
            }

            if candidates[idx].hit_count() > candidates[anchor_idx].hit_count() {
                debug!(
                    "{}: {} at {} beats {} at {}",
                    chrom, candidates[idx].id, pos, candidates[anchor_idx].id, anchor_pos
                );
                discarded[anchor_idx] = true;
                anchor = Some((pos, idx));
            } else {
                debug!(
                    "{}: {} at {} beats {} at {}",
                    chrom, candidates[anchor_idx].id, anchor_pos, candidates[idx].id, pos
                );
                discarded[idx] = true;
            }
        }
    }

    candidates
        .iter()
        .zip(discarded)
        .filter(|(_, gone)| *gone)
        .map(|(c, _)| c.id.clone())
        .collect()
}

///
/// Single-threaded filter over a set of guide candidates and their aligner hits.
///
/// Phases run in a fixed order: [`CandidateFilterPipeline::filter_offtargets`],
/// then [`CandidateFilterPipeline::collapse_by_density`], then
/// [`CandidateFilterPipeline::finish`]. Discarding a candidate removes it from
/// the candidate map and the hit table together.
///
#[derive(Debug)]
pub struct CandidateFilterPipeline {
    config: PipelineConfig,
    stage: Stage,
    order: Vec<String>,
    candidates: HashMap<String, GuideCandidate>,
    hits: HashMap<String, Vec<HitRecord>>,
}

impl CandidateFilterPipeline {
    ///
    /// Build the working set. Hits naming an unknown id are ignored.
    ///
    pub fn load(
        config: PipelineConfig,
        guides: Vec<Guide>,
        hits: Vec<HitRecord>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let mut order = Vec::with_capacity(guides.len());
        let mut candidates: HashMap<String, GuideCandidate> = HashMap::default();
        for guide in guides {
            if candidates.contains_key(&guide.id) {
                return Err(PipelineError::DuplicateCandidate(guide.id));
            }
            order.push(guide.id.clone());
            candidates.insert(guide.id.clone(), GuideCandidate::new(&guide.id, &guide.sequence));
        }

        let mut table: HashMap<String, Vec<HitRecord>> = HashMap::default();
        let mut ignored = 0;
        for hit in hits {
            match candidates.get_mut(&hit.candidate_id) {
                Some(candidate) => {
                    candidate
                        .hit_positions
                        .push((hit.chrom.clone(), hit.position));
                    table.entry(hit.candidate_id.clone()).or_default().push(hit);
                }
                None => ignored += 1,
            }
        }
        if ignored > 0 {
            debug!("Ignored {} hits for unknown candidates", ignored);
        }

        info!("Loaded {} candidates", order.len());

        Ok(CandidateFilterPipeline {
            config,
            stage: Stage::Loaded,
            order,
            candidates,
            hits: table,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GuideCandidate> {
        self.candidates.get(id)
    }

    pub fn hits_for(&self, id: &str) -> &[HitRecord] {
        self.hits.get(id).map(|h| h.as_slice()).unwrap_or_default()
    }

    /// Surviving candidates in load order.
    pub fn candidates(&self) -> impl Iterator<Item = &GuideCandidate> {
        self.order.iter().filter_map(|id| self.candidates.get(id))
    }

    fn expect_stage(&self, expected: Stage) -> Result<(), PipelineError> {
        if self.stage != expected {
            return Err(PipelineError::OutOfOrder {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    /// Drop the given ids everywhere and return their candidates in load order.
    fn discard(&mut self, ids: &HashSet<String>) -> Vec<GuideCandidate> {
        let mut removed = Vec::new();
        self.order.retain(|id| {
            if ids.contains(id) {
                if let Some(candidate) = self.candidates.remove(id) {
                    removed.push(candidate);
                }
                self.hits.remove(id);
                false
            } else {
                true
            }
        });
        removed
    }

    ///
    /// Remove every candidate with at least one genuine off-target hit (see
    /// [`classify_offtarget`]). Returns the removed candidates.
    ///
    pub fn filter_offtargets<A, I>(
        &mut self,
        pam: &PamSpec,
        genome: &Genome,
        annotated: &A,
        intended: &I,
    ) -> Result<Vec<GuideCandidate>, PipelineError>
    where
        A: PointLookup + ?Sized,
        I: PointLookup + ?Sized,
    {
        self.expect_stage(Stage::Loaded)?;

        let guide_length = self.config.guide_length;
        let offending: HashSet<String> = self
            .order
            .iter()
            .filter(|id| {
                self.hits_for(id).iter().any(|hit| {
                    classify_offtarget(hit, pam, genome, annotated, intended, guide_length)
                })
            })
            .cloned()
            .collect();

        let removed = self.discard(&offending);
        info!(
            "Removed {} candidates with off-target hits, {} remain",
            removed.len(),
            self.order.len()
        );

        self.stage = Stage::OfftargetFiltered;
        Ok(removed)
    }

    ///
    /// Collapse crowded candidates with [`collapse_by_density`] using the
    /// configured proximity threshold. Returns the removed candidates.
    ///
    pub fn collapse_by_density(&mut self) -> Result<Vec<GuideCandidate>, PipelineError> {
        self.expect_stage(Stage::OfftargetFiltered)?;

        let survivors: Vec<GuideCandidate> = self.candidates().cloned().collect();
        let discarded = collapse_by_density(&survivors, self.config.proximity_threshold);

        let removed = self.discard(&discarded);
        info!(
            "Collapsed {} crowded candidates, {} remain",
            removed.len(),
            self.order.len()
        );

        self.stage = Stage::DensityCollapsed;
        Ok(removed)
    }

    /// Surviving `(id, sequence)` pairs in load order.
    pub fn finish(&mut self) -> Result<Vec<(String, String)>, PipelineError> {
        self.expect_stage(Stage::DensityCollapsed)?;
        self.stage = Stage::Final;

        Ok(self
            .candidates()
            .map(|c| (c.id.clone(), c.sequence.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ribodep_overlaprs::IntervalIndex;
    use rstest::*;

    fn hit(id: &str, strand: Strand, chrom: &str, position: u32) -> HitRecord {
        HitRecord {
            candidate_id: id.to_string(),
            strand,
            chrom: chrom.to_string(),
            position,
        }
    }

    fn guide(id: &str) -> Guide {
        Guide {
            id: id.to_string(),
            sequence: "ACGTA".to_string(),
        }
    }

    #[fixture]
    fn genome() -> Genome {
        let mut genome = Genome::default();
        // spacer at 2..7, TGG at 7..10, CCA at 12..15
        genome.insert("chr1", "AAACGTATGGAACCAACGTAAAA");
        genome
    }

    #[fixture]
    fn annotated() -> IntervalIndex {
        let mut index = IntervalIndex::new();
        index.insert("chr1", 0, 22).unwrap();
        index
    }

    #[rstest]
    fn test_forward_offtarget(genome: Genome, annotated: IntervalIndex) {
        let pam = PamSpec::new("NGG").unwrap();
        let intended = IntervalIndex::new();
        let h = hit("g1", Strand::Forward, "chr1", 2);
        assert!(classify_offtarget(&h, &pam, &genome, &annotated, &intended, 5));
    }

    #[rstest]
    fn test_reverse_offtarget(genome: Genome, annotated: IntervalIndex) {
        let pam = PamSpec::new("NGG").unwrap();
        let intended = IntervalIndex::new();
        let h = hit("g1", Strand::Reverse, "chr1", 15);
        assert!(classify_offtarget(&h, &pam, &genome, &annotated, &intended, 5));
    }

    #[rstest]
    #[case(Strand::Forward, 3)]
    #[case(Strand::Reverse, 16)]
    #[case(Strand::Reverse, 1)]
    #[case(Strand::Forward, 20)]
    fn test_no_pam(
        genome: Genome,
        annotated: IntervalIndex,
        #[case] strand: Strand,
        #[case] position: u32,
    ) {
        let pam = PamSpec::new("NGG").unwrap();
        let intended = IntervalIndex::new();
        let h = hit("g1", strand, "chr1", position);
        assert!(!classify_offtarget(&h, &pam, &genome, &annotated, &intended, 5));
    }

    #[rstest]
    fn test_unannotated_or_unknown_is_not_offtarget(genome: Genome) {
        let pam = PamSpec::new("NGG").unwrap();
        let empty = IntervalIndex::new();
        let h = hit("g1", Strand::Forward, "chr1", 2);
        assert!(!classify_offtarget(&h, &pam, &genome, &empty, &empty, 5));

        let mut annotated = IntervalIndex::new();
        annotated.insert("chrX", 0, 100).unwrap();
        let h = hit("g1", Strand::Forward, "chrX", 2);
        assert!(!classify_offtarget(&h, &pam, &genome, &annotated, &empty, 5));
    }

    #[rstest]
    fn test_config_validation() {
        let config = PipelineConfig {
            proximity_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(
            CandidateFilterPipeline::load(config, vec![], vec![]),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[rstest]
    fn test_duplicate_candidate() {
        let err =
            CandidateFilterPipeline::load(Default::default(), vec![guide("a"), guide("a")], vec![])
                .unwrap_err();
        assert_eq!(err, PipelineError::DuplicateCandidate("a".to_string()));
    }

    #[rstest]
    fn test_unknown_hits_ignored() {
        let hits = vec![
            hit("a", Strand::Forward, "chr1", 10),
            hit("ghost", Strand::Forward, "chr1", 12),
            hit("a", Strand::Reverse, "chr2", 3),
        ];
        let pipeline =
            CandidateFilterPipeline::load(Default::default(), vec![guide("a")], hits).unwrap();
        let a = pipeline.get("a").unwrap();
        assert_eq!(
            a.hit_positions,
            vec![("chr1".to_string(), 10), ("chr2".to_string(), 3)]
        );
        assert_eq!(pipeline.hits_for("ghost").len(), 0);
    }

    #[rstest]
    fn test_phases_out_of_order() {
        let mut pipeline =
            CandidateFilterPipeline::load(Default::default(), vec![guide("a")], vec![]).unwrap();
        assert_eq!(
            pipeline.collapse_by_density().unwrap_err(),
            PipelineError::OutOfOrder {
                expected: Stage::OfftargetFiltered,
                found: Stage::Loaded,
            }
        );
        assert!(pipeline.finish().is_err());
        assert_eq!(pipeline.stage(), Stage::Loaded);
    }

    #[rstest]
    fn test_tie_discards_right_entry() {
        let mut a = GuideCandidate::new("a", "A");
        a.hit_positions.push(("chr1".to_string(), 40));
        let mut b = GuideCandidate::new("b", "C");
        b.hit_positions.push(("chr1".to_string(), 10));

        let discarded = collapse_by_density(&[a, b], 50);
        assert_eq!(discarded, HashSet::from(["a".to_string()]));
    }

    #[rstest]
    fn test_anchor_follows_the_survivor() {
        let mut a = GuideCandidate::new("a", "A");
        a.hit_positions.push(("chr1".to_string(), 0));
        let mut b = GuideCandidate::new("b", "C");
        b.hit_positions.push(("chr1".to_string(), 40));
        for chrom in ["chr2", "chr3", "chr4", "chr5"] {
            b.hit_positions.push((chrom.to_string(), 0));
        }
        let mut c = GuideCandidate::new("c", "G");
        c.hit_positions.push(("chr1".to_string(), 80));

        let discarded = collapse_by_density(&[a, b, c], 50);
        assert_eq!(discarded, HashSet::from(["a".to_string(), "c".to_string()]));
    }

    #[rstest]
    #[case(40, vec!["A"])]
    #[case(1000, vec!["A", "B"])]
    fn test_pipeline_keeps_busier_of_close_candidates(
        #[case] b_pos: u32,
        #[case] expected: Vec<&str>,
    ) {
        let mut hits = vec![hit("A", Strand::Forward, "chr1", 10)];
        for chrom in ["chr2", "chr3", "chr4", "chr5"] {
            hits.push(hit("A", Strand::Forward, chrom, 100));
        }
        hits.push(hit("B", Strand::Forward, "chr1", b_pos));
        hits.push(hit("B", Strand::Forward, "chr6", 100));

        let config = PipelineConfig {
            guide_length: 20,
            proximity_threshold: 50,
        };
        let mut pipeline =
            CandidateFilterPipeline::load(config, vec![guide("A"), guide("B")], hits).unwrap();
        assert_eq!(pipeline.get("A").unwrap().hit_count(), 5);
        assert_eq!(pipeline.get("B").unwrap().hit_count(), 2);

        let empty = IntervalIndex::new();
        let removed = pipeline
            .filter_offtargets(&PamSpec::new("NGG").unwrap(), &Genome::default(), &empty, &empty)
            .unwrap();
        assert!(removed.is_empty());

        pipeline.collapse_by_density().unwrap();
        let ids: Vec<String> = pipeline.finish().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    fn test_collapse_is_per_chromosome() {
        let mut a = GuideCandidate::new("a", "A");
        a.hit_positions.push(("chr1".to_string(), 10));
        let mut b = GuideCandidate::new("b", "C");
        b.hit_positions.push(("chr2".to_string(), 12));

        assert!(collapse_by_density(&[a, b], 50).is_empty());
    }
}
