use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use ribodep_core::utils::layout_from_path;
use ribodep_guides::pipeline::{DEFAULT_GUIDE_LENGTH, DEFAULT_PROXIMITY_THRESHOLD};
use ribodep_guides::{
    CandidateFilterPipeline, Genome, Guide, GuideCandidate, PamSpec, PipelineConfig, intended_index,
    read_fasta, read_hits, read_intended_regions, write_fasta,
};
use ribodep_overlaprs::IntervalIndex;

/// Everything the candidate filter needs, loaded and validated.
pub struct CandidateInputs {
    pub pam: PamSpec,
    pub genome: Genome,
    pub annotated: IntervalIndex,
    pub intended: IntervalIndex,
    pub pipeline: CandidateFilterPipeline,
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| panic!("--{} is required", name))
}

pub fn load_candidate_inputs(
    matches: &ArgMatches,
    proximity_threshold: u32,
) -> Result<CandidateInputs> {
    let genome_path = required(matches, "genome");
    let regions_path = required(matches, "regions");
    let gtf_path = Path::new(required(matches, "gtf"));
    let guides_path = required(matches, "guides");
    let hits_path = required(matches, "hits");
    let pam = required(matches, "pam");

    let config = PipelineConfig {
        guide_length: *matches
            .get_one::<u32>("length")
            .unwrap_or(&DEFAULT_GUIDE_LENGTH),
        proximity_threshold,
    };
    config.validate()?;
    let pam = PamSpec::new(pam)?;

    let genome = Genome::from_fasta(Path::new(genome_path))
        .with_context(|| format!("Failed to load genome {}", genome_path))?;
    let regions = read_intended_regions(Path::new(regions_path))
        .with_context(|| format!("Failed to load intended regions {}", regions_path))?;
    let annotated = IntervalIndex::from_annotation_file(gtf_path, layout_from_path(gtf_path))
        .with_context(|| format!("Failed to load annotation {}", gtf_path.display()))?;

    let guides: Vec<Guide> = read_fasta(Path::new(guides_path))
        .with_context(|| format!("Failed to load guides {}", guides_path))?
        .into_iter()
        .map(|r| Guide {
            id: r.name,
            sequence: r.sequence,
        })
        .collect();
    let hits = read_hits(Path::new(hits_path))
        .with_context(|| format!("Failed to load hits {}", hits_path))?;

    let pipeline = CandidateFilterPipeline::load(config, guides, hits)?;

    Ok(CandidateInputs {
        pam,
        genome,
        annotated,
        intended: intended_index(&regions),
        pipeline,
    })
}

pub fn write_candidates(path: &str, candidates: &[GuideCandidate]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
    let mut writer = BufWriter::new(file);
    write_fasta(
        &mut writer,
        candidates
            .iter()
            .map(|c| (c.id.as_str(), c.sequence.as_str())),
    )?;
    writer.flush()?;
    Ok(())
}

pub fn run_filter(matches: &ArgMatches) -> Result<()> {
    let proximity = *matches
        .get_one::<u32>("proximity")
        .unwrap_or(&DEFAULT_PROXIMITY_THRESHOLD);
    let offtarget_out = required(matches, "offtargets");
    let output = required(matches, "output");

    let CandidateInputs {
        pam,
        genome,
        annotated,
        intended,
        mut pipeline,
    } = load_candidate_inputs(matches, proximity)?;

    let removed = pipeline.filter_offtargets(&pam, &genome, &annotated, &intended)?;
    write_candidates(offtarget_out, &removed)?;

    let collapsed = pipeline.collapse_by_density()?;
    let survivors = pipeline.finish()?;

    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = BufWriter::new(file);
    write_fasta(
        &mut writer,
        survivors.iter().map(|(id, seq)| (id.as_str(), seq.as_str())),
    )?;
    writer.flush()?;

    eprintln!(
        "{} off-target, {} collapsed, {} guides written to {}",
        removed.len(),
        collapsed.len(),
        survivors.len(),
        output
    );

    Ok(())
}
