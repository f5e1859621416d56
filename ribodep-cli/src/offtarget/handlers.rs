use anyhow::Result;
use clap::ArgMatches;

use ribodep_guides::pipeline::DEFAULT_PROXIMITY_THRESHOLD;

use crate::filter::handlers::{CandidateInputs, load_candidate_inputs, write_candidates};

pub fn run_offtarget(matches: &ArgMatches) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .expect("--output has a default");

    let CandidateInputs {
        pam,
        genome,
        annotated,
        intended,
        mut pipeline,
    } = load_candidate_inputs(matches, DEFAULT_PROXIMITY_THRESHOLD)?;

    let removed = pipeline.filter_offtargets(&pam, &genome, &annotated, &intended)?;
    write_candidates(output, &removed)?;

    eprintln!(
        "{} of {} guides have off-target hits, written to {}",
        removed.len(),
        removed.len() + pipeline.len(),
        output
    );

    Ok(())
}
