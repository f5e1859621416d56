//! sgRNA design for rRNA depletion.
//!
//! Guides are mined next to PAM sites in the intended rRNA regions ([`mining`]),
//! aligned against the genome by an external aligner, and then filtered by the
//! [`CandidateFilterPipeline`]: candidates with a genuine off-target hit are
//! removed, crowded candidates are collapsed, and the survivors are written out.
//!
//! ```
//! use ribodep_guides::{PamSpec, revcomp};
//!
//! let pam = PamSpec::new("NGG").unwrap();
//! assert!(pam.matches_forward("AGG"));
//! assert_eq!(revcomp("AGG").unwrap(), "CCT");
//! ```
pub mod errors;
pub mod genome;
pub mod hits;
pub mod mining;
pub mod pam;
pub mod pipeline;
pub mod regions;
pub mod sequence;

pub use self::errors::{GuideError, HitParseError, PipelineError};
pub use self::genome::{FastaRecord, Genome, read_fasta, write_fasta};
pub use self::hits::{HitRecord, parse_hits, read_hits};
pub use self::mining::{Guide, MiningParams, mine_guides};
pub use self::pam::PamSpec;
pub use self::pipeline::{
    CandidateFilterPipeline, GuideCandidate, PipelineConfig, Stage, classify_offtarget,
    collapse_by_density,
};
pub use self::regions::{IntendedRegion, intended_index, read_intended_regions};
pub use self::sequence::{expand_ambiguous, gc_content, revcomp};
