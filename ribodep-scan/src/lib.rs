//! rRNA depletion scanning.
//!
//! Reads are reduced to reference blocks ([`blocks`]) and counted towards a bin only
//! when they are not heavily soft clipped and cover more than half of it. The
//! [`Scanner`] tiles an rRNA annotation, counts a control and a depleted library
//! bin by bin across worker threads, and reports FPKM values and the depletion ratio
//! for every bin.
pub mod blocks;
pub mod config;
pub mod depletion;
pub mod errors;
pub mod reads;
pub mod scanner;

pub use self::blocks::{
    AlignmentBlock, CigarOp, CigarOpKind, extract_blocks, is_excessively_clipped,
    overlaps_sufficiently,
};
pub use self::config::ScanConfig;
pub use self::depletion::{DepletionRecord, depletion_ratio, fpkm};
pub use self::errors::{ScanConfigError, ScanError};
pub use self::reads::{AlignedRead, BamReadSource, ReadSource, count_valid_reads, total_reads};
pub use self::scanner::Scanner;
