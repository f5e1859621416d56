//! SNP filtering and mock read simulation.
//!
//! [`filter_snps`] selects common, unambiguous SNPs inside rRNA intervals.
//! [`MockSimulator`] draws random windows over an rRNA annotation and writes
//! reads from them, optionally carrying one of those SNPs, so the depletion
//! scan and guide design can be exercised on known input.
pub mod config;
pub mod consts;
pub mod errors;
pub mod mock;
pub mod snps;
pub mod variant;

pub use self::config::MockConfig;
pub use self::errors::{MockConfigError, SnpParseError};
pub use self::mock::{MockSimulator, simulate_window};
pub use self::snps::{SnpDb, SnpInfo, filter_snps, is_ambiguous_alt};
pub use self::variant::apply_variant;
