use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MOCK_OUTPUT, DEFAULT_WINDOW_LENGTH};
use crate::errors::MockConfigError;

/// Settings for mock read simulation.
///
/// # Example
/// ```toml
/// genome = "genome.fa"
/// n = 10
/// rrna_interval = "rRNA.bed"
/// snp_db = "SNP_candidates.tsv"
/// add_snp = true
/// seed = 7
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockConfig {
    pub genome: PathBuf,
    /// Copies emitted per window.
    pub n: u32,
    #[serde(default, alias = "SNPdb")]
    pub snp_db: Option<PathBuf>,
    #[serde(default, alias = "addSNP")]
    pub add_snp: bool,
    #[serde(alias = "rRNA_interval")]
    pub rrna_interval: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_window_length")]
    pub window_length: u32,
    pub seed: Option<u64>,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_MOCK_OUTPUT)
}

fn default_window_length() -> u32 {
    DEFAULT_WINDOW_LENGTH
}

impl MockConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock config from {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse mock config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MockConfigError> {
        if self.n == 0 {
            return Err(MockConfigError::InvalidValue {
                field: "n",
                reason: "must be positive".to_string(),
            });
        }
        if self.window_length == 0 {
            return Err(MockConfigError::InvalidValue {
                field: "window_length",
                reason: "must be positive".to_string(),
            });
        }
        if self.add_snp && self.snp_db.is_none() {
            return Err(MockConfigError::InvalidValue {
                field: "snp_db",
                reason: "required when add_snp is set".to_string(),
            });
        }
        Ok(())
    }
}
