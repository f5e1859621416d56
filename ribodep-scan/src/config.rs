use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::errors::ScanConfigError;

/// Settings for the depletion scan.
///
/// # Example
/// ```toml
/// bam_dir = "/data/bams"
/// bam_ref = "control.bam"
/// bam_del = "depleted.bam"
/// ref_rrna_ratio = 0.85
/// del_rrna_ratio = 0.05
/// rrna_interval = "rRNA.gtf"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    pub bam_dir: Option<PathBuf>,
    pub bam_ref: PathBuf,
    pub bam_del: PathBuf,
    pub ref_rrna_ratio: f64,
    pub del_rrna_ratio: f64,
    /// Library sizes; counted from the BAM files when absent.
    pub ref_reads: Option<u64>,
    pub del_reads: Option<u64>,
    pub rrna_interval: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_max_soft_clip")]
    pub max_soft_clip: u32,
    #[serde(default = "default_min_overlap_fraction")]
    pub min_overlap_fraction: f64,
    #[serde(default = "default_bin_length")]
    pub bin_length: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_output() -> PathBuf {
    PathBuf::from("rRNA_dep_rate.tsv")
}

fn default_max_soft_clip() -> u32 {
    50
}

fn default_min_overlap_fraction() -> f64 {
    0.5
}

fn default_bin_length() -> u32 {
    100
}

fn default_step() -> u32 {
    50
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan config from {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scan config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScanConfigError> {
        for (field, value) in [
            ("ref_rrna_ratio", self.ref_rrna_ratio),
            ("del_rrna_ratio", self.del_rrna_ratio),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ScanConfigError::InvalidValue {
                    field,
                    reason: format!("must be in [0, 1), got {}", value),
                });
            }
        }
        if !(0.0..1.0).contains(&self.min_overlap_fraction) {
            return Err(ScanConfigError::InvalidValue {
                field: "min_overlap_fraction",
                reason: format!("must be in [0, 1), got {}", self.min_overlap_fraction),
            });
        }
        if self.bin_length == 0 {
            return Err(ScanConfigError::InvalidValue {
                field: "bin_length",
                reason: "must be positive".to_string(),
            });
        }
        if self.step == 0 {
            return Err(ScanConfigError::InvalidValue {
                field: "step",
                reason: "must be positive".to_string(),
            });
        }
        for (field, value) in [("ref_reads", self.ref_reads), ("del_reads", self.del_reads)] {
            if value == Some(0) {
                return Err(ScanConfigError::InvalidValue {
                    field,
                    reason: "must be positive when given".to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.bam_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn control_bam(&self) -> PathBuf {
        self.resolve(&self.bam_ref)
    }

    pub fn depleted_bam(&self) -> PathBuf {
        self.resolve(&self.bam_del)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
bam_dir = "/data"
bam_ref = "con.bam"
bam_del = "/abs/del.bam"
ref_rrna_ratio = 0.8
del_rrna_ratio = 0.1
rrna_interval = "rrna.bed"
"#;

    #[fixture]
    fn config() -> ScanConfig {
        toml::from_str(MINIMAL).unwrap()
    }

    #[rstest]
    fn test_defaults_and_paths(config: ScanConfig) {
        assert_eq!(config.max_soft_clip, 50);
        assert_eq!(config.bin_length, 100);
        assert_eq!(config.step, 50);
        assert_eq!(config.ref_reads, None);
        assert_eq!(config.control_bam(), PathBuf::from("/data/con.bam"));
        assert_eq!(config.depleted_bam(), PathBuf::from("/abs/del.bam"));
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_ratio_of_one_is_rejected(mut config: ScanConfig) {
        config.ref_rrna_ratio = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ScanConfigError::InvalidValue {
                field: "ref_rrna_ratio",
                ..
            })
        ));
    }

    #[rstest]
    fn test_zero_read_count_is_rejected(mut config: ScanConfig) {
        config.del_reads = Some(0);
        assert!(config.validate().is_err());
    }

    #[rstest]
    fn test_from_file_validates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}\nstep = 0\n", MINIMAL).unwrap();
        assert!(ScanConfig::from_file(file.path()).is_err());
    }
}
