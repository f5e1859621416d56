pub const DEFAULT_FREQUENCY_CUTOFF: f64 = 0.1;
pub const DEFAULT_SNP_OUTPUT: &str = "SNP_candidates.tsv";

pub const DEFAULT_MOCK_OUTPUT: &str = "mock.fa";
pub const DEFAULT_WINDOW_LENGTH: u32 = 100;
