pub const DEFAULT_BIN_LENGTH: u32 = 100;
pub const DEFAULT_STEP: u32 = 50;

/// Sampled windows shorter than this are discarded.
pub const MIN_WINDOW_LENGTH: u32 = 30;

pub const DEFAULT_COVERAGE_FRACTION: f64 = 0.4;
