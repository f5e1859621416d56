use std::fmt::{self, Display};

use ribodep_core::models::Bin;

/// Raw per-bin read counts from the control and depleted libraries.
#[derive(Debug, Clone, PartialEq)]
pub struct BinCounts {
    pub bin: Bin,
    pub n_con: u64,
    pub n_del: u64,
}

/// One output row of the depletion scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DepletionRecord {
    pub counts: BinCounts,
    pub fpkm_con_norm: f64,
    pub fpkm_del: f64,
    pub ratio: Option<f64>,
}

/// Fragments per kilobase of bin per million reads.
pub fn fpkm(reads: u64, total_reads: u64, bin_length: u32) -> f64 {
    reads as f64 * 1e9 / (bin_length as f64 * total_reads as f64)
}

/// Rescale a control FPKM by the non-rRNA fractions of both libraries.
pub fn normalize_control(fpkm_con: f64, ref_rrna_ratio: f64, del_rrna_ratio: f64) -> f64 {
    fpkm_con * (1.0 - del_rrna_ratio) / (1.0 - ref_rrna_ratio)
}

/// `(con - del) / con`, or `None` when the control has no signal.
pub fn depletion_ratio(fpkm_con: f64, fpkm_del: f64) -> Option<f64> {
    if fpkm_con == 0.0 {
        return None;
    }
    Some((fpkm_con - fpkm_del) / fpkm_con)
}

/// Library-wide constants needed to turn counts into depletion records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub ref_reads: u64,
    pub del_reads: u64,
    pub ref_rrna_ratio: f64,
    pub del_rrna_ratio: f64,
    pub bin_length: u32,
}

impl Normalization {
    pub fn record(&self, counts: BinCounts) -> DepletionRecord {
        let fpkm_con = fpkm(counts.n_con, self.ref_reads, self.bin_length);
        let fpkm_del = fpkm(counts.n_del, self.del_reads, self.bin_length);
        let fpkm_con_norm = normalize_control(fpkm_con, self.ref_rrna_ratio, self.del_rrna_ratio);

        DepletionRecord {
            ratio: depletion_ratio(fpkm_con_norm, fpkm_del),
            counts,
            fpkm_con_norm,
            fpkm_del,
        }
    }
}

impl Display for DepletionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = match self.ratio {
            Some(r) => r.to_string(),
            None => "NA".to_string(),
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.counts.bin.as_string(),
            self.counts.n_con,
            self.counts.n_del,
            self.fpkm_con_norm,
            self.fpkm_del,
            ratio
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_fpkm() {
        // 10 reads in a 100bp bin out of 1M reads
        assert_eq!(fpkm(10, 1_000_000, 100), 100.0);
        assert_eq!(fpkm(0, 1_000_000, 100), 0.0);
    }

    #[rstest]
    fn test_normalize_control() {
        let normed = normalize_control(100.0, 0.5, 0.1);
        assert!((normed - 180.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(100.0, 25.0, Some(0.75))]
    #[case(100.0, 100.0, Some(0.0))]
    #[case(50.0, 100.0, Some(-1.0))]
    #[case(0.0, 10.0, None)]
    fn test_depletion_ratio(#[case] con: f64, #[case] del: f64, #[case] expected: Option<f64>) {
        assert_eq!(depletion_ratio(con, del), expected);
    }

    #[rstest]
    fn test_record_row() {
        let norm = Normalization {
            ref_reads: 1_000_000,
            del_reads: 1_000_000,
            ref_rrna_ratio: 0.0,
            del_rrna_ratio: 0.0,
            bin_length: 100,
        };
        let counts = BinCounts {
            bin: Bin::new("chr1", 0, 100).unwrap(),
            n_con: 10,
            n_del: 5,
        };
        let record = norm.record(counts);
        assert_eq!(record.to_string(), "chr1\t0\t100\t10\t5\t100\t50\t0.5");

        let empty = norm.record(BinCounts {
            bin: Bin::new("chr1", 50, 150).unwrap(),
            n_con: 0,
            n_del: 3,
        });
        assert!(empty.to_string().ends_with("\tNA"));
    }
}
