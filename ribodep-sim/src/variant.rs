use crate::snps::{MULTI_ALLELE, SnpInfo};

fn tail(bytes: &[u8], from: usize) -> &[u8] {
    &bytes[from.min(bytes.len())..]
}

///
/// Write one SNP allele into a read drawn from the window starting at
/// `region_start`.
///
/// `pos` is the SNP position; the variant lands at offset `pos - region_start - 1`.
/// - an integer alt deletes `reference.len()` bases
/// - a `<copies><bases>` alt overwrites `bases.len()` bases with `bases`
/// - any other alt replaces the single base at the offset
///
/// Offsets past the end of the read are clamped.
///
pub fn apply_variant(read: &str, region_start: u32, pos: u32, snp: &SnpInfo) -> String {
    let bytes = read.as_bytes();
    let offset = pos.saturating_sub(region_start).saturating_sub(1) as usize;
    let head = &bytes[..offset.min(bytes.len())];

    let mut out = Vec::with_capacity(bytes.len() + snp.alt.len());
    out.extend_from_slice(head);

    match MULTI_ALLELE.captures(&snp.alt) {
        Some(caps) => {
            let bases = &caps[2];
            out.extend_from_slice(bases.as_bytes());
            out.extend_from_slice(tail(bytes, offset + bases.len()));
        }
        None if snp.alt.trim().parse::<i64>().is_ok() => {
            out.extend_from_slice(tail(bytes, offset + snp.reference.len()));
        }
        None => {
            out.extend_from_slice(snp.alt.as_bytes());
            out.extend_from_slice(tail(bytes, offset + 1));
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
