//! Alignment blocks and the overlap rule used to decide whether a read counts
//! towards a window.
//!
//! A spliced read is split into contiguous blocks at every skip (`N`) operation.
//! Matches and deletions extend the current block; soft clips are reported
//! separately so reads with long clips can be rejected.
//!
//! ```rust
//! use ribodep_scan::blocks::{AlignmentBlock, CigarOp, CigarOpKind, extract_blocks};
//!
//! let ops = [
//!     CigarOp::new(CigarOpKind::Match, 50),
//!     CigarOp::new(CigarOpKind::Skip, 10),
//!     CigarOp::new(CigarOpKind::Match, 30),
//! ];
//! let (blocks, clips) = extract_blocks(100, &ops);
//! assert_eq!(blocks, vec![AlignmentBlock::new(100, 150), AlignmentBlock::new(160, 190)]);
//! assert!(clips.is_empty());
//! ```

use noodles::sam::alignment::record::cigar::op::Kind;
use ribodep_core::models::Bin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOpKind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Pad,
    SequenceMatch,
    SequenceMismatch,
}

impl From<Kind> for CigarOpKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Match => CigarOpKind::Match,
            Kind::Insertion => CigarOpKind::Insertion,
            Kind::Deletion => CigarOpKind::Deletion,
            Kind::Skip => CigarOpKind::Skip,
            Kind::SoftClip => CigarOpKind::SoftClip,
            Kind::HardClip => CigarOpKind::HardClip,
            Kind::Pad => CigarOpKind::Pad,
            Kind::SequenceMatch => CigarOpKind::SequenceMatch,
            Kind::SequenceMismatch => CigarOpKind::SequenceMismatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarOpKind,
    pub len: u32,
}

impl CigarOp {
    pub fn new(kind: CigarOpKind, len: u32) -> Self {
        CigarOp { kind, len }
    }
}

/// A contiguous reference span covered by a read, `(start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub start: u32,
    pub end: u32,
}

impl AlignmentBlock {
    pub fn new(start: u32, end: u32) -> Self {
        AlignmentBlock { start, end }
    }
}

///
/// Turn a read's alignment operations into reference blocks.
///
/// Returns the blocks and the lengths of all soft clips. `=` and `X` do not
/// extend blocks; every kind other than `M`, `D`, `N` and `S` is ignored. The
/// final block is always emitted, even when empty.
///
/// # Arguments
///
/// - alignment_start: 0-based reference position of the first aligned base
/// - ops: the read's alignment operations, in order
///
pub fn extract_blocks(alignment_start: u32, ops: &[CigarOp]) -> (Vec<AlignmentBlock>, Vec<u32>) {
    let mut blocks = Vec::new();
    let mut soft_clips = Vec::new();

    let mut pos = alignment_start;
    let mut matched = 0u32;

    for op in ops {
        match op.kind {
            CigarOpKind::Match | CigarOpKind::Deletion => matched += op.len,
            CigarOpKind::Skip => {
                blocks.push(AlignmentBlock::new(pos, pos + matched));
                pos += matched + op.len;
                matched = 0;
            }
            CigarOpKind::SoftClip => soft_clips.push(op.len),
            _ => {}
        }
    }
    blocks.push(AlignmentBlock::new(pos, pos + matched));

    (blocks, soft_clips)
}

/// True if any soft clip is longer than `max_soft_clip`.
pub fn is_excessively_clipped(soft_clips: &[u32], max_soft_clip: u32) -> bool {
    soft_clips.iter().any(|&clip| clip > max_soft_clip)
}

///
/// Decide whether a read's blocks cover more than `min_fraction` of the window.
///
/// Blocks entirely outside the window are skipped. For the rest, a block ending
/// inside the window contributes `block.end - max(block.start, window.start)`, and
/// a block starting inside the window contributes
/// `min(window.end, block.end) - block.start`, the latter taking precedence when
/// both apply. A block spanning the whole window leaves the previous value in
/// place. Zero-width windows never pass.
///
pub fn overlaps_sufficiently(window: &Bin, blocks: &[AlignmentBlock], min_fraction: f64) -> bool {
    let ws = window.start as i64;
    let we = window.end as i64;
    let window_len = we - ws;
    if window_len <= 0 {
        return false;
    }

    let mut overlap = 0i64;
    for block in blocks {
        let bs = block.start as i64;
        let be = block.end as i64;

        if bs > we || be < ws {
            continue;
        }
        if be < we {
            overlap = be - bs.max(ws);
        }
        if bs > ws {
            overlap = we.min(be) - bs;
        }

        if overlap as f64 / window_len as f64 > min_fraction {
            return true;
        }
    }

    false
}
