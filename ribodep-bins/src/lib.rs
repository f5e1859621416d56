//! Genomic window generation for ribodep.
//!
//! Windows come in two flavours: fixed-length overlapping tiles over annotated
//! regions ([`tile_fixed`], [`BinBuilder`]) and randomly placed windows used for
//! simulation ([`sample_random_windows`]). Tiles are spread over workers with
//! [`partition_for_workers`] and processed with [`dispatch_ordered`], which
//! returns results in the order the chunks were submitted.
//!
//! ```rust
//! use ribodep_bins::{partition_for_workers, tile_fixed};
//! use ribodep_core::models::Region;
//!
//! let region = Region::new("chr1", 0, 200).unwrap();
//! let bins = tile_fixed(&region, 100, 50).unwrap();
//! assert_eq!(bins.len(), 4);
//!
//! let chunks = partition_for_workers(bins, 3).unwrap();
//! assert_eq!(chunks.len(), 3);
//! ```
pub mod consts;
pub mod dispatch;
pub mod errors;
pub mod partition;
pub mod random;
pub mod tiling;

pub use self::dispatch::dispatch_ordered;
pub use self::errors::{BinError, DispatchError};
pub use self::partition::partition_for_workers;
pub use self::random::{random_windows_by_chrom, sample_random_windows};
pub use self::tiling::{BinBuilder, tile_fixed};
