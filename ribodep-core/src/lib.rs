//! Core models and parsing shared by every ribodep crate.
//!
//! The records here are deliberately small: an [`Interval`](models::Interval) is a pair of
//! coordinates, a [`Region`](models::Region) adds the chromosome name, and a
//! [`Bin`](models::Bin) is simply a region produced by tiling. Constructors validate
//! `start <= end` so malformed coordinates surface as errors instead of silently
//! producing empty or inverted spans.
//!
//! Annotation files (BED-like or GTF) are read through [`utils::read_annotation_file`],
//! which fails the whole load on the first malformed line.
//!
//! ```rust
//! use ribodep_core::models::{Interval, Region};
//!
//! let iv = Interval::new(100, 200).unwrap();
//! assert!(iv.contains(150));
//! assert!(!iv.contains(100));
//!
//! let region = Region::new("chr1", 10, 20).unwrap();
//! assert_eq!(region.width(), 10);
//! ```
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;
