pub mod interval;
pub mod region;
pub mod strand;

// re-export for cleaner imports
pub use self::interval::Interval;
pub use self::region::{Bin, Region};
pub use self::strand::Strand;
