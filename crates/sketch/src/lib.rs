//! Count-min sketch and the frequency trackers built on top of it.

pub mod count_min;
pub mod heavy_hitters;

pub use count_min::{CountMinSketch, QueryStrategy};
pub use heavy_hitters::{HeavyHitters, StreamThreshold};
