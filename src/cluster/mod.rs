//! Package cluster turns rental listings into map marker clusters
pub mod distance;
pub mod greedy;
pub mod grouping;
pub mod listing;
pub mod pipeline;
pub mod point;

#[cfg(test)]
mod pipeline_test;

pub use distance::DistanceModel;
pub use pipeline::{ClusterOptions, ClusterOutput, cluster_listings};
// Public API exports - allow unused imports as the CLI only consumes a subset
#[allow(unused_imports)]
pub use listing::{Category, Listing, NormalizedListing};
#[allow(unused_imports)]
pub use point::{Cluster, Point, SizeTier};
// Stage entry points, exposed for renderers that drive the stages
// separately (offset variant, custom merge order)
#[allow(unused_imports)]
pub use greedy::{cluster_by_distance, threshold_for_zoom};
#[allow(unused_imports)]
pub use grouping::{group_same_location, offset_duplicates};
