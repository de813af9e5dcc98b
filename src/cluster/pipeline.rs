//! Full clustering pipeline: normalize, group, cluster, cap
//!
//! A pure function of (listings, zoom, category filter, flags). No
//! internal state survives between invocations; the caller recomputes
//! on every relevant input change.

use super::distance::DistanceModel;
use super::greedy::cluster_by_distance;
use super::grouping::group_same_location;
use super::listing::{Category, Listing, NormalizedListing, normalize_listings};
use super::point::Cluster;

/// Cap on individually rendered markers when clustering is disabled
///
/// A performance guard for the map renderer, not a correctness rule:
/// listings beyond the cap are dropped from the output with a logged
/// warning, never an error.
pub const MAX_INDIVIDUAL_MARKERS: usize = 200;

/// Inputs controlling a clustering pass
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    pub zoom: f64,
    pub category: Option<Category>,
    pub clustering_enabled: bool,
    pub distance_model: DistanceModel,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            zoom: 12.0,
            category: None,
            clustering_enabled: true,
            distance_model: DistanceModel::default(),
        }
    }
}

/// Result of a clustering pass
#[derive(Debug)]
pub struct ClusterOutput {
    /// Normalized listings the indices below refer to
    pub listings: Vec<NormalizedListing>,
    /// Same-location clusters first, then distance clusters
    pub clusters: Vec<Cluster>,
    /// Indices rendered as individual markers, in input order
    pub unclustered: Vec<usize>,
    /// True when the marker cap dropped listings from `unclustered`
    pub truncated: bool,
}

/// Runs the full pipeline over raw listings
///
/// Normalization always runs. With clustering enabled, same-location
/// grouping runs first and its members are excluded from the distance
/// stage, so no listing ends up in two clusters. With clustering
/// disabled, every listing is an individual marker, subject to
/// [`MAX_INDIVIDUAL_MARKERS`].
pub fn cluster_listings(raw: &[Listing], options: &ClusterOptions) -> ClusterOutput {
    let listings = normalize_listings(raw, options.category);

    if !options.clustering_enabled {
        let mut unclustered: Vec<usize> = (0..listings.len()).collect();
        let truncated = unclustered.len() > MAX_INDIVIDUAL_MARKERS;
        if truncated {
            log::warn!(
                "{} listings exceed the individual marker cap of {}, dropping {}",
                unclustered.len(),
                MAX_INDIVIDUAL_MARKERS,
                unclustered.len() - MAX_INDIVIDUAL_MARKERS
            );
            unclustered.truncate(MAX_INDIVIDUAL_MARKERS);
        }
        return ClusterOutput {
            listings,
            clusters: Vec::new(),
            unclustered,
            truncated,
        };
    }

    let (mut clusters, grouped) = group_same_location(&listings);
    let distance_clusters =
        cluster_by_distance(&listings, &grouped, options.zoom, options.distance_model);

    let mut in_cluster = grouped;
    for cluster in &distance_clusters {
        for &i in &cluster.members {
            in_cluster.set(i, true);
        }
    }
    clusters.extend(distance_clusters);

    let unclustered = (0..listings.len()).filter(|&i| !in_cluster[i]).collect();

    ClusterOutput {
        listings,
        clusters,
        unclustered,
        truncated: false,
    }
}
