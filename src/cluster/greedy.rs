//! Greedy zoom-banded distance clustering
//!
//! A deliberately simple O(n²) pass: each unassigned listing seeds a
//! cluster and absorbs every later unassigned listing within the zoom
//! band's threshold. Acceptable because the marker volume cap bounds n
//! and the whole pass is recomputed wholesale on input changes rather
//! than maintained incrementally.

use bitvec::prelude::*;

use super::distance::DistanceModel;
use super::listing::NormalizedListing;
use super::point::Cluster;

/// Above this zoom level markers are dense enough on screen that
/// proximity clustering stops
pub const MAX_CLUSTER_ZOOM: f64 = 13.0;

/// Below this many listings clustering is not worth doing
pub const MIN_LISTINGS_FOR_CLUSTERING: usize = 10;

/// Clustering radius in meters for a zoom level
///
/// Three discrete bands, no interpolation: 5000 m below zoom 8, 2000 m
/// below zoom 10, 1000 m from there up.
pub fn threshold_for_zoom(zoom: f64) -> f64 {
    if zoom < 8.0 {
        5000.0
    } else if zoom < 10.0 {
        2000.0
    } else {
        1000.0
    }
}

/// Clusters listings by great-circle proximity
///
/// # Arguments
///
/// * `listings` - The full normalized listing slice
/// * `grouped` - Indices already absorbed by same-location clusters;
///   they are never considered here
/// * `zoom` - Current map zoom level
/// * `model` - Distance formula to use
///
/// # Returns
///
/// Proximity clusters with sequential ids `"cluster-<n>"`, each
/// positioned at its seed member's coordinate. Empty when `zoom` is
/// above [`MAX_CLUSTER_ZOOM`] or fewer than
/// [`MIN_LISTINGS_FOR_CLUSTERING`] listings are on the map. Seeds that
/// absorb nothing are released back as individual markers.
pub fn cluster_by_distance(
    listings: &[NormalizedListing],
    grouped: &BitSlice,
    zoom: f64,
    model: DistanceModel,
) -> Vec<Cluster> {
    if zoom > MAX_CLUSTER_ZOOM || listings.len() < MIN_LISTINGS_FOR_CLUSTERING {
        return Vec::new();
    }

    let threshold = threshold_for_zoom(zoom);
    let mut assigned = grouped.to_bitvec();
    let mut clusters = Vec::new();

    for i in 0..listings.len() {
        if assigned[i] {
            continue;
        }
        assigned.set(i, true);

        let seed = listings[i].position;
        let mut members = vec![i];
        for j in (i + 1)..listings.len() {
            if assigned[j] {
                continue;
            }
            if model.measure(&seed, &listings[j].position) < threshold {
                assigned.set(j, true);
                members.push(j);
            }
        }

        if members.len() >= 2 {
            let id = format!("cluster-{}", clusters.len());
            clusters.push(Cluster::new(id, seed, members));
        } else {
            // Barren seed collapses back into an individual marker
            assigned.set(i, false);
        }
    }

    clusters
}
