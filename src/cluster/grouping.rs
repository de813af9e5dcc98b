//! Same-location grouping and the duplicate-coordinate offset variant
//!
//! Exact coordinate collisions (several units at one building) are
//! handled separately from proximity clustering. The search map merges
//! them into same-location clusters; the alternate renderer keeps them
//! as individual markers and fans them out around a small circle
//! instead. A renderer uses one strategy or the other, never both.

use std::collections::HashMap;
use std::f64::consts::PI;

use bitvec::prelude::*;

use super::listing::NormalizedListing;
use super::point::{Cluster, Point};

/// Radius of the duplicate fan-out circle in degrees (~22 m)
pub const DUPLICATE_OFFSET_DEG: f64 = 0.0002;

/// Groups listing indices by their rounded location key, preserving
/// first-seen key order
fn indices_by_location(
    listings: &[NormalizedListing],
) -> (Vec<String>, HashMap<String, Vec<usize>>) {
    let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
    let mut key_order = Vec::new();

    for (i, listing) in listings.iter().enumerate() {
        let key = listing.position.location_key();
        let members = by_key.entry(key.clone()).or_default();
        if members.is_empty() {
            key_order.push(key);
        }
        members.push(i);
    }

    (key_order, by_key)
}

/// Clusters listings that share a location key
///
/// Runs at every zoom level, before and independently of distance
/// clustering. Keys with a single listing are left alone; they stay
/// available for the distance stage.
///
/// # Returns
///
/// A tuple `(clusters, grouped)` where:
/// - `clusters` are the same-location clusters in first-seen key order,
///   with ids `"same-location-<lat>,<lng>"`
/// - `grouped` marks the indices absorbed here, so the distance
///   clusterer skips them
pub fn group_same_location(listings: &[NormalizedListing]) -> (Vec<Cluster>, BitVec) {
    let (key_order, by_key) = indices_by_location(listings);

    let mut grouped = bitvec![0; listings.len()];
    let mut clusters = Vec::new();

    for key in &key_order {
        let members = &by_key[key];
        if members.len() < 2 {
            continue;
        }
        for &i in members {
            grouped.set(i, true);
        }
        let position = listings[members[0]].position;
        clusters.push(Cluster::new(
            format!("same-location-{key}"),
            position,
            members.clone(),
        ));
    }

    (clusters, grouped)
}

/// Fans out listings sharing a location around a small circle
///
/// Member `i` of an n-listing group moves to
/// `angle = 2π·i/n`, `(lat + R·sin(angle), lng + R·cos(angle))` with
/// `R` = [`DUPLICATE_OFFSET_DEG`], so overlapping markers become
/// individually clickable without merging their identities.
///
/// # Returns
///
/// One position per input listing, index-aligned; listings at a unique
/// location keep their original position.
#[allow(dead_code)] // Alternate renderer entry point, not used by the CLI
pub fn offset_duplicates(listings: &[NormalizedListing]) -> Vec<Point> {
    let (_, by_key) = indices_by_location(listings);

    let mut positions: Vec<Point> = listings.iter().map(|l| l.position).collect();

    for members in by_key.values() {
        if members.len() < 2 {
            continue;
        }
        let n = members.len() as f64;
        for (slot, &i) in members.iter().enumerate() {
            let angle = 2.0 * PI * slot as f64 / n;
            let base = listings[i].position;
            positions[i] = Point::new(
                base.lat + DUPLICATE_OFFSET_DEG * angle.sin(),
                base.lng + DUPLICATE_OFFSET_DEG * angle.cos(),
            );
        }
    }

    positions
}
