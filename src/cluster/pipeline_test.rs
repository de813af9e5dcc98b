#[cfg(test)]
mod tests {
    use crate::cluster::distance::{DistanceModel, EARTH_RADIUS_M};
    use crate::cluster::listing::{Category, Listing};
    use crate::cluster::pipeline::{
        ClusterOptions, ClusterOutput, MAX_INDIVIDUAL_MARKERS, cluster_listings,
    };
    use quickcheck::quickcheck;
    use serde_json::json;

    const LAT_DEGREE_M: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

    fn raw_listing(id: &str, lat: f64, lng: f64) -> Listing {
        serde_json::from_value(json!({
            "id": id,
            "displayCoordinates": [lat, lng],
        }))
        .expect("listing should deserialize")
    }

    fn raw_listing_with_category(id: &str, category: &str, lat: f64, lng: f64) -> Listing {
        serde_json::from_value(json!({
            "id": id,
            "category": category,
            "displayCoordinates": [lat, lng],
        }))
        .expect("listing should deserialize")
    }

    /// Distinct listings spread half a degree of latitude apart
    fn distant_listings(count: usize) -> Vec<Listing> {
        (0..count)
            .map(|i| raw_listing(&format!("l{i}"), -60.0 + i as f64 * 0.5, 100.0))
            .collect()
    }

    /// Collects how many times each listing index appears across
    /// clusters and the unclustered set
    fn occurrences(output: &ClusterOutput) -> Vec<usize> {
        let mut seen = vec![0usize; output.listings.len()];
        for cluster in &output.clusters {
            for &i in &cluster.members {
                seen[i] += 1;
            }
        }
        for &i in &output.unclustered {
            seen[i] += 1;
        }
        seen
    }

    fn membership_sets(output: &ClusterOutput) -> Vec<Vec<usize>> {
        let mut sets: Vec<Vec<usize>> = output
            .clusters
            .iter()
            .map(|c| {
                let mut m = c.members.clone();
                m.sort_unstable();
                m
            })
            .collect();
        sets.sort();
        sets
    }

    #[test]
    fn test_membership_exclusive_and_complete() {
        let mut raw = vec![
            // Same-location pair
            raw_listing("dup1", 52.52, 13.405),
            raw_listing("dup2", 52.52, 13.405),
            // Proximity pair, 300 m from each other but 5 km from the dupes
            raw_listing("near1", 52.52 + 5000.0 / LAT_DEGREE_M, 13.405),
            raw_listing("near2", 52.52 + 5300.0 / LAT_DEGREE_M, 13.405),
        ];
        raw.extend(distant_listings(8));

        let output = cluster_listings(&raw, &ClusterOptions { zoom: 9.0, ..Default::default() });

        assert!(occurrences(&output).iter().all(|&n| n == 1));
    }

    #[test]
    fn test_same_location_takes_precedence() {
        // dup1/dup2 collide exactly; near sits 100 m away, well inside
        // the zoom 9 threshold, but its neighbors are already grouped
        let mut raw = vec![
            raw_listing("dup1", 52.52, 13.405),
            raw_listing("dup2", 52.52, 13.405),
            raw_listing("near", 52.52 + 100.0 / LAT_DEGREE_M, 13.405),
        ];
        raw.extend(distant_listings(8));

        let output = cluster_listings(&raw, &ClusterOptions { zoom: 9.0, ..Default::default() });

        assert_eq!(output.clusters.len(), 1);
        assert!(output.clusters[0].id.starts_with("same-location-"));
        assert_eq!(output.clusters[0].members, vec![0, 1]);
        assert!(output.unclustered.contains(&2));
    }

    #[test]
    fn test_high_zoom_keeps_only_same_location_clusters() {
        let mut raw = distant_listings(50);
        raw.push(raw_listing("dup1", 10.0, 10.0));
        raw.push(raw_listing("dup2", 10.0, 10.0));

        let output = cluster_listings(&raw, &ClusterOptions { zoom: 14.0, ..Default::default() });

        assert_eq!(output.clusters.len(), 1);
        assert!(output.clusters[0].id.starts_with("same-location-"));
        assert_eq!(output.unclustered.len(), 50);
    }

    #[test]
    fn test_idempotent_membership() {
        let mut raw = vec![
            raw_listing("dup1", 48.85, 2.35),
            raw_listing("dup2", 48.85, 2.35),
            raw_listing("a", 48.86, 2.35),
            raw_listing("b", 48.87, 2.35),
            raw_listing("c", 48.88, 2.36),
        ];
        raw.extend(distant_listings(10));
        let options = ClusterOptions { zoom: 7.0, ..Default::default() };

        let first = cluster_listings(&raw, &options);
        let second = cluster_listings(&raw, &options);

        assert_eq!(membership_sets(&first), membership_sets(&second));
        assert_eq!(first.unclustered, second.unclustered);
    }

    #[test]
    fn test_volume_cap_when_clustering_disabled() {
        let raw = distant_listings(250);
        let options = ClusterOptions {
            clustering_enabled: false,
            ..Default::default()
        };

        let output = cluster_listings(&raw, &options);

        assert!(output.clusters.is_empty());
        assert_eq!(output.unclustered.len(), MAX_INDIVIDUAL_MARKERS);
        let expected: Vec<usize> = (0..MAX_INDIVIDUAL_MARKERS).collect();
        assert_eq!(output.unclustered, expected);
        assert!(output.truncated);
    }

    #[test]
    fn test_no_cap_under_limit_or_when_clustering() {
        let raw = distant_listings(150);
        let options = ClusterOptions {
            clustering_enabled: false,
            ..Default::default()
        };
        let output = cluster_listings(&raw, &options);
        assert_eq!(output.unclustered.len(), 150);
        assert!(!output.truncated);

        // The cap is a no-clustering guard only
        let raw = distant_listings(250);
        let output =
            cluster_listings(&raw, &ClusterOptions { zoom: 14.0, ..Default::default() });
        assert_eq!(output.unclustered.len(), 250);
        assert!(!output.truncated);
    }

    #[test]
    fn test_category_filter_applies_before_clustering() {
        let raw = vec![
            raw_listing_with_category("s1", "stay", 52.52, 13.405),
            raw_listing_with_category("v1", "vehicle", 52.52, 13.405),
            raw_listing_with_category("s2", "stay", 52.52, 13.405),
        ];

        let options = ClusterOptions {
            category: Some(Category::Stay),
            ..Default::default()
        };
        let output = cluster_listings(&raw, &options);

        assert_eq!(output.listings.len(), 2);
        assert!(output.listings.iter().all(|l| l.category == Some(Category::Stay)));
        // The two stays still collide on location
        assert_eq!(output.clusters.len(), 1);
        assert_eq!(output.clusters[0].members, vec![0, 1]);
    }

    #[test]
    fn test_distance_models_agree_end_to_end() {
        let mut raw = vec![
            raw_listing("a", 52.52, 13.405),
            raw_listing("b", 52.52 + 800.0 / LAT_DEGREE_M, 13.405),
            raw_listing("c", 52.52 + 4000.0 / LAT_DEGREE_M, 13.405),
        ];
        raw.extend(distant_listings(8));

        let spherical = cluster_listings(
            &raw,
            &ClusterOptions { zoom: 6.0, ..Default::default() },
        );
        let haversine = cluster_listings(
            &raw,
            &ClusterOptions {
                zoom: 6.0,
                distance_model: DistanceModel::Haversine,
                ..Default::default()
            },
        );

        assert_eq!(membership_sets(&spherical), membership_sets(&haversine));
        assert_eq!(spherical.unclustered, haversine.unclustered);
    }

    quickcheck! {
        fn prop_each_listing_rendered_exactly_once(coords: Vec<(i8, i8)>) -> bool {
            let raw: Vec<Listing> = coords
                .iter()
                .enumerate()
                .map(|(i, (a, b))| {
                    let lat = f64::from(i32::from(*a) % 80);
                    let lng = f64::from(i32::from(*b) % 170);
                    raw_listing(&format!("l{i}"), lat, lng)
                })
                .collect();

            let output =
                cluster_listings(&raw, &ClusterOptions { zoom: 6.0, ..Default::default() });
            occurrences(&output).iter().all(|&n| n == 1)
        }

        fn prop_pipeline_idempotent(coords: Vec<(i8, i8)>) -> bool {
            let raw: Vec<Listing> = coords
                .iter()
                .enumerate()
                .map(|(i, (a, b))| {
                    let lat = f64::from(i32::from(*a) % 80);
                    let lng = f64::from(i32::from(*b) % 170);
                    raw_listing(&format!("l{i}"), lat, lng)
                })
                .collect();

            let options = ClusterOptions { zoom: 9.0, ..Default::default() };
            let first = cluster_listings(&raw, &options);
            let second = cluster_listings(&raw, &options);
            membership_sets(&first) == membership_sets(&second)
                && first.unclustered == second.unclustered
        }
    }
}
