//! Core geometry and cluster types shared by the grouping stages

/// Point represents a geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// Decimal places used when rounding coordinates into a grouping key
///
/// Six decimal places is roughly 0.1 m of resolution, enough to treat
/// listings at the same building as one location without merging
/// genuinely distinct addresses.
pub const KEY_PRECISION: usize = 6;

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Point { lat, lng }
    }

    /// Returns the rounded grouping key `"<lat>,<lng>"` at [`KEY_PRECISION`]
    ///
    /// Two points with the same key are considered to occupy the same
    /// location for same-location grouping and duplicate offsetting.
    pub fn location_key(&self) -> String {
        format!(
            "{:.prec$},{:.prec$}",
            self.lat,
            self.lng,
            prec = KEY_PRECISION
        )
    }
}

/// Size tier of a cluster, derived from its member count
///
/// Presentation-only: the map renderer picks a marker icon size from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    /// Classifies a member count into a tier
    ///
    /// `Large` at 10 or more members, `Medium` at 5 or more, `Small`
    /// otherwise. Callers never construct clusters of fewer than 2 members.
    pub fn from_member_count(count: usize) -> Self {
        if count >= 10 {
            SizeTier::Large
        } else if count >= 5 {
            SizeTier::Medium
        } else {
            SizeTier::Small
        }
    }

    /// Lowercase label used in CSV output
    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        }
    }
}

/// Cluster represents a group of 2+ listings rendered as a single marker
///
/// Clusters are ephemeral: they are recomputed from scratch whenever the
/// listing set, zoom level, or category filter changes, and carry no
/// identity across recomputations beyond the derived `id` string.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// `"same-location-<lat>,<lng>"` or `"cluster-<n>"`
    pub id: String,
    /// Representative coordinate: the shared location for same-location
    /// clusters, the seed member's position for distance-based ones
    pub position: Point,
    /// Indices into the normalized listing slice, in input order
    pub members: Vec<usize>,
    pub size_tier: SizeTier,
}

impl Cluster {
    /// Builds a cluster from its members, deriving the size tier
    ///
    /// # Panics
    ///
    /// Panics if `members` has fewer than 2 entries; singletons are never
    /// clusters.
    pub fn new(id: String, position: Point, members: Vec<usize>) -> Self {
        assert!(members.len() >= 2, "cluster needs at least 2 members");
        let size_tier = SizeTier::from_member_count(members.len());
        Cluster {
            id,
            position,
            members,
            size_tier,
        }
    }
}
