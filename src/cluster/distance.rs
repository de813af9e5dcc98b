//! Great-circle distance between listing coordinates
//!
//! Two interchangeable models are provided. The spherical law of cosines
//! is the default; the Haversine formula is the fallback model and must
//! agree with it to within floating-point tolerance at clustering scales
//! (a few kilometers), so switching models never changes cluster shapes.

use super::point::Point;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Selects which great-circle formula the clusterer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceModel {
    #[default]
    Spherical,
    Haversine,
}

impl DistanceModel {
    /// Distance between two points in meters under this model
    pub fn measure(&self, a: &Point, b: &Point) -> f64 {
        match self {
            DistanceModel::Spherical => distance_spherical(a, b),
            DistanceModel::Haversine => distance_haversine(a, b),
        }
    }
}

/// Great-circle distance via the spherical law of cosines
///
/// # Returns
///
/// Distance in meters
pub fn distance_spherical(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let central = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos();
    // Rounding can push the cosine a hair outside [-1, 1] for near-identical
    // points, which would make acos return NaN
    EARTH_RADIUS_M * central.clamp(-1.0, 1.0).acos()
}

/// Great-circle distance via the Haversine formula
///
/// # Returns
///
/// Distance in meters
pub fn distance_haversine(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
