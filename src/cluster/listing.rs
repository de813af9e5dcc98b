//! Listing records and coordinate normalization
//!
//! Listings arrive as JSON with several possible coordinate fields of
//! loosely controlled shape. The candidate fields are kept as raw
//! [`serde_json::Value`]s and tried through an ordered accessor chain;
//! the first candidate that is a two-element array of finite numbers
//! wins. Listings with no usable candidate are excluded from mapping,
//! which is a filtering decision, not an error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::point::Point;

/// Listing category, used as an optional search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stay,
    Vehicle,
}

impl Category {
    /// Parses a lowercase category name, `None` for anything unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stay" => Some(Category::Stay),
            "vehicle" => Some(Category::Vehicle),
            _ => None,
        }
    }

    #[allow(dead_code)] // Part of the public surface, used by renderers
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stay => "stay",
            Category::Vehicle => "vehicle",
        }
    }
}

/// Raw listing record as served by the listings endpoint
///
/// Only the fields relevant to mapping are modeled; coordinate
/// candidates stay untyped because their shape varies by record source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    /// Unknown category strings deserialize to `None` rather than
    /// failing the whole record
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Address object; its `coordinates` member is the preferred source
    #[serde(default)]
    pub address: Option<Value>,
    /// Precomputed display coordinate pair
    #[serde(default)]
    pub display_coordinates: Option<Value>,
    /// Generic location object with a `coordinates` member
    #[serde(default)]
    pub location: Option<Value>,
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::parse))
}

/// Listing with a validated coordinate, ready for grouping
#[derive(Debug, Clone)]
pub struct NormalizedListing {
    pub id: String,
    pub position: Point,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub view_count: Option<u64>,
}

/// Coordinate source accessors, tried in priority order
///
/// Address-embedded pair first, then the precomputed display pair, then
/// the generic location pair. The first accessor whose value parses as
/// a valid pair wins.
const COORDINATE_SOURCES: [fn(&Listing) -> Option<&Value>; 3] = [
    address_coordinates,
    display_coordinates,
    location_coordinates,
];

fn address_coordinates(listing: &Listing) -> Option<&Value> {
    listing.address.as_ref()?.get("coordinates")
}

fn display_coordinates(listing: &Listing) -> Option<&Value> {
    listing.display_coordinates.as_ref()
}

fn location_coordinates(listing: &Listing) -> Option<&Value> {
    listing.location.as_ref()?.get("coordinates")
}

/// Parses a candidate coordinate value into a point
///
/// Valid only if the value is an array of exactly two finite numbers,
/// ordered `[lat, lng]`. Everything else is rejected.
fn parse_pair(value: &Value) -> Option<Point> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let lat = pair[0].as_f64()?;
    let lng = pair[1].as_f64()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some(Point::new(lat, lng))
}

/// Normalizes a single listing, `None` if it cannot appear on the map
///
/// An active category filter excludes non-matching listings regardless
/// of coordinate validity; listings without a category never match a
/// filter.
pub fn normalize_listing(listing: &Listing, filter: Option<Category>) -> Option<NormalizedListing> {
    if let Some(wanted) = filter {
        if listing.category != Some(wanted) {
            return None;
        }
    }

    let position = COORDINATE_SOURCES
        .iter()
        .find_map(|source| source(listing).and_then(parse_pair))?;

    Some(NormalizedListing {
        id: listing.id.clone(),
        position,
        category: listing.category,
        price: listing.price,
        view_count: listing.view_count,
    })
}

/// Normalizes a batch of listings, silently dropping unusable ones
pub fn normalize_listings(listings: &[Listing], filter: Option<Category>) -> Vec<NormalizedListing> {
    listings
        .iter()
        .filter_map(|listing| normalize_listing(listing, filter))
        .collect()
}
