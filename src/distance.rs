//! Geodesic distance on the WGS-84 ellipsoid.
//!
//! Delegates to Karney's algorithm through `geo`, accurate to a few
//! nanometres and symmetric in its arguments.

use crate::listing::Coordinate;
use geo::{Distance, Geodesic, Point};

/// Shortest distance in meters between two coordinates along the ellipsoid.
pub fn geodesic_distance(a: Coordinate, b: Coordinate) -> f64 {
    // Fixed argument order makes the result bit-for-bit symmetric.
    let (first, second) = if (a.lat, a.lon) <= (b.lat, b.lon) {
        (a, b)
    } else {
        (b, a)
    };
    let from = Point::new(first.lon, first.lat);
    let to = Point::new(second.lon, second.lat);
    Geodesic::distance(from, to).abs()
}
