//! Top-K ranking of listings by distance to a target.
//!
//! Order of operations is fixed: filter, drop unresolved, measure, stable
//! sort ascending, truncate. Inputs are never mutated; every pass returns
//! fresh `(listing, distance)` pairs for its own target.

use crate::distance::geodesic_distance;
use crate::listing::{Listing, TargetPoint};
use serde::Serialize;
use std::num::NonZeroUsize;

pub const DEFAULT_TOP_K: usize = 3;

const DEFAULT_K: NonZeroUsize = match NonZeroUsize::new(DEFAULT_TOP_K) {
    Some(k) => k,
    None => panic!("DEFAULT_TOP_K must be positive"),
};

/// Anything that can accept or reject a listing.
pub trait ListingPredicate {
    fn accepts(&self, listing: &Listing) -> bool;
}

impl<F> ListingPredicate for F
where
    F: Fn(&Listing) -> bool,
{
    fn accepts(&self, listing: &Listing) -> bool {
        self(listing)
    }
}

/// Price/room bounds. A listing without the attribute always passes that bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ListingFilter {
    pub max_price: Option<f64>,
    pub min_rooms: Option<f64>,
}

impl ListingFilter {
    pub fn new(max_price: Option<f64>, min_rooms: Option<f64>) -> Self {
        Self {
            max_price,
            min_rooms,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_price.is_none() && self.min_rooms.is_none()
    }
}

impl ListingPredicate for ListingFilter {
    fn accepts(&self, listing: &Listing) -> bool {
        let price_ok = match (self.max_price, listing.price()) {
            (Some(max), Some(price)) => price <= max,
            _ => true,
        };
        let rooms_ok = match (self.min_rooms, listing.rooms()) {
            (Some(min), Some(rooms)) => rooms >= min,
            _ => true,
        };
        price_ok && rooms_ok
    }
}

/// One entry of a ranking: the listing and its distance to the ranked target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedListing<'a> {
    pub listing: &'a Listing,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    k: NonZeroUsize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self { k: DEFAULT_K }
    }
}

impl Ranker {
    pub fn new(k: NonZeroUsize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k.get()
    }

    /// Rank every resolved listing.
    pub fn rank<'a>(&self, listings: &'a [Listing], target: &TargetPoint) -> Vec<RankedListing<'a>> {
        self.rank_filtered(listings, target, &|_: &Listing| true)
    }

    /// Rank the listings accepted by `predicate`.
    pub fn rank_filtered<'a, P>(
        &self,
        listings: &'a [Listing],
        target: &TargetPoint,
        predicate: &P,
    ) -> Vec<RankedListing<'a>>
    where
        P: ListingPredicate + ?Sized,
    {
        let origin = target.coordinate();

        let mut ranked: Vec<RankedListing<'a>> = listings
            .iter()
            .filter(|listing| predicate.accepts(listing))
            .filter_map(|listing| {
                listing.coordinate().map(|coordinate| RankedListing {
                    listing,
                    distance_m: geodesic_distance(coordinate, origin),
                })
            })
            .collect();

        // `sort_by` is stable, so equal distances keep input order.
        ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        ranked.truncate(self.k.get());
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Coordinate;

    const TARGET: TargetPoint = TargetPoint::new("origin", "Origin", 0.0, 0.0);

    /// Meters per degree of latitude near the equator on WGS-84.
    const M_PER_DEG_LAT: f64 = 110_574.389;

    fn at_distance(name: &str, meters: f64) -> Listing {
        let lat = meters / M_PER_DEG_LAT;
        Listing::new("Haifa", name, "1").with_coordinate(Coordinate::new(lat, 0.0).unwrap())
    }

    fn k(n: usize) -> Ranker {
        Ranker::new(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn test_five_listings_two_unresolved() {
        let listings = vec![
            at_distance("Hundred", 100.0),
            Listing::new("Haifa", "Lost", "1"),
            at_distance("TwoFifty", 250.0),
            Listing::new("Haifa", "Gone", "2"),
            at_distance("Fifty", 50.0),
        ];

        let ranked = k(3).rank(&listings, &TARGET);
        let streets: Vec<&str> = ranked.iter().map(|r| r.listing.street()).collect();
        assert_eq!(streets, vec!["Fifty", "Hundred", "TwoFifty"]);
        assert!((ranked[0].distance_m - 50.0).abs() < 0.01);
        assert!((ranked[1].distance_m - 100.0).abs() < 0.01);
        assert!((ranked[2].distance_m - 250.0).abs() < 0.01);
    }

    #[test]
    fn test_length_bounded_and_sorted() {
        let listings: Vec<Listing> = [700.0, 20.0, 350.0, 90.0, 1200.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, m)| at_distance(&format!("S{}", i), *m))
            .collect();

        for n in 1..=8 {
            let ranked = k(n).rank(&listings, &TARGET);
            assert_eq!(ranked.len(), n.min(listings.len()));
            assert!(ranked
                .windows(2)
                .all(|w| w[0].distance_m <= w[1].distance_m));
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let listings = vec![
            at_distance("First", 100.0),
            at_distance("Second", 100.0),
            at_distance("Third", 100.0),
            at_distance("Near", 10.0),
        ];
        let ranked = k(3).rank(&listings, &TARGET);
        let streets: Vec<&str> = ranked.iter().map(|r| r.listing.street()).collect();
        assert_eq!(streets, vec!["Near", "First", "Second"]);
    }

    #[test]
    fn test_filter_applies_before_truncation() {
        let listings = vec![
            at_distance("Cheap far", 900.0).with_price(1_000_000.0),
            at_distance("Pricey near", 10.0).with_price(5_000_000.0),
        ];
        let filter = ListingFilter::new(Some(2_000_000.0), None);
        let ranked = k(1).rank_filtered(&listings, &TARGET, &filter);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].listing.street(), "Cheap far");
    }

    #[test]
    fn test_absent_attributes_pass_filter() {
        let filter = ListingFilter::new(Some(1.0), Some(10.0));
        let bare = Listing::new("Haifa", "Herzl", "1");
        assert!(filter.accepts(&bare));
        assert!(filter.accepts(&bare.clone().with_price(0.5)));
        assert!(!filter.accepts(&bare.clone().with_price(2.0)));
        assert!(!filter.accepts(&bare.with_rooms(3.0)));
    }

    #[test]
    fn test_price_and_rooms_scenario() {
        let listings = vec![
            at_distance("One", 10.0).with_price(1_500_000.0),
            at_distance("Two", 20.0).with_price(2_500_000.0),
            at_distance("Three", 30.0).with_price(1_800_000.0).with_rooms(4.0),
        ];
        let filter = ListingFilter::new(Some(2_000_000.0), Some(3.0));
        let ranked = k(3).rank_filtered(&listings, &TARGET, &filter);
        let streets: Vec<&str> = ranked.iter().map(|r| r.listing.street()).collect();
        assert_eq!(streets, vec!["One", "Three"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = ListingFilter::new(Some(2_000_000.0), Some(3.0));
        let edge = Listing::new("Haifa", "Edge", "1")
            .with_price(2_000_000.0)
            .with_rooms(3.0);
        assert!(filter.accepts(&edge));
    }

    #[test]
    fn test_closure_predicate() {
        let listings = vec![at_distance("Keep", 10.0), at_distance("Drop", 5.0)];
        let ranked = k(3).rank_filtered(&listings, &TARGET, &|l: &Listing| l.street() == "Keep");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].listing.street(), "Keep");
    }

    #[test]
    fn test_unresolved_never_ranked() {
        let listings = vec![Listing::new("Haifa", "A", "1"), Listing::new("Haifa", "B", "2")];
        assert!(k(3).rank(&listings, &TARGET).is_empty());
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        assert!(Ranker::default().rank(&[], &TARGET).is_empty());
    }

    #[test]
    fn test_ranking_two_targets_independent() {
        let north = TargetPoint::new("north", "North", 0.01, 0.0);
        let listings = vec![at_distance("Low", 0.0), at_distance("High", 1105.74)];

        let from_origin = Ranker::default().rank(&listings, &TARGET);
        let from_north = Ranker::default().rank(&listings, &north);

        assert_eq!(from_origin[0].listing.street(), "Low");
        assert_eq!(from_north[0].listing.street(), "High");
        // Inputs are untouched between passes.
        assert_eq!(listings[0].coordinate().map(|c| c.lat), Some(0.0));
    }

    #[test]
    fn test_default_k_is_three() {
        assert_eq!(Ranker::default().k(), 3);
    }
}
