//! Query façade: "closest properties" and dataset statistics over a geocoded
//! listing set.

mod catalog;
mod report;

pub use catalog::Catalog;
pub use report::{AttributeStats, ClosestReport, StatisticsReport, TargetSection};

use crate::error::RequestError;
use crate::listing::{Listing, TargetPoint, CLINIC, SCHOOL};
use crate::ranker::{ListingFilter, ListingPredicate, Ranker};
use serde::Serialize;
use std::str::FromStr;

pub const DEFAULT_MAX_PRICE: f64 = 2_000_000.0;
pub const DEFAULT_MIN_ROOMS: f64 = 3.0;

/// Which fixed targets a query ranks against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSelector {
    Clinic,
    School,
    #[default]
    Both,
}

impl TargetSelector {
    pub fn targets(self) -> &'static [TargetPoint] {
        const CLINIC_ONLY: &[TargetPoint] = &[CLINIC];
        const SCHOOL_ONLY: &[TargetPoint] = &[SCHOOL];
        const BOTH: &[TargetPoint] = &[CLINIC, SCHOOL];
        match self {
            TargetSelector::Clinic => CLINIC_ONLY,
            TargetSelector::School => SCHOOL_ONLY,
            TargetSelector::Both => BOTH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetSelector::Clinic => "clinic",
            TargetSelector::School => "school",
            TargetSelector::Both => "both",
        }
    }
}

impl FromStr for TargetSelector {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clinic" => Ok(TargetSelector::Clinic),
            "school" => Ok(TargetSelector::School),
            "both" => Ok(TargetSelector::Both),
            _ => Err(RequestError::UnknownLocationType(s.to_string())),
        }
    }
}

/// Parameters of a closest-properties query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FindClosestRequest {
    pub location_type: TargetSelector,
    pub max_price: Option<f64>,
    pub min_rooms: Option<f64>,
}

impl Default for FindClosestRequest {
    fn default() -> Self {
        Self {
            location_type: TargetSelector::Both,
            max_price: Some(DEFAULT_MAX_PRICE),
            min_rooms: Some(DEFAULT_MIN_ROOMS),
        }
    }
}

impl FindClosestRequest {
    /// Build a request, validating the location type before anything runs.
    pub fn from_parts(
        location_type: Option<&str>,
        max_price: Option<f64>,
        min_rooms: Option<f64>,
    ) -> Result<Self, RequestError> {
        let location_type = match location_type {
            Some(raw) => raw.parse()?,
            None => TargetSelector::default(),
        };
        Ok(Self {
            location_type,
            max_price,
            min_rooms,
        })
    }

    /// Like `from_parts`, but a missing bound falls back to its default
    /// unless `unfiltered` is set.
    pub fn with_defaults(
        location_type: Option<&str>,
        max_price: Option<f64>,
        min_rooms: Option<f64>,
        unfiltered: bool,
    ) -> Result<Self, RequestError> {
        if unfiltered {
            return Self::from_parts(location_type, max_price, min_rooms);
        }
        Self::from_parts(
            location_type,
            Some(max_price.unwrap_or(DEFAULT_MAX_PRICE)),
            Some(min_rooms.unwrap_or(DEFAULT_MIN_ROOMS)),
        )
    }

    /// Drop both bounds.
    pub fn unfiltered(mut self) -> Self {
        self.max_price = None;
        self.min_rooms = None;
        self
    }

    pub fn filter(&self) -> ListingFilter {
        ListingFilter::new(self.max_price, self.min_rooms)
    }
}

/// Read-only view over a geocoded listing set.
#[derive(Debug, Clone, Copy)]
pub struct PropertyFinder<'a> {
    listings: &'a [Listing],
    ranker: Ranker,
}

impl<'a> PropertyFinder<'a> {
    pub fn new(listings: &'a [Listing]) -> Self {
        Self {
            listings,
            ranker: Ranker::default(),
        }
    }

    /// Rank the filtered listings against every requested target, each
    /// target independently.
    pub fn find_closest(&self, request: &FindClosestRequest) -> ClosestReport<'a> {
        let filter = request.filter();

        let sections = request
            .location_type
            .targets()
            .iter()
            .map(|target| TargetSection {
                target: target.clone(),
                results: self.ranker.rank_filtered(self.listings, target, &filter),
            })
            .collect();

        ClosestReport {
            sections,
            filter,
            matching: self.listings.iter().filter(|l| filter.accepts(l)).count(),
            total: self.listings.len(),
            unresolved: self
                .listings
                .iter()
                .filter(|l| l.coordinate().is_none())
                .count(),
        }
    }

    pub fn statistics(&self) -> StatisticsReport {
        StatisticsReport {
            total: self.listings.len(),
            resolved: self
                .listings
                .iter()
                .filter(|l| l.coordinate().is_some())
                .count(),
            price: AttributeStats::from_values(self.listings.iter().filter_map(Listing::price)),
            rooms: AttributeStats::from_values(self.listings.iter().filter_map(Listing::rooms)),
        }
    }
}
