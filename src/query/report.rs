//! Text and JSON shapes of the two façade reports.

use crate::listing::{format_rooms, format_shekels, TargetPoint};
use crate::ranker::{ListingFilter, RankedListing};
use serde::Serialize;
use std::fmt;

/// Ranked results for one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSection<'a> {
    pub target: TargetPoint,
    pub results: Vec<RankedListing<'a>>,
}

/// Output of `find_closest`.
#[derive(Debug, Clone, Serialize)]
pub struct ClosestReport<'a> {
    pub sections: Vec<TargetSection<'a>>,
    pub filter: ListingFilter,
    /// Listings accepted by the filter, resolved or not.
    pub matching: usize,
    pub total: usize,
    /// Listings without a coordinate.
    pub unresolved: usize,
}

impl fmt::Display for ClosestReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "Closest to {}:", section.target.label())?;
            if section.results.is_empty() {
                writeln!(f, "No properties found matching your criteria.")?;
            }
            for (rank, entry) in section.results.iter().enumerate() {
                writeln!(f, "{}. {} - {:.1} m", rank + 1, entry.listing, entry.distance_m)?;
            }
            writeln!(f)?;
        }

        let max_price = self
            .filter
            .max_price
            .map(format_shekels)
            .unwrap_or_else(|| "any".to_string());
        let min_rooms = self
            .filter
            .min_rooms
            .map(format_rooms)
            .unwrap_or_else(|| "any".to_string());
        writeln!(f, "Filters applied: max price {}, min rooms {}", max_price, min_rooms)?;
        write!(f, "Found {} properties out of {} total", self.matching, self.total)?;
        if self.unresolved > 0 {
            write!(f, " ({} could not be geocoded)", self.unresolved)?;
        }
        Ok(())
    }
}

/// count/mean/min/max of one attribute over the listings that have it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttributeStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AttributeStats {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            mean: Some(sum / count as f64),
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Output of `statistics`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total: usize,
    pub resolved: usize,
    pub price: AttributeStats,
    pub rooms: AttributeStats,
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Property dataset statistics")?;
        writeln!(f, "Total properties: {}", self.total)?;
        writeln!(f, "Geocoded: {}", self.resolved)?;

        writeln!(f)?;
        writeln!(f, "Prices ({} listed):", self.price.count)?;
        match (self.price.mean, self.price.min, self.price.max) {
            (Some(mean), Some(min), Some(max)) => {
                writeln!(f, "Average: {}", format_shekels(mean))?;
                writeln!(f, "Range: {} - {}", format_shekels(min), format_shekels(max))?;
            }
            _ => writeln!(f, "No price data")?,
        }

        writeln!(f)?;
        writeln!(f, "Rooms ({} listed):", self.rooms.count)?;
        match (self.rooms.mean, self.rooms.min, self.rooms.max) {
            (Some(mean), Some(min), Some(max)) => {
                writeln!(f, "Average: {:.1}", mean)?;
                write!(f, "Range: {} - {}", format_rooms(min), format_rooms(max))
            }
            _ => write!(f, "No room data"),
        }
    }
}
