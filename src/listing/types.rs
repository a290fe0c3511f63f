//! Core types for listings and points of interest.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid degree ranges.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
        {
            Some(Self { lat, lon })
        } else {
            None
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A named point of interest that listings are measured against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPoint {
    name: &'static str,
    label: &'static str,
    coordinate: Coordinate,
}

impl TargetPoint {
    pub const fn new(name: &'static str, label: &'static str, lat: f64, lon: f64) -> Self {
        Self {
            name,
            label,
            coordinate: Coordinate { lat, lon },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Heading used in reports ("Clinic", "School").
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

pub const CLINIC: TargetPoint = TargetPoint::new("clinic", "Clinic", 32.807, 35.043);
pub const SCHOOL: TargetPoint = TargetPoint::new("school", "School", 32.802, 35.048);

/// A property listing.
///
/// The address fields are fixed at construction. `coordinate` starts out empty
/// and is filled in by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    city: String,
    street: String,
    house_number: String,
    price: Option<f64>,
    rooms: Option<f64>,
    coordinate: Option<Coordinate>,
}

impl Listing {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        house_number: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            house_number: house_number.into(),
            price: None,
            rooms: None,
            coordinate: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_rooms(mut self, rooms: f64) -> Self {
        self.rooms = Some(rooms);
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn house_number(&self) -> &str {
        &self.house_number
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn rooms(&self) -> Option<f64> {
        self.rooms
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub(crate) fn set_coordinate(&mut self, coordinate: Option<Coordinate>) {
        self.coordinate = coordinate;
    }

    /// "Herzl 12, Haifa"
    pub fn short_address(&self) -> String {
        format!("{} {}, {}", self.street, self.house_number, self.city)
    }

    /// Free-text query sent to the geocoder, e.g. "Herzl 12, Haifa, Israel".
    pub fn geocode_query(&self, country: Option<&str>) -> String {
        match country {
            Some(country) if !country.trim().is_empty() => {
                format!("{}, {}", self.short_address(), country.trim())
            }
            _ => self.short_address(),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_address())?;
        if let Some(rooms) = self.rooms {
            write!(f, ", {} rooms", format_rooms(rooms))?;
        }
        if let Some(price) = self.price {
            write!(f, ", {}", format_shekels(price))?;
        }
        Ok(())
    }
}

/// Render a room count without a trailing ".0" ("3", "3.5").
pub fn format_rooms(rooms: f64) -> String {
    if rooms.fract() == 0.0 {
        format!("{:.0}", rooms)
    } else {
        format!("{}", rooms)
    }
}

/// Render an amount as whole shekels with thousands separators ("₪1,500,000").
pub fn format_shekels(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-\u{20AA}{}", grouped)
    } else {
        format!("\u{20AA}{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_range_checks() {
        assert!(Coordinate::new(32.8, 35.0).is_some());
        assert!(Coordinate::new(90.0, 180.0).is_some());
        assert!(Coordinate::new(90.1, 0.0).is_none());
        assert!(Coordinate::new(0.0, -180.5).is_none());
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_geocode_query_appends_country() {
        let listing = Listing::new("Haifa", "Herzl", "12");
        assert_eq!(listing.geocode_query(Some("Israel")), "Herzl 12, Haifa, Israel");
        assert_eq!(listing.geocode_query(None), "Herzl 12, Haifa");
        assert_eq!(listing.geocode_query(Some("  ")), "Herzl 12, Haifa");
    }

    #[test]
    fn test_display_includes_optional_attributes() {
        let bare = Listing::new("Haifa", "Herzl", "12");
        assert_eq!(bare.to_string(), "Herzl 12, Haifa");

        let full = Listing::new("Haifa", "Herzl", "12")
            .with_rooms(3.5)
            .with_price(1_850_000.0);
        assert_eq!(full.to_string(), "Herzl 12, Haifa, 3.5 rooms, \u{20AA}1,850,000");
    }

    #[test]
    fn test_format_shekels_grouping() {
        assert_eq!(format_shekels(0.0), "\u{20AA}0");
        assert_eq!(format_shekels(999.0), "\u{20AA}999");
        assert_eq!(format_shekels(1000.0), "\u{20AA}1,000");
        assert_eq!(format_shekels(2_000_000.0), "\u{20AA}2,000,000");
        assert_eq!(format_shekels(1_234_567.4), "\u{20AA}1,234,567");
    }

    #[test]
    fn test_format_rooms() {
        assert_eq!(format_rooms(4.0), "4");
        assert_eq!(format_rooms(2.5), "2.5");
    }

    #[test]
    fn test_fixed_targets() {
        assert_eq!(CLINIC.name(), "clinic");
        assert!((CLINIC.coordinate().lat - 32.807).abs() < 1e-9);
        assert_eq!(SCHOOL.label(), "School");
        assert!((SCHOOL.coordinate().lon - 35.048).abs() < 1e-9);
    }
}
