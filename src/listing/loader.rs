//! CSV listing loader.
//!
//! Expected header: `city,street,number,price,rooms`. The room column is also
//! accepted as `property_rooms`. Blank cells mean "attribute absent", never zero.

use super::types::Listing;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("cannot open listings file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed listings csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: {field} '{value}' is not a number")]
    NotANumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: price {value} is negative")]
    NegativePrice { row: usize, value: f64 },
    #[error("row {row}: room count {value} must be positive")]
    NonPositiveRooms { row: usize, value: f64 },
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(default)]
    city: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    number: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(default, alias = "property_rooms", deserialize_with = "empty_string_as_none")]
    rooms: Option<String>,
}

impl ListingRow {
    fn into_listing(self, row: usize) -> Result<Listing, ListingError> {
        let city = required(self.city, row, "city")?;
        let street = required(self.street, row, "street")?;
        let number = required(self.number, row, "number")?;

        let mut listing = Listing::new(city, street, number);

        if let Some(raw) = self.price {
            let value = parse_amount(&raw).ok_or_else(|| ListingError::NotANumber {
                row,
                field: "price",
                value: raw.clone(),
            })?;
            if value < 0.0 {
                return Err(ListingError::NegativePrice { row, value });
            }
            listing = listing.with_price(value);
        }

        if let Some(raw) = self.rooms {
            let value: f64 = raw.trim().parse().map_err(|_| ListingError::NotANumber {
                row,
                field: "rooms",
                value: raw.clone(),
            })?;
            if !(value > 0.0) {
                return Err(ListingError::NonPositiveRooms { row, value });
            }
            listing = listing.with_rooms(value);
        }

        Ok(listing)
    }
}

fn required(value: String, row: usize, field: &'static str) -> Result<String, ListingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ListingError::MissingField { row, field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Accepts "1500000", "1,500,000", "₪1,500,000" and "1500000.0".
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('\u{20AA}')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse listings from any CSV source.
///
/// Only unreadable or structurally broken CSV is an error. A row with a blank
/// address field or a bad number is logged and skipped.
pub fn parse_listings<R: Read>(reader: R) -> Result<Vec<Listing>, ListingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut listings = Vec::new();
    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        // Row numbers are 1-based and count the header line.
        let row = index + 2;
        match record?.into_listing(row) {
            Ok(listing) => listings.push(listing),
            Err(err) => warn!(row, error = %err, "skipping listing row"),
        }
    }
    Ok(listings)
}

/// Load listings from a CSV file on disk.
pub fn load_listings(path: &Path) -> Result<Vec<Listing>, ListingError> {
    let file = File::open(path).map_err(|source| ListingError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let listings = parse_listings(file)?;
    info!(path = %path.display(), count = listings.len(), "loaded listings");
    Ok(listings)
}
