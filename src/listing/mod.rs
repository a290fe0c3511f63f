//! Listing records and the CSV loader that produces them.

pub mod loader;
pub mod types;

pub use loader::{load_listings, parse_listings, ListingError};
pub use types::{format_rooms, format_shekels, Coordinate, Listing, TargetPoint, CLINIC, SCHOOL};
