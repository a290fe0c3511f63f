//! Address geocoding for listings.
//!
//! Provides a pluggable provider (Nominatim by default), an in-process cache
//! and a throttle that spaces out external lookups.

pub mod cache;
pub mod geocoder;
pub mod provider;
pub mod throttle;
pub mod types;

pub use cache::GeocodeCache;
pub use geocoder::Geocoder;
pub use provider::{GeocodeProvider, NominatimProvider, NOMINATIM_SEARCH_URL};
pub use throttle::{Pacer, ThreadPacer, Throttle, DEFAULT_INTERVAL};
pub use types::{GeocodeOutcome, GeocodeSummary, ProviderError, UnresolvedReason};
