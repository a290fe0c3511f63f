use super::PropertyFinder;
use crate::geocode::{GeocodeSummary, Geocoder};
use crate::listing::{load_listings, Listing, ListingError};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Memory(Vec<Listing>),
}

/// Listing set plus the geocoder that resolves it.
///
/// Nothing is read or geocoded until the first call that needs listings.
/// After that the geocoded set is reused for the life of the catalog.
#[derive(Debug)]
pub struct Catalog {
    source: Source,
    geocoder: Geocoder,
    listings: Vec<Listing>,
    summary: Option<GeocodeSummary>,
}

impl Catalog {
    pub fn from_path(path: impl Into<PathBuf>, geocoder: Geocoder) -> Self {
        Self::with_source(Source::File(path.into()), geocoder)
    }

    pub fn from_listings(listings: Vec<Listing>, geocoder: Geocoder) -> Self {
        Self::with_source(Source::Memory(listings), geocoder)
    }

    fn with_source(source: Source, geocoder: Geocoder) -> Self {
        Self {
            source,
            geocoder,
            listings: Vec::new(),
            summary: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.summary.is_some()
    }

    /// Summary of the geocoding pass, once it has run.
    pub fn summary(&self) -> Option<GeocodeSummary> {
        self.summary
    }

    pub fn listings(&mut self) -> Result<&[Listing], ListingError> {
        self.ensure_loaded()?;
        Ok(&self.listings)
    }

    pub fn finder(&mut self) -> Result<PropertyFinder<'_>, ListingError> {
        self.ensure_loaded()?;
        Ok(PropertyFinder::new(&self.listings))
    }

    fn ensure_loaded(&mut self) -> Result<(), ListingError> {
        if self.summary.is_some() {
            return Ok(());
        }

        // A failed file read leaves the catalog unloaded so the next call retries.
        let mut listings = match &mut self.source {
            Source::File(path) => load_listings(path.as_path())?,
            Source::Memory(listings) => std::mem::take(listings),
        };

        info!(count = listings.len(), "geocoding listing catalog");
        let summary = self.geocoder.geocode_all(&mut listings);
        self.listings = listings;
        self.summary = Some(summary);
        Ok(())
    }
}
