//! The geocoding context: provider, cache and throttle behind one owner.
//!
//! Lookup flow: blank check → cache → (offline? stop) → provider, paced by the
//! throttle. Provider failures are logged and become `Unresolved`; nothing in
//! here returns an error to the caller.

use super::cache::GeocodeCache;
use super::provider::GeocodeProvider;
use super::throttle::Throttle;
use super::types::{GeocodeOutcome, GeocodeSummary, UnresolvedReason};
use crate::listing::Listing;
use chrono::Utc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cache,
    Provider,
    Local,
}

/// Create one per process and pass it to whoever needs addresses resolved.
pub struct Geocoder {
    provider: Box<dyn GeocodeProvider>,
    cache: GeocodeCache,
    throttle: Throttle,
    country: Option<String>,
    offline: bool,
}

impl Geocoder {
    pub fn new(provider: Box<dyn GeocodeProvider>, throttle: Throttle) -> Self {
        Self {
            provider,
            cache: GeocodeCache::new(),
            throttle,
            country: None,
            offline: false,
        }
    }

    /// Country appended to every listing address before lookup.
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.trim().is_empty());
        self
    }

    /// Offline mode: only the cache is consulted.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut GeocodeCache {
        &mut self.cache
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Resolve one free-text address.
    pub fn resolve(&mut self, address: &str) -> GeocodeOutcome {
        self.resolve_with_origin(address).0
    }

    fn resolve_with_origin(&mut self, address: &str) -> (GeocodeOutcome, Origin) {
        let address = address.trim();
        if address.is_empty() {
            return (
                GeocodeOutcome::unresolved(UnresolvedReason::EmptyAddress),
                Origin::Local,
            );
        }

        if let Some(outcome) = self.cache.get(address) {
            let age_secs = self
                .cache
                .stored_at(address)
                .map(|stored| (Utc::now() - stored).num_seconds());
            debug!(address, age_secs, "geocode cache hit");
            return (outcome, Origin::Cache);
        }

        if self.offline {
            return (
                GeocodeOutcome::unresolved(UnresolvedReason::Offline),
                Origin::Local,
            );
        }

        let provider = &self.provider;
        let answer = self.throttle.run(|| provider.lookup(address));

        let outcome = match answer {
            Ok(Some(coordinate)) => {
                info!(address, lat = coordinate.lat, lon = coordinate.lon, "geocoded");
                GeocodeOutcome::resolved(coordinate)
            }
            Ok(None) => {
                warn!(address, provider = provider.name(), "no geocoding match");
                GeocodeOutcome::unresolved(UnresolvedReason::NoMatch)
            }
            Err(err) => {
                warn!(address, provider = provider.name(), error = %err, "geocoding failed");
                GeocodeOutcome::unresolved(UnresolvedReason::Failed(err.to_string()))
            }
        };

        let cacheable = match &outcome {
            GeocodeOutcome::Resolved { .. } => true,
            GeocodeOutcome::Unresolved { reason } => reason.is_definitive(),
        };
        if cacheable {
            self.cache.put(address, outcome.clone());
        }

        (outcome, Origin::Provider)
    }

    /// Resolve a listing's address and store the coordinate on it.
    ///
    /// A listing that already has a coordinate is returned as-is.
    pub fn geocode_listing(&mut self, listing: &mut Listing) -> GeocodeOutcome {
        if let Some(coordinate) = listing.coordinate() {
            return GeocodeOutcome::resolved(coordinate);
        }
        let query = listing.geocode_query(self.country.as_deref());
        let outcome = self.resolve(&query);
        listing.set_coordinate(outcome.coordinate());
        outcome
    }

    /// Forget any cached answer for this listing and look it up again.
    ///
    /// Offline, nothing is forgotten: the listing keeps its coordinate and the
    /// cached answer stays.
    pub fn regeocode(&mut self, listing: &mut Listing) -> GeocodeOutcome {
        let query = listing.geocode_query(self.country.as_deref());
        if self.offline {
            warn!(address = %query, "offline, keeping existing geocode");
            return self.geocode_listing(listing);
        }
        self.cache.remove(&query);
        listing.set_coordinate(None);
        let outcome = self.resolve(&query);
        listing.set_coordinate(outcome.coordinate());
        outcome
    }

    /// Geocode a batch strictly one after another.
    ///
    /// Unresolved listings keep `coordinate = None` and are reported only in
    /// the log and the returned summary.
    pub fn geocode_all(&mut self, listings: &mut [Listing]) -> GeocodeSummary {
        let mut summary = GeocodeSummary::default();

        for listing in listings.iter_mut() {
            if listing.coordinate().is_some() {
                summary.skipped += 1;
                continue;
            }

            let query = listing.geocode_query(self.country.as_deref());
            let (outcome, origin) = self.resolve_with_origin(&query);
            match origin {
                Origin::Cache => summary.cache_hits += 1,
                Origin::Provider => summary.lookups += 1,
                Origin::Local => {}
            }

            match outcome {
                GeocodeOutcome::Resolved { coordinate } => {
                    listing.set_coordinate(Some(coordinate));
                    summary.resolved += 1;
                }
                GeocodeOutcome::Unresolved { reason } => {
                    if origin != Origin::Provider {
                        warn!(address = %query, %reason, "listing left unresolved");
                    }
                    summary.unresolved += 1;
                }
            }
        }

        info!(
            resolved = summary.resolved,
            unresolved = summary.unresolved,
            cache_hits = summary.cache_hits,
            lookups = summary.lookups,
            skipped = summary.skipped,
            "geocoding pass finished"
        );
        summary
    }
}

impl std::fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field("provider", &self.provider.name())
            .field("cached", &self.cache.len())
            .field("throttle", &self.throttle)
            .field("country", &self.country)
            .field("offline", &self.offline)
            .finish()
    }
}
