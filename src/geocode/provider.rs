//! Geocoding providers. Nominatim is the only network-backed one.

use super::types::ProviderError;
use crate::listing::Coordinate;
use serde::Deserialize;
use std::time::Duration;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A service that turns free-text addresses into coordinates.
///
/// `Ok(None)` means the service answered with no match.
pub trait GeocodeProvider: Send {
    fn name(&self) -> &'static str;

    fn lookup(&self, address: &str) -> Result<Option<Coordinate>, ProviderError>;
}

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search, one request per lookup.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    country_codes: Option<String>,
}

impl NominatimProvider {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            timeout: Duration::from_secs(10),
            country_codes: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Restrict results to ISO 3166-1 alpha-2 codes, e.g. "il".
    pub fn with_country_codes(mut self, codes: Option<String>) -> Self {
        self.country_codes = codes.filter(|c| !c.trim().is_empty());
        self
    }
}

impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn lookup(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        let mut request = ureq::get(&self.base_url)
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .query("q", address)
            .query("format", "json")
            .query("limit", "1");
        if let Some(ref codes) = self.country_codes {
            request = request.query("countrycodes", codes);
        }

        let response = request
            .call()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        match results.first() {
            Some(top) => {
                tracing::debug!(
                    address,
                    display_name = top.display_name.as_deref().unwrap_or(""),
                    "nominatim match"
                );
                parse_coordinate(&top.lat, &top.lon).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn parse_coordinate(lat: &str, lon: &str) -> Result<Coordinate, ProviderError> {
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| ProviderError::InvalidResponse(format!("bad latitude '{}'", lat)))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| ProviderError::InvalidResponse(format!("bad longitude '{}'", lon)))?;
    Coordinate::new(lat, lon).ok_or_else(|| {
        ProviderError::InvalidResponse(format!("coordinate ({}, {}) out of range", lat, lon))
    })
}
