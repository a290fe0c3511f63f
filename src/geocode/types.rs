//! Core types for the geocoding subsystem.

use crate::listing::Coordinate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result of resolving one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Resolved { coordinate: Coordinate },
    Unresolved { reason: UnresolvedReason },
}

impl GeocodeOutcome {
    pub fn resolved(coordinate: Coordinate) -> Self {
        Self::Resolved { coordinate }
    }

    pub fn unresolved(reason: UnresolvedReason) -> Self {
        Self::Unresolved { reason }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved { coordinate } => Some(*coordinate),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Why an address has no coordinate. None of these abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Address text was blank; no lookup was made.
    EmptyAddress,
    /// The service answered but had no match.
    NoMatch,
    /// Offline mode and the address was not cached.
    Offline,
    /// Transport or service failure.
    Failed(String),
}

impl UnresolvedReason {
    /// Definitive answers are cached; transient failures are not.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::EmptyAddress | Self::NoMatch)
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "empty address"),
            Self::NoMatch => write!(f, "no match"),
            Self::Offline => write!(f, "offline and not cached"),
            Self::Failed(msg) => write!(f, "lookup failed: {}", msg),
        }
    }
}

/// Errors raised by a provider. The geocoder turns these into `Unresolved`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Counters reported after a batch geocode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeocodeSummary {
    pub resolved: usize,
    pub unresolved: usize,
    pub cache_hits: usize,
    pub lookups: usize,
    /// Listings that already carried a coordinate and were left alone.
    pub skipped: usize,
}
