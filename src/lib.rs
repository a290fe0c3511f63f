//! Property finder: geocode a listing set once, then rank listings by
//! geodesic distance to a clinic and a school.

pub mod config;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod listing;
pub mod query;
pub mod ranker;
pub mod server;
pub mod telemetry;
pub mod tools;
