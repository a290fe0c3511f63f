use crate::error::AppError;
use crate::query::Catalog;
use std::sync::{Mutex, MutexGuard};

pub struct AppState {
    catalog: Mutex<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
        }
    }

    /// One writer at a time: geocoding and queries serialize on this lock.
    pub fn catalog(&self) -> Result<MutexGuard<'_, Catalog>, AppError> {
        self.catalog
            .lock()
            .map_err(|_| AppError::Internal("catalog lock poisoned".into()))
    }
}
