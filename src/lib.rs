//! Oruma palliative care server
//!
//! REST JSON API for a community palliative care clinic: patient register,
//! home visit log, equipment registry with a loan ledger, and medicine
//! dispensation records.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::{AppConfig, AuthConfig};
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    /// Kept for the readiness check
    pub repository: repository::Repository,
}

impl AppState {
    pub fn new(auth: AuthConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository.clone(), auth);
        Self {
            services: Arc::new(services),
            repository,
        }
    }
}
