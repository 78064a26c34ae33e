//! Pharmacy inventory catalog service.
//!
//! A CRUD API for medicine records with JWT authentication and a
//! read-through/write-invalidate Redis cache in front of MongoDB. Writers
//! are serialized with distributed locks so concurrent mutations of the
//! same record cannot interleave their cache invalidations.

use std::sync::Arc;

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod token;

// Re-export commonly used types
pub use error::{AppError, Result};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<config::Config>,
    pub cache: Arc<cache::CacheManager>,
    pub medicines: Arc<repository::MedicineRepository>,
    pub users: Arc<repository::UserRepository>,
}
